use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

use super::list::NamedResource;

/// Full detail record for one pokemon, trimmed to the fields the snapshot
/// table needs. Unknown fields in the body are ignored; a missing expected
/// key fails the whole fetch rather than producing a partial record.
#[derive(Debug, Deserialize)]
pub struct PokemonDetail {
    pub id: i64,
    pub name: String,
    pub height: i64,
    pub weight: i64,
    /// Null upstream for species without a defined experience yield.
    pub base_experience: Option<i64>,
    pub types: Vec<TypeSlot>,
    pub abilities: Vec<AbilitySlot>,
    pub stats: Vec<StatSlot>,
}

#[derive(Debug, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
}

#[derive(Debug, Deserialize)]
pub struct StatSlot {
    pub base_stat: i64,
    pub stat: NamedResource,
}

/// Fetch one detail record. One request, no retry; any failure propagates.
pub async fn fetch_detail(client: &Client, url: &str) -> Result<PokemonDetail> {
    super::get_json(client, url).await
}
