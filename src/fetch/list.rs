use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::ApiConfig;

/// Lightweight pointer to a detail record, as returned by list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One page of the pokemon list endpoint.
#[derive(Debug, Deserialize)]
pub struct PokemonPage {
    /// Total entries the source knows about, which may exceed this page.
    pub count: u64,
    pub next: Option<String>,
    pub results: Vec<NamedResource>,
}

/// Fetch the first page of pokemon references, up to `page_limit` entries.
/// Later pages are not followed; the snapshot covers the first page only.
pub async fn fetch_page(client: &Client, api: &ApiConfig) -> Result<PokemonPage> {
    let url = Url::parse_with_params(
        &format!("{}/pokemon", api.base_url.trim_end_matches('/')),
        [("limit", api.page_limit.to_string())],
    )?;
    super::get_json(client, url.as_str()).await
}
