use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;

pub mod detail;
pub mod list;

pub use detail::PokemonDetail;
pub use list::{NamedResource, PokemonPage};

/// GET `url` and deserialize the JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .json::<T>()
        .await
        .with_context(|| format!("Reading JSON from {}", url))
}
