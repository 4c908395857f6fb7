use anyhow::{Context, Result};
use std::env;

/// Source API settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the PokéAPI, without a trailing slash.
    pub base_url: String,
    /// Page size requested from the list endpoint. Only the first page is
    /// fetched, so this bounds the whole snapshot.
    pub page_limit: u32,
}

/// Data Lake Gen2 destination settings. Account and key carry no defaults
/// and must come from the environment.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub account: String,
    pub access_key: String,
    pub container: String,
    pub endpoint_suffix: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Build the run configuration from the environment. A missing storage
    /// account or key fails the run before any network call is made.
    pub fn from_env() -> Result<Self> {
        let api = ApiConfig {
            base_url: env_or("POKEAPI_BASE_URL", "https://pokeapi.co/api/v2"),
            page_limit: env::var("POKEAPI_PAGE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
        };

        let storage = StorageConfig {
            account: env::var("AZURE_STORAGE_ACCOUNT")
                .context("AZURE_STORAGE_ACCOUNT must be set")?,
            access_key: env::var("AZURE_STORAGE_ACCESS_KEY")
                .context("AZURE_STORAGE_ACCESS_KEY must be set")?,
            container: env_or("AZURE_STORAGE_CONTAINER", "bronze"),
            endpoint_suffix: env_or("AZURE_STORAGE_ENDPOINT_SUFFIX", "core.windows.net"),
        };

        Ok(Self { api, storage })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
