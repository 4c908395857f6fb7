use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use reqwest::{Client, Method};
use tracing::{debug, info};
use url::Url;

use crate::config::StorageConfig;

pub mod auth;

/// Snapshot filename for a run started at `at`.
pub fn snapshot_file_name(at: DateTime<Local>) -> String {
    format!("pokemon_full_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

/// Data Lake Gen2 sink. Holds the injected storage configuration for the
/// run; one instance uploads one snapshot file.
pub struct DataLakeSink {
    http: Client,
    account: String,
    access_key: String,
    container: String,
    endpoint_suffix: String,
}

impl DataLakeSink {
    pub fn new(http: Client, storage: &StorageConfig) -> Self {
        Self {
            http,
            account: storage.account.clone(),
            access_key: storage.access_key.clone(),
            container: storage.container.clone(),
            endpoint_suffix: storage.endpoint_suffix.clone(),
        }
    }

    /// Upload `payload` as `file_name` in the configured container: create
    /// the file handle, append the whole payload at offset 0, then flush to
    /// commit. A failure after append leaves an uncommitted remote file
    /// behind; nothing is rolled back.
    pub async fn upload(&self, file_name: &str, payload: String) -> Result<()> {
        let length = payload.len();

        self.create(file_name).await?;
        debug!(file = file_name, "created remote file");

        self.append(file_name, payload).await?;
        debug!(file = file_name, bytes = length, "appended payload");

        self.flush(file_name, length).await?;
        info!(file = file_name, bytes = length, "committed remote file");

        Ok(())
    }

    async fn create(&self, file_name: &str) -> Result<()> {
        self.request(Method::PUT, file_name, &[("resource", "file")], String::new())
            .await
            .with_context(|| {
                format!("creating {} in container {}", file_name, self.container)
            })
    }

    async fn append(&self, file_name: &str, payload: String) -> Result<()> {
        self.request(
            Method::PATCH,
            file_name,
            &[("action", "append"), ("position", "0")],
            payload,
        )
        .await
        .with_context(|| format!("appending to {}", file_name))
    }

    async fn flush(&self, file_name: &str, length: usize) -> Result<()> {
        let position = length.to_string();
        self.request(
            Method::PATCH,
            file_name,
            &[("action", "flush"), ("position", position.as_str())],
            String::new(),
        )
        .await
        .with_context(|| format!("flushing {}", file_name))
    }

    async fn request(
        &self,
        method: Method,
        file_name: &str,
        query: &[(&str, &str)],
        body: String,
    ) -> Result<()> {
        let path = format!("/{}/{}", self.container, file_name);
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let x_ms_headers = [
            ("x-ms-date", date.as_str()),
            ("x-ms-version", auth::MS_VERSION),
        ];
        let authorization = auth::authorization(
            &self.account,
            &self.access_key,
            method.as_str(),
            body.len(),
            &x_ms_headers,
            &path,
            query,
        )?;

        let mut url = Url::parse(&format!(
            "https://{}.dfs.{}{}",
            self.account, self.endpoint_suffix, path
        ))?;
        url.query_pairs_mut().extend_pairs(query);

        self.http
            .request(method, url)
            .header("x-ms-date", date)
            .header("x-ms-version", auth::MS_VERSION)
            .header("authorization", authorization)
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
