use anyhow::Result;
use chrono::Local;
use pokesnap::{
    config::Config,
    fetch,
    sink::{snapshot_file_name, DataLakeSink},
    table,
};
use reqwest::Client;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) load configuration ───────────────────────────────────────
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    info!(
        base_url = %config.api.base_url,
        page_limit = config.api.page_limit,
        container = %config.storage.container,
        "configured"
    );

    let client = Client::new();

    // ─── 3) list entity references ───────────────────────────────────
    let page = fetch::list::fetch_page(&client, &config.api).await?;
    info!(listed = page.results.len(), total = page.count, "listed pokemon");
    if page.next.is_some() {
        // First page only; the remainder is out of this snapshot's scope.
        info!(
            beyond_snapshot = page.count.saturating_sub(page.results.len() as u64),
            "source has more entries than one page"
        );
    }

    // ─── 4) fetch details one at a time, flatten to rows ─────────────
    let mut rows = Vec::with_capacity(page.results.len());
    for reference in &page.results {
        let detail = fetch::detail::fetch_detail(&client, &reference.url).await?;
        debug!(name = %detail.name, id = detail.id, "fetched detail");
        rows.push(table::Row::from_detail(&detail));
    }

    // ─── 5) serialize and commit the snapshot ────────────────────────
    let csv = table::to_csv(&rows);
    let file_name = snapshot_file_name(Local::now());
    let sink = DataLakeSink::new(client, &config.storage);
    sink.upload(&file_name, csv).await?;

    info!(
        "✅ uploaded {} with {} pokemon records to container '{}'",
        file_name,
        rows.len(),
        config.storage.container
    );
    Ok(())
}
