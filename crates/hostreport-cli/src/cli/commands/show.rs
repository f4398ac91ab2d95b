//! `hostreport show` – print the snapshot that `report` would send.

use anyhow::{Context, Result};
use hostreport_core::{HostCollector, PayloadSource};

pub async fn run_show() -> Result<()> {
    let payload = tokio::task::spawn_blocking(|| HostCollector::new().collect())
        .await
        .context("collector task failed")??;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
