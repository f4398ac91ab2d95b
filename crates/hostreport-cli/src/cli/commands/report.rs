//! `hostreport report` – collect a snapshot and deliver it.

use anyhow::{Context, Result};
use hostreport_core::config::{ReporterConfig, RetryConfig};
use hostreport_core::delivery::{publish_with, publish_with_async, ThreadSleeper};
use hostreport_core::transport::CurlTransport;
use hostreport_core::{DeliveryResult, HostCollector, PayloadSource};

/// Flag values that take precedence over config file and environment.
#[derive(Debug, Clone, Default)]
pub struct ReportOverrides {
    pub host: Option<String>,
    pub api_key: Option<String>,
    pub attempts: Option<u32>,
    pub base_delay: Option<f64>,
    pub use_async: bool,
}

impl ReportOverrides {
    pub fn apply(&self, cfg: &mut ReporterConfig) {
        if let Some(host) = &self.host {
            cfg.host = Some(host.clone());
        }
        if let Some(key) = &self.api_key {
            cfg.api_key = Some(key.clone());
        }
        if self.attempts.is_some() || self.base_delay.is_some() {
            let retry = cfg.retry.get_or_insert_with(RetryConfig::default);
            if let Some(n) = self.attempts {
                retry.max_attempts = n;
            }
            if let Some(secs) = self.base_delay {
                retry.base_delay_secs = secs;
            }
        }
    }
}

pub async fn run_report(mut cfg: ReporterConfig, overrides: ReportOverrides) -> Result<()> {
    overrides.apply(&mut cfg);
    let target = cfg.target()?;
    let policy = cfg.policy();
    tracing::debug!("report target: {:?}, policy: {:?}", target, policy);

    // sysinfo and the GPU probe block; keep them off the runtime threads.
    let payload = tokio::task::spawn_blocking(|| HostCollector::new().collect())
        .await
        .context("collector task failed")??;
    tracing::info!(
        "collected payload: {}",
        serde_json::to_string(&payload).unwrap_or_default()
    );

    let captured_at = payload.captured_at();
    let transport = CurlTransport::new(&target.host, &target.api_key, cfg.transport_options());

    let result = if overrides.use_async {
        publish_with_async(&payload, transport, &policy).await
    } else {
        tokio::task::spawn_blocking(move || {
            publish_with(&payload, transport, &policy, ThreadSleeper)
        })
        .await
        .context("delivery task failed")?
    };

    match result {
        DeliveryResult::Delivered => {
            println!("Data sent for {}", captured_at);
            Ok(())
        }
        DeliveryResult::Abandoned(reason) => {
            anyhow::bail!("delivery abandoned: {}", reason)
        }
    }
}
