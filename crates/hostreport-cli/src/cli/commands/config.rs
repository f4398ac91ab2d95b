//! `hostreport config` – show where config lives and what is in effect.

use anyhow::Result;
use hostreport_core::config::{self, ReporterConfig};

pub fn run_config(cfg: &ReporterConfig) -> Result<()> {
    println!("config file: {}", config::config_path()?.display());
    println!("host:        {}", cfg.host.as_deref().unwrap_or("<unset>"));
    println!(
        "api_key:     {}",
        if cfg.api_key.is_some() { "<redacted>" } else { "<unset>" }
    );

    let policy = cfg.policy();
    println!("attempts:    {}", policy.attempts());
    println!("base delay:  {:?}", policy.base_delay);

    let options = cfg.transport_options();
    println!("connect:     {:?}", options.connect_timeout);
    println!("timeout:     {:?}", options.timeout);

    if let Err(e) = cfg.target() {
        println!("note: {}", e);
    }
    Ok(())
}
