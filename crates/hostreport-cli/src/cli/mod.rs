//! CLI for hostreport.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use hostreport_core::config;

use commands::{run_completions, run_config, run_manpage, run_report, run_show, ReportOverrides};

/// Top-level CLI for hostreport.
#[derive(Debug, Parser)]
#[command(name = "hostreport")]
#[command(about = "Collect a host snapshot and report it to a collector", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Collect a snapshot and deliver it to the collector.
    Report {
        /// Collector base URL (overrides config and HOSTREPORT_HOST).
        #[arg(long, value_name = "URL")]
        host: Option<String>,
        /// API key sent as X-API-KEY (overrides config and HOSTREPORT_API_KEY).
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,
        /// Maximum delivery attempts, including the first.
        #[arg(long, value_name = "N")]
        attempts: Option<u32>,
        /// Base backoff delay in seconds.
        #[arg(long, value_name = "SECS")]
        base_delay: Option<f64>,
        /// Back off on the async runtime instead of blocking the thread.
        #[arg(long = "async")]
        use_async: bool,
    },

    /// Collect a snapshot and print it as JSON without sending it.
    Show,

    /// Print the config file path and the effective configuration.
    Config,

    /// Generate shell completions on stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Render the man page (roff) on stdout.
    Manpage,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Report {
                host,
                api_key,
                attempts,
                base_delay,
                use_async,
            } => {
                let mut cfg = config::load_or_init()?;
                cfg.apply_env_overrides(|k| std::env::var(k).ok());
                let overrides = ReportOverrides {
                    host,
                    api_key,
                    attempts,
                    base_delay,
                    use_async,
                };
                run_report(cfg, overrides).await?;
            }
            CliCommand::Show => run_show().await?,
            CliCommand::Config => {
                let mut cfg = config::load_or_init()?;
                cfg.apply_env_overrides(|k| std::env::var(k).ok());
                run_config(&cfg)?;
            }
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Manpage => run_manpage()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
