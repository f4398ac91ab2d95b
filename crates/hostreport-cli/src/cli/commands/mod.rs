//! CLI command handlers, one file per command.

mod completions;
mod config;
mod manpage;
mod report;
mod show;

pub use completions::run_completions;
pub use config::run_config;
pub use manpage::run_manpage;
pub use report::{run_report, ReportOverrides};
pub use show::run_show;
