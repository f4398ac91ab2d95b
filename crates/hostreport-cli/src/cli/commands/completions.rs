//! `hostreport completions <shell>`.

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io::Write;

use crate::cli::Cli;

pub fn run_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let mut out = std::io::stdout().lock();
    clap_complete::generate(shell, &mut cmd, "hostreport", &mut out);
    out.flush()?;
    Ok(())
}
