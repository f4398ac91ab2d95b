//! Tests for show, config, completions, manpage.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;

#[test]
fn cli_parse_show() {
    match parse(&["hostreport", "show"]) {
        CliCommand::Show => {}
        _ => panic!("expected Show"),
    }
}

#[test]
fn cli_parse_config() {
    match parse(&["hostreport", "config"]) {
        CliCommand::Config => {}
        _ => panic!("expected Config"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["hostreport", "completions", "zsh"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, Shell::Zsh),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_completions_requires_known_shell() {
    assert!(Cli::try_parse_from(["hostreport", "completions"]).is_err());
    assert!(Cli::try_parse_from(["hostreport", "completions", "cmd.exe"]).is_err());
}

#[test]
fn cli_parse_manpage() {
    match parse(&["hostreport", "manpage"]) {
        CliCommand::Manpage => {}
        _ => panic!("expected Manpage"),
    }
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["hostreport"]).is_err());
    assert!(Cli::try_parse_from(["hostreport", "download"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn manpage_mentions_subcommands() {
    let mut out = Vec::new();
    clap_mangen::Man::new(Cli::command()).render(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("hostreport"));
    assert!(text.contains("report"));
}

#[test]
fn bash_completions_list_report() {
    let mut out = Vec::new();
    clap_complete::generate(Shell::Bash, &mut Cli::command(), "hostreport", &mut out);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("report"));
    assert!(text.contains("--api-key"));
}
