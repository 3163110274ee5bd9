//! Tests for CLI argument parsing functionality
//!
//! These tests verify that command line arguments are properly parsed,
//! including the pass count bounds and validity tier names.

use clap::Parser;
use guest_wireless_pass::types::config::{CliArgs, Command, SettingsCommand};
use guest_wireless_pass::types::{OutputFormat, ValidityPolicy};
use std::path::PathBuf;

/// Test print defaults
#[test]
fn test_print_defaults() {
    let args = CliArgs::try_parse_from(["guest-pass", "print"]).unwrap();
    assert!(args.config.is_none());
    assert!(!args.verbose);
    assert!(!args.debug);

    match args.command {
        Command::Print(print) => {
            assert_eq!(print.count, 1);
            assert_eq!(print.validity, ValidityPolicy::TwoDays);
            assert!(print.description.is_none());
            assert!(!print.preview);
            assert_eq!(print.output_format, OutputFormat::Text);
        }
        other => panic!("expected print command, got {:?}", other),
    }
}

/// Test explicit print options
#[test]
fn test_print_options() {
    let args = CliArgs::try_parse_from([
        "guest-pass",
        "print",
        "-n",
        "12",
        "--validity",
        "never",
        "--description",
        "Open day",
        "--preview",
        "--output-format",
        "json",
    ])
    .unwrap();

    match args.command {
        Command::Print(print) => {
            assert_eq!(print.count, 12);
            assert_eq!(print.validity, ValidityPolicy::Never);
            assert_eq!(print.description.as_deref(), Some("Open day"));
            assert!(print.preview);
            assert_eq!(print.output_format, OutputFormat::Json);
        }
        other => panic!("expected print command, got {:?}", other),
    }
}

/// Test count bounds are enforced by the parser
#[test]
fn test_count_bounds() {
    assert!(CliArgs::try_parse_from(["guest-pass", "print", "--count", "25"]).is_ok());
    assert!(CliArgs::try_parse_from(["guest-pass", "print", "--count", "0"]).is_err());
    assert!(CliArgs::try_parse_from(["guest-pass", "print", "--count", "26"]).is_err());
}

/// Test invalid validity tier
#[test]
fn test_invalid_validity() {
    assert!(CliArgs::try_parse_from(["guest-pass", "print", "--validity", "7"]).is_err());
}

/// Test global flags after the subcommand
#[test]
fn test_global_flags() {
    let args = CliArgs::try_parse_from([
        "guest-pass",
        "info",
        "--config",
        "/etc/guest-pass/config.xml",
        "--verbose",
        "--log-dir",
        "logs",
    ])
    .unwrap();

    assert!(matches!(args.command, Command::Info));
    assert_eq!(args.config, Some(PathBuf::from("/etc/guest-pass/config.xml")));
    assert!(args.verbose);
    assert_eq!(args.log_dir.as_deref(), Some("logs"));
}

/// Test settings subcommands
#[test]
fn test_settings_commands() {
    let args = CliArgs::try_parse_from(["guest-pass", "settings", "list"]).unwrap();
    assert!(matches!(args.command, Command::Settings(SettingsCommand::List)));

    let args =
        CliArgs::try_parse_from(["guest-pass", "settings", "set", "SSID", "CampusGuest"]).unwrap();
    match args.command {
        Command::Settings(SettingsCommand::Set { key, value, encrypted }) => {
            assert_eq!(key, "SSID");
            assert_eq!(value, "CampusGuest");
            assert!(!encrypted);
        }
        other => panic!("expected settings set, got {:?}", other),
    }

    let args = CliArgs::try_parse_from([
        "guest-pass",
        "settings",
        "get",
        "BindPassword",
        "--encrypted",
    ])
    .unwrap();
    assert!(matches!(
        args.command,
        Command::Settings(SettingsCommand::Get { encrypted: true, .. })
    ));
}

/// Test that a subcommand is required
#[test]
fn test_subcommand_required() {
    assert!(CliArgs::try_parse_from(["guest-pass"]).is_err());
}
