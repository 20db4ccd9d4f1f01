// crates/no-dues-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing and session helpers.
// Purpose: Ensure actor flags, timestamps and identifiers fail closed.
// Dependencies: no-dues-cli main helpers
// ============================================================================

//! ## Overview
//! Validates the CLI helpers that turn flags into service inputs: actor
//! construction, timestamp overrides, certificate identifiers, locale
//! resolution and text rendering.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use clap::Parser;
use no_dues_cli::i18n::Locale;
use no_dues_config::NoDuesConfig;
use no_dues_core::CertificateFilter;
use no_dues_core::CertificateStore;
use no_dues_core::DepartmentCode;
use no_dues_core::Role;
use no_dues_core::RollNumber;
use no_dues_core::Timestamp;

use super::CertificateCommand;
use super::Cli;
use super::CliStore;
use super::Commands;
use super::LangArg;
use super::OutputFormat;
use super::RoleArg;
use super::SessionArgs;
use super::build_actor;
use super::format_minor_units;
use super::open_store;
use super::parse_certificate_id;
use super::render_summaries_text;
use super::resolve_locale;
use super::resolve_timestamp;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn session(roles: Vec<RoleArg>) -> SessionArgs {
    SessionArgs {
        config: None,
        user_id: "lib-admin".to_string(),
        display_name: None,
        roles,
        home_department: Some("library".to_string()),
        actor_roll_number: None,
        at_unix_ms: None,
        format: OutputFormat::Text,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn build_actor_requires_a_role() {
    let error = build_actor(&session(Vec::new())).unwrap_err();
    assert!(error.to_string().contains("--role"));
}

#[test]
fn build_actor_maps_flags() {
    let actor = build_actor(&session(vec![RoleArg::DepartmentAdmin, RoleArg::Hod])).unwrap();
    assert_eq!(actor.user_id.as_str(), "lib-admin");
    assert_eq!(actor.display_name, "lib-admin");
    assert!(actor.has_role(Role::DepartmentAdmin));
    assert!(actor.has_role(Role::Hod));
    assert_eq!(actor.home_department, Some(DepartmentCode::new("LIBRARY")));
    assert_eq!(actor.roll_number, None);
}

#[test]
fn resolve_timestamp_honors_override() {
    assert_eq!(
        resolve_timestamp(Some(1_700_000_000_000)).unwrap(),
        Timestamp::UnixMillis(1_700_000_000_000)
    );
    assert!(resolve_timestamp(Some(-1)).is_err());
    assert!(matches!(resolve_timestamp(None).unwrap(), Timestamp::UnixMillis(millis) if millis > 0));
}

#[test]
fn parse_certificate_id_rejects_zero() {
    assert!(parse_certificate_id(0).is_err());
    assert_eq!(parse_certificate_id(7).unwrap().to_string(), "7");
}

#[test]
fn resolve_locale_prefers_flag_then_env() {
    assert_eq!(resolve_locale(Some(LangArg::Hi), Some("en")).unwrap(), Locale::Hi);
    assert_eq!(resolve_locale(None, Some("hi-IN")).unwrap(), Locale::Hi);
    assert_eq!(resolve_locale(None, None).unwrap(), Locale::En);
    let error = resolve_locale(None, Some("fr")).unwrap_err();
    assert!(error.to_string().contains("NO_DUES_LANG"));
}

#[test]
fn format_minor_units_pads_cents() {
    assert_eq!(format_minor_units(15_000), "150.00");
    assert_eq!(format_minor_units(1_205), "12.05");
    assert_eq!(format_minor_units(7), "0.07");
}

#[test]
fn render_summaries_text_reports_empty_listing() {
    assert_eq!(render_summaries_text(&[]), "No certificates found.");
}

#[test]
fn default_config_opens_memory_store() {
    let store = open_store(&NoDuesConfig::default()).unwrap();
    assert!(matches!(store, CliStore::Memory(_)));
    assert!(store.list(&CertificateFilter::default()).unwrap().is_empty());
    let first = store.allocate_id().unwrap();
    let second = store.allocate_id().unwrap();
    assert!(second > first);
}

#[test]
fn cli_parses_sign_command() {
    let cli = Cli::try_parse_from([
        "no-dues",
        "certificate",
        "sign",
        "--user-id",
        "lib-admin",
        "--role",
        "department-admin",
        "--home-department",
        "LIBRARY",
        "--id",
        "3",
        "--department",
        "library",
        "--e-signature",
        "--format",
        "json",
    ])
    .unwrap();
    let Some(Commands::Certificate {
        command: CertificateCommand::Sign(command),
    }) = cli.command
    else {
        panic!("expected certificate sign command");
    };
    assert_eq!(command.id, 3);
    assert_eq!(command.department, "library");
    assert!(command.e_signature);
    assert_eq!(command.session.roles, vec![RoleArg::DepartmentAdmin]);
    assert_eq!(command.session.format, OutputFormat::Json);
}

#[test]
fn cli_parses_list_filters() {
    let cli = Cli::try_parse_from([
        "no-dues",
        "certificate",
        "list",
        "--user-id",
        "stu-1",
        "--role",
        "student",
        "--actor-roll-number",
        "CS21B001",
        "--roll-number",
        "CS21B001",
        "--status",
        "all-signed",
    ])
    .unwrap();
    let Some(Commands::Certificate {
        command: CertificateCommand::List(command),
    }) = cli.command
    else {
        panic!("expected certificate list command");
    };
    let actor = build_actor(&command.session).unwrap();
    assert!(actor.is_student(&RollNumber::new("CS21B001")));
    assert_eq!(command.roll_number.as_deref(), Some("CS21B001"));
    assert!(command.status.is_some());
}

#[test]
fn cli_rejects_unknown_role() {
    let result = Cli::try_parse_from([
        "no-dues",
        "certificate",
        "show",
        "--user-id",
        "x",
        "--role",
        "registrar",
        "--id",
        "1",
    ]);
    assert!(result.is_err());
}
