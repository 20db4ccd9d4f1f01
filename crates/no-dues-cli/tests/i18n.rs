// crates/no-dues-cli/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Exercises the translation catalog and placeholder substitution.
// Purpose: Ensure CLI user-facing strings route through stable i18n helpers.
// Dependencies: no-dues-cli i18n module and the `t!` macro.
// ============================================================================

//! ## Overview
//! Validates the No Dues CLI i18n catalog behavior:
//! - Message arguments capture key/value substitutions.
//! - Translation falls back to keys on misses.
//! - The [`t!`](no_dues_cli::t) macro formats placeholders correctly.

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

use no_dues_cli::i18n::MessageArg;
use no_dues_cli::i18n::translate;
use no_dues_cli::t;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Confirms message arguments capture key/value pairs.
#[test]
fn message_arg_new_captures_key_and_value() {
    let arg = MessageArg::new("path", "/tmp/no-dues.toml");
    assert_eq!(arg.key, "path");
    assert_eq!(arg.value, "/tmp/no-dues.toml");
}

/// Confirms catalog entries resolve and replace placeholders.
#[test]
fn translate_substitutes_placeholders() {
    let args = vec![MessageArg::new("id", "7")];
    assert_eq!(translate("certificate.deleted", args), "Certificate 7 deleted.");
}

/// Confirms missing keys fall back to the key string.
#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("missing.key", Vec::new()), "missing.key");
}

/// Confirms the t! macro formats named arguments.
#[test]
fn t_macro_formats_message() {
    let rendered = t!("main.version", version = "0.1.0");
    assert!(rendered.contains("no-dues"));
    assert!(rendered.contains("0.1.0"));
}

/// Confirms the t! macro accepts several arguments and display values.
#[test]
fn t_macro_formats_multiple_arguments() {
    let rendered = t!("departments.list.entry", code = "LIBRARY", name = "Library");
    assert_eq!(rendered, "- LIBRARY: Library");
}
