// crates/no-dues-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Unit tests for catalog parity and locale parsing.
// Purpose: Ensure CLI localization remains consistent across supported locales.
// Dependencies: no-dues-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies the CLI message catalogs stay in sync, locale parsing is tolerant,
//! and locale templates preserve placeholder parity with English.

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

use std::collections::BTreeSet;

use crate::i18n::Locale;
use crate::i18n::MessageArg;
use crate::i18n::SUPPORTED_LOCALES;
use crate::i18n::catalog_entries_for;
use crate::i18n::catalog_for;
use crate::i18n::translate;

fn parse_placeholder_names(template: &str) -> Result<BTreeSet<String>, String> {
    let mut placeholders = BTreeSet::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        if rest[.. start].contains('}') {
            return Err("unmatched '}'".to_string());
        }
        let after = &rest[start + 1 ..];
        let end = after.find('}').ok_or_else(|| "unclosed '{'".to_string())?;
        let name = &after[.. end];
        if name.is_empty() {
            return Err("empty placeholder".to_string());
        }
        if name.contains('{') {
            return Err(format!("nested '{{' in '{name}'"));
        }
        if !name.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_') {
            return Err(format!("placeholder '{name}' must use [a-z0-9_]"));
        }
        placeholders.insert(name.to_string());
        rest = &after[end + 1 ..];
    }
    if rest.contains('}') {
        return Err("unmatched '}'".to_string());
    }
    Ok(placeholders)
}

#[test]
fn catalogs_have_matching_keys() {
    assert!(SUPPORTED_LOCALES.contains(&Locale::En), "English must remain the baseline locale");
    let en_keys: BTreeSet<&'static str> = catalog_for(Locale::En).keys().copied().collect();
    for locale in SUPPORTED_LOCALES {
        let locale_keys: BTreeSet<&'static str> = catalog_for(*locale).keys().copied().collect();
        assert_eq!(en_keys, locale_keys, "locale catalogs must stay in parity ({locale:?})");
    }
}

#[test]
fn catalogs_have_unique_keys_per_locale() {
    for locale in SUPPORTED_LOCALES {
        let entries = catalog_entries_for(*locale);
        let keys: BTreeSet<&str> = entries.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys.len(), entries.len(), "duplicate catalog keys in locale {locale:?}");
    }
}

#[test]
fn catalogs_have_placeholder_shape_parity_with_english() {
    let en_catalog = catalog_for(Locale::En);
    for (key, en_template) in en_catalog {
        let en_placeholders = parse_placeholder_names(en_template)
            .unwrap_or_else(|error| panic!("invalid placeholder in '{key}' (en): {error}"));
        for locale in SUPPORTED_LOCALES {
            let template = catalog_for(*locale).get(key).copied().expect("key exists");
            let placeholders = parse_placeholder_names(template).unwrap_or_else(|error| {
                panic!("invalid placeholder in '{key}' ({locale:?}): {error}")
            });
            assert_eq!(
                en_placeholders, placeholders,
                "placeholder set mismatch for key '{key}' in locale {locale:?}"
            );
        }
    }
}

#[test]
fn hindi_differs_for_curated_keys() {
    const CURATED_KEYS: &[&str] =
        &["config.validate.ok", "certificate.list.none", "i18n.disclaimer.machine_translated"];
    for key in CURATED_KEYS {
        let en = catalog_for(Locale::En).get(key).copied().expect("en key exists");
        let hi = catalog_for(Locale::Hi).get(key).copied().expect("hi key exists");
        assert_ne!(en, hi, "Hindi must differ from English for curated key '{key}'");
    }
}

#[test]
fn locale_parse_accepts_region_tags_and_case() {
    assert_eq!(Locale::parse("en"), Some(Locale::En));
    assert_eq!(Locale::parse("EN"), Some(Locale::En));
    assert_eq!(Locale::parse("en-IN"), Some(Locale::En));
    assert_eq!(Locale::parse("hi"), Some(Locale::Hi));
    assert_eq!(Locale::parse("hi_IN"), Some(Locale::Hi));
    assert_eq!(Locale::parse(" HI "), Some(Locale::Hi));
    assert_eq!(Locale::parse(""), None);
    assert_eq!(Locale::parse("ca"), None);
}

#[test]
fn locale_labels_round_trip() {
    for locale in SUPPORTED_LOCALES {
        assert_eq!(Locale::parse(locale.as_str()), Some(*locale));
    }
}

#[test]
fn translate_substitutes_placeholders() {
    let output = translate(
        "audit.open_failed",
        vec![MessageArg::new("path", "/var/log/no-dues.jsonl"), MessageArg::new("error", "denied")],
    );
    assert!(output.contains("/var/log/no-dues.jsonl"));
    assert!(output.contains("denied"));
}

#[test]
fn fallback_chain_en_to_key() {
    let nonexistent_key = "nonexistent.key.does.not.exist";
    assert_eq!(translate(nonexistent_key, vec![]), nonexistent_key);
}
