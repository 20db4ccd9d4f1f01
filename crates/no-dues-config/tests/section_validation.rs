//! Section validation tests for no-dues-config.
// crates/no-dues-config/tests/section_validation.rs
// =============================================================================
// Module: Config Section Validation Tests
// Description: Validate registry, store, audit, numbering and roster sections.
// Purpose: Ensure invalid section values fail closed with clear messages.
// =============================================================================

use no_dues_config::AuditSinkType;
use no_dues_config::ConfigError;
use no_dues_config::NoDuesConfig;
use no_dues_core::DepartmentCode;
use no_dues_core::DepartmentRegistry;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<NoDuesConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

#[test]
fn registry_defaults_to_institution_departments() -> TestResult {
    let config = NoDuesConfig::from_toml_str("").map_err(|err| err.to_string())?;
    let registry = config.registry.to_registry();
    if registry != DepartmentRegistry::institution_default() {
        return Err("default registry should match the institution list".to_string());
    }
    if registry.len() != 22 {
        return Err(format!("expected 22 departments, got {}", registry.len()));
    }
    Ok(())
}

#[test]
fn registry_rejects_duplicate_codes_after_normalization() -> TestResult {
    let toml = r#"
[registry]
departments = [
    { code = "library", name = "Library" },
    { code = " LIBRARY ", name = "Central Library" },
]
"#;
    assert_invalid(NoDuesConfig::from_toml_str(toml), "duplicate code LIBRARY")
}

#[test]
fn registry_rejects_empty_code() -> TestResult {
    let toml = r#"
[registry]
departments = [{ code = "  ", name = "Blank" }]
"#;
    assert_invalid(NoDuesConfig::from_toml_str(toml), "code must be non-empty")
}

#[test]
fn registry_rejects_empty_name() -> TestResult {
    let toml = r#"
[registry]
departments = [{ code = "HOSTEL", name = "" }]
"#;
    assert_invalid(NoDuesConfig::from_toml_str(toml), "name for HOSTEL must be non-empty")
}

#[test]
fn registry_accepts_empty_department_list() -> TestResult {
    let toml = "[registry]\ndepartments = []\n";
    let config = NoDuesConfig::from_toml_str(toml).map_err(|err| err.to_string())?;
    if !config.registry.to_registry().is_empty() {
        return Err("explicit empty registry should stay empty".to_string());
    }
    Ok(())
}

#[test]
fn registry_normalizes_codes() -> TestResult {
    let toml = r#"
[registry]
departments = [{ code = "sports", name = "Sports" }]
"#;
    let config = NoDuesConfig::from_toml_str(toml).map_err(|err| err.to_string())?;
    let codes = config.registry.to_registry().list_required_departments();
    if codes != vec![DepartmentCode::new("SPORTS")] {
        return Err("department code should be upper case".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Store
// ============================================================================

#[test]
fn sqlite_store_requires_path() -> TestResult {
    assert_invalid(NoDuesConfig::from_toml_str("[store]\ntype = \"sqlite\"\n"), "requires path")
}

#[test]
fn memory_store_rejects_path() -> TestResult {
    let toml = "[store]\ntype = \"memory\"\npath = \"store.db\"\n";
    assert_invalid(NoDuesConfig::from_toml_str(toml), "memory store must not set path")
}

#[test]
fn sqlite_store_rejects_zero_busy_timeout() -> TestResult {
    let toml = "[store]\ntype = \"sqlite\"\npath = \"store.db\"\nbusy_timeout_ms = 0\n";
    assert_invalid(NoDuesConfig::from_toml_str(toml), "busy_timeout_ms must be greater than zero")
}

#[test]
fn store_rejects_unknown_type() -> TestResult {
    assert_invalid(NoDuesConfig::from_toml_str("[store]\ntype = \"redis\"\n"), "config parse error")
}

#[test]
fn memory_store_has_no_sqlite_config() -> TestResult {
    let config = NoDuesConfig::from_toml_str("").map_err(|err| err.to_string())?;
    if config.store.sqlite_config().is_some() {
        return Err("memory store should not yield sqlite config".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Audit
// ============================================================================

#[test]
fn audit_defaults_to_stderr() -> TestResult {
    let config = NoDuesConfig::from_toml_str("").map_err(|err| err.to_string())?;
    if config.audit.sink != AuditSinkType::Stderr {
        return Err("audit sink should default to stderr".to_string());
    }
    Ok(())
}

#[test]
fn audit_file_sink_requires_path() -> TestResult {
    let toml = "[audit]\nsink = \"file\"\n";
    assert_invalid(NoDuesConfig::from_toml_str(toml), "requires audit.path")
}

#[test]
fn audit_path_requires_file_sink() -> TestResult {
    let toml = "[audit]\nsink = \"none\"\npath = \"audit.jsonl\"\n";
    assert_invalid(NoDuesConfig::from_toml_str(toml), "only valid with audit.sink")
}

#[test]
fn audit_file_path_rejects_blank() -> TestResult {
    let toml = "[audit]\nsink = \"file\"\npath = \"   \"\n";
    assert_invalid(NoDuesConfig::from_toml_str(toml), "audit.path must be non-empty")
}

// ============================================================================
// SECTION: Numbering
// ============================================================================

#[test]
fn numbering_defaults_to_ndc() -> TestResult {
    let config = NoDuesConfig::from_toml_str("").map_err(|err| err.to_string())?;
    if config.numbering.to_numbering().prefix != "NDC" {
        return Err("default prefix should be NDC".to_string());
    }
    Ok(())
}

#[test]
fn numbering_rejects_empty_prefix() -> TestResult {
    assert_invalid(NoDuesConfig::from_toml_str("[numbering]\nprefix = \"\"\n"), "1..=16 characters")
}

#[test]
fn numbering_rejects_long_prefix() -> TestResult {
    let toml = format!("[numbering]\nprefix = \"{}\"\n", "A".repeat(17));
    assert_invalid(NoDuesConfig::from_toml_str(&toml), "1..=16 characters")
}

#[test]
fn numbering_rejects_non_alphanumeric_prefix() -> TestResult {
    let toml = "[numbering]\nprefix = \"NDC-\"\n";
    assert_invalid(NoDuesConfig::from_toml_str(toml), "ascii alphanumeric")
}

// ============================================================================
// SECTION: Roster
// ============================================================================

#[test]
fn roster_path_rejects_blank() -> TestResult {
    assert_invalid(
        NoDuesConfig::from_toml_str("[roster]\npath = \"\"\n"),
        "roster.path must be non-empty",
    )
}
