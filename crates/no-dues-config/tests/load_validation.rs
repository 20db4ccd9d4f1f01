//! Config load validation tests for no-dues-config.
// crates/no-dues-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use no_dues_config::ConfigError;
use no_dues_config::NoDuesConfig;
use no_dues_config::StoreType;
use tempfile::NamedTempFile;

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
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(content: &str) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content.as_bytes()).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(NoDuesConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(NoDuesConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(NoDuesConfig::load(Some(&path)), "config io error")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(NoDuesConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(NoDuesConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let file = write_config("[store\ntype = ")?;
    assert_invalid(NoDuesConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_sections() -> TestResult {
    let file = write_config("[server]\nbind = \"127.0.0.1:0\"\n")?;
    assert_invalid(NoDuesConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_accepts_empty_file_with_defaults() -> TestResult {
    let file = write_config("")?;
    let config = NoDuesConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config != NoDuesConfig::default() {
        return Err("empty config should equal defaults".to_string());
    }
    if config.store.store_type != StoreType::Memory {
        return Err("default store should be memory".to_string());
    }
    Ok(())
}

#[test]
fn load_reads_full_config() -> TestResult {
    let file = write_config(
        r#"
[registry]
departments = [
    { code = "library", name = "Library" },
    { code = "HOSTEL", name = "Hostel" },
]

[store]
type = "sqlite"
path = "no-dues.db"
busy_timeout_ms = 2500
journal_mode = "delete"
sync_mode = "normal"

[audit]
sink = "file"
path = "audit.jsonl"

[numbering]
prefix = "NODUE"

[roster]
path = "roster.json"
"#,
    )?;
    let config = NoDuesConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    let service = config.service_config();
    let codes: Vec<String> =
        service.registry.departments().iter().map(|dept| dept.code.to_string()).collect();
    if codes != ["LIBRARY", "HOSTEL"] {
        return Err(format!("unexpected registry codes {}", codes.join(",")));
    }
    if service.numbering.prefix != "NODUE" {
        return Err("numbering prefix not applied".to_string());
    }
    let sqlite = config.store.sqlite_config().ok_or("expected sqlite config")?;
    if sqlite.busy_timeout_ms != 2500 || sqlite.path != Path::new("no-dues.db") {
        return Err("sqlite settings not applied".to_string());
    }
    if config.roster.path.as_deref() != Some("roster.json") {
        return Err("roster path not applied".to_string());
    }
    Ok(())
}
