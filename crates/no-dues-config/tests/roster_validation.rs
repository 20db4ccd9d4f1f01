//! Roster loading tests for no-dues-config.
// crates/no-dues-config/tests/roster_validation.rs
// =============================================================================
// Module: Roster Validation Tests
// Description: Validate roster parsing, integrity checks and image loading.
// Purpose: Ensure seeded directories only ever see consistent data.
// =============================================================================

use std::fs;

use no_dues_config::ConfigError;
use no_dues_config::Roster;
use no_dues_core::DueStatus;
use no_dues_core::SignatureImage;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<Roster, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid roster".to_string()),
    }
}

const STUDENT: &str = r#"{
    "student_id": "stu-1",
    "name": "Asha Verma",
    "roll_number": "CS21B001",
    "branch": "CSE",
    "semester": 8,
    "email": "asha@example.edu",
    "mobile_number": null
}"#;

fn roster_with(students: &str, dues: &str, signatures: &str) -> String {
    format!(r#"{{"students": [{students}], "dues": [{dues}], "signatures": [{signatures}]}}"#)
}

#[test]
fn roster_parses_students_and_dues() -> TestResult {
    let due = r#"{"due_id": "d-1", "student_id": "stu-1", "department": "library",
        "description": "Overdue book", "amount_minor": 15000, "status": "PAID"}"#;
    let roster = Roster::from_json_str(&roster_with(STUDENT, due, ""))
        .map_err(|err| err.to_string())?;
    if roster.students.len() != 1 || roster.dues.len() != 1 {
        return Err("roster should carry one student and one due".to_string());
    }
    let due = &roster.dues[0];
    if due.status != DueStatus::Paid || due.department.as_str() != "LIBRARY" {
        return Err("due fields not parsed".to_string());
    }
    Ok(())
}

#[test]
fn roster_accepts_empty_document() -> TestResult {
    let roster = Roster::from_json_str("{}").map_err(|err| err.to_string())?;
    if !roster.students.is_empty() || !roster.dues.is_empty() || !roster.signatures.is_empty() {
        return Err("empty roster should have no entries".to_string());
    }
    Ok(())
}

#[test]
fn roster_rejects_duplicate_roll_numbers() -> TestResult {
    let other = STUDENT.replace("stu-1", "stu-2");
    let students = format!("{STUDENT}, {other}");
    assert_invalid(
        Roster::from_json_str(&roster_with(&students, "", "")),
        "duplicate roll number CS21B001",
    )
}

#[test]
fn roster_rejects_duplicate_student_ids() -> TestResult {
    let other = STUDENT.replace("CS21B001", "CS21B002");
    let students = format!("{STUDENT}, {other}");
    assert_invalid(Roster::from_json_str(&roster_with(&students, "", "")), "duplicate student_id")
}

#[test]
fn roster_rejects_dues_for_unknown_students() -> TestResult {
    let due = r#"{"due_id": "d-1", "student_id": "ghost", "department": "HOSTEL",
        "description": "Mess bill", "amount_minor": 100, "status": "PENDING"}"#;
    assert_invalid(
        Roster::from_json_str(&roster_with(STUDENT, due, "")),
        "references unknown student ghost",
    )
}

#[test]
fn roster_rejects_duplicate_due_ids() -> TestResult {
    let due = r#"{"due_id": "d-1", "student_id": "stu-1", "department": "HOSTEL",
        "description": "Mess bill", "amount_minor": 100, "status": "PENDING"}"#;
    let dues = format!("{due}, {due}");
    assert_invalid(Roster::from_json_str(&roster_with(STUDENT, &dues, "")), "duplicate due_id d-1")
}

#[test]
fn roster_rejects_unknown_fields() -> TestResult {
    assert_invalid(Roster::from_json_str(r#"{"staff": []}"#), "config parse error")
}

#[test]
fn roster_rejects_duplicate_signers() -> TestResult {
    let signature = r#"{"user_id": "hod-cse", "image_path": "hod.png"}"#;
    let signatures = format!("{signature}, {signature}");
    assert_invalid(
        Roster::from_json_str(&roster_with("", "", &signatures)),
        "duplicate signature for hod-cse",
    )
}

#[test]
fn roster_loads_images_relative_to_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let image_bytes = b"\x89PNG signature bytes";
    fs::create_dir(dir.path().join("signatures")).map_err(|err| err.to_string())?;
    fs::write(dir.path().join("signatures").join("hod.png"), image_bytes)
        .map_err(|err| err.to_string())?;
    let roster_path = dir.path().join("roster.json");
    let signature = r#"{"user_id": "hod-cse", "image_path": "signatures/hod.png"}"#;
    fs::write(&roster_path, roster_with(STUDENT, "", signature)).map_err(|err| err.to_string())?;

    let roster = Roster::load(&roster_path).map_err(|err| err.to_string())?;
    let image = roster.load_signature_image(&roster.signatures[0]).map_err(|err| err.to_string())?;
    if image != SignatureImage::from_bytes(image_bytes) {
        return Err("loaded image does not match file bytes".to_string());
    }
    if image.verified_bytes().as_deref() != Some(&image_bytes[..]) {
        return Err("image digest did not verify".to_string());
    }
    Ok(())
}

#[test]
fn roster_reports_missing_image() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let roster_path = dir.path().join("roster.json");
    let signature = r#"{"user_id": "hod-cse", "image_path": "missing.png"}"#;
    fs::write(&roster_path, roster_with("", "", signature)).map_err(|err| err.to_string())?;
    let roster = Roster::load(&roster_path).map_err(|err| err.to_string())?;
    match roster.load_signature_image(&roster.signatures[0]) {
        Err(ConfigError::Io(message)) if message.contains("missing.png") => Ok(()),
        Err(other) => Err(format!("unexpected error {other}")),
        Ok(_) => Err("expected missing image error".to_string()),
    }
}

#[test]
fn roster_load_rejects_non_utf8() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let roster_path = dir.path().join("roster.json");
    fs::write(&roster_path, [0xFF, 0xFE]).map_err(|err| err.to_string())?;
    assert_invalid(Roster::load(&roster_path), "roster file must be utf-8")
}
