// crates/no-dues-core/tests/signature_ledger.rs
// ============================================================================
// Module: Signature Ledger Tests
// Description: Seeding, single resolution and aggregate derivation.
// Purpose: Validate per-department record semantics in isolation.
// Dependencies: no-dues-core
// ============================================================================

//! ## Overview
//! Covers ledger seeding (one pending record per department, duplicates
//! refused), exactly-once resolution, and the aggregate rule where
//! rejection dominates.

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

use no_dues_core::DepartmentCode;
use no_dues_core::LedgerAggregate;
use no_dues_core::LedgerError;
use no_dues_core::SignatureImage;
use no_dues_core::SignatureLedger;
use no_dues_core::SignatureStatus;
use no_dues_core::SignerStamp;
use no_dues_core::Timestamp;
use no_dues_core::UserId;

fn codes(values: &[&str]) -> Vec<DepartmentCode> {
    values.iter().map(|value| DepartmentCode::new(value)).collect()
}

fn stamp(user: &str, at: u64) -> SignerStamp {
    SignerStamp {
        user_id: UserId::new(user),
        name: format!("{user} name"),
        at: Timestamp::Logical(at),
        comments: Some("ok".to_string()),
        image: None,
    }
}

#[test]
fn initialize_seeds_one_pending_record_per_department_in_order() {
    let ledger = SignatureLedger::initialize(&codes(&["LIBRARY", "HOD", "TRANSPORT"])).unwrap();
    let departments: Vec<&str> =
        ledger.records().iter().map(|record| record.department.as_str()).collect();
    assert_eq!(departments, vec!["LIBRARY", "HOD", "TRANSPORT"]);
    assert!(ledger.records().iter().all(|record| record.status == SignatureStatus::Pending));
    assert!(ledger.records().iter().all(|record| record.signed_by_user_id.is_none()));
    assert_eq!(ledger.aggregate_state(), LedgerAggregate::Pending);
}

#[test]
fn initialize_rejects_duplicate_departments_after_normalization() {
    let err = SignatureLedger::initialize(&codes(&["LIBRARY", " library "])).unwrap_err();
    assert_eq!(err, LedgerError::DuplicateDepartment(DepartmentCode::new("LIBRARY")));
}

#[test]
fn sign_stamps_signer_identity_and_time() {
    let mut ledger = SignatureLedger::initialize(&codes(&["LIBRARY", "HOD"])).unwrap();
    let image = SignatureImage::from_bytes(b"png-bytes");
    let record = ledger
        .sign(
            &DepartmentCode::new("LIBRARY"),
            SignerStamp {
                image: Some(image.clone()),
                ..stamp("librarian", 7)
            },
        )
        .unwrap()
        .clone();
    assert_eq!(record.status, SignatureStatus::Signed);
    assert_eq!(record.signed_by_user_id, Some(UserId::new("librarian")));
    assert_eq!(record.signed_by_name.as_deref(), Some("librarian name"));
    assert_eq!(record.signed_at, Some(Timestamp::Logical(7)));
    assert_eq!(record.comments.as_deref(), Some("ok"));
    assert_eq!(record.e_signature, Some(image));
    assert_eq!(ledger.aggregate_state(), LedgerAggregate::Partial);
}

#[test]
fn second_resolution_fails_and_leaves_record_unchanged() {
    let mut ledger = SignatureLedger::initialize(&codes(&["LIBRARY"])).unwrap();
    let library = DepartmentCode::new("LIBRARY");
    ledger.sign(&library, stamp("first", 1)).unwrap();
    let before = ledger.record(&library).unwrap().clone();

    let sign_again = ledger.sign(&library, stamp("second", 2)).unwrap_err();
    assert_eq!(
        sign_again,
        LedgerError::AlreadyResolved {
            department: library.clone(),
            status: SignatureStatus::Signed,
        }
    );
    let reject_after = ledger.reject(&library, stamp("second", 3)).unwrap_err();
    assert!(matches!(reject_after, LedgerError::AlreadyResolved { .. }));
    assert_eq!(ledger.record(&library), Some(&before));
}

#[test]
fn unknown_department_is_not_found() {
    let mut ledger = SignatureLedger::initialize(&codes(&["LIBRARY"])).unwrap();
    let err = ledger.sign(&DepartmentCode::new("SPORTS"), stamp("u", 1)).unwrap_err();
    assert_eq!(err, LedgerError::NotFound(DepartmentCode::new("SPORTS")));
}

#[test]
fn reject_drops_signature_image() {
    let mut ledger = SignatureLedger::initialize(&codes(&["LIBRARY"])).unwrap();
    let record = ledger
        .reject(
            &DepartmentCode::new("library"),
            SignerStamp {
                image: Some(SignatureImage::from_bytes(b"img")),
                ..stamp("librarian", 1)
            },
        )
        .unwrap();
    assert_eq!(record.status, SignatureStatus::Rejected);
    assert!(record.e_signature.is_none());
}

#[test]
fn aggregate_follows_rejection_dominance() {
    let mut ledger = SignatureLedger::initialize(&codes(&["A", "B", "C"])).unwrap();
    ledger.sign(&DepartmentCode::new("A"), stamp("u", 1)).unwrap();
    assert_eq!(ledger.aggregate_state(), LedgerAggregate::Partial);
    ledger.reject(&DepartmentCode::new("B"), stamp("u", 2)).unwrap();
    assert_eq!(ledger.aggregate_state(), LedgerAggregate::Rejected);
    ledger.sign(&DepartmentCode::new("C"), stamp("u", 3)).unwrap();
    assert_eq!(ledger.aggregate_state(), LedgerAggregate::Rejected);
}

#[test]
fn aggregate_is_all_signed_once_every_record_signed() {
    let mut ledger = SignatureLedger::initialize(&codes(&["A", "B"])).unwrap();
    ledger.sign(&DepartmentCode::new("B"), stamp("u", 1)).unwrap();
    ledger.sign(&DepartmentCode::new("A"), stamp("u", 2)).unwrap();
    assert_eq!(ledger.aggregate_state(), LedgerAggregate::AllSigned);
}

#[test]
fn empty_ledger_is_all_signed() {
    let ledger = SignatureLedger::initialize(&[]).unwrap();
    assert!(ledger.is_empty());
    assert_eq!(ledger.aggregate_state(), LedgerAggregate::AllSigned);
}
