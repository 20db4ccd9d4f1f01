// crates/no-dues-core/tests/audit_sinks.rs
// ============================================================================
// Module: Audit Sink Tests
// Description: One audit event per operation and JSON-lines file output.
// Purpose: Validate outcome classification and the on-disk record shape.
// Dependencies: no-dues-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Checks that the service emits exactly one audit event per call with the
//! right outcome, and that the file sink writes parseable JSON lines.

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

mod common;

use std::fs;

use common::STUDENT_ROLL;
use common::admin;
use common::at;
use common::fixture;
use common::student_ctx;
use no_dues_core::AuditEvent;
use no_dues_core::AuditEventParams;
use no_dues_core::AuditOutcome;
use no_dues_core::AuditSink;
use no_dues_core::CertificateId;
use no_dues_core::DepartmentCode;
use no_dues_core::DueStatus;
use no_dues_core::FileAuditSink;
use no_dues_core::RequestCertificate;
use no_dues_core::RollNumber;
use no_dues_core::SignDepartmentRequest;
use no_dues_core::Timestamp;
use no_dues_core::UserId;
use serde_json::Value;

fn request_for(roll: &str) -> RequestCertificate {
    RequestCertificate {
        roll_number: RollNumber::new(roll),
        requested_at: at(0),
    }
}

#[test]
fn every_operation_emits_one_classified_event() {
    let fixture = fixture(&["LIBRARY"]);
    let view = fixture.service.request_certificate(&admin(), &request_for(STUDENT_ROLL)).unwrap();
    let sign = SignDepartmentRequest {
        certificate_id: view.id,
        department: DepartmentCode::new("LIBRARY"),
        comments: None,
        use_e_signature: false,
        decided_at: at(30),
    };
    fixture.service.sign_department(&student_ctx(STUDENT_ROLL), &sign).unwrap_err();
    fixture.service.sign_department(&admin(), &sign).unwrap();
    fixture.service.sign_department(&admin(), &sign).unwrap_err();

    let events = fixture.audit.events();
    assert_eq!(events.len(), 4);
    let outcomes: Vec<AuditOutcome> = events.iter().map(|event| event.outcome).collect();
    assert_eq!(
        outcomes,
        vec![AuditOutcome::Ok, AuditOutcome::Denied, AuditOutcome::Ok, AuditOutcome::Error]
    );
    assert_eq!(events[0].operation, "request_certificate");
    assert_eq!(events[0].certificate_id, Some(view.id));
    assert_eq!(events[1].error_kind, Some("authorization"));
    assert_eq!(events[1].actor_id, UserId::new(format!("u-{STUDENT_ROLL}")));
    assert_eq!(events[2].department, Some(DepartmentCode::new("LIBRARY")));
    assert_eq!(events[2].timestamp_ms, Some(1_717_200_030_000));
    assert_eq!(events[3].error_kind, Some("already_resolved"));
}

#[test]
fn rejected_request_is_audited_without_certificate() {
    let fixture = fixture(&["LIBRARY"]);
    fixture.dues.record_due(common::due("D-1", "LIBRARY", DueStatus::Pending)).unwrap();
    fixture.service.request_certificate(&admin(), &request_for(STUDENT_ROLL)).unwrap_err();
    let events = fixture.audit.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, AuditOutcome::Error);
    assert_eq!(events[0].error_kind, Some("pending_dues"));
    assert!(events[0].certificate_id.is_none());
}

#[test]
fn read_operations_carry_no_timestamp() {
    let fixture = fixture(&["LIBRARY"]);
    fixture
        .service
        .check_eligibility(&student_ctx(STUDENT_ROLL), &RollNumber::new(STUDENT_ROLL))
        .unwrap();
    let events = fixture.audit.events();
    assert_eq!(events[0].operation, "check_eligibility");
    assert!(events[0].timestamp_ms.is_none());
    assert!(events[0].logical_time.is_none());
}

#[test]
fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let sink = FileAuditSink::new(&path).unwrap();
    for (index, outcome) in [AuditOutcome::Ok, AuditOutcome::Denied].into_iter().enumerate() {
        sink.record(&AuditEvent::new(AuditEventParams {
            operation: "sign_department",
            at: Some(Timestamp::Logical(u64::try_from(index).unwrap() + 1)),
            actor_id: UserId::new("u-lib"),
            certificate_id: CertificateId::from_raw(7),
            department: Some(DepartmentCode::new("library")),
            outcome,
            error_kind: None,
        }));
    }
    drop(sink);

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "certificate_operation");
    assert_eq!(lines[0]["operation"], "sign_department");
    assert_eq!(lines[0]["actor_id"], "u-lib");
    assert_eq!(lines[0]["certificate_id"], 7);
    assert_eq!(lines[0]["department"], "LIBRARY");
    assert_eq!(lines[0]["outcome"], "ok");
    assert_eq!(lines[0]["logical_time"], 1);
    assert!(lines[0]["timestamp_ms"].is_null());
    assert_eq!(lines[1]["outcome"], "denied");

    let reopened = FileAuditSink::new(&path).unwrap();
    reopened.record(&AuditEvent::new(AuditEventParams {
        operation: "delete_certificate",
        at: None,
        actor_id: UserId::new("u-admin"),
        certificate_id: None,
        department: None,
        outcome: AuditOutcome::Error,
        error_kind: Some("not_found"),
    }));
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 3);
}
