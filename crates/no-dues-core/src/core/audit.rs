// crates/no-dues-core/src/core/audit.rs
// ============================================================================
// Module: Audit Events
// Description: Structured audit payload emitted for every service operation.
// Purpose: Give deployments one serializable record per allowed or denied call.
// Dependencies: crate::core::{identifiers, time}, serde
// ============================================================================

//! ## Overview
//! Audit events are emitted by the certificate service for every operation,
//! whether it succeeded, was denied, or failed with a typed error. Events
//! carry only identifiers and labels; student details and signature images
//! are never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::identifiers::CertificateId;
use crate::core::identifiers::DepartmentCode;
use crate::core::identifiers::UserId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Event name used for certificate service audit records.
pub const CERTIFICATE_AUDIT_EVENT: &str = "certificate_operation";

/// Outcome classification for an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Operation completed.
    Ok,
    /// Authorization policy denied the operation.
    Denied,
    /// Operation failed with a typed error.
    Error,
}

/// Certificate service audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch) when the request carried one.
    pub timestamp_ms: Option<i64>,
    /// Logical request time for hosts that do not use wall-clock time.
    pub logical_time: Option<u64>,
    /// Service operation label.
    pub operation: &'static str,
    /// Acting user.
    pub actor_id: UserId,
    /// Target certificate, when known.
    pub certificate_id: Option<CertificateId>,
    /// Target department, when applicable.
    pub department: Option<DepartmentCode>,
    /// Operation outcome.
    pub outcome: AuditOutcome,
    /// Stable error kind label when the operation failed.
    pub error_kind: Option<&'static str>,
}

/// Inputs required to construct an audit event.
#[derive(Debug, Clone)]
pub struct AuditEventParams {
    /// Service operation label.
    pub operation: &'static str,
    /// Request time, when the operation carries one.
    pub at: Option<Timestamp>,
    /// Acting user.
    pub actor_id: UserId,
    /// Target certificate, when known.
    pub certificate_id: Option<CertificateId>,
    /// Target department, when applicable.
    pub department: Option<DepartmentCode>,
    /// Operation outcome.
    pub outcome: AuditOutcome,
    /// Stable error kind label when the operation failed.
    pub error_kind: Option<&'static str>,
}

impl AuditEvent {
    /// Creates an audit event stamped with the request time.
    #[must_use]
    pub fn new(params: AuditEventParams) -> Self {
        let (timestamp_ms, logical_time) = match params.at {
            Some(Timestamp::UnixMillis(millis)) => (Some(millis), None),
            Some(Timestamp::Logical(value)) => (None, Some(value)),
            None => (None, None),
        };
        Self {
            event: CERTIFICATE_AUDIT_EVENT,
            timestamp_ms,
            logical_time,
            operation: params.operation,
            actor_id: params.actor_id,
            certificate_id: params.certificate_id,
            department: params.department,
            outcome: params.outcome,
            error_kind: params.error_kind,
        }
    }
}
