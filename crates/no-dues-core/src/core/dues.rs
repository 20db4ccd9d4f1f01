// crates/no-dues-core/src/core/dues.rs
// ============================================================================
// Module: Dues
// Description: Minimal due record shape consumed by the eligibility gate.
// Purpose: Define the single predicate the certificate gate depends on.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! Dues are owned by an external ledger. The core only needs to know whether
//! a student has any due that is not yet cleared, and which ones, for the
//! eligibility report.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::DepartmentCode;
use crate::core::identifiers::StudentId;

// ============================================================================
// SECTION: Due Types
// ============================================================================

/// Payment lifecycle of a due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DueStatus {
    /// Raised and unpaid.
    Pending,
    /// Paid by the student, awaiting department approval.
    Paid,
    /// Payment approved; the due is cleared.
    Approved,
    /// Payment rejected by the department.
    Rejected,
}

impl DueStatus {
    /// Returns true when the due no longer blocks certification.
    #[must_use]
    pub const fn is_cleared(self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// A single due owed by a student to a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueRecord {
    /// Ledger-assigned due identifier.
    pub due_id: String,
    /// Owing student.
    pub student_id: StudentId,
    /// Department that raised the due.
    pub department: DepartmentCode,
    /// Free-form description.
    pub description: String,
    /// Amount in minor currency units.
    pub amount_minor: u64,
    /// Payment status.
    pub status: DueStatus,
}

impl DueRecord {
    /// Returns true when this due blocks certification.
    #[must_use]
    pub const fn is_outstanding(&self) -> bool {
        !self.status.is_cleared()
    }
}
