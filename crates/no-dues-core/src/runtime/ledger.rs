// crates/no-dues-core/src/runtime/ledger.rs
// ============================================================================
// Module: Signature Ledger
// Description: Per-department signature state for one certificate.
// Purpose: Resolve department records exactly once and derive their aggregate.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The signature ledger holds one record per required department, in
//! registry order. Records resolve from `PENDING` to `SIGNED` or `REJECTED`
//! exactly once; a second resolution is an error, never a no-op.
//!
//! ## Aggregate
//! - `REJECTED` when any record is rejected (rejection dominates).
//! - `ALLSIGNED` when every record is signed (an empty ledger included).
//! - `PENDING` when every record is pending.
//! - `PARTIAL` otherwise.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::CertificateStatus;
use crate::core::DepartmentCode;
use crate::core::SignatureRecord;
use crate::core::SignatureStatus;
use crate::core::SignerStamp;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Signature ledger errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The same department appears twice.
    #[error("duplicate department in signature ledger: {0}")]
    DuplicateDepartment(DepartmentCode),
    /// No record exists for the department.
    #[error("no signature record for department {0}")]
    NotFound(DepartmentCode),
    /// The record already left `PENDING`.
    #[error("signature for department {department} already resolved as {}", .status.label())]
    AlreadyResolved {
        /// Target department.
        department: DepartmentCode,
        /// Current record status.
        status: SignatureStatus,
    },
}

// ============================================================================
// SECTION: Aggregate State
// ============================================================================

/// Aggregate state derived from every record in a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerAggregate {
    /// Every record is pending.
    Pending,
    /// Some records signed, none rejected.
    Partial,
    /// Every record signed.
    AllSigned,
    /// At least one record rejected.
    Rejected,
}

impl From<LedgerAggregate> for CertificateStatus {
    fn from(aggregate: LedgerAggregate) -> Self {
        match aggregate {
            LedgerAggregate::Pending => Self::Pending,
            LedgerAggregate::Partial => Self::Partial,
            LedgerAggregate::AllSigned => Self::AllSigned,
            LedgerAggregate::Rejected => Self::Rejected,
        }
    }
}

// ============================================================================
// SECTION: Ledger
// ============================================================================

/// Ordered signature records for one certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureLedger {
    /// Records in registry order at certificate creation.
    records: Vec<SignatureRecord>,
}

impl SignatureLedger {
    /// Seeds one pending record per department.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateDepartment`] when a code repeats.
    pub fn initialize(departments: &[DepartmentCode]) -> Result<Self, LedgerError> {
        let records = departments.iter().cloned().map(SignatureRecord::pending).collect();
        Self::from_records(records)
    }

    /// Rebuilds a ledger from persisted records, re-checking uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the records violate ledger invariants.
    pub fn from_records(records: Vec<SignatureRecord>) -> Result<Self, LedgerError> {
        let mut seen = BTreeSet::new();
        for record in &records {
            if !seen.insert(&record.department) {
                return Err(LedgerError::DuplicateDepartment(record.department.clone()));
            }
        }
        Ok(Self {
            records,
        })
    }

    /// Resolves a pending record as signed.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] or [`LedgerError::AlreadyResolved`].
    pub fn sign(
        &mut self,
        department: &DepartmentCode,
        stamp: SignerStamp,
    ) -> Result<&SignatureRecord, LedgerError> {
        self.resolve(department, SignatureStatus::Signed, stamp)
    }

    /// Resolves a pending record as rejected. Rejections never carry an image.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] or [`LedgerError::AlreadyResolved`].
    pub fn reject(
        &mut self,
        department: &DepartmentCode,
        stamp: SignerStamp,
    ) -> Result<&SignatureRecord, LedgerError> {
        let stamp = SignerStamp {
            image: None,
            ..stamp
        };
        self.resolve(department, SignatureStatus::Rejected, stamp)
    }

    /// Derives the aggregate state from every record.
    #[must_use]
    pub fn aggregate_state(&self) -> LedgerAggregate {
        let statuses = || self.records.iter().map(|record| record.status);
        if statuses().any(|status| status == SignatureStatus::Rejected) {
            LedgerAggregate::Rejected
        } else if statuses().all(|status| status == SignatureStatus::Signed) {
            LedgerAggregate::AllSigned
        } else if statuses().all(|status| status == SignatureStatus::Pending) {
            LedgerAggregate::Pending
        } else {
            LedgerAggregate::Partial
        }
    }

    /// Returns the records in registry order.
    #[must_use]
    pub fn records(&self) -> &[SignatureRecord] {
        &self.records
    }

    /// Returns the record for a department.
    #[must_use]
    pub fn record(&self, department: &DepartmentCode) -> Option<&SignatureRecord> {
        self.records.iter().find(|record| &record.department == department)
    }

    /// Returns the number of required departments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when no departments are required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Moves one pending record to a resolved status.
    fn resolve(
        &mut self,
        department: &DepartmentCode,
        status: SignatureStatus,
        stamp: SignerStamp,
    ) -> Result<&SignatureRecord, LedgerError> {
        let record = self
            .records
            .iter_mut()
            .find(|record| &record.department == department)
            .ok_or_else(|| LedgerError::NotFound(department.clone()))?;
        if record.status.is_resolved() {
            return Err(LedgerError::AlreadyResolved {
                department: department.clone(),
                status: record.status,
            });
        }
        record.status = status;
        record.signed_by_user_id = Some(stamp.user_id);
        record.signed_by_name = Some(stamp.name);
        record.signed_at = Some(stamp.at);
        record.comments = stamp.comments;
        record.e_signature = stamp.image;
        Ok(record)
    }
}
