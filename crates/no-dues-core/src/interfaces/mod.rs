// crates/no-dues-core/src/interfaces/mod.rs
// ============================================================================
// Module: No Dues Interfaces
// Description: Backend-agnostic interfaces for dues, directories and storage.
// Purpose: Define the collaborator contracts consumed by the certificate core.
// Dependencies: crate::core, crate::runtime, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the certificate workflow integrates with external
//! systems (the dues ledger, user and student directories, notification
//! delivery and persistence) without embedding backend-specific details.
//! Implementations must fail closed: an unreachable collaborator is an error,
//! never an implicit "no dues" or "no signature".

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::AuditEvent;
use crate::core::Certificate;
use crate::core::CertificateFilter;
use crate::core::CertificateId;
use crate::core::CertificateTransition;
use crate::core::DueRecord;
use crate::core::RollNumber;
use crate::core::SignatureImage;
use crate::core::SignatureRequestReceipt;
use crate::core::StudentId;
use crate::core::StudentProfile;
use crate::core::UserId;
use crate::runtime::TransitionError;

// ============================================================================
// SECTION: Due Ledger
// ============================================================================

/// Due ledger errors.
#[derive(Debug, Error)]
pub enum DueLedgerError {
    /// Ledger is unavailable.
    #[error("due ledger unavailable: {0}")]
    Unavailable(String),
    /// Ledger returned invalid data.
    #[error("due ledger invalid data: {0}")]
    Invalid(String),
}

/// External ledger of dues owed by students.
pub trait DueLedger {
    /// Returns true when the student has any due that is not cleared.
    ///
    /// # Errors
    ///
    /// Returns [`DueLedgerError`] when the ledger cannot answer.
    fn has_outstanding_dues(&self, student_id: &StudentId) -> Result<bool, DueLedgerError> {
        Ok(!self.outstanding_dues(student_id)?.is_empty())
    }

    /// Returns the dues that still block certification.
    ///
    /// # Errors
    ///
    /// Returns [`DueLedgerError`] when the ledger cannot answer.
    fn outstanding_dues(&self, student_id: &StudentId) -> Result<Vec<DueRecord>, DueLedgerError>;
}

// ============================================================================
// SECTION: Directories
// ============================================================================

/// Directory lookup errors.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Directory is unavailable.
    #[error("directory unavailable: {0}")]
    Unavailable(String),
    /// Directory returned invalid data.
    #[error("directory invalid data: {0}")]
    Invalid(String),
}

/// Directory of user accounts and their stored e-signatures.
pub trait UserDirectory {
    /// Returns true when the user has an e-signature on file.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the lookup fails.
    fn has_stored_signature(&self, user_id: &UserId) -> Result<bool, DirectoryError> {
        Ok(self.signature_image(user_id)?.is_some())
    }

    /// Returns the user's stored e-signature image, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the lookup fails.
    fn signature_image(&self, user_id: &UserId) -> Result<Option<SignatureImage>, DirectoryError>;
}

/// Directory of enrolled students.
pub trait StudentDirectory {
    /// Resolves a student by roll number.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the lookup fails.
    fn find_by_roll_number(
        &self,
        roll_number: &RollNumber,
    ) -> Result<Option<StudentProfile>, DirectoryError>;
}

// ============================================================================
// SECTION: Notifications
// ============================================================================

/// Notification delivery errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Delivery failed.
    #[error("signature request delivery failed: {0}")]
    Delivery(String),
}

/// Delivers signature requests to departments.
pub trait SignatureRequestNotifier: Send + Sync {
    /// Delivers a signature request.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when delivery fails.
    fn notify(&self, receipt: &SignatureRequestReceipt) -> Result<(), NotifyError>;
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink for certificate service events.
pub trait AuditSink: Send + Sync {
    /// Records an audit event.
    fn record(&self, event: &AuditEvent);
}

// ============================================================================
// SECTION: Certificate Store
// ============================================================================

/// Certificate store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("certificate store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("certificate store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("certificate store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("certificate store invalid data: {0}")]
    Invalid(String),
    /// Write conflicts with existing data.
    #[error("certificate store conflict: {0}")]
    Conflict(String),
    /// Store reported an error.
    #[error("certificate store error: {0}")]
    Store(String),
}

/// Errors raised while applying a transition to a stored certificate.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// Certificate does not exist.
    #[error("certificate {0} not found")]
    NotFound(CertificateId),
    /// State machine rejected the transition; nothing was persisted.
    #[error(transparent)]
    Transition(#[from] TransitionError),
    /// Store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Durable certificate persistence.
///
/// # Invariants
/// - `apply` loads, transitions and persists in one atomic unit.
/// - A signature record update only succeeds while the record is still
///   pending, so the loser of a race observes an already-resolved error.
/// - `delete` removes signature records with their certificate.
pub trait CertificateStore {
    /// Allocates a fresh certificate identifier. Identifiers are never reused.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when allocation fails.
    fn allocate_id(&self) -> Result<CertificateId, StoreError>;

    /// Inserts a newly created certificate with its signature records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the identifier or number already exists.
    fn insert(&self, certificate: &Certificate) -> Result<(), StoreError>;

    /// Loads a certificate by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load(&self, id: CertificateId) -> Result<Option<Certificate>, StoreError>;

    /// Lists certificates matching a filter, ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn list(&self, filter: &CertificateFilter) -> Result<Vec<Certificate>, StoreError>;

    /// Applies a transition atomically and returns the updated certificate.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError`] when the certificate is missing, the transition
    /// is rejected, or persistence fails.
    fn apply(
        &self,
        id: CertificateId,
        transition: &CertificateTransition,
    ) -> Result<Certificate, ApplyError>;

    /// Deletes a certificate and its signature records. Returns false when it
    /// did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when deletion fails.
    fn delete(&self, id: CertificateId) -> Result<bool, StoreError>;
}
