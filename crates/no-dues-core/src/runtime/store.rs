// crates/no-dues-core/src/runtime/store.rs
// ============================================================================
// Module: No Dues In-Memory Collaborators
// Description: In-memory certificate store, dues ledger and directories.
// Purpose: Provide deterministic collaborators for tests and the CLI roster.
// Dependencies: crate::core, crate::interfaces, crate::runtime::machine
// ============================================================================

//! ## Overview
//! In-memory implementations of every collaborator interface. Each one guards
//! its state with a single mutex, so a certificate transition (load, apply,
//! persist) is atomic with respect to concurrent callers. They are not
//! intended for durable production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::Certificate;
use crate::core::CertificateFilter;
use crate::core::CertificateId;
use crate::core::CertificateTransition;
use crate::core::DueRecord;
use crate::core::DueStatus;
use crate::core::RollNumber;
use crate::core::SignatureImage;
use crate::core::SignatureRequestReceipt;
use crate::core::StudentId;
use crate::core::StudentProfile;
use crate::core::UserId;
use crate::interfaces::ApplyError;
use crate::interfaces::CertificateStore;
use crate::interfaces::DirectoryError;
use crate::interfaces::DueLedger;
use crate::interfaces::DueLedgerError;
use crate::interfaces::NotifyError;
use crate::interfaces::SignatureRequestNotifier;
use crate::interfaces::StoreError;
use crate::interfaces::StudentDirectory;
use crate::interfaces::UserDirectory;
use crate::runtime::machine::CertificateStateMachine;

// ============================================================================
// SECTION: In-Memory Certificate Store
// ============================================================================

/// Mutable state behind the in-memory certificate store.
#[derive(Debug, Default)]
struct CertificateTable {
    /// Last allocated identifier.
    last_id: u64,
    /// Certificates keyed by identifier.
    certificates: BTreeMap<CertificateId, Certificate>,
}

/// In-memory certificate store for tests and local runs.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCertificateStore {
    /// Certificate table protected by a mutex.
    table: Arc<Mutex<CertificateTable>>,
}

impl InMemoryCertificateStore {
    /// Creates an empty in-memory certificate store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a closure against the locked table.
    fn with_table<T>(
        &self,
        f: impl FnOnce(&mut CertificateTable) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self
            .table
            .lock()
            .map_err(|_| StoreError::Store("certificate store mutex poisoned".to_string()))?;
        f(&mut guard)
    }
}

impl CertificateStore for InMemoryCertificateStore {
    fn allocate_id(&self) -> Result<CertificateId, StoreError> {
        self.with_table(|table| {
            let next = table
                .last_id
                .checked_add(1)
                .ok_or_else(|| StoreError::Store("certificate id space exhausted".to_string()))?;
            table.last_id = next;
            CertificateId::from_raw(next)
                .ok_or_else(|| StoreError::Invalid("allocated certificate id is zero".to_string()))
        })
    }

    fn insert(&self, certificate: &Certificate) -> Result<(), StoreError> {
        self.with_table(|table| {
            if table.certificates.contains_key(&certificate.id()) {
                return Err(StoreError::Conflict(format!(
                    "certificate {} already exists",
                    certificate.id()
                )));
            }
            if table
                .certificates
                .values()
                .any(|existing| existing.certificate_number() == certificate.certificate_number())
            {
                return Err(StoreError::Conflict(format!(
                    "certificate number {} already exists",
                    certificate.certificate_number()
                )));
            }
            table.last_id = table.last_id.max(certificate.id().get());
            table.certificates.insert(certificate.id(), certificate.clone());
            Ok(())
        })
    }

    fn load(&self, id: CertificateId) -> Result<Option<Certificate>, StoreError> {
        self.with_table(|table| Ok(table.certificates.get(&id).cloned()))
    }

    fn list(&self, filter: &CertificateFilter) -> Result<Vec<Certificate>, StoreError> {
        self.with_table(|table| {
            Ok(table
                .certificates
                .values()
                .filter(|certificate| filter.matches(certificate))
                .cloned()
                .collect())
        })
    }

    fn apply(
        &self,
        id: CertificateId,
        transition: &CertificateTransition,
    ) -> Result<Certificate, ApplyError> {
        let mut guard = self
            .table
            .lock()
            .map_err(|_| StoreError::Store("certificate store mutex poisoned".to_string()))?;
        let current = guard.certificates.get(&id).ok_or(ApplyError::NotFound(id))?;
        let mut updated = current.clone();
        CertificateStateMachine::apply(&mut updated, transition)?;
        guard.certificates.insert(id, updated.clone());
        Ok(updated)
    }

    fn delete(&self, id: CertificateId) -> Result<bool, StoreError> {
        self.with_table(|table| Ok(table.certificates.remove(&id).is_some()))
    }
}

// ============================================================================
// SECTION: In-Memory Due Ledger
// ============================================================================

/// In-memory dues ledger keyed by student.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDueLedger {
    /// Dues keyed by student, protected by a mutex.
    dues: Arc<Mutex<BTreeMap<StudentId, Vec<DueRecord>>>>,
}

impl InMemoryDueLedger {
    /// Creates an empty dues ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a due.
    ///
    /// # Errors
    ///
    /// Returns [`DueLedgerError`] when the ledger lock is poisoned.
    pub fn record_due(&self, due: DueRecord) -> Result<(), DueLedgerError> {
        self.dues
            .lock()
            .map_err(|_| DueLedgerError::Unavailable("due ledger mutex poisoned".to_string()))?
            .entry(due.student_id.clone())
            .or_default()
            .push(due);
        Ok(())
    }

    /// Updates the status of a due. Returns false when the due is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`DueLedgerError`] when the ledger lock is poisoned.
    pub fn set_status(&self, due_id: &str, status: DueStatus) -> Result<bool, DueLedgerError> {
        let mut guard = self
            .dues
            .lock()
            .map_err(|_| DueLedgerError::Unavailable("due ledger mutex poisoned".to_string()))?;
        let Some(due) = guard.values_mut().flatten().find(|due| due.due_id == due_id) else {
            return Ok(false);
        };
        due.status = status;
        Ok(true)
    }
}

impl DueLedger for InMemoryDueLedger {
    fn outstanding_dues(&self, student_id: &StudentId) -> Result<Vec<DueRecord>, DueLedgerError> {
        let guard = self
            .dues
            .lock()
            .map_err(|_| DueLedgerError::Unavailable("due ledger mutex poisoned".to_string()))?;
        Ok(guard
            .get(student_id)
            .map(|dues| dues.iter().filter(|due| due.is_outstanding()).cloned().collect())
            .unwrap_or_default())
    }
}

// ============================================================================
// SECTION: In-Memory Directories
// ============================================================================

/// In-memory student directory keyed by roll number.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStudentDirectory {
    /// Students keyed by roll number, protected by a mutex.
    students: Arc<Mutex<BTreeMap<RollNumber, StudentProfile>>>,
}

impl InMemoryStudentDirectory {
    /// Creates an empty student directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enrolls or replaces a student.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the directory lock is poisoned.
    pub fn enroll(&self, student: StudentProfile) -> Result<(), DirectoryError> {
        self.students
            .lock()
            .map_err(|_| DirectoryError::Unavailable("student directory mutex poisoned".to_string()))?
            .insert(student.roll_number.clone(), student);
        Ok(())
    }
}

impl StudentDirectory for InMemoryStudentDirectory {
    fn find_by_roll_number(
        &self,
        roll_number: &RollNumber,
    ) -> Result<Option<StudentProfile>, DirectoryError> {
        let guard = self.students.lock().map_err(|_| {
            DirectoryError::Unavailable("student directory mutex poisoned".to_string())
        })?;
        Ok(guard.get(roll_number).cloned())
    }
}

/// In-memory user directory holding stored e-signatures.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserDirectory {
    /// Signature images keyed by user, protected by a mutex.
    signatures: Arc<Mutex<BTreeMap<UserId, SignatureImage>>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty user directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) a user's e-signature image.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the directory lock is poisoned.
    pub fn store_signature(
        &self,
        user_id: UserId,
        image: SignatureImage,
    ) -> Result<(), DirectoryError> {
        self.signatures
            .lock()
            .map_err(|_| DirectoryError::Unavailable("user directory mutex poisoned".to_string()))?
            .insert(user_id, image);
        Ok(())
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn signature_image(&self, user_id: &UserId) -> Result<Option<SignatureImage>, DirectoryError> {
        let guard = self
            .signatures
            .lock()
            .map_err(|_| DirectoryError::Unavailable("user directory mutex poisoned".to_string()))?;
        Ok(guard.get(user_id).cloned())
    }
}

// ============================================================================
// SECTION: Notifier
// ============================================================================

/// Notifier that accepts and drops every signature request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl SignatureRequestNotifier for NoopNotifier {
    fn notify(&self, _receipt: &SignatureRequestReceipt) -> Result<(), NotifyError> {
        Ok(())
    }
}
