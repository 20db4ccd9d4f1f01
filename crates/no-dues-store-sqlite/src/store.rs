// crates/no-dues-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Certificate Store
// Description: Durable CertificateStore backed by SQLite WAL.
// Purpose: Persist certificates with atomic, race-safe signature updates.
// Dependencies: no-dues-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`CertificateStore`] using `SQLite`.
//! Certificates are stored in a `certificates` table and their per-department
//! records in `signature_records`, keyed by certificate and department with
//! the registry position preserved. Loads rebuild certificates through
//! [`CertificateStateMachine::restore`] and fail closed when the stored status
//! does not match the records.
//!
//! Transitions open an `IMMEDIATE` transaction, re-load the certificate,
//! run the state machine, and persist with an update that is conditional on
//! the record still being `PENDING`. A second writer on another connection
//! waits on the busy timeout and then observes the resolved record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use no_dues_core::ApplyError;
use no_dues_core::Certificate;
use no_dues_core::CertificateFilter;
use no_dues_core::CertificateId;
use no_dues_core::CertificateNumber;
use no_dues_core::CertificateParts;
use no_dues_core::CertificateStateMachine;
use no_dues_core::CertificateStatus;
use no_dues_core::CertificateStore;
use no_dues_core::CertificateTransition;
use no_dues_core::DepartmentCode;
use no_dues_core::LedgerError;
use no_dues_core::PrincipalSignOff;
use no_dues_core::SignatureImage;
use no_dues_core::SignatureRecord;
use no_dues_core::SignatureStatus;
use no_dues_core::StoreError;
use no_dues_core::StudentProfile;
use no_dues_core::Timestamp;
use no_dues_core::TransitionError;
use no_dues_core::UserId;
use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use rusqlite::TransactionBehavior;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` certificate store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a configuration with default pragmas for a database path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding student details or signature images.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store contents fail integrity checks.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data or configuration.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Write violates a uniqueness constraint.
    #[error("sqlite store conflict: {0}")]
    Conflict(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::Conflict(message) => Self::Conflict(message),
        }
    }
}

impl From<SqliteStoreError> for ApplyError {
    fn from(error: SqliteStoreError) -> Self {
        Self::Store(error.into())
    }
}

/// Maps an engine error, surfacing constraint violations as conflicts.
fn db_error(err: &rusqlite::Error) -> SqliteStoreError {
    if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
        SqliteStoreError::Conflict(err.to_string())
    } else {
        SqliteStoreError::Db(err.to_string())
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed certificate store with WAL support.
///
/// # Invariants
/// - Connection access is serialized through a mutex; cross-process writers
///   are serialized by `IMMEDIATE` transactions.
/// - Certificate identifiers come from a persistent sequence and are never
///   reused after deletion.
#[derive(Clone)]
pub struct SqliteCertificateStore {
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteCertificateStore {
    /// Opens an `SQLite`-backed certificate store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Verifies the store can execute a simple SQL statement.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] if the mutex is poisoned or the query fails.
    pub fn readiness(&self) -> Result<(), SqliteStoreError> {
        self.with_connection(|connection| {
            connection
                .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map(|_| ())
                .map_err(|err| db_error(&err))
        })
    }

    /// Runs a closure against the locked connection.
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, SqliteStoreError>,
    ) -> Result<T, SqliteStoreError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))?;
        f(&mut guard)
    }

    /// Runs a closure inside an `IMMEDIATE` transaction and commits on success.
    fn with_write_tx<T, E>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<SqliteStoreError>,
    {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))?;
        let tx = guard
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|err| db_error(&err))?;
        let value = f(&tx)?;
        tx.commit().map_err(|err| db_error(&err))?;
        Ok(value)
    }
}

impl CertificateStore for SqliteCertificateStore {
    fn allocate_id(&self) -> Result<CertificateId, StoreError> {
        self.with_write_tx(|tx| {
            tx.execute("UPDATE certificate_sequence SET last_id = last_id + 1 WHERE singleton = 1", [])
                .map_err(|err| db_error(&err))?;
            let next: i64 = tx
                .query_row("SELECT last_id FROM certificate_sequence WHERE singleton = 1", [], |row| {
                    row.get(0)
                })
                .map_err(|err| db_error(&err))?;
            Ok(certificate_id_from_sql(next)?)
        })
    }

    fn insert(&self, certificate: &Certificate) -> Result<(), StoreError> {
        self.with_write_tx(|tx| Ok(insert_certificate(tx, certificate)?))
    }

    fn load(&self, id: CertificateId) -> Result<Option<Certificate>, StoreError> {
        Ok(self.with_connection(|connection| {
            let tx = connection.transaction().map_err(|err| db_error(&err))?;
            let certificate = load_certificate(&tx, id)?;
            tx.commit().map_err(|err| db_error(&err))?;
            Ok(certificate)
        })?)
    }

    fn list(&self, filter: &CertificateFilter) -> Result<Vec<Certificate>, StoreError> {
        Ok(self.with_connection(|connection| {
            let tx = connection.transaction().map_err(|err| db_error(&err))?;
            let ids = {
                let mut stmt = tx
                    .prepare_cached(
                        "SELECT id FROM certificates WHERE (?1 IS NULL OR roll_number = ?1) AND \
                         (?2 IS NULL OR status = ?2) ORDER BY id",
                    )
                    .map_err(|err| db_error(&err))?;
                let rows = stmt
                    .query_map(
                        params![
                            filter.roll_number.as_ref().map(|roll| roll.as_str().to_string()),
                            filter.status.map(CertificateStatus::label)
                        ],
                        |row| row.get::<_, i64>(0),
                    )
                    .map_err(|err| db_error(&err))?;
                rows.collect::<Result<Vec<i64>, _>>().map_err(|err| db_error(&err))?
            };
            let mut certificates = Vec::with_capacity(ids.len());
            for raw in ids {
                let id = certificate_id_from_sql(raw)?;
                let certificate = load_certificate(&tx, id)?.ok_or_else(|| {
                    SqliteStoreError::Corrupt(format!("certificate {id} vanished during list"))
                })?;
                certificates.push(certificate);
            }
            tx.commit().map_err(|err| db_error(&err))?;
            Ok(certificates)
        })?)
    }

    fn apply(
        &self,
        id: CertificateId,
        transition: &CertificateTransition,
    ) -> Result<Certificate, ApplyError> {
        self.with_write_tx(|tx| {
            let mut certificate = load_certificate(tx, id)?.ok_or(ApplyError::NotFound(id))?;
            CertificateStateMachine::apply(&mut certificate, transition)?;
            persist_transition(tx, &certificate, transition)?;
            Ok(certificate)
        })
    }

    fn delete(&self, id: CertificateId) -> Result<bool, StoreError> {
        self.with_write_tx(|tx| {
            let removed = tx
                .execute("DELETE FROM certificates WHERE id = ?1", params![certificate_id_to_sql(id)?])
                .map_err(|err| db_error(&err))?;
            Ok(removed > 0)
        })
    }
}

// ============================================================================
// SECTION: Persistence
// ============================================================================

/// Inserts a certificate row and its signature records.
fn insert_certificate(tx: &Transaction<'_>, certificate: &Certificate) -> Result<(), SqliteStoreError> {
    let parts = certificate.to_parts();
    let id = certificate_id_to_sql(parts.id)?;
    tx.execute(
        "INSERT INTO certificates (id, certificate_number, roll_number, status, student_json, \
         principal_json, issue_date_json, created_at_json) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            parts.certificate_number.as_str(),
            parts.student.roll_number.as_str(),
            parts.status.label(),
            to_json(&parts.student)?,
            to_optional_json(parts.principal.as_ref())?,
            to_optional_json(parts.issue_date.as_ref())?,
            to_json(&parts.created_at)?,
        ],
    )
    .map_err(|err| db_error(&err))?;
    for (position, record) in parts.signatures.iter().enumerate() {
        let position = i64::try_from(position)
            .map_err(|_| SqliteStoreError::Invalid("too many signature records".to_string()))?;
        tx.execute(
            "INSERT INTO signature_records (certificate_id, position, department, status, \
             signed_by_user_id, signed_by_name, signed_at_json, comments, e_signature_json) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id,
                position,
                record.department.as_str(),
                record.status.label(),
                record.signed_by_user_id.as_ref().map(UserId::as_str),
                record.signed_by_name.as_deref(),
                to_optional_json(record.signed_at.as_ref())?,
                record.comments.as_deref(),
                to_optional_json(record.e_signature.as_ref())?,
            ],
        )
        .map_err(|err| db_error(&err))?;
    }
    tx.execute(
        "UPDATE certificate_sequence SET last_id = MAX(last_id, ?1) WHERE singleton = 1",
        params![id],
    )
    .map_err(|err| db_error(&err))?;
    Ok(())
}

/// Persists the result of an applied transition.
///
/// Record updates are conditional on the stored record still being pending;
/// principal updates on the certificate not yet carrying a sign-off.
fn persist_transition(
    tx: &Transaction<'_>,
    certificate: &Certificate,
    transition: &CertificateTransition,
) -> Result<(), ApplyError> {
    let id = certificate_id_to_sql(certificate.id())?;
    match transition {
        CertificateTransition::SignDepartment {
            department,
            ..
        }
        | CertificateTransition::RejectDepartment {
            department,
            ..
        } => {
            let record = certificate.ledger().record(department).ok_or_else(|| {
                TransitionError::Ledger(LedgerError::NotFound(department.clone()))
            })?;
            let updated = tx
                .execute(
                    "UPDATE signature_records SET status = ?1, signed_by_user_id = ?2, \
                     signed_by_name = ?3, signed_at_json = ?4, comments = ?5, e_signature_json \
                     = ?6 WHERE certificate_id = ?7 AND department = ?8 AND status = ?9",
                    params![
                        record.status.label(),
                        record.signed_by_user_id.as_ref().map(UserId::as_str),
                        record.signed_by_name.as_deref(),
                        to_optional_json(record.signed_at.as_ref())?,
                        record.comments.as_deref(),
                        to_optional_json(record.e_signature.as_ref())?,
                        id,
                        department.as_str(),
                        SignatureStatus::Pending.label(),
                    ],
                )
                .map_err(|err| db_error(&err))?;
            if updated == 0 {
                let status = stored_record_status(tx, id, department)?;
                return Err(TransitionError::Ledger(LedgerError::AlreadyResolved {
                    department: department.clone(),
                    status,
                })
                .into());
            }
            tx.execute(
                "UPDATE certificates SET status = ?1 WHERE id = ?2",
                params![certificate.status().label(), id],
            )
            .map_err(|err| db_error(&err))?;
        }
        CertificateTransition::SignPrincipal {
            ..
        } => {
            let updated = tx
                .execute(
                    "UPDATE certificates SET status = ?1, principal_json = ?2, issue_date_json = \
                     ?3 WHERE id = ?4 AND principal_json IS NULL",
                    params![
                        certificate.status().label(),
                        to_optional_json(certificate.principal())?,
                        to_optional_json(certificate.issue_date().as_ref())?,
                        id,
                    ],
                )
                .map_err(|err| db_error(&err))?;
            if updated == 0 {
                return Err(TransitionError::PrincipalAlreadySigned.into());
            }
        }
    }
    Ok(())
}

/// Reads the stored status of one signature record.
fn stored_record_status(
    tx: &Transaction<'_>,
    id: i64,
    department: &DepartmentCode,
) -> Result<SignatureStatus, SqliteStoreError> {
    let label: String = tx
        .query_row(
            "SELECT status FROM signature_records WHERE certificate_id = ?1 AND department = ?2",
            params![id, department.as_str()],
            |row| row.get(0),
        )
        .map_err(|err| db_error(&err))?;
    parse_signature_status(&label)
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Raw certificate row.
struct CertificateRow {
    /// Stored certificate number.
    certificate_number: String,
    /// Stored status label.
    status: String,
    /// Student profile JSON.
    student_json: String,
    /// Principal sign-off JSON, when signed.
    principal_json: Option<String>,
    /// Issue date JSON, when issued.
    issue_date_json: Option<String>,
    /// Creation timestamp JSON.
    created_at_json: String,
}

/// Raw signature record row.
struct RecordRow {
    /// Department code.
    department: String,
    /// Status label.
    status: String,
    /// Signer identifier.
    signed_by_user_id: Option<String>,
    /// Signer display name.
    signed_by_name: Option<String>,
    /// Resolution timestamp JSON.
    signed_at_json: Option<String>,
    /// Comments.
    comments: Option<String>,
    /// E-signature JSON.
    e_signature_json: Option<String>,
}

/// Loads and restores one certificate inside a transaction.
fn load_certificate(
    tx: &Transaction<'_>,
    id: CertificateId,
) -> Result<Option<Certificate>, SqliteStoreError> {
    let raw_id = certificate_id_to_sql(id)?;
    let row = tx
        .query_row(
            "SELECT certificate_number, status, student_json, principal_json, issue_date_json, \
             created_at_json FROM certificates WHERE id = ?1",
            params![raw_id],
            |row| {
                Ok(CertificateRow {
                    certificate_number: row.get(0)?,
                    status: row.get(1)?,
                    student_json: row.get(2)?,
                    principal_json: row.get(3)?,
                    issue_date_json: row.get(4)?,
                    created_at_json: row.get(5)?,
                })
            },
        )
        .optional()
        .map_err(|err| db_error(&err))?;
    let Some(row) = row else {
        return Ok(None);
    };
    let records = {
        let mut stmt = tx
            .prepare_cached(
                "SELECT department, status, signed_by_user_id, signed_by_name, signed_at_json, \
                 comments, e_signature_json FROM signature_records WHERE certificate_id = ?1 \
                 ORDER BY position",
            )
            .map_err(|err| db_error(&err))?;
        let rows = stmt
            .query_map(params![raw_id], |row| {
                Ok(RecordRow {
                    department: row.get(0)?,
                    status: row.get(1)?,
                    signed_by_user_id: row.get(2)?,
                    signed_by_name: row.get(3)?,
                    signed_at_json: row.get(4)?,
                    comments: row.get(5)?,
                    e_signature_json: row.get(6)?,
                })
            })
            .map_err(|err| db_error(&err))?;
        rows.collect::<Result<Vec<RecordRow>, _>>().map_err(|err| db_error(&err))?
    };
    let signatures =
        records.into_iter().map(signature_record_from_row).collect::<Result<Vec<_>, _>>()?;
    let status = CertificateStatus::from_label(&row.status).ok_or_else(|| {
        SqliteStoreError::Corrupt(format!("certificate {id} has unknown status {}", row.status))
    })?;
    let parts = CertificateParts {
        id,
        certificate_number: CertificateNumber::new(row.certificate_number),
        student: from_json::<StudentProfile>(&row.student_json)?,
        status,
        signatures,
        principal: from_optional_json::<PrincipalSignOff>(row.principal_json.as_deref())?,
        issue_date: from_optional_json::<Timestamp>(row.issue_date_json.as_deref())?,
        created_at: from_json::<Timestamp>(&row.created_at_json)?,
    };
    CertificateStateMachine::restore(parts)
        .map(Some)
        .map_err(|err| SqliteStoreError::Corrupt(format!("certificate {id}: {err}")))
}

/// Converts a stored record row into a signature record.
fn signature_record_from_row(row: RecordRow) -> Result<SignatureRecord, SqliteStoreError> {
    Ok(SignatureRecord {
        department: DepartmentCode::new(&row.department),
        status: parse_signature_status(&row.status)?,
        signed_by_user_id: row.signed_by_user_id.map(UserId::new),
        signed_by_name: row.signed_by_name,
        signed_at: from_optional_json::<Timestamp>(row.signed_at_json.as_deref())?,
        comments: row.comments,
        e_signature: from_optional_json::<SignatureImage>(row.e_signature_json.as_deref())?,
    })
}

// ============================================================================
// SECTION: Encoding Helpers
// ============================================================================

/// Parses a stored signature status label.
fn parse_signature_status(label: &str) -> Result<SignatureStatus, SqliteStoreError> {
    SignatureStatus::from_label(label)
        .ok_or_else(|| SqliteStoreError::Corrupt(format!("unknown signature status: {label}")))
}

/// Converts a certificate identifier to an `SQLite` integer.
fn certificate_id_to_sql(id: CertificateId) -> Result<i64, SqliteStoreError> {
    i64::try_from(id.get())
        .map_err(|_| SqliteStoreError::Invalid(format!("certificate id {id} exceeds i64")))
}

/// Converts an `SQLite` integer to a certificate identifier.
fn certificate_id_from_sql(raw: i64) -> Result<CertificateId, SqliteStoreError> {
    u64::try_from(raw)
        .ok()
        .and_then(CertificateId::from_raw)
        .ok_or_else(|| SqliteStoreError::Corrupt(format!("invalid certificate id: {raw}")))
}

/// Serializes a value to JSON text.
fn to_json<T: Serialize>(value: &T) -> Result<String, SqliteStoreError> {
    serde_json::to_string(value).map_err(|err| SqliteStoreError::Invalid(err.to_string()))
}

/// Serializes an optional value to JSON text.
fn to_optional_json<T: Serialize>(value: Option<&T>) -> Result<Option<String>, SqliteStoreError> {
    value.map(to_json).transpose()
}

/// Deserializes JSON text, treating failures as corruption.
fn from_json<T: DeserializeOwned>(text: &str) -> Result<T, SqliteStoreError> {
    serde_json::from_str(text).map_err(|err| SqliteStoreError::Corrupt(err.to_string()))
}

/// Deserializes optional JSON text.
fn from_optional_json<T: DeserializeOwned>(text: Option<&str>) -> Result<Option<T>, SqliteStoreError> {
    text.map(from_json).transpose()
}

// ============================================================================
// SECTION: Connection Setup
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection =
        Connection::open_with_flags(&config.path, flags).map_err(|err| db_error(&err))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| db_error(&err))?;
    connection.execute_batch("PRAGMA foreign_keys = ON;").map_err(|err| db_error(&err))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| db_error(&err))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| db_error(&err))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|err| db_error(&err))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| db_error(&err))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| db_error(&err))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| db_error(&err))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS certificate_sequence (
                    singleton INTEGER PRIMARY KEY CHECK (singleton = 1),
                    last_id INTEGER NOT NULL
                );
                INSERT OR IGNORE INTO certificate_sequence (singleton, last_id) VALUES (1, 0);
                CREATE TABLE IF NOT EXISTS certificates (
                    id INTEGER PRIMARY KEY,
                    certificate_number TEXT NOT NULL UNIQUE,
                    roll_number TEXT NOT NULL,
                    status TEXT NOT NULL,
                    student_json TEXT NOT NULL,
                    principal_json TEXT,
                    issue_date_json TEXT,
                    created_at_json TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_certificates_roll_number
                    ON certificates (roll_number);
                CREATE TABLE IF NOT EXISTS signature_records (
                    certificate_id INTEGER NOT NULL,
                    position INTEGER NOT NULL,
                    department TEXT NOT NULL,
                    status TEXT NOT NULL,
                    signed_by_user_id TEXT,
                    signed_by_name TEXT,
                    signed_at_json TEXT,
                    comments TEXT,
                    e_signature_json TEXT,
                    PRIMARY KEY (certificate_id, department),
                    UNIQUE (certificate_id, position),
                    FOREIGN KEY (certificate_id)
                        REFERENCES certificates(id) ON DELETE CASCADE
                );",
            )
            .map_err(|err| db_error(&err))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| db_error(&err))?;
    Ok(())
}
