// crates/no-dues-core/src/core/certificate.rs
// ============================================================================
// Module: Certificate Aggregate
// Description: The No Dues Certificate aggregate root and its caller views.
// Purpose: Hold certificate state whose status is derived, never assigned.
// Dependencies: crate::core::{department, dues, identifiers, signature, time},
// crate::runtime::ledger, serde
// ============================================================================

//! ## Overview
//! A [`Certificate`] owns its signature ledger and principal sign-off. Its
//! status is private and only recomputed by the state machine, so no caller
//! can set a status that disagrees with the signature records.
//!
//! ## Invariants
//! - Status is a pure function of the ledger aggregate and the principal flag.
//! - Principal sign-off exists only when every department has signed.
//! - `issue_date` is set exactly when principal sign-off exists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::department::DepartmentRegistry;
use crate::core::dues::DueRecord;
use crate::core::identifiers::CertificateId;
use crate::core::identifiers::CertificateNumber;
use crate::core::identifiers::DepartmentCode;
use crate::core::identifiers::RollNumber;
use crate::core::identifiers::StudentId;
use crate::core::identifiers::UserId;
use crate::core::signature::SignatureImage;
use crate::core::signature::SignatureRecord;
use crate::core::signature::SignatureStatus;
use crate::core::signature::SignerStamp;
use crate::core::time::Timestamp;
use crate::runtime::ledger::SignatureLedger;

// ============================================================================
// SECTION: Certificate Status
// ============================================================================

/// Certificate-level status derived from the ledger and principal flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateStatus {
    /// No department has resolved yet.
    Pending,
    /// Some departments signed, none rejected.
    Partial,
    /// Every department signed; awaiting the principal.
    #[serde(rename = "ALLSIGNED")]
    AllSigned,
    /// At least one department rejected (terminal).
    Rejected,
    /// Principal signed; the certificate is issued (terminal).
    Complete,
}

impl CertificateStatus {
    /// Returns the canonical wire label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Partial => "PARTIAL",
            Self::AllSigned => "ALLSIGNED",
            Self::Rejected => "REJECTED",
            Self::Complete => "COMPLETE",
        }
    }

    /// Parses a canonical wire label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "PENDING" => Some(Self::Pending),
            "PARTIAL" => Some(Self::Partial),
            "ALLSIGNED" => Some(Self::AllSigned),
            "REJECTED" => Some(Self::Rejected),
            "COMPLETE" => Some(Self::Complete),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Student Profile
// ============================================================================

/// Student details copied onto the certificate at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Directory identifier.
    pub student_id: StudentId,
    /// Full name.
    pub name: String,
    /// University roll number.
    pub roll_number: RollNumber,
    /// Branch or course.
    pub branch: String,
    /// Current semester.
    pub semester: u8,
    /// Contact email.
    pub email: Option<String>,
    /// Contact mobile number.
    pub mobile_number: Option<String>,
}

// ============================================================================
// SECTION: Principal Sign-Off
// ============================================================================

/// Final approval recorded by the principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalSignOff {
    /// Signing user.
    pub signed_by_user_id: UserId,
    /// Signing user's display name.
    pub signed_by_name: String,
    /// Signing time.
    pub signed_at: Timestamp,
    /// Optional e-signature image.
    pub e_signature: Option<SignatureImage>,
}

// ============================================================================
// SECTION: Certificate
// ============================================================================

/// The No Dues Certificate aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Store-allocated identifier.
    pub(crate) id: CertificateId,
    /// Unique printed certificate number.
    pub(crate) certificate_number: CertificateNumber,
    /// Subject student.
    pub(crate) student: StudentProfile,
    /// Derived status (recomputed after every mutation).
    pub(crate) status: CertificateStatus,
    /// Per-department signature records.
    pub(crate) ledger: SignatureLedger,
    /// Principal sign-off, once granted.
    pub(crate) principal: Option<PrincipalSignOff>,
    /// Issue date, set on completion.
    pub(crate) issue_date: Option<Timestamp>,
    /// Creation time.
    pub(crate) created_at: Timestamp,
}

impl Certificate {
    /// Returns the certificate identifier.
    #[must_use]
    pub const fn id(&self) -> CertificateId {
        self.id
    }

    /// Returns the printed certificate number.
    #[must_use]
    pub const fn certificate_number(&self) -> &CertificateNumber {
        &self.certificate_number
    }

    /// Returns the subject student.
    #[must_use]
    pub const fn student(&self) -> &StudentProfile {
        &self.student
    }

    /// Returns the derived status.
    #[must_use]
    pub const fn status(&self) -> CertificateStatus {
        self.status
    }

    /// Returns the signature ledger.
    #[must_use]
    pub const fn ledger(&self) -> &SignatureLedger {
        &self.ledger
    }

    /// Returns the signature records in registry order.
    #[must_use]
    pub fn signatures(&self) -> &[SignatureRecord] {
        self.ledger.records()
    }

    /// Returns true once the principal has signed.
    #[must_use]
    pub const fn principal_signed(&self) -> bool {
        self.principal.is_some()
    }

    /// Returns the principal sign-off, if any.
    #[must_use]
    pub const fn principal(&self) -> Option<&PrincipalSignOff> {
        self.principal.as_ref()
    }

    /// Returns the issue date, set on completion.
    #[must_use]
    pub const fn issue_date(&self) -> Option<Timestamp> {
        self.issue_date
    }

    /// Returns the creation time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Decomposes the certificate into plain persisted parts.
    #[must_use]
    pub fn to_parts(&self) -> CertificateParts {
        CertificateParts {
            id: self.id,
            certificate_number: self.certificate_number.clone(),
            student: self.student.clone(),
            status: self.status,
            signatures: self.ledger.records().to_vec(),
            principal: self.principal.clone(),
            issue_date: self.issue_date,
            created_at: self.created_at,
        }
    }

    /// Builds the full caller view, attaching registry display names.
    #[must_use]
    pub fn view(&self, registry: &DepartmentRegistry) -> CertificateView {
        let principal = self.principal.as_ref();
        CertificateView {
            id: self.id,
            certificate_number: self.certificate_number.clone(),
            student: self.student.clone(),
            status: self.status,
            principal_signed: principal.is_some(),
            principal_signed_by: principal.map(|signoff| signoff.signed_by_name.clone()),
            principal_signed_at: principal.map(|signoff| signoff.signed_at),
            principal_e_signature: principal.and_then(|signoff| signoff.e_signature.clone()),
            issue_date: self.issue_date,
            created_at: self.created_at,
            signatures: self
                .ledger
                .records()
                .iter()
                .map(|record| SignatureView {
                    department_name: registry.display_name(&record.department),
                    record: record.clone(),
                })
                .collect(),
        }
    }

    /// Builds the list summary.
    #[must_use]
    pub fn summary(&self) -> CertificateSummary {
        let records = self.ledger.records();
        CertificateSummary {
            id: self.id,
            certificate_number: self.certificate_number.clone(),
            student_name: self.student.name.clone(),
            roll_number: self.student.roll_number.clone(),
            status: self.status,
            signed_departments: records
                .iter()
                .filter(|record| record.status == SignatureStatus::Signed)
                .count(),
            required_departments: records.len(),
            created_at: self.created_at,
            issue_date: self.issue_date,
        }
    }
}

/// Plain persisted form of a certificate, used by stores to rebuild it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateParts {
    /// Store-allocated identifier.
    pub id: CertificateId,
    /// Unique printed certificate number.
    pub certificate_number: CertificateNumber,
    /// Subject student.
    pub student: StudentProfile,
    /// Status as persisted; must match the derived status on restore.
    pub status: CertificateStatus,
    /// Signature records in registry order.
    pub signatures: Vec<SignatureRecord>,
    /// Principal sign-off, if any.
    pub principal: Option<PrincipalSignOff>,
    /// Issue date, if any.
    pub issue_date: Option<Timestamp>,
    /// Creation time.
    pub created_at: Timestamp,
}

// ============================================================================
// SECTION: Caller Views
// ============================================================================

/// Signature record enriched with the department display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureView {
    /// Department display name.
    pub department_name: String,
    /// Underlying record.
    #[serde(flatten)]
    pub record: SignatureRecord,
}

/// Full certificate view returned after every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateView {
    /// Certificate identifier.
    pub id: CertificateId,
    /// Printed certificate number.
    pub certificate_number: CertificateNumber,
    /// Subject student.
    pub student: StudentProfile,
    /// Derived status.
    pub status: CertificateStatus,
    /// Whether the principal has signed.
    pub principal_signed: bool,
    /// Principal display name.
    pub principal_signed_by: Option<String>,
    /// Principal signing time.
    pub principal_signed_at: Option<Timestamp>,
    /// Principal e-signature image.
    pub principal_e_signature: Option<SignatureImage>,
    /// Issue date, set on completion.
    pub issue_date: Option<Timestamp>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Signature records in registry order.
    pub signatures: Vec<SignatureView>,
}

impl CertificateView {
    /// Returns the record view for a department.
    #[must_use]
    pub fn signature(&self, department: &DepartmentCode) -> Option<&SignatureView> {
        self.signatures.iter().find(|view| &view.record.department == department)
    }
}

/// Compact certificate listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateSummary {
    /// Certificate identifier.
    pub id: CertificateId,
    /// Printed certificate number.
    pub certificate_number: CertificateNumber,
    /// Student name.
    pub student_name: String,
    /// Student roll number.
    pub roll_number: RollNumber,
    /// Derived status.
    pub status: CertificateStatus,
    /// Departments that have signed.
    pub signed_departments: usize,
    /// Departments required.
    pub required_departments: usize,
    /// Creation time.
    pub created_at: Timestamp,
    /// Issue date, set on completion.
    pub issue_date: Option<Timestamp>,
}

/// Listing filter for certificates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateFilter {
    /// Restrict to one student.
    pub roll_number: Option<RollNumber>,
    /// Restrict to one status.
    pub status: Option<CertificateStatus>,
}

impl CertificateFilter {
    /// Returns true when the certificate passes the filter.
    #[must_use]
    pub fn matches(&self, certificate: &Certificate) -> bool {
        self.roll_number.as_ref().is_none_or(|roll| &certificate.student.roll_number == roll)
            && self.status.is_none_or(|status| certificate.status == status)
    }
}

// ============================================================================
// SECTION: Transitions
// ============================================================================

/// State change applied to a stored certificate in one atomic unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CertificateTransition {
    /// Resolve a department record as signed.
    SignDepartment {
        /// Target department.
        department: DepartmentCode,
        /// Signer identity and time.
        stamp: SignerStamp,
    },
    /// Resolve a department record as rejected.
    RejectDepartment {
        /// Target department.
        department: DepartmentCode,
        /// Rejecting user identity and time.
        stamp: SignerStamp,
    },
    /// Record the principal's final sign-off.
    SignPrincipal {
        /// Principal identity, time and optional image.
        signoff: PrincipalSignOff,
    },
}

// ============================================================================
// SECTION: Eligibility and Requests
// ============================================================================

/// Result of checking whether a student may request a certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityReport {
    /// Student roll number.
    pub roll_number: RollNumber,
    /// Directory identifier.
    pub student_id: StudentId,
    /// True when no due is outstanding.
    pub eligible: bool,
    /// Dues still blocking certification.
    pub outstanding_dues: Vec<DueRecord>,
}

/// Receipt for a signature request sent to a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRequestReceipt {
    /// Certificate identifier.
    pub certificate_id: CertificateId,
    /// Printed certificate number.
    pub certificate_number: CertificateNumber,
    /// Department asked to sign.
    pub department: DepartmentCode,
    /// Department display name.
    pub department_name: String,
    /// Requesting user.
    pub requested_by: UserId,
    /// Request time.
    pub requested_at: Timestamp,
    /// Optional note for the department.
    pub message: Option<String>,
}

// ============================================================================
// SECTION: Numbering
// ============================================================================

/// Default certificate number prefix.
pub const DEFAULT_CERTIFICATE_PREFIX: &str = "NDC";

/// Strategy for printed certificate numbers.
///
/// Numbers derive from the store-allocated identifier, so they are unique as
/// long as identifiers are never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateNumbering {
    /// Number prefix.
    pub prefix: String,
}

impl CertificateNumbering {
    /// Creates a numbering strategy with a custom prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Builds the number for a certificate created at `created_at`.
    #[must_use]
    pub fn number_for(&self, id: CertificateId, created_at: Timestamp) -> CertificateNumber {
        let number = match created_at.calendar_year() {
            Some(year) => format!("{}-{year}-{:06}", self.prefix, id.get()),
            None => format!("{}-{:06}", self.prefix, id.get()),
        };
        CertificateNumber::new(number)
    }
}

impl Default for CertificateNumbering {
    fn default() -> Self {
        Self::new(DEFAULT_CERTIFICATE_PREFIX)
    }
}
