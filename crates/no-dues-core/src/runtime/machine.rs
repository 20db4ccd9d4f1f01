// crates/no-dues-core/src/runtime/machine.rs
// ============================================================================
// Module: Certificate State Machine
// Description: Creation, transition and restoration of certificate aggregates.
// Purpose: Keep certificate status a pure derivation of ledger and principal.
// Dependencies: crate::core, crate::runtime::ledger, thiserror
// ============================================================================

//! ## Overview
//! The state machine is the only code that writes a certificate's status.
//! After every mutation the status is recomputed from the ledger aggregate;
//! once the principal has signed it is `COMPLETE` regardless of the ledger.
//!
//! ```text
//! PENDING -> PARTIAL -> ALLSIGNED -> COMPLETE
//!    \          \
//!     +----------+--> REJECTED
//! ```
//!
//! Security posture: stores hand persisted data back through [`restore`],
//! which refuses any combination the machine could never have produced.
//!
//! [`restore`]: CertificateStateMachine::restore

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::Certificate;
use crate::core::CertificateId;
use crate::core::CertificateNumber;
use crate::core::CertificateParts;
use crate::core::CertificateStatus;
use crate::core::CertificateTransition;
use crate::core::DepartmentCode;
use crate::core::PrincipalSignOff;
use crate::core::StudentProfile;
use crate::core::Timestamp;
use crate::runtime::ledger::LedgerAggregate;
use crate::runtime::ledger::LedgerError;
use crate::runtime::ledger::SignatureLedger;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// State machine errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Signature ledger rejected the mutation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// Principal already signed this certificate.
    #[error("principal has already signed this certificate")]
    PrincipalAlreadySigned,
    /// Principal sign-off requires every department to have signed.
    #[error("principal sign-off requires ALLSIGNED, certificate is {}", .0.label())]
    NotReadyForPrincipal(CertificateStatus),
    /// Persisted data describes a state the machine cannot produce.
    #[error("inconsistent certificate state: {0}")]
    Inconsistent(String),
}

// ============================================================================
// SECTION: Derivation
// ============================================================================

/// Derives certificate status from the ledger aggregate and principal flag.
#[must_use]
pub fn derive_status(aggregate: LedgerAggregate, principal_signed: bool) -> CertificateStatus {
    if principal_signed { CertificateStatus::Complete } else { aggregate.into() }
}

// ============================================================================
// SECTION: State Machine
// ============================================================================

/// Inputs required to create a certificate.
#[derive(Debug, Clone)]
pub struct NewCertificate {
    /// Store-allocated identifier.
    pub id: CertificateId,
    /// Printed certificate number.
    pub certificate_number: CertificateNumber,
    /// Subject student.
    pub student: StudentProfile,
    /// Required departments in registry order.
    pub departments: Vec<DepartmentCode>,
    /// Creation time.
    pub created_at: Timestamp,
}

/// Certificate lifecycle state machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct CertificateStateMachine;

impl CertificateStateMachine {
    /// Creates a certificate with one pending record per department.
    ///
    /// An empty department list yields an `ALLSIGNED` certificate.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Ledger`] when the department list repeats a code.
    pub fn create(request: NewCertificate) -> Result<Certificate, TransitionError> {
        let ledger = SignatureLedger::initialize(&request.departments)?;
        let mut certificate = Certificate {
            id: request.id,
            certificate_number: request.certificate_number,
            student: request.student,
            status: CertificateStatus::Pending,
            ledger,
            principal: None,
            issue_date: None,
            created_at: request.created_at,
        };
        Self::apply_signature_mutation(&mut certificate);
        Ok(certificate)
    }

    /// Recomputes status after a ledger mutation.
    pub fn apply_signature_mutation(certificate: &mut Certificate) {
        certificate.status =
            derive_status(certificate.ledger.aggregate_state(), certificate.principal.is_some());
    }

    /// Records principal sign-off and completes the certificate.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::PrincipalAlreadySigned`] or
    /// [`TransitionError::NotReadyForPrincipal`]; the certificate is unchanged.
    pub fn sign_as_principal(
        certificate: &mut Certificate,
        signoff: PrincipalSignOff,
    ) -> Result<(), TransitionError> {
        if certificate.principal.is_some() {
            return Err(TransitionError::PrincipalAlreadySigned);
        }
        if certificate.ledger.aggregate_state() != LedgerAggregate::AllSigned {
            return Err(TransitionError::NotReadyForPrincipal(certificate.status));
        }
        certificate.issue_date = Some(signoff.signed_at);
        certificate.principal = Some(signoff);
        Self::apply_signature_mutation(certificate);
        Ok(())
    }

    /// Applies a transition to a certificate. On error the certificate is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the transition is not allowed.
    pub fn apply(
        certificate: &mut Certificate,
        transition: &CertificateTransition,
    ) -> Result<(), TransitionError> {
        match transition {
            CertificateTransition::SignDepartment {
                department,
                stamp,
            } => {
                certificate.ledger.sign(department, stamp.clone())?;
                Self::apply_signature_mutation(certificate);
            }
            CertificateTransition::RejectDepartment {
                department,
                stamp,
            } => {
                certificate.ledger.reject(department, stamp.clone())?;
                Self::apply_signature_mutation(certificate);
            }
            CertificateTransition::SignPrincipal {
                signoff,
            } => Self::sign_as_principal(certificate, signoff.clone())?,
        }
        Ok(())
    }

    /// Rebuilds a certificate from persisted parts.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the parts break a certificate invariant.
    pub fn restore(parts: CertificateParts) -> Result<Certificate, TransitionError> {
        let ledger = SignatureLedger::from_records(parts.signatures)?;
        let aggregate = ledger.aggregate_state();
        if parts.principal.is_some() && aggregate != LedgerAggregate::AllSigned {
            return Err(TransitionError::Inconsistent(format!(
                "certificate {} has principal sign-off without every department signed",
                parts.id
            )));
        }
        if parts.principal.is_some() != parts.issue_date.is_some() {
            return Err(TransitionError::Inconsistent(format!(
                "certificate {} issue date does not match principal sign-off",
                parts.id
            )));
        }
        let derived = derive_status(aggregate, parts.principal.is_some());
        if derived != parts.status {
            return Err(TransitionError::Inconsistent(format!(
                "certificate {} stored status {} but records derive {}",
                parts.id,
                parts.status.label(),
                derived.label()
            )));
        }
        Ok(Certificate {
            id: parts.id,
            certificate_number: parts.certificate_number,
            student: parts.student,
            status: derived,
            ledger,
            principal: parts.principal,
            issue_date: parts.issue_date,
            created_at: parts.created_at,
        })
    }
}
