// crates/no-dues-core/src/runtime/service.rs
// ============================================================================
// Module: Certificate Service
// Description: Orchestration facade for the No Dues certificate workflow.
// Purpose: Enforce the dues gate, authorization and atomic state transitions.
// Dependencies: crate::core, crate::interfaces, crate::runtime, thiserror
// ============================================================================

//! ## Overview
//! [`CertificateService`] is the only mutator of certificates. Each operation
//! receives an explicit [`IdentityContext`], checks the authorization policy,
//! consults collaborators, and hands the state change to the store as one
//! [`CertificateTransition`] so ledger mutation and status recomputation
//! persist together. Every mutating call returns the fresh certificate view.
//!
//! Every operation emits exactly one audit event, including denials and
//! typed failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::core::Actor;
use crate::core::AuditEvent;
use crate::core::AuditEventParams;
use crate::core::AuditOutcome;
use crate::core::CertificateFilter;
use crate::core::CertificateId;
use crate::core::CertificateNumbering;
use crate::core::CertificateSummary;
use crate::core::CertificateTransition;
use crate::core::CertificateView;
use crate::core::DepartmentCode;
use crate::core::DepartmentRegistry;
use crate::core::EligibilityReport;
use crate::core::IdentityContext;
use crate::core::PrincipalSignOff;
use crate::core::RollNumber;
use crate::core::SignatureImage;
use crate::core::SignatureRequestReceipt;
use crate::core::SignatureStatus;
use crate::core::SignerStamp;
use crate::core::StudentProfile;
use crate::core::Timestamp;
use crate::core::UserId;
use crate::interfaces::ApplyError;
use crate::interfaces::AuditSink;
use crate::interfaces::CertificateStore;
use crate::interfaces::DirectoryError;
use crate::interfaces::DueLedger;
use crate::interfaces::DueLedgerError;
use crate::interfaces::NotifyError;
use crate::interfaces::SignatureRequestNotifier;
use crate::interfaces::StoreError;
use crate::interfaces::StudentDirectory;
use crate::interfaces::UserDirectory;
use crate::runtime::audit::NoopAuditSink;
use crate::runtime::ledger::LedgerError;
use crate::runtime::machine::CertificateStateMachine;
use crate::runtime::machine::NewCertificate;
use crate::runtime::machine::TransitionError;
use crate::runtime::policy::Action;
use crate::runtime::policy::AuthorizationPolicy;
use crate::runtime::store::NoopNotifier;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Stable error classification callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Student has outstanding dues.
    PendingDues,
    /// Actor lacks permission.
    Authorization,
    /// Certificate, student or signature record does not exist.
    NotFound,
    /// Department registry repeats a code.
    DuplicateDepartment,
    /// Signature record already signed or rejected.
    AlreadyResolved,
    /// E-signature requested but none on file.
    MissingSignature,
    /// Principal sign-off attempted out of order.
    Precondition,
    /// Storage failure.
    Store,
    /// Collaborator failure.
    Collaborator,
}

impl ErrorKind {
    /// Returns the stable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PendingDues => "pending_dues",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::DuplicateDepartment => "duplicate_department",
            Self::AlreadyResolved => "already_resolved",
            Self::MissingSignature => "missing_signature",
            Self::Precondition => "precondition",
            Self::Store => "store",
            Self::Collaborator => "collaborator",
        }
    }
}

/// Certificate service errors.
#[derive(Debug, Error)]
pub enum CertificateError {
    /// Student has dues that are not cleared.
    #[error("student {roll_number} has {outstanding} outstanding due(s)")]
    PendingDues {
        /// Student roll number.
        roll_number: RollNumber,
        /// Number of outstanding dues.
        outstanding: usize,
    },
    /// Authorization policy denied the action.
    #[error("user {actor} is not authorized to {action}")]
    Unauthorized {
        /// Acting user.
        actor: UserId,
        /// Denied operation label.
        action: &'static str,
    },
    /// Certificate does not exist.
    #[error("certificate {0} not found")]
    CertificateNotFound(CertificateId),
    /// Student is not enrolled.
    #[error("student {0} not found")]
    StudentNotFound(RollNumber),
    /// Certificate has no record for the department.
    #[error("certificate {certificate_id} has no signature record for {department}")]
    SignatureNotFound {
        /// Certificate identifier.
        certificate_id: CertificateId,
        /// Requested department.
        department: DepartmentCode,
    },
    /// Department registry repeats a code.
    #[error("duplicate department in registry: {0}")]
    DuplicateDepartment(DepartmentCode),
    /// Signature record already left `PENDING`.
    #[error("department {department} already {} certificate {certificate_id}", resolution_verb(.status))]
    AlreadyResolved {
        /// Certificate identifier.
        certificate_id: CertificateId,
        /// Target department.
        department: DepartmentCode,
        /// Current record status.
        status: SignatureStatus,
    },
    /// E-signature requested but the user has none on file.
    #[error("user {0} has no stored e-signature")]
    MissingSignature(UserId),
    /// Principal sign-off attempted out of order.
    #[error("precondition failed: {0}")]
    Precondition(String),
    /// Certificate store failed.
    #[error("store error: {0}")]
    Store(String),
    /// External collaborator failed.
    #[error("collaborator error: {0}")]
    Collaborator(String),
}

impl CertificateError {
    /// Returns the stable error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PendingDues {
                ..
            } => ErrorKind::PendingDues,
            Self::Unauthorized {
                ..
            } => ErrorKind::Authorization,
            Self::CertificateNotFound(_)
            | Self::StudentNotFound(_)
            | Self::SignatureNotFound {
                ..
            } => ErrorKind::NotFound,
            Self::DuplicateDepartment(_) => ErrorKind::DuplicateDepartment,
            Self::AlreadyResolved {
                ..
            } => ErrorKind::AlreadyResolved,
            Self::MissingSignature(_) => ErrorKind::MissingSignature,
            Self::Precondition(_) => ErrorKind::Precondition,
            Self::Store(_) => ErrorKind::Store,
            Self::Collaborator(_) => ErrorKind::Collaborator,
        }
    }

    /// Maps a transition failure on a known certificate.
    fn from_transition(certificate_id: CertificateId, error: TransitionError) -> Self {
        match error {
            TransitionError::Ledger(LedgerError::DuplicateDepartment(department)) => {
                Self::DuplicateDepartment(department)
            }
            TransitionError::Ledger(LedgerError::NotFound(department)) => Self::SignatureNotFound {
                certificate_id,
                department,
            },
            TransitionError::Ledger(LedgerError::AlreadyResolved {
                department,
                status,
            }) => Self::AlreadyResolved {
                certificate_id,
                department,
                status,
            },
            TransitionError::PrincipalAlreadySigned | TransitionError::NotReadyForPrincipal(_) => {
                Self::Precondition(error.to_string())
            }
            TransitionError::Inconsistent(message) => Self::Store(message),
        }
    }

    /// Maps a store apply failure on a known certificate.
    fn from_apply(certificate_id: CertificateId, error: ApplyError) -> Self {
        match error {
            ApplyError::NotFound(id) => Self::CertificateNotFound(id),
            ApplyError::Transition(error) => Self::from_transition(certificate_id, error),
            ApplyError::Store(error) => error.into(),
        }
    }
}

/// Returns the past-tense verb for a resolved record.
const fn resolution_verb(status: &SignatureStatus) -> &'static str {
    match *status {
        SignatureStatus::Rejected => "rejected",
        SignatureStatus::Signed | SignatureStatus::Pending => "signed",
    }
}

impl From<StoreError> for CertificateError {
    fn from(error: StoreError) -> Self {
        Self::Store(error.to_string())
    }
}

impl From<DueLedgerError> for CertificateError {
    fn from(error: DueLedgerError) -> Self {
        Self::Collaborator(error.to_string())
    }
}

impl From<DirectoryError> for CertificateError {
    fn from(error: DirectoryError) -> Self {
        Self::Collaborator(error.to_string())
    }
}

impl From<NotifyError> for CertificateError {
    fn from(error: NotifyError) -> Self {
        Self::Collaborator(error.to_string())
    }
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Request to create a certificate for a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCertificate {
    /// Subject student roll number.
    pub roll_number: RollNumber,
    /// Request time.
    pub requested_at: Timestamp,
}

/// Request to sign a department record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignDepartmentRequest {
    /// Target certificate.
    pub certificate_id: CertificateId,
    /// Target department.
    pub department: DepartmentCode,
    /// Optional comments.
    pub comments: Option<String>,
    /// Embed the signer's stored e-signature.
    pub use_e_signature: bool,
    /// Decision time.
    pub decided_at: Timestamp,
}

/// Request to reject a department record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectDepartmentRequest {
    /// Target certificate.
    pub certificate_id: CertificateId,
    /// Target department.
    pub department: DepartmentCode,
    /// Optional rejection reason.
    pub comments: Option<String>,
    /// Decision time.
    pub decided_at: Timestamp,
}

/// Request asking a department to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRequest {
    /// Target certificate.
    pub certificate_id: CertificateId,
    /// Department asked to sign.
    pub department: DepartmentCode,
    /// Optional note.
    pub message: Option<String>,
    /// Request time.
    pub requested_at: Timestamp,
}

/// Request for principal sign-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalSignRequest {
    /// Target certificate.
    pub certificate_id: CertificateId,
    /// Embed the principal's stored e-signature.
    pub use_e_signature: bool,
    /// Signing time.
    pub signed_at: Timestamp,
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Certificate service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateServiceConfig {
    /// Departments every new certificate must clear.
    pub registry: DepartmentRegistry,
    /// Certificate number strategy.
    pub numbering: CertificateNumbering,
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Audit fields known once an operation finishes.
struct AuditScope<'a> {
    /// Operation label.
    operation: &'static str,
    /// Acting user.
    actor: &'a Actor,
    /// Request time, when the operation carries one.
    at: Option<Timestamp>,
    /// Target certificate, when known.
    certificate_id: Option<CertificateId>,
    /// Target department, when applicable.
    department: Option<&'a DepartmentCode>,
}

/// Orchestration facade for the certificate workflow.
pub struct CertificateService<S, L, U, R> {
    /// Service configuration.
    config: CertificateServiceConfig,
    /// Certificate persistence.
    store: S,
    /// Dues ledger consulted by the eligibility gate.
    dues: L,
    /// User directory holding e-signatures.
    users: U,
    /// Student directory.
    students: R,
    /// Authorization policy.
    policy: AuthorizationPolicy,
    /// Audit sink.
    audit: Arc<dyn AuditSink>,
    /// Signature request delivery.
    notifier: Arc<dyn SignatureRequestNotifier>,
}

impl<S, L, U, R> CertificateService<S, L, U, R>
where
    S: CertificateStore,
    L: DueLedger,
    U: UserDirectory,
    R: StudentDirectory,
{
    /// Creates a service with no-op audit and notification collaborators.
    #[must_use]
    pub fn new(config: CertificateServiceConfig, store: S, dues: L, users: U, students: R) -> Self {
        Self {
            config,
            store,
            dues,
            users,
            students,
            policy: AuthorizationPolicy,
            audit: Arc::new(NoopAuditSink),
            notifier: Arc::new(NoopNotifier),
        }
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Replaces the signature request notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn SignatureRequestNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Returns the department registry applied to new certificates.
    #[must_use]
    pub const fn registry(&self) -> &DepartmentRegistry {
        &self.config.registry
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Creates a certificate once the student's dues are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::StudentNotFound`], [`CertificateError::PendingDues`]
    /// (nothing is created), [`CertificateError::Unauthorized`] or a store error.
    pub fn request_certificate(
        &self,
        ctx: &IdentityContext,
        request: &RequestCertificate,
    ) -> Result<CertificateView, CertificateError> {
        let actor = ctx.current_actor();
        let result = self.create_certificate(actor, request);
        self.audit(
            &AuditScope {
                operation: Action::RequestCertificate(request.roll_number.clone()).label(),
                actor,
                at: Some(request.requested_at),
                certificate_id: result.as_ref().ok().map(|view| view.id),
                department: None,
            },
            &result,
        );
        result
    }

    /// Returns the full view of a certificate.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::CertificateNotFound`] or
    /// [`CertificateError::Unauthorized`].
    pub fn certificate(
        &self,
        ctx: &IdentityContext,
        certificate_id: CertificateId,
    ) -> Result<CertificateView, CertificateError> {
        let actor = ctx.current_actor();
        let result = self.view_certificate(actor, certificate_id);
        self.audit(
            &AuditScope {
                operation: "view_certificate",
                actor,
                at: None,
                certificate_id: Some(certificate_id),
                department: None,
            },
            &result,
        );
        result
    }

    /// Lists certificate summaries. Students only ever see their own.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Unauthorized`] or a store error.
    pub fn list_certificates(
        &self,
        ctx: &IdentityContext,
        filter: &CertificateFilter,
    ) -> Result<Vec<CertificateSummary>, CertificateError> {
        let actor = ctx.current_actor();
        let result = self.summaries(actor, filter);
        self.audit(
            &AuditScope {
                operation: Action::ListCertificates.label(),
                actor,
                at: None,
                certificate_id: None,
                department: None,
            },
            &result,
        );
        result
    }

    /// Lists certificates whose students currently have no outstanding dues.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Unauthorized`], a store error or a
    /// dues ledger error.
    pub fn certificates_with_cleared_dues(
        &self,
        ctx: &IdentityContext,
    ) -> Result<Vec<CertificateSummary>, CertificateError> {
        let actor = ctx.current_actor();
        let result = self.cleared_summaries(actor);
        self.audit(
            &AuditScope {
                operation: Action::ListClearedDues.label(),
                actor,
                at: None,
                certificate_id: None,
                department: None,
            },
            &result,
        );
        result
    }

    /// Reports whether a student may request a certificate.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Unauthorized`],
    /// [`CertificateError::StudentNotFound`] or a collaborator error.
    pub fn check_eligibility(
        &self,
        ctx: &IdentityContext,
        roll_number: &RollNumber,
    ) -> Result<EligibilityReport, CertificateError> {
        let actor = ctx.current_actor();
        let result = self.eligibility(actor, roll_number);
        self.audit(
            &AuditScope {
                operation: Action::CheckEligibility(roll_number.clone()).label(),
                actor,
                at: None,
                certificate_id: None,
                department: None,
            },
            &result,
        );
        result
    }

    /// Signs a department record and recomputes certificate status.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Unauthorized`], [`CertificateError::MissingSignature`],
    /// a not-found error, or [`CertificateError::AlreadyResolved`].
    pub fn sign_department(
        &self,
        ctx: &IdentityContext,
        request: &SignDepartmentRequest,
    ) -> Result<CertificateView, CertificateError> {
        let actor = ctx.current_actor();
        let result = self.resolve_department(actor, request);
        self.audit(
            &AuditScope {
                operation: Action::SignDepartment(request.department.clone()).label(),
                actor,
                at: Some(request.decided_at),
                certificate_id: Some(request.certificate_id),
                department: Some(&request.department),
            },
            &result,
        );
        result
    }

    /// Rejects a department record; the certificate becomes `REJECTED`.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Unauthorized`], a not-found error, or
    /// [`CertificateError::AlreadyResolved`].
    pub fn reject_department(
        &self,
        ctx: &IdentityContext,
        request: &RejectDepartmentRequest,
    ) -> Result<CertificateView, CertificateError> {
        let actor = ctx.current_actor();
        let result = self.reject(actor, request);
        self.audit(
            &AuditScope {
                operation: Action::RejectDepartment(request.department.clone()).label(),
                actor,
                at: Some(request.decided_at),
                certificate_id: Some(request.certificate_id),
                department: Some(&request.department),
            },
            &result,
        );
        result
    }

    /// Asks a department to sign a pending record.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Unauthorized`], a not-found error,
    /// [`CertificateError::AlreadyResolved`] or a delivery failure.
    pub fn request_signature(
        &self,
        ctx: &IdentityContext,
        request: &SignatureRequest,
    ) -> Result<SignatureRequestReceipt, CertificateError> {
        let actor = ctx.current_actor();
        let result = self.send_signature_request(actor, request);
        self.audit(
            &AuditScope {
                operation: Action::RequestSignature(request.department.clone()).label(),
                actor,
                at: Some(request.requested_at),
                certificate_id: Some(request.certificate_id),
                department: Some(&request.department),
            },
            &result,
        );
        result
    }

    /// Records principal sign-off and issues the certificate.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Unauthorized`], [`CertificateError::MissingSignature`],
    /// [`CertificateError::CertificateNotFound`] or [`CertificateError::Precondition`].
    pub fn sign_principal(
        &self,
        ctx: &IdentityContext,
        request: &PrincipalSignRequest,
    ) -> Result<CertificateView, CertificateError> {
        let actor = ctx.current_actor();
        let result = self.principal_sign_off(actor, request);
        self.audit(
            &AuditScope {
                operation: Action::SignPrincipal.label(),
                actor,
                at: Some(request.signed_at),
                certificate_id: Some(request.certificate_id),
                department: None,
            },
            &result,
        );
        result
    }

    /// Deletes a certificate together with its signature records.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Unauthorized`] or
    /// [`CertificateError::CertificateNotFound`].
    pub fn delete_certificate(
        &self,
        ctx: &IdentityContext,
        certificate_id: CertificateId,
        requested_at: Timestamp,
    ) -> Result<(), CertificateError> {
        let actor = ctx.current_actor();
        let result = self.authorize(actor, &Action::DeleteCertificate).and_then(|()| {
            if self.store.delete(certificate_id)? {
                Ok(())
            } else {
                Err(CertificateError::CertificateNotFound(certificate_id))
            }
        });
        self.audit(
            &AuditScope {
                operation: Action::DeleteCertificate.label(),
                actor,
                at: Some(requested_at),
                certificate_id: Some(certificate_id),
                department: None,
            },
            &result,
        );
        result
    }

    // ------------------------------------------------------------------------
    // Operation bodies
    // ------------------------------------------------------------------------

    /// Dues gate, authorization, numbering, creation and insert.
    fn create_certificate(
        &self,
        actor: &Actor,
        request: &RequestCertificate,
    ) -> Result<CertificateView, CertificateError> {
        let student = self.find_student(&request.roll_number)?;
        let outstanding = self.dues.outstanding_dues(&student.student_id)?;
        if !outstanding.is_empty() {
            return Err(CertificateError::PendingDues {
                roll_number: student.roll_number,
                outstanding: outstanding.len(),
            });
        }
        self.authorize(actor, &Action::RequestCertificate(student.roll_number.clone()))?;
        let id = self.store.allocate_id()?;
        let certificate = CertificateStateMachine::create(NewCertificate {
            id,
            certificate_number: self.config.numbering.number_for(id, request.requested_at),
            student,
            departments: self.config.registry.list_required_departments(),
            created_at: request.requested_at,
        })
        .map_err(|error| CertificateError::from_transition(id, error))?;
        self.store.insert(&certificate)?;
        Ok(certificate.view(&self.config.registry))
    }

    /// Loads and authorizes a certificate view.
    fn view_certificate(
        &self,
        actor: &Actor,
        certificate_id: CertificateId,
    ) -> Result<CertificateView, CertificateError> {
        let certificate = self
            .store
            .load(certificate_id)?
            .ok_or(CertificateError::CertificateNotFound(certificate_id))?;
        self.authorize(actor, &Action::ViewCertificate(certificate.student().roll_number.clone()))?;
        Ok(certificate.view(&self.config.registry))
    }

    /// Lists summaries, scoping students to their own roll number.
    fn summaries(
        &self,
        actor: &Actor,
        filter: &CertificateFilter,
    ) -> Result<Vec<CertificateSummary>, CertificateError> {
        self.authorize(actor, &Action::ListCertificates)?;
        let mut filter = filter.clone();
        if !actor.is_privileged() {
            if filter.roll_number.is_some() && filter.roll_number != actor.roll_number {
                return Err(denied(actor, &Action::ListCertificates));
            }
            filter.roll_number.clone_from(&actor.roll_number);
        }
        let certificates = self.store.list(&filter)?;
        Ok(certificates.iter().map(|certificate| certificate.summary()).collect())
    }

    /// Authorizes and keeps certificates whose subject has no outstanding dues.
    fn cleared_summaries(
        &self,
        actor: &Actor,
    ) -> Result<Vec<CertificateSummary>, CertificateError> {
        self.authorize(actor, &Action::ListClearedDues)?;
        let mut cleared = Vec::new();
        for certificate in self.store.list(&CertificateFilter::default())? {
            if !self.dues.has_outstanding_dues(&certificate.student().student_id)? {
                cleared.push(certificate.summary());
            }
        }
        Ok(cleared)
    }

    /// Authorizes and reports outstanding dues.
    fn eligibility(
        &self,
        actor: &Actor,
        roll_number: &RollNumber,
    ) -> Result<EligibilityReport, CertificateError> {
        self.authorize(actor, &Action::CheckEligibility(roll_number.clone()))?;
        let student = self.find_student(roll_number)?;
        let outstanding_dues = self.dues.outstanding_dues(&student.student_id)?;
        Ok(EligibilityReport {
            roll_number: student.roll_number,
            student_id: student.student_id,
            eligible: outstanding_dues.is_empty(),
            outstanding_dues,
        })
    }

    /// Authorizes, resolves the e-signature and applies the sign transition.
    fn resolve_department(
        &self,
        actor: &Actor,
        request: &SignDepartmentRequest,
    ) -> Result<CertificateView, CertificateError> {
        self.authorize(actor, &Action::SignDepartment(request.department.clone()))?;
        let image = self.e_signature(actor, request.use_e_signature)?;
        let transition = CertificateTransition::SignDepartment {
            department: request.department.clone(),
            stamp: stamp(actor, request.decided_at, request.comments.clone(), image),
        };
        self.apply(request.certificate_id, &transition)
    }

    /// Authorizes and applies the reject transition.
    fn reject(
        &self,
        actor: &Actor,
        request: &RejectDepartmentRequest,
    ) -> Result<CertificateView, CertificateError> {
        self.authorize(actor, &Action::RejectDepartment(request.department.clone()))?;
        let transition = CertificateTransition::RejectDepartment {
            department: request.department.clone(),
            stamp: stamp(actor, request.decided_at, request.comments.clone(), None),
        };
        self.apply(request.certificate_id, &transition)
    }

    /// Authorizes, checks the record is pending, and notifies the department.
    fn send_signature_request(
        &self,
        actor: &Actor,
        request: &SignatureRequest,
    ) -> Result<SignatureRequestReceipt, CertificateError> {
        self.authorize(actor, &Action::RequestSignature(request.department.clone()))?;
        let certificate = self
            .store
            .load(request.certificate_id)?
            .ok_or(CertificateError::CertificateNotFound(request.certificate_id))?;
        let record = certificate.ledger().record(&request.department).ok_or_else(|| {
            CertificateError::SignatureNotFound {
                certificate_id: request.certificate_id,
                department: request.department.clone(),
            }
        })?;
        if record.status.is_resolved() {
            return Err(CertificateError::AlreadyResolved {
                certificate_id: request.certificate_id,
                department: request.department.clone(),
                status: record.status,
            });
        }
        let receipt = SignatureRequestReceipt {
            certificate_id: certificate.id(),
            certificate_number: certificate.certificate_number().clone(),
            department: request.department.clone(),
            department_name: self.config.registry.display_name(&request.department),
            requested_by: actor.user_id.clone(),
            requested_at: request.requested_at,
            message: request.message.clone(),
        };
        self.notifier.notify(&receipt)?;
        Ok(receipt)
    }

    /// Authorizes, resolves the e-signature and applies principal sign-off.
    fn principal_sign_off(
        &self,
        actor: &Actor,
        request: &PrincipalSignRequest,
    ) -> Result<CertificateView, CertificateError> {
        self.authorize(actor, &Action::SignPrincipal)?;
        let e_signature = self.e_signature(actor, request.use_e_signature)?;
        let transition = CertificateTransition::SignPrincipal {
            signoff: PrincipalSignOff {
                signed_by_user_id: actor.user_id.clone(),
                signed_by_name: actor.display_name.clone(),
                signed_at: request.signed_at,
                e_signature,
            },
        };
        self.apply(request.certificate_id, &transition)
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Applies a transition through the store and renders the fresh view.
    fn apply(
        &self,
        certificate_id: CertificateId,
        transition: &CertificateTransition,
    ) -> Result<CertificateView, CertificateError> {
        let certificate = self
            .store
            .apply(certificate_id, transition)
            .map_err(|error| CertificateError::from_apply(certificate_id, error))?;
        Ok(certificate.view(&self.config.registry))
    }

    /// Resolves a student by roll number.
    fn find_student(&self, roll_number: &RollNumber) -> Result<StudentProfile, CertificateError> {
        self.students
            .find_by_roll_number(roll_number)?
            .ok_or_else(|| CertificateError::StudentNotFound(roll_number.clone()))
    }

    /// Loads the actor's stored e-signature when requested.
    fn e_signature(
        &self,
        actor: &Actor,
        requested: bool,
    ) -> Result<Option<SignatureImage>, CertificateError> {
        if !requested {
            return Ok(None);
        }
        if !self.users.has_stored_signature(&actor.user_id)? {
            return Err(CertificateError::MissingSignature(actor.user_id.clone()));
        }
        self.users
            .signature_image(&actor.user_id)?
            .map(Some)
            .ok_or_else(|| CertificateError::MissingSignature(actor.user_id.clone()))
    }

    /// Checks the policy, failing closed.
    fn authorize(&self, actor: &Actor, action: &Action) -> Result<(), CertificateError> {
        if self.policy.decide(actor, action).is_allowed() {
            Ok(())
        } else {
            Err(denied(actor, action))
        }
    }

    /// Emits one audit event for a finished operation.
    fn audit<T>(&self, scope: &AuditScope<'_>, result: &Result<T, CertificateError>) {
        let (outcome, error_kind) = match result {
            Ok(_) => (AuditOutcome::Ok, None),
            Err(error) if error.kind() == ErrorKind::Authorization => {
                (AuditOutcome::Denied, Some(error.kind().label()))
            }
            Err(error) => (AuditOutcome::Error, Some(error.kind().label())),
        };
        self.audit.record(&AuditEvent::new(AuditEventParams {
            operation: scope.operation,
            at: scope.at,
            actor_id: scope.actor.user_id.clone(),
            certificate_id: scope.certificate_id,
            department: scope.department.cloned(),
            outcome,
            error_kind,
        }));
    }
}

/// Builds the authorization error for an action.
fn denied(actor: &Actor, action: &Action) -> CertificateError {
    CertificateError::Unauthorized {
        actor: actor.user_id.clone(),
        action: action.label(),
    }
}

/// Builds the signer stamp recorded on a resolved record.
fn stamp(
    actor: &Actor,
    at: Timestamp,
    comments: Option<String>,
    image: Option<SignatureImage>,
) -> SignerStamp {
    SignerStamp {
        user_id: actor.user_id.clone(),
        name: actor.display_name.clone(),
        at,
        comments,
        image,
    }
}
