// crates/no-dues-core/src/runtime/policy.rs
// ============================================================================
// Module: Authorization Policy
// Description: Allow-list decisions for every certificate workflow action.
// Purpose: Centralize role checks in one pure, deny-by-default function.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The policy maps an actor and an action to allow or deny. It holds no state
//! and performs no I/O. Every rule is an explicit allow-list; anything not
//! matched is denied.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Actor;
use crate::core::DepartmentCode;
use crate::core::Role;
use crate::core::RollNumber;

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Workflow action submitted for authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Request a certificate for the student with this roll number.
    RequestCertificate(RollNumber),
    /// Check dues eligibility for the student with this roll number.
    CheckEligibility(RollNumber),
    /// View a certificate whose subject has this roll number.
    ViewCertificate(RollNumber),
    /// List certificates.
    ListCertificates,
    /// List certificates whose students have cleared every due.
    ListClearedDues,
    /// Sign a department record.
    SignDepartment(DepartmentCode),
    /// Reject a department record.
    RejectDepartment(DepartmentCode),
    /// Ask a department to sign.
    RequestSignature(DepartmentCode),
    /// Record principal sign-off.
    SignPrincipal,
    /// Delete a certificate.
    DeleteCertificate,
}

impl Action {
    /// Returns the stable operation label used in audit logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::RequestCertificate(_) => "request_certificate",
            Self::CheckEligibility(_) => "check_eligibility",
            Self::ViewCertificate(_) => "view_certificate",
            Self::ListCertificates => "list_certificates",
            Self::ListClearedDues => "list_cleared_dues",
            Self::SignDepartment(_) => "sign_department",
            Self::RejectDepartment(_) => "reject_department",
            Self::RequestSignature(_) => "request_signature",
            Self::SignPrincipal => "sign_principal",
            Self::DeleteCertificate => "delete_certificate",
        }
    }
}

/// Authorization outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    /// Action is permitted.
    Allow,
    /// Action is denied.
    Deny,
}

impl PolicyDecision {
    /// Returns true when the action is permitted.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts a boolean rule result into a decision.
    const fn from_rule(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Deny-by-default authorization policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthorizationPolicy;

impl AuthorizationPolicy {
    /// Decides whether the actor may perform the action.
    #[must_use]
    pub fn decide(&self, actor: &Actor, action: &Action) -> PolicyDecision {
        let allowed = match action {
            Action::SignDepartment(department) | Action::RejectDepartment(department) => {
                Self::may_resolve_department(actor, department)
            }
            Action::RequestSignature(department) => {
                actor.has_role(Role::Hod) && !department.is_hod()
            }
            Action::SignPrincipal => {
                actor.has_role(Role::Admin) || actor.has_role(Role::Principal)
            }
            Action::RequestCertificate(roll_number)
            | Action::CheckEligibility(roll_number)
            | Action::ViewCertificate(roll_number) => {
                actor.is_privileged() || actor.is_student(roll_number)
            }
            Action::ListCertificates => {
                actor.is_privileged()
                    || (actor.has_role(Role::Student) && actor.roll_number.is_some())
            }
            Action::ListClearedDues => actor.is_privileged(),
            Action::DeleteCertificate => actor.has_role(Role::Admin),
        };
        PolicyDecision::from_rule(allowed)
    }

    /// Sign and reject share one allow-list.
    fn may_resolve_department(actor: &Actor, department: &DepartmentCode) -> bool {
        if actor.has_role(Role::Admin) {
            return true;
        }
        if actor.has_role(Role::DepartmentAdmin) && actor.home_department.as_ref() == Some(department)
        {
            return true;
        }
        actor.has_role(Role::Hod) && department.is_hod()
    }
}
