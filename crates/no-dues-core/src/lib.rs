// crates/no-dues-core/src/lib.rs
// ============================================================================
// Module: No Dues Core Library
// Description: Public API surface for the No Dues certificate workflow core.
// Purpose: Expose domain types, collaborator interfaces, and runtime services.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The No Dues core models the "No Dues Certificate" approval workflow: a
//! dues-clearance gate, a per-department signature ledger, a certificate
//! state machine, and the authorization rules governing each transition.
//! It is storage-agnostic and integrates through explicit interfaces; the
//! [`CertificateService`] is the only mutator of certificate state.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::ApplyError;
pub use interfaces::AuditSink;
pub use interfaces::CertificateStore;
pub use interfaces::DirectoryError;
pub use interfaces::DueLedger;
pub use interfaces::DueLedgerError;
pub use interfaces::NotifyError;
pub use interfaces::SignatureRequestNotifier;
pub use interfaces::StoreError;
pub use interfaces::StudentDirectory;
pub use interfaces::UserDirectory;
pub use runtime::Action;
pub use runtime::AuthorizationPolicy;
pub use runtime::CertificateError;
pub use runtime::CertificateService;
pub use runtime::CertificateServiceConfig;
pub use runtime::CertificateStateMachine;
pub use runtime::ErrorKind;
pub use runtime::FileAuditSink;
pub use runtime::InMemoryCertificateStore;
pub use runtime::InMemoryDueLedger;
pub use runtime::InMemoryStudentDirectory;
pub use runtime::InMemoryUserDirectory;
pub use runtime::LedgerAggregate;
pub use runtime::LedgerError;
pub use runtime::MemoryAuditSink;
pub use runtime::NewCertificate;
pub use runtime::NoopAuditSink;
pub use runtime::NoopNotifier;
pub use runtime::PolicyDecision;
pub use runtime::PrincipalSignRequest;
pub use runtime::RejectDepartmentRequest;
pub use runtime::RequestCertificate;
pub use runtime::SignDepartmentRequest;
pub use runtime::SignatureLedger;
pub use runtime::SignatureRequest;
pub use runtime::StderrAuditSink;
pub use runtime::TransitionError;
pub use runtime::derive_status;
