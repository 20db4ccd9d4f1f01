// crates/no-dues-core/src/runtime/mod.rs
// ============================================================================
// Module: No Dues Runtime
// Description: Ledger, state machine, policy and service orchestration.
// Purpose: Execute certificate workflow operations against the interfaces.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime holds the signature ledger, the certificate state machine,
//! the authorization policy, and the [`CertificateService`] that composes
//! them. In-memory collaborators and audit sinks live here for tests and
//! local runs.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod ledger;
pub mod machine;
pub mod policy;
pub mod service;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use ledger::LedgerAggregate;
pub use ledger::LedgerError;
pub use ledger::SignatureLedger;
pub use machine::CertificateStateMachine;
pub use machine::NewCertificate;
pub use machine::TransitionError;
pub use machine::derive_status;
pub use policy::Action;
pub use policy::AuthorizationPolicy;
pub use policy::PolicyDecision;
pub use service::CertificateError;
pub use service::CertificateService;
pub use service::CertificateServiceConfig;
pub use service::ErrorKind;
pub use service::PrincipalSignRequest;
pub use service::RejectDepartmentRequest;
pub use service::RequestCertificate;
pub use service::SignDepartmentRequest;
pub use service::SignatureRequest;
pub use store::InMemoryCertificateStore;
pub use store::InMemoryDueLedger;
pub use store::InMemoryStudentDirectory;
pub use store::InMemoryUserDirectory;
pub use store::NoopNotifier;
