// crates/no-dues-core/src/core/mod.rs
// ============================================================================
// Module: No Dues Core Types
// Description: Canonical certificate, signature, dues and identity structures.
// Purpose: Provide stable, serializable types for the certificate workflow.
// Dependencies: base64, serde, sha2, time
// ============================================================================

//! ## Overview
//! Core types define certificates, signature records, dues, actors and the
//! department registry. They are the canonical source of truth for every
//! derived surface (CLI output, stores, audit logs).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod actor;
pub mod audit;
pub mod certificate;
pub mod department;
pub mod dues;
pub mod hashing;
pub mod identifiers;
pub mod signature;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use actor::Actor;
pub use actor::IdentityContext;
pub use actor::Role;
pub use actor::UnknownRole;
pub use audit::AuditEvent;
pub use audit::AuditEventParams;
pub use audit::AuditOutcome;
pub use audit::CERTIFICATE_AUDIT_EVENT;
pub use certificate::Certificate;
pub use certificate::CertificateFilter;
pub use certificate::CertificateNumbering;
pub use certificate::CertificateParts;
pub use certificate::CertificateStatus;
pub use certificate::CertificateSummary;
pub use certificate::CertificateTransition;
pub use certificate::CertificateView;
pub use certificate::DEFAULT_CERTIFICATE_PREFIX;
pub use certificate::EligibilityReport;
pub use certificate::PrincipalSignOff;
pub use certificate::SignatureRequestReceipt;
pub use certificate::SignatureView;
pub use certificate::StudentProfile;
pub use department::Department;
pub use department::DepartmentRegistry;
pub use dues::DueRecord;
pub use dues::DueStatus;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::hash_bytes;
pub use identifiers::CertificateId;
pub use identifiers::CertificateNumber;
pub use identifiers::DepartmentCode;
pub use identifiers::RollNumber;
pub use identifiers::StudentId;
pub use identifiers::UserId;
pub use signature::SignatureImage;
pub use signature::SignatureRecord;
pub use signature::SignatureStatus;
pub use signature::SignerStamp;
pub use time::Timestamp;
