// crates/no-dues-core/src/core/signature.rs
// ============================================================================
// Module: Signature Records
// Description: Per-department sign-off records and e-signature images.
// Purpose: Capture one department's pending/signed/rejected decision.
// Dependencies: crate::core::{hashing, identifiers, time}, base64, serde
// ============================================================================

//! ## Overview
//! A signature record is created `PENDING` when its certificate is created
//! and resolves to `SIGNED` or `REJECTED` exactly once. Resolution stamps the
//! signer identity, time, optional comments and (for signing) an optional
//! e-signature image copied from the user directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde::Serialize;

use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::HashDigest;
use crate::core::hashing::hash_bytes;
use crate::core::identifiers::DepartmentCode;
use crate::core::identifiers::UserId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Signature Status
// ============================================================================

/// Resolution state of a single department's sign-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignatureStatus {
    /// Awaiting the department's decision.
    Pending,
    /// Department signed off.
    Signed,
    /// Department refused to sign.
    Rejected,
}

impl SignatureStatus {
    /// Returns the canonical wire label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Signed => "SIGNED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Parses a canonical wire label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "PENDING" => Some(Self::Pending),
            "SIGNED" => Some(Self::Signed),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true once the record has left `PENDING`.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

// ============================================================================
// SECTION: E-Signature Images
// ============================================================================

/// E-signature image embedded into a resolved record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureImage {
    /// Digest of the raw image bytes.
    pub digest: HashDigest,
    /// Base64-encoded image bytes.
    pub content_base64: String,
}

impl SignatureImage {
    /// Builds an image reference from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            digest: hash_bytes(DEFAULT_HASH_ALGORITHM, bytes),
            content_base64: STANDARD.encode(bytes),
        }
    }

    /// Decodes the image and checks it against the stored digest.
    ///
    /// Returns `None` when the content is not valid base64 or the digest differs.
    #[must_use]
    pub fn verified_bytes(&self) -> Option<Vec<u8>> {
        let bytes = STANDARD.decode(&self.content_base64).ok()?;
        (hash_bytes(self.digest.algorithm, &bytes) == self.digest).then_some(bytes)
    }
}

// ============================================================================
// SECTION: Signer Stamp
// ============================================================================

/// Identity and time stamped onto a record when it is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerStamp {
    /// Signing user.
    pub user_id: UserId,
    /// Signing user's display name.
    pub name: String,
    /// Decision time.
    pub at: Timestamp,
    /// Optional free-form comments.
    pub comments: Option<String>,
    /// Optional e-signature image.
    pub image: Option<SignatureImage>,
}

// ============================================================================
// SECTION: Signature Record
// ============================================================================

/// One department's sign-off record for one certificate.
///
/// # Invariants
/// - Unique per (certificate, department).
/// - Once `status` leaves `PENDING` the record is immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Department the record belongs to.
    pub department: DepartmentCode,
    /// Current resolution state.
    pub status: SignatureStatus,
    /// Resolving user, when resolved.
    pub signed_by_user_id: Option<UserId>,
    /// Resolving user's display name, when resolved.
    pub signed_by_name: Option<String>,
    /// Resolution time, when resolved.
    pub signed_at: Option<Timestamp>,
    /// Resolution comments.
    pub comments: Option<String>,
    /// Embedded e-signature image (signing only).
    pub e_signature: Option<SignatureImage>,
}

impl SignatureRecord {
    /// Creates a pending record for a department.
    #[must_use]
    pub const fn pending(department: DepartmentCode) -> Self {
        Self {
            department,
            status: SignatureStatus::Pending,
            signed_by_user_id: None,
            signed_by_name: None,
            signed_at: None,
            comments: None,
            e_signature: None,
        }
    }
}
