// crates/no-dues-config/src/roster.rs
// ============================================================================
// Module: No Dues Roster
// Description: JSON roster of students, dues and stored e-signatures.
// Purpose: Seed the in-memory collaborators from a validated file.
// Dependencies: no-dues-core, serde, serde_json
// ============================================================================

//! ## Overview
//! A roster is a JSON document listing enrolled students, their dues and the
//! e-signature images on file for signers. Image paths resolve relative to
//! the roster file. Loading validates uniqueness and referential integrity
//! before anything reaches the directories.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use no_dues_core::DueRecord;
use no_dues_core::SignatureImage;
use no_dues_core::StudentProfile;
use no_dues_core::UserId;
use serde::Deserialize;
use serde::Serialize;

use crate::config::ConfigError;
use crate::config::MAX_CONFIG_FILE_SIZE;
use crate::config::read_bounded_utf8;
use crate::config::validate_path;

// ============================================================================
// SECTION: Types
// ============================================================================

/// E-signature image on file for a signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterSignature {
    /// Signer the image belongs to.
    pub user_id: UserId,
    /// Image path, relative to the roster file unless absolute.
    pub image_path: PathBuf,
}

/// Students, dues and signatures backing the in-memory collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Roster {
    /// Enrolled students.
    #[serde(default)]
    pub students: Vec<StudentProfile>,
    /// Dues owed by enrolled students.
    #[serde(default)]
    pub dues: Vec<DueRecord>,
    /// Stored e-signature images.
    #[serde(default)]
    pub signatures: Vec<RosterSignature>,
    /// Directory relative image paths resolve against.
    #[serde(skip)]
    base_dir: PathBuf,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl Roster {
    /// Loads and validates a roster file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let content = read_bounded_utf8(path, "roster")?;
        let mut roster = Self::from_json_str(&content)?;
        roster.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(roster)
    }

    /// Parses and validates a roster from JSON text. Image paths resolve
    /// against the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let roster: Self = serde_json::from_str(content)
            .map_err(|err| ConfigError::Parse(format!("roster: {err}")))?;
        roster.validate()?;
        Ok(roster)
    }

    /// Validates uniqueness and referential integrity.
    fn validate(&self) -> Result<(), ConfigError> {
        let mut students = BTreeSet::new();
        let mut rolls = BTreeSet::new();
        for student in &self.students {
            if student.student_id.as_str().trim().is_empty() {
                return Err(ConfigError::Invalid("roster student_id must be non-empty".to_string()));
            }
            if student.roll_number.as_str().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "roster student {} has an empty roll number",
                    student.student_id
                )));
            }
            if !students.insert(student.student_id.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "roster duplicate student_id {}",
                    student.student_id
                )));
            }
            if !rolls.insert(student.roll_number.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "roster duplicate roll number {}",
                    student.roll_number
                )));
            }
        }

        let mut dues = BTreeSet::new();
        for due in &self.dues {
            if due.due_id.trim().is_empty() {
                return Err(ConfigError::Invalid("roster due_id must be non-empty".to_string()));
            }
            if !dues.insert(due.due_id.as_str()) {
                return Err(ConfigError::Invalid(format!("roster duplicate due_id {}", due.due_id)));
            }
            if !students.contains(&due.student_id) {
                return Err(ConfigError::Invalid(format!(
                    "roster due {} references unknown student {}",
                    due.due_id, due.student_id
                )));
            }
        }

        let mut signers = BTreeSet::new();
        for signature in &self.signatures {
            if !signers.insert(signature.user_id.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "roster duplicate signature for {}",
                    signature.user_id
                )));
            }
            validate_path(&signature.image_path)?;
        }
        Ok(())
    }

    /// Resolves a signature image path against the roster directory.
    #[must_use]
    pub fn resolve_image_path(&self, signature: &RosterSignature) -> PathBuf {
        if signature.image_path.is_absolute() {
            signature.image_path.clone()
        } else {
            self.base_dir.join(&signature.image_path)
        }
    }

    /// Reads a signature image from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the image cannot be read or is too large.
    pub fn load_signature_image(
        &self,
        signature: &RosterSignature,
    ) -> Result<SignatureImage, ConfigError> {
        let path = self.resolve_image_path(signature);
        let bytes = fs::read(&path).map_err(|err| {
            ConfigError::Io(format!("signature image {}: {err}", path.display()))
        })?;
        if bytes.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "signature image {} is empty",
                path.display()
            )));
        }
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "signature image {} exceeds size limit",
                path.display()
            )));
        }
        Ok(SignatureImage::from_bytes(&bytes))
    }
}
