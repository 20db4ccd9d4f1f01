// crates/no-dues-core/src/core/department.rs
// ============================================================================
// Module: Department Registry
// Description: The fixed, ordered set of departments a certificate must clear.
// Purpose: Supply the canonical department list used to seed signature ledgers.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! The registry is static configuration, not a dynamic entity. Every
//! certificate is seeded with one signature record per registry entry at the
//! moment it is created; later registry edits never touch existing
//! certificates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::DepartmentCode;

// ============================================================================
// SECTION: Default Registry
// ============================================================================

/// Academic departments, in display order.
const ACADEMIC_DEPARTMENTS: &[(&str, &str)] = &[
    ("CSE", "Computer Science & Engineering"),
    ("ECE", "Electronics & Communication Engineering"),
    ("ME", "Mechanical Engineering"),
    ("CE", "Civil Engineering"),
    ("EE", "Electrical Engineering"),
    ("IT", "Information Technology"),
    ("BT", "Biotechnology"),
    ("CH", "Chemical Engineering"),
    ("AE", "Aerospace Engineering"),
    ("PHY", "Physics"),
    ("CHEM", "Chemistry"),
    ("MATH", "Mathematics"),
];

/// Administrative departments, in display order.
const ADMINISTRATIVE_DEPARTMENTS: &[(&str, &str)] = &[
    ("LIBRARY", "Library"),
    ("TRAINING_AND_PLACEMENT", "Training & Placement"),
    ("SPORTS", "Sports"),
    ("OFFICE", "Administrative Office"),
    ("HOD", "Head of Department"),
    ("IES_LIBRARY", "IES Library"),
    ("TRANSPORT", "Transport"),
    ("HOSTEL", "Hostel"),
    ("ACCOUNTS", "Accounts"),
    ("STUDENT_SECTION", "Student Section"),
];

// ============================================================================
// SECTION: Department
// ============================================================================

/// Registry entry for a department whose sign-off is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Stable department code.
    pub code: DepartmentCode,
    /// Human-readable department name.
    pub display_name: String,
}

impl Department {
    /// Creates a registry entry.
    #[must_use]
    pub fn new(code: impl AsRef<str>, display_name: impl Into<String>) -> Self {
        Self {
            code: DepartmentCode::new(code),
            display_name: display_name.into(),
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Ordered, read-only list of departments required for certification.
///
/// # Invariants
/// - Order is preserved exactly as configured.
/// - Uniqueness is validated by configuration loading and re-checked when a
///   ledger is seeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentRegistry {
    /// Registry entries in required order.
    departments: Vec<Department>,
}

impl DepartmentRegistry {
    /// Creates a registry from an ordered list of departments.
    #[must_use]
    pub const fn new(departments: Vec<Department>) -> Self {
        Self {
            departments,
        }
    }

    /// Returns the registry shipped with the institution defaults.
    #[must_use]
    pub fn institution_default() -> Self {
        let departments = ACADEMIC_DEPARTMENTS
            .iter()
            .chain(ADMINISTRATIVE_DEPARTMENTS)
            .map(|(code, name)| Department::new(code, *name))
            .collect();
        Self::new(departments)
    }

    /// Returns the ordered department codes required for certification.
    #[must_use]
    pub fn list_required_departments(&self) -> Vec<DepartmentCode> {
        self.departments.iter().map(|department| department.code.clone()).collect()
    }

    /// Returns the registry entries in order.
    #[must_use]
    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// Returns the display name for a code, falling back to the code itself.
    #[must_use]
    pub fn display_name(&self, code: &DepartmentCode) -> String {
        self.departments
            .iter()
            .find(|department| &department.code == code)
            .map_or_else(|| code.to_string(), |department| department.display_name.clone())
    }

    /// Returns the number of required departments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.departments.len()
    }

    /// Returns true when no departments are required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
    }
}

impl Default for DepartmentRegistry {
    fn default() -> Self {
        Self::institution_default()
    }
}
