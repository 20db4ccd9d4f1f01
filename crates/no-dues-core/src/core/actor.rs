// crates/no-dues-core/src/core/actor.rs
// ============================================================================
// Module: Actors and Roles
// Description: Closed role enumeration and the explicit identity context.
// Purpose: Replace ambient session state with a value passed into every call.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! The surrounding session layer authenticates users; the core only consumes
//! the result as an [`IdentityContext`]. Roles form a closed enumeration and
//! are checked exclusively by the authorization policy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::DepartmentCode;
use crate::core::identifiers::RollNumber;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Roles
// ============================================================================

/// Platform roles recognized by the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform administrator.
    Admin,
    /// Administrator of a single department.
    DepartmentAdmin,
    /// Head of Department.
    Hod,
    /// Institution principal.
    Principal,
    /// Student account.
    Student,
}

impl Role {
    /// Returns the canonical snake case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::DepartmentAdmin => "department_admin",
            Self::Hod => "hod",
            Self::Principal => "principal",
            Self::Student => "student",
        }
    }

    /// Returns true for staff roles that may act on behalf of a student.
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        !matches!(self, Self::Student)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a role label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Accepts `admin`, `ADMIN` and `ROLE_ADMIN` style labels.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let label = normalized.strip_prefix("role_").unwrap_or(&normalized);
        match label {
            "admin" => Ok(Self::Admin),
            "department_admin" => Ok(Self::DepartmentAdmin),
            "hod" => Ok(Self::Hod),
            "principal" => Ok(Self::Principal),
            "student" => Ok(Self::Student),
            _ => Err(UnknownRole(value.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Actor
// ============================================================================

/// Authenticated user performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User identifier.
    pub user_id: UserId,
    /// Display name stamped onto signatures.
    pub display_name: String,
    /// Granted roles.
    pub roles: BTreeSet<Role>,
    /// Home department for department administrators.
    pub home_department: Option<DepartmentCode>,
    /// Roll number for student accounts.
    pub roll_number: Option<RollNumber>,
}

impl Actor {
    /// Creates an actor with no roles.
    #[must_use]
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: UserId::new(user_id),
            display_name: display_name.into(),
            roles: BTreeSet::new(),
            home_department: None,
            roll_number: None,
        }
    }

    /// Adds a role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    /// Sets the home department.
    #[must_use]
    pub fn with_home_department(mut self, department: impl AsRef<str>) -> Self {
        self.home_department = Some(DepartmentCode::new(department));
        self
    }

    /// Sets the student roll number.
    #[must_use]
    pub fn with_roll_number(mut self, roll_number: impl AsRef<str>) -> Self {
        self.roll_number = Some(RollNumber::new(roll_number));
        self
    }

    /// Returns true when the actor holds the role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns true when the actor holds any staff role.
    #[must_use]
    pub fn is_privileged(&self) -> bool {
        self.roles.iter().any(|role| role.is_privileged())
    }

    /// Returns true when the actor is the student with this roll number.
    #[must_use]
    pub fn is_student(&self, roll_number: &RollNumber) -> bool {
        self.has_role(Role::Student) && self.roll_number.as_ref() == Some(roll_number)
    }
}

// ============================================================================
// SECTION: Identity Context
// ============================================================================

/// Explicit identity passed into every service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    /// Authenticated actor.
    actor: Actor,
}

impl IdentityContext {
    /// Wraps an authenticated actor.
    #[must_use]
    pub const fn new(actor: Actor) -> Self {
        Self {
            actor,
        }
    }

    /// Returns the current actor.
    #[must_use]
    pub const fn current_actor(&self) -> &Actor {
        &self.actor
    }
}
