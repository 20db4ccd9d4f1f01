// crates/no-dues-core/tests/common/mod.rs
// ============================================================================
// Module: Shared Test Fixtures
// Description: Actors, students and service wiring shared by core tests.
// Purpose: Keep scenario tests focused on workflow behavior.
// Dependencies: no-dues-core
// ============================================================================

//! ## Overview
//! Builds in-memory services with a configurable registry and a small set of
//! actors covering every role.

#![allow(dead_code, reason = "Each test binary uses a different subset of fixtures.")]

use std::sync::Arc;

use no_dues_core::Actor;
use no_dues_core::CertificateNumbering;
use no_dues_core::CertificateService;
use no_dues_core::CertificateServiceConfig;
use no_dues_core::Department;
use no_dues_core::DepartmentRegistry;
use no_dues_core::DueRecord;
use no_dues_core::DueStatus;
use no_dues_core::IdentityContext;
use no_dues_core::InMemoryCertificateStore;
use no_dues_core::InMemoryDueLedger;
use no_dues_core::InMemoryStudentDirectory;
use no_dues_core::InMemoryUserDirectory;
use no_dues_core::MemoryAuditSink;
use no_dues_core::Role;
use no_dues_core::RollNumber;
use no_dues_core::StudentId;
use no_dues_core::StudentProfile;
use no_dues_core::Timestamp;

/// Service type wired to in-memory collaborators.
pub type MemoryService = CertificateService<
    InMemoryCertificateStore,
    InMemoryDueLedger,
    InMemoryUserDirectory,
    InMemoryStudentDirectory,
>;

/// Roll number of the default fixture student.
pub const STUDENT_ROLL: &str = "21CS001";

/// In-memory service plus handles to its collaborators.
pub struct Fixture {
    /// Service under test.
    pub service: MemoryService,
    /// Dues ledger shared with the service.
    pub dues: InMemoryDueLedger,
    /// User directory shared with the service.
    pub users: InMemoryUserDirectory,
    /// Student directory shared with the service.
    pub students: InMemoryStudentDirectory,
    /// Certificate store shared with the service.
    pub store: InMemoryCertificateStore,
    /// Audit events emitted by the service.
    pub audit: Arc<MemoryAuditSink>,
}

/// Builds a registry from department codes.
pub fn registry(codes: &[&str]) -> DepartmentRegistry {
    DepartmentRegistry::new(codes.iter().map(|code| Department::new(code, *code)).collect())
}

/// Builds a fixture with the given registry and one enrolled student.
pub fn fixture(codes: &[&str]) -> Fixture {
    fixture_with_registry(registry(codes))
}

/// Builds a fixture with an explicit registry and one enrolled student.
pub fn fixture_with_registry(registry: DepartmentRegistry) -> Fixture {
    let dues = InMemoryDueLedger::new();
    let users = InMemoryUserDirectory::new();
    let students = InMemoryStudentDirectory::new();
    let store = InMemoryCertificateStore::new();
    let audit = Arc::new(MemoryAuditSink::new());
    students.enroll(student(STUDENT_ROLL, "S-1")).unwrap();
    let config = CertificateServiceConfig {
        registry,
        numbering: CertificateNumbering::default(),
    };
    let service = CertificateService::new(
        config,
        store.clone(),
        dues.clone(),
        users.clone(),
        students.clone(),
    )
    .with_audit_sink(audit.clone());
    Fixture {
        service,
        dues,
        users,
        students,
        store,
        audit,
    }
}

/// Builds a student profile.
pub fn student(roll: &str, id: &str) -> StudentProfile {
    StudentProfile {
        student_id: StudentId::new(id),
        name: format!("Student {roll}"),
        roll_number: RollNumber::new(roll),
        branch: "CSE".to_string(),
        semester: 8,
        email: Some(format!("{roll}@example.edu")),
        mobile_number: None,
    }
}

/// Builds a due for the fixture student.
pub fn due(id: &str, department: &str, status: DueStatus) -> DueRecord {
    DueRecord {
        due_id: id.to_string(),
        student_id: StudentId::new("S-1"),
        department: department.into(),
        description: "Library fine".to_string(),
        amount_minor: 25_000,
        status,
    }
}

/// Wraps an actor into an identity context.
pub fn ctx(actor: Actor) -> IdentityContext {
    IdentityContext::new(actor)
}

/// Platform administrator.
pub fn admin() -> IdentityContext {
    ctx(Actor::new("u-admin", "Admin User").with_role(Role::Admin))
}

/// Head of Department.
pub fn hod() -> IdentityContext {
    ctx(Actor::new("u-hod", "Dr. Head").with_role(Role::Hod))
}

/// Institution principal.
pub fn principal() -> IdentityContext {
    ctx(Actor::new("u-principal", "Principal").with_role(Role::Principal))
}

/// Administrator of one department.
pub fn department_admin(user: &str, department: &str) -> IdentityContext {
    ctx(Actor::new(user, format!("{department} Admin"))
        .with_role(Role::DepartmentAdmin)
        .with_home_department(department))
}

/// Student account for a roll number.
pub fn student_ctx(roll: &str) -> IdentityContext {
    ctx(Actor::new(format!("u-{roll}"), format!("Student {roll}"))
        .with_role(Role::Student)
        .with_roll_number(roll))
}

/// Unix timestamp in 2024 offset by `seconds`.
pub fn at(seconds: i64) -> Timestamp {
    Timestamp::UnixMillis(1_717_200_000_000 + seconds * 1_000)
}
