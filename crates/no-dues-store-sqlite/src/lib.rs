// crates/no-dues-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Certificate Store
// Description: Durable CertificateStore backend using SQLite WAL.
// Purpose: Persist certificates and signature records across processes.
// Dependencies: no-dues-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`CertificateStore`] implementation.
//! Certificates and their signature records live in normalized tables, and
//! every transition runs inside one immediate transaction so concurrent
//! signers on separate connections resolve a record exactly once.
//!
//! [`CertificateStore`]: no_dues_core::CertificateStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteCertificateStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
