// crates/no-dues-config/src/lib.rs
// ============================================================================
// Module: No Dues Config Library
// Description: Canonical config model and roster loading.
// Purpose: Single source of truth for no-dues.toml semantics.
// Dependencies: no-dues-core, no-dues-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `no-dues-config` defines the configuration model for the No Dues
//! workflow: the department registry, certificate store, audit sink,
//! certificate numbering and the optional roster file that backs the
//! in-memory collaborators. Validation is strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod roster;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use roster::Roster;
pub use roster::RosterSignature;
