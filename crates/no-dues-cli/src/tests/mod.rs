// crates/no-dues-cli/src/tests/mod.rs
// ============================================================================
// Module: CLI Unit Tests
// Description: Unit test modules for the CLI library.
// Purpose: Group crate-internal tests that need private helpers.
// Dependencies: crate::i18n
// ============================================================================

//! ## Overview
//! Unit tests that reach into crate-private catalog helpers.

mod i18n;
