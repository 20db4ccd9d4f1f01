// crates/no-dues-cli/src/lib.rs
// ============================================================================
// Module: No Dues CLI Library
// Description: Shared helpers for the No Dues command-line interface.
// Purpose: Expose the message catalog to the binary and its tests.
// Dependencies: crate::i18n
// ============================================================================

//! ## Overview
//! Library half of the `no-dues` binary. It currently carries the i18n
//! catalog and the [`t!`](crate::t) macro so integration tests can exercise the same
//! strings the binary prints.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod i18n;

#[cfg(test)]
mod tests;
