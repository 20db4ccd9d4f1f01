// crates/no-dues-core/src/core/time.rs
// ============================================================================
// Module: No Dues Time Model
// Description: Canonical timestamp representations for workflow records.
// Purpose: Keep the core free of wall-clock reads so transitions are replayable.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Every mutating request carries its own timestamp. The core never reads the
//! wall clock; hosts (the CLI, a server) stamp requests before calling into
//! the service.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp used on certificates and signature records.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads wall-clock time.
/// - No validation is performed; monotonicity is a caller responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(i64),
    /// Monotonic logical time value.
    Logical(u64),
}

impl Timestamp {
    /// Returns the timestamp as unix milliseconds when available.
    #[must_use]
    pub const fn as_unix_millis(&self) -> Option<i64> {
        match self {
            Self::UnixMillis(value) => Some(*value),
            Self::Logical(_) => None,
        }
    }

    /// Returns the UTC calendar year for unix timestamps.
    #[must_use]
    pub fn calendar_year(&self) -> Option<i32> {
        self.to_datetime().map(OffsetDateTime::year)
    }

    /// Renders the timestamp for display (RFC 3339 for unix time).
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::UnixMillis(millis) => self
                .to_datetime()
                .and_then(|datetime| datetime.format(&Rfc3339).ok())
                .unwrap_or_else(|| format!("unix_ms:{millis}")),
            Self::Logical(value) => format!("logical:{value}"),
        }
    }

    /// Converts unix timestamps to a UTC datetime.
    fn to_datetime(self) -> Option<OffsetDateTime> {
        let millis = self.as_unix_millis()?;
        let nanos = i128::from(millis).checked_mul(1_000_000)?;
        OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
    }
}
