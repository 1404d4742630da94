//! Error Types for the Quality & Analytics Core
//!
//! The core recovers from per-record and per-column problems locally:
//! a bad value is repaired or skipped, never propagated as an `Err`.
//! The types here cover the two situations that *are* structural misuse
//! and must be distinguishable to the caller:
//!
//! - a raw reading whose timestamp cannot be interpreted as a point in
//!   time (`NormalizeError`): `ReadingStore::append` reports this by
//!   returning `false`, callers that parse directly get the typed error;
//! - an export request naming a format the core does not speak
//!   (`ExportError::UnsupportedFormat`), so "no data" and "your format
//!   name is wrong" never look the same.
//!
//! Validation failures are deliberately *not* errors: the validator
//! accumulates them into a [`ValidationReport`](crate::validate::ValidationReport)
//! because a malformed reading is an expected input, not a fault.

use thiserror::Error;

/// Failure to turn a raw wire record into a typed [`Reading`](crate::reading::Reading).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The record is not a JSON object.
    #[error("reading must be an object")]
    NotAnObject,

    /// The timestamp field is absent.
    #[error("reading has no timestamp")]
    MissingTimestamp,

    /// The timestamp is present but cannot be parsed as a point in time.
    #[error("unparsable timestamp: {0}")]
    BadTimestamp(String),
}

/// Failure to export a snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// The requested format name is not one the core supports.
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
}
