//! Predictor and configuration error definitions.
//!
//! This module defines the error kinds surfaced by the prediction core. It provides:
//! 1. **Predictor Errors:** Recoverable inconsistencies met while predicting; every
//!    one of them has a defined not-taken fallback and never aborts a run.
//! 2. **Configuration Errors:** Rejected parameter sets, reported before any table
//!    is allocated.

use thiserror::Error;

/// Recoverable inconsistencies observed while predicting or training.
///
/// None of these stop a simulation. Callers that use the infallible entry
/// points get a not-taken prediction instead; the `try_*` variants hand the
/// error back for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PredictorError {
    /// A raw saturating-counter state lies outside its defined state set.
    ///
    /// Raised when decoding a counter value (for example one loaded from a
    /// checkpoint written by a host) that is wider than the counter.
    #[error("saturating counter state {state} is outside the {bits}-bit state set")]
    InvalidCounterState {
        /// The raw state that was observed.
        state: u8,
        /// Width of the counter in bits.
        bits: u8,
    },

    /// The facade was asked to predict without an active scheme.
    ///
    /// Happens before `initialize` or after `teardown`.
    #[error("no prediction scheme is active")]
    Uninitialized,
}

/// Reasons a configuration is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A table must have a power-of-two number of entries, at most 2^28.
    #[error("{table} size {size} is not a power of two between 1 and 2^28")]
    NotPowerOfTwo {
        /// Which table was misconfigured.
        table: &'static str,
        /// The offending entry count.
        size: usize,
    },

    /// A history or index width is zero or wider than the register allows.
    #[error("{what} width {bits} is outside 1..={max}")]
    WidthOutOfRange {
        /// Which width was misconfigured.
        what: &'static str,
        /// The configured width in bits.
        bits: u32,
        /// The largest accepted width.
        max: u32,
    },

    /// The tagged-table parameter lists do not describe the same number of tables.
    #[error(
        "tagged tables disagree on count: {sizes} sizes, {history_lengths} history lengths, {tag_widths} tag widths"
    )]
    TableCountMismatch {
        /// Length of `table_sizes`.
        sizes: usize,
        /// Length of `history_lengths`.
        history_lengths: usize,
        /// Length of `tag_widths`.
        tag_widths: usize,
    },

    /// Tagged-table history lengths must increase strictly from table to table.
    #[error("tagged table {index} history length {length} does not exceed the previous {previous}")]
    HistoryNotIncreasing {
        /// Position of the offending table.
        index: usize,
        /// Its history length.
        length: u32,
        /// History length of the table before it.
        previous: u32,
    },

    /// The configuration text could not be parsed.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
