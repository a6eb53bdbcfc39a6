//! Conditional branch direction prediction library.
//!
//! This crate implements the direction-prediction core of a cycle-level CPU
//! simulator with the following:
//! 1. **Building blocks:** Saturating counters and (folded) history registers.
//! 2. **Schemes:** Static, gshare, tournament and a tagged multi-table predictor.
//! 3. **Facade:** A [`Predictor`] that owns the configured scheme for one run.
//! 4. **Configuration:** Serde-deserializable parameters with documented defaults.

/// Branch prediction units (counters, histories, and the four schemes).
pub mod bru;
/// Common types (branch descriptors and error kinds).
pub mod common;
/// Predictor configuration (defaults, scheme selector, per-scheme parameters).
pub mod config;
/// Run-scoped predictor facade.
pub mod predictor;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Per-branch descriptor handed to [`Predictor::train`].
pub use crate::common::BranchInfo;
/// Facade owning the active prediction scheme.
pub use crate::predictor::Predictor;
