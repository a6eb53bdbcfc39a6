//! Common types shared by the predictor schemes and the facade.
//!
//! This module provides:
//! 1. **Branch Descriptors:** The branch-class flags a simulator reports on retirement.
//! 2. **Error Handling:** Predictor and configuration error kinds.

/// Retired branch descriptor.
pub mod branch;

/// Error types for prediction and configuration.
pub mod error;

pub use branch::BranchInfo;
pub use error::{ConfigError, PredictorError};
