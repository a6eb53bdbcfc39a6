//! Static Branch Predictor.
//!
//! Implements an "Always Taken" policy for conditional branches. It holds no
//! tables and ignores training entirely.

use super::BranchPredictor;

/// Static Branch Predictor structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPredictor;

impl StaticPredictor {
    /// Creates a new Static Predictor.
    pub const fn new() -> Self {
        Self
    }
}

impl BranchPredictor for StaticPredictor {
    /// Always predicts taken.
    fn predict_branch(&self, _pc: u64) -> bool {
        true
    }

    /// Does nothing; the static policy never learns.
    fn update_branch(&mut self, _pc: u64, _taken: bool) {}
}
