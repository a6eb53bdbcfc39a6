//! Branch Predictor Interface.
//!
//! This module defines the `BranchPredictor` trait that every direction
//! prediction scheme implements. Schemes only ever see conditional branches;
//! filtering by branch class happens in the facade.

/// Trait for conditional branch direction prediction algorithms.
pub trait BranchPredictor {
    /// Predicts whether the conditional branch at `pc` will be taken.
    ///
    /// Must not modify any predictor state: predicting twice in a row without
    /// an intervening update returns the same answer.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the branch instruction
    fn predict_branch(&self, pc: u64) -> bool;

    /// Trains the predictor with the resolved outcome of the branch at `pc`.
    ///
    /// Every decision taken here is based on the tables as they were when
    /// the call started; updates are applied afterwards.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the branch instruction
    /// * `taken` - Whether the branch was actually taken
    fn update_branch(&mut self, pc: u64, taken: bool);
}
