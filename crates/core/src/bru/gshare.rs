//! GShare Branch Predictor.
//!
//! GShare correlates global branch history with the program counter using an XOR
//! hash. This allows the predictor to distinguish the same branch instruction
//! in different execution contexts.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `predict()`: O(1)
//!   - `update()`: O(1)
//! - **Space Complexity:** O(2^N) where N is the history width (15 bits = 32K 2-bit counters)
//! - **Best Case:** Correlated branches where outcome depends on recent history
//! - **Worst Case:** Uncorrelated branches or history length too short/long for pattern

use crate::config::MAX_TABLE_BITS;

use super::{
    BranchPredictor,
    counter::TwoBitCounter,
    history::{HistoryRegister, low_mask},
};

/// GShare Predictor structure.
#[derive(Debug, Clone)]
pub struct GSharePredictor {
    /// Global History Register. Kept 64 bits wide; indexing only looks at the low N bits.
    ghr: HistoryRegister,
    /// Pattern History Table of 2-bit saturating counters.
    pht: Vec<TwoBitCounter>,
    /// Mask selecting the low N bits of address and history.
    index_mask: u64,
}

impl GSharePredictor {
    /// Creates a GShare predictor with a 2^`history_bits`-entry table.
    ///
    /// All counters start weakly not-taken and the history starts empty.
    /// Widths above [`MAX_TABLE_BITS`] are clamped to it.
    pub fn new(history_bits: u32) -> Self {
        let index_mask = low_mask(history_bits.min(MAX_TABLE_BITS));
        Self {
            ghr: HistoryRegister::new(u64::BITS),
            pht: vec![TwoBitCounter::WEAK_NOT_TAKEN; (index_mask as usize) + 1],
            index_mask,
        }
    }

    /// Calculates the index into the Pattern History Table.
    ///
    /// Low N address bits XOR low N history bits.
    pub const fn index(&self, pc: u64) -> usize {
        ((pc & self.index_mask) ^ (self.ghr.value() & self.index_mask)) as usize
    }

    /// Current global history.
    pub const fn history(&self) -> HistoryRegister {
        self.ghr
    }

    /// Counter at `index`, if it exists.
    pub fn counter(&self, index: usize) -> Option<TwoBitCounter> {
        self.pht.get(index).copied()
    }

    /// Number of table entries.
    pub fn table_size(&self) -> usize {
        self.pht.len()
    }
}

impl BranchPredictor for GSharePredictor {
    /// Returns the prediction of the counter at the hashed index.
    fn predict_branch(&self, pc: u64) -> bool {
        self.pht[self.index(pc)].predict()
    }

    /// Updates the counter used for the prediction, then shifts the outcome
    /// into the Global History Register.
    fn update_branch(&mut self, pc: u64, taken: bool) {
        let idx = self.index(pc);
        self.pht[idx].train(taken);
        self.ghr.push(taken);
    }
}
