//! Tournament Branch Predictor.
//!
//! A hybrid predictor that employs a meta-predictor (Choice PHT) to select
//! between a Global predictor and a Local predictor (PAg). This allows the
//! predictor to adapt to different types of branch behaviors.
//!
//! - **Global:** 2-bit counters indexed purely by the global history.
//! - **Local:** a per-address local history register (selected by low PC bits)
//!   indexes a table of 3-bit counters.
//! - **Choice:** 2-state-per-side counters indexed by the global history; they
//!   only move when the two sides disagree.

use super::{
    BranchPredictor,
    counter::{ThreeBitCounter, TwoBitCounter},
    history::HistoryRegister,
};
use crate::config::{MAX_TABLE_BITS, TournamentConfig};

/// State of one choice (meta-predictor) counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChoiceCounter {
    /// Trust the global predictor, strongly.
    StrongGlobal,
    /// Trust the global predictor, weakly.
    #[default]
    WeakGlobal,
    /// Trust the local predictor, weakly.
    WeakLocal,
    /// Trust the local predictor, strongly.
    StrongLocal,
}

impl ChoiceCounter {
    /// True when the local predictor should be used.
    #[inline]
    pub const fn favors_local(self) -> bool {
        matches!(self, Self::WeakLocal | Self::StrongLocal)
    }

    /// One step toward trusting the global predictor.
    pub const fn toward_global(self) -> Self {
        match self {
            Self::StrongGlobal | Self::WeakGlobal => Self::StrongGlobal,
            Self::WeakLocal => Self::WeakGlobal,
            Self::StrongLocal => Self::WeakLocal,
        }
    }

    /// One step toward trusting the local predictor.
    pub const fn toward_local(self) -> Self {
        match self {
            Self::StrongGlobal => Self::WeakGlobal,
            Self::WeakGlobal => Self::WeakLocal,
            Self::WeakLocal | Self::StrongLocal => Self::StrongLocal,
        }
    }
}

/// Everything a prediction at one PC depends on, read before any update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentLookup {
    /// Index into the global and choice tables.
    pub global_idx: usize,
    /// Slot in the local history table.
    pub local_slot: usize,
    /// Index into the local counter table (the slot's history).
    pub local_idx: usize,
    /// Global predictor's answer.
    pub global_taken: bool,
    /// Local predictor's answer.
    pub local_taken: bool,
    /// Choice counter at `global_idx`.
    pub choice: ChoiceCounter,
}

impl TournamentLookup {
    /// The answer of the side the choice counter favors.
    pub const fn taken(&self) -> bool {
        if self.choice.favors_local() {
            self.local_taken
        } else {
            self.global_taken
        }
    }
}

/// Tournament Predictor structure.
#[derive(Debug, Clone)]
pub struct TournamentPredictor {
    /// Global History Register.
    ghr: HistoryRegister,

    /// Global Pattern History Table (2-bit counters).
    global_pht: Vec<TwoBitCounter>,

    /// Choice Prediction Table, same indexing as the global PHT.
    choice_pht: Vec<ChoiceCounter>,

    /// Local History Table storing history patterns per branch.
    local_history_table: Vec<HistoryRegister>,
    /// Mask for selecting a Local History Table slot from the PC.
    local_hist_mask: usize,

    /// Local Pattern History Table indexed by local history patterns (3-bit counters).
    local_pht: Vec<ThreeBitCounter>,
}

impl TournamentPredictor {
    /// Creates a new Tournament Predictor based on the provided configuration.
    ///
    /// Widths above [`MAX_TABLE_BITS`] are clamped to it.
    pub fn new(config: &TournamentConfig) -> Self {
        let global_bits = config.global_size_bits.min(MAX_TABLE_BITS);
        let local_pred_bits = config.local_pred_bits.min(MAX_TABLE_BITS);
        let global_size = 1 << global_bits;
        let local_hist_size = 1 << config.local_hist_bits.min(MAX_TABLE_BITS);
        let local_pred_size = 1 << local_pred_bits;

        Self {
            ghr: HistoryRegister::new(global_bits),
            global_pht: vec![TwoBitCounter::WEAK_NOT_TAKEN; global_size],
            choice_pht: vec![ChoiceCounter::default(); global_size],
            local_history_table: vec![
                HistoryRegister::new(local_pred_bits);
                local_hist_size
            ],
            local_hist_mask: local_hist_size - 1,
            local_pht: vec![ThreeBitCounter::WEAK_NOT_TAKEN; local_pred_size],
        }
    }

    /// Reads both sub-predictors and the choice counter for `pc`.
    pub fn lookup(&self, pc: u64) -> TournamentLookup {
        let global_idx = self.ghr.value() as usize;
        let local_slot = (pc as usize) & self.local_hist_mask;
        let local_idx = self.local_history_table[local_slot].value() as usize;

        TournamentLookup {
            global_idx,
            local_slot,
            local_idx,
            global_taken: self.global_pht[global_idx].predict(),
            local_taken: self.local_pht[local_idx].predict(),
            choice: self.choice_pht[global_idx],
        }
    }

    /// Current global history.
    pub const fn global_history(&self) -> HistoryRegister {
        self.ghr
    }

    /// Local history register that `pc` maps to.
    pub fn local_history(&self, pc: u64) -> HistoryRegister {
        self.local_history_table[(pc as usize) & self.local_hist_mask]
    }

    /// Choice counter at `index`, if it exists.
    pub fn choice(&self, index: usize) -> Option<ChoiceCounter> {
        self.choice_pht.get(index).copied()
    }
}

impl BranchPredictor for TournamentPredictor {
    /// Queries both Global and Local predictors and uses the Choice PHT to
    /// decide which prediction to use.
    fn predict_branch(&self, pc: u64) -> bool {
        self.lookup(pc).taken()
    }

    /// Updates the predictor with the actual branch outcome.
    ///
    /// The choice counter is moved first, using the sub-predictions read
    /// before anything changed; then the global side and its history, then
    /// the local side and its history.
    fn update_branch(&mut self, pc: u64, taken: bool) {
        let snap = self.lookup(pc);

        let global_correct = snap.global_taken == taken;
        let local_correct = snap.local_taken == taken;
        if global_correct != local_correct {
            self.choice_pht[snap.global_idx] = if global_correct {
                snap.choice.toward_global()
            } else {
                snap.choice.toward_local()
            };
        }

        self.global_pht[snap.global_idx].train(taken);
        self.ghr.push(taken);

        self.local_pht[snap.local_idx].train(taken);
        self.local_history_table[snap.local_slot].push(taken);
    }
}
