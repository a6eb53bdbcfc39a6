//! Branch prediction unit (BRU) implementations.
//!
//! This module contains the direction predictors (static, gshare,
//! tournament and the tagged multi-table predictor) together with the
//! saturating counters and history registers they are built from.

pub use self::branch_predictor::BranchPredictor;

/// Branch predictor trait.
pub mod branch_predictor;

/// N-bit saturating confidence counters.
pub mod counter;

/// Global history branch predictor (gshare algorithm).
pub mod gshare;

/// Shift-register branch histories and XOR folding.
pub mod history;

/// Static branch predictor (always taken).
pub mod static_bp;

/// Tagged multi-table (TAGE-style) branch predictor.
pub mod tage;

/// Tournament branch predictor (combines local and global predictors).
pub mod tournament;

use self::{
    gshare::GSharePredictor, static_bp::StaticPredictor, tage::TagePredictor,
    tournament::TournamentPredictor,
};
use crate::config::{BranchPredictor as BpType, PredictorConfig};

/// Enum wrapper for static dispatch of Branch Predictors.
/// The scheme is chosen once at construction, so the per-branch calls never
/// go through a vtable.
#[derive(Debug, Clone)]
pub enum BranchPredictorWrapper {
    /// Always taken.
    Static(StaticPredictor),
    /// Global history XOR address.
    GShare(GSharePredictor),
    /// Local/global with a choice table.
    Tournament(TournamentPredictor),
    /// Base table plus tagged tables.
    Custom(TagePredictor),
}

impl BranchPredictorWrapper {
    /// Creates the scheme selected by `config`, allocating all of its tables.
    pub fn new(config: &PredictorConfig) -> Self {
        match config.branch_predictor {
            BpType::Static => Self::Static(StaticPredictor::new()),
            BpType::GShare => Self::GShare(GSharePredictor::new(config.ghistory_bits)),
            BpType::Tournament => Self::Tournament(TournamentPredictor::new(&config.tournament)),
            BpType::Custom => Self::Custom(TagePredictor::new(&config.custom)),
        }
    }

    /// Selector value of the wrapped scheme.
    pub const fn kind(&self) -> BpType {
        match self {
            Self::Static(_) => BpType::Static,
            Self::GShare(_) => BpType::GShare,
            Self::Tournament(_) => BpType::Tournament,
            Self::Custom(_) => BpType::Custom,
        }
    }
}

impl BranchPredictor for BranchPredictorWrapper {
    #[inline(always)]
    fn predict_branch(&self, pc: u64) -> bool {
        match self {
            Self::Static(bp) => bp.predict_branch(pc),
            Self::GShare(bp) => bp.predict_branch(pc),
            Self::Tournament(bp) => bp.predict_branch(pc),
            Self::Custom(bp) => bp.predict_branch(pc),
        }
    }

    #[inline(always)]
    fn update_branch(&mut self, pc: u64, taken: bool) {
        match self {
            Self::Static(bp) => bp.update_branch(pc, taken),
            Self::GShare(bp) => bp.update_branch(pc, taken),
            Self::Tournament(bp) => bp.update_branch(pc, taken),
            Self::Custom(bp) => bp.update_branch(pc, taken),
        }
    }
}
