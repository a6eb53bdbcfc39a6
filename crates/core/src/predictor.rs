//! Predictor Facade.
//!
//! The facade is the only surface a host simulator needs. It owns the scheme
//! selected by configuration for the lifetime of one run:
//! 1. **Lifecycle:** `initialize` validates the configuration and allocates the
//!    scheme's tables; `teardown` releases them. Both are safe to repeat.
//! 2. **Prediction:** `predict` forwards to the active scheme and never changes state.
//! 3. **Training:** `train` forwards conditional branches only; every other
//!    branch class leaves the predictor untouched.
//!
//! Without an active scheme the facade predicts not-taken.

use crate::bru::{BranchPredictor, BranchPredictorWrapper};
use crate::common::{BranchInfo, ConfigError, PredictorError};
use crate::config::{BranchPredictor as BpType, Config, PredictorConfig};

/// Run-scoped owner of the configured prediction scheme.
///
/// # Examples
///
/// ```
/// use bpred_core::{BranchInfo, Config, Predictor};
/// use bpred_core::config::BranchPredictor;
///
/// let mut config = Config::default();
/// config.predictor.branch_predictor = BranchPredictor::GShare;
///
/// let mut bp = Predictor::new(&config);
/// bp.initialize().unwrap();
///
/// let pc = 0x8000_0040;
/// let before = bp.predict(pc);
/// bp.train(pc, !before, &BranchInfo::conditional(0x8000_0000));
/// bp.teardown();
/// assert!(!bp.predict(pc));
/// ```
#[derive(Debug, Clone)]
pub struct Predictor {
    config: PredictorConfig,
    scheme: Option<BranchPredictorWrapper>,
}

impl Predictor {
    /// Creates a facade for `config` without allocating any table.
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.predictor.clone(),
            scheme: None,
        }
    }

    /// Validates the configuration and builds the selected scheme.
    ///
    /// Calling it again while a scheme is active keeps the existing state.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] describing the first invalid parameter;
    /// the facade then stays uninitialized.
    pub fn initialize(&mut self) -> Result<(), ConfigError> {
        if self.scheme.is_some() {
            tracing::debug!(scheme = %self.config.branch_predictor, "predictor already initialized");
            return Ok(());
        }
        self.config.validate()?;
        self.scheme = Some(BranchPredictorWrapper::new(&self.config));
        tracing::debug!(scheme = %self.config.branch_predictor, "predictor initialized");
        Ok(())
    }

    /// Releases the active scheme and all of its tables.
    pub fn teardown(&mut self) {
        if self.scheme.take().is_some() {
            tracing::debug!(scheme = %self.config.branch_predictor, "predictor torn down");
        }
    }

    /// True between `initialize` and `teardown`.
    pub const fn is_initialized(&self) -> bool {
        self.scheme.is_some()
    }

    /// Configured scheme selector.
    pub const fn kind(&self) -> BpType {
        self.config.branch_predictor
    }

    /// Active scheme, for inspection.
    pub const fn scheme(&self) -> Option<&BranchPredictorWrapper> {
        self.scheme.as_ref()
    }

    /// Predicts the conditional branch at `pc`.
    ///
    /// # Errors
    ///
    /// Returns [`PredictorError::Uninitialized`] when no scheme is active.
    pub fn try_predict(&self, pc: u64) -> Result<bool, PredictorError> {
        self.scheme
            .as_ref()
            .map(|bp| bp.predict_branch(pc))
            .ok_or(PredictorError::Uninitialized)
    }

    /// Predicts the conditional branch at `pc`; not-taken without an active scheme.
    pub fn predict(&self, pc: u64) -> bool {
        self.try_predict(pc).unwrap_or_else(|err| {
            tracing::debug!(pc, %err, "predicting not-taken");
            false
        })
    }

    /// Trains the active scheme with a retired branch.
    ///
    /// Only conditional branches reach the scheme. Branches retired without
    /// an active scheme are dropped.
    pub fn train(&mut self, pc: u64, taken: bool, branch: &BranchInfo) {
        if !branch.conditional {
            return;
        }
        match self.scheme.as_mut() {
            Some(bp) => bp.update_branch(pc, taken),
            None => tracing::warn!(
                pc,
                err = %PredictorError::Uninitialized,
                "dropping branch outcome"
            ),
        }
    }
}
