//! Saturating Counters.
//!
//! An N-bit saturating counter is a small finite-state machine over the
//! ordered states `0..2^N`. Training moves the state one step toward the
//! observed outcome and clamps at both extremes; the prediction splits the
//! state set at its midpoint (lower half not-taken, upper half taken).
//!
//! The 2-bit counter states are, in order, StrongNotTaken, WeakNotTaken,
//! WeakTaken and StrongTaken. The 3-bit counter has SN, WN1, WN2, WN3, WT1,
//! WT2, WT3 and ST.

use crate::common::PredictorError;

/// An N-bit saturating confidence counter.
///
/// The state is private and every constructor keeps it inside `0..2^BITS`,
/// so a live counter can never be in an undefined state. Raw states coming
/// from outside go through [`SaturatingCounter::from_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SaturatingCounter<const BITS: u8> {
    state: u8,
}

/// 2-bit counter used by gshare, the tournament global side and the tagged tables.
pub type TwoBitCounter = SaturatingCounter<2>;

/// 3-bit counter used by the tournament local side.
pub type ThreeBitCounter = SaturatingCounter<3>;

impl<const BITS: u8> SaturatingCounter<BITS> {
    /// Highest (strongest taken) state.
    pub const MAX: u8 = (1 << BITS) - 1;

    /// Lowest state that predicts taken.
    pub const THRESHOLD: u8 = 1 << (BITS - 1);

    /// Strongest not-taken state.
    pub const STRONG_NOT_TAKEN: Self = Self { state: 0 };

    /// Weakest not-taken state (WN for 2-bit, WN3 for 3-bit).
    pub const WEAK_NOT_TAKEN: Self = Self {
        state: Self::THRESHOLD - 1,
    };

    /// Weakest taken state (WT for 2-bit, WT1 for 3-bit).
    pub const WEAK_TAKEN: Self = Self {
        state: Self::THRESHOLD,
    };

    /// Strongest taken state.
    pub const STRONG_TAKEN: Self = Self { state: Self::MAX };

    /// Returns the weak state agreeing with `taken`.
    #[inline]
    pub const fn weak(taken: bool) -> Self {
        if taken {
            Self::WEAK_TAKEN
        } else {
            Self::WEAK_NOT_TAKEN
        }
    }

    /// Decodes a raw state.
    ///
    /// # Errors
    ///
    /// Returns [`PredictorError::InvalidCounterState`] if `state` is not below `2^BITS`.
    pub const fn from_state(state: u8) -> Result<Self, PredictorError> {
        if state > Self::MAX {
            return Err(PredictorError::InvalidCounterState { state, bits: BITS });
        }
        Ok(Self { state })
    }

    /// Predicts directly from a raw state.
    ///
    /// An undefined state is reported through `tracing` and predicts not-taken.
    pub fn predict_state(state: u8) -> bool {
        match Self::from_state(state) {
            Ok(counter) => counter.predict(),
            Err(err) => {
                tracing::warn!(%err, "undefined counter state, predicting not-taken");
                false
            }
        }
    }

    /// Raw state value.
    #[inline]
    pub const fn state(self) -> u8 {
        self.state
    }

    /// Taken if the state is in the upper half.
    #[inline]
    pub const fn predict(self) -> bool {
        self.state >= Self::THRESHOLD
    }

    /// Moves one step toward the outcome, saturating at the extremes.
    #[inline]
    pub const fn train(&mut self, taken: bool) {
        if taken {
            if self.state < Self::MAX {
                self.state += 1;
            }
        } else if self.state > 0 {
            self.state -= 1;
        }
    }

    /// True at either extreme.
    #[inline]
    pub const fn is_saturated(self) -> bool {
        self.state == 0 || self.state == Self::MAX
    }
}

impl<const BITS: u8> Default for SaturatingCounter<BITS> {
    /// Counters start weakly not-taken.
    fn default() -> Self {
        Self::WEAK_NOT_TAKEN
    }
}

impl<const BITS: u8> TryFrom<u8> for SaturatingCounter<BITS> {
    type Error = PredictorError;

    fn try_from(state: u8) -> Result<Self, Self::Error> {
        Self::from_state(state)
    }
}
