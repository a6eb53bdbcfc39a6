//! Saturating Counter Tests.
//!
//! Verifies the midpoint prediction split, monotone one-step training and
//! idempotent saturation of the 2-bit and 3-bit counters.

use bpred_core::bru::counter::{SaturatingCounter, ThreeBitCounter, TwoBitCounter};
use bpred_core::common::PredictorError;
use proptest::prelude::*;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Prediction split
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0, false)]
#[case(1, false)]
#[case(2, true)]
#[case(3, true)]
fn two_bit_prediction_split(#[case] state: u8, #[case] taken: bool) {
    assert_eq!(TwoBitCounter::from_state(state).unwrap().predict(), taken);
}

#[rstest]
#[case(0, false)]
#[case(3, false)]
#[case(4, true)]
#[case(7, true)]
fn three_bit_prediction_split(#[case] state: u8, #[case] taken: bool) {
    assert_eq!(ThreeBitCounter::from_state(state).unwrap().predict(), taken);
}

#[test]
fn default_is_weak_not_taken() {
    assert_eq!(TwoBitCounter::default(), TwoBitCounter::WEAK_NOT_TAKEN);
    assert_eq!(ThreeBitCounter::default().state(), 3);
}

#[test]
fn weak_matches_outcome() {
    assert!(TwoBitCounter::weak(true).predict());
    assert!(!TwoBitCounter::weak(false).predict());
    assert!(!TwoBitCounter::weak(true).is_saturated());
    assert!(!TwoBitCounter::weak(false).is_saturated());
}

// ══════════════════════════════════════════════════════════
// 2. Undefined states
// ══════════════════════════════════════════════════════════

#[test]
fn out_of_range_state_is_reported() {
    crate::common::init_tracing();
    let err = ThreeBitCounter::try_from(8).unwrap_err();
    assert_eq!(err, PredictorError::InvalidCounterState { state: 8, bits: 3 });
    assert!(!ThreeBitCounter::predict_state(8));
    assert!(!TwoBitCounter::predict_state(u8::MAX));
}

// ══════════════════════════════════════════════════════════
// 3. Training properties
// ══════════════════════════════════════════════════════════

fn check_monotone<const BITS: u8>(state: u8, taken: bool) {
    let before = SaturatingCounter::<BITS>::from_state(state).unwrap();
    let mut after = before;
    after.train(taken);
    if taken {
        assert!(after.state() >= before.state());
    } else {
        assert!(after.state() <= before.state());
    }
    assert!(after.state().abs_diff(before.state()) <= 1);
}

fn check_saturates<const BITS: u8>(state: u8, taken: bool) {
    let mut ctr = SaturatingCounter::<BITS>::from_state(state).unwrap();
    for _ in 0..=SaturatingCounter::<BITS>::MAX {
        ctr.train(taken);
    }
    let extreme = if taken {
        SaturatingCounter::<BITS>::STRONG_TAKEN
    } else {
        SaturatingCounter::<BITS>::STRONG_NOT_TAKEN
    };
    assert_eq!(ctr, extreme);
    ctr.train(taken);
    assert_eq!(ctr, extreme, "further identical training is idempotent");
    assert_eq!(ctr.predict(), taken);
}

proptest! {
    #[test]
    fn two_bit_training_is_monotone(state in 0u8..4, taken: bool) {
        check_monotone::<2>(state, taken);
    }

    #[test]
    fn three_bit_training_is_monotone(state in 0u8..8, taken: bool) {
        check_monotone::<3>(state, taken);
    }

    #[test]
    fn two_bit_training_saturates(state in 0u8..4, taken: bool) {
        check_saturates::<2>(state, taken);
    }

    #[test]
    fn three_bit_training_saturates(state in 0u8..8, taken: bool) {
        check_saturates::<3>(state, taken);
    }
}
