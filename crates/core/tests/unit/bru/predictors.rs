//! Branch Predictor Direction Tests.
//!
//! Verifies the direction prediction and training logic of the four schemes:
//! Static, GShare, Tournament and the tagged multi-table predictor. Tests that
//! need to pin internal table state live next to the implementations; this
//! file drives the predictors through their public API only.

use bpred_core::bru::counter::TwoBitCounter;
use bpred_core::bru::gshare::GSharePredictor;
use bpred_core::bru::static_bp::StaticPredictor;
use bpred_core::bru::tage::{Allocation, Provider, SlotRef, TagePredictor};
use bpred_core::bru::tournament::{ChoiceCounter, TournamentPredictor};
use bpred_core::bru::{BranchPredictor, BranchPredictorWrapper};
use bpred_core::config::{BranchPredictor as BpType, CustomConfig, PredictorConfig, TournamentConfig};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::{loop_trace, synthetic_trace};

// ══════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════

fn small_tournament() -> TournamentPredictor {
    TournamentPredictor::new(&TournamentConfig {
        global_size_bits: 6,
        local_hist_bits: 6,
        local_pred_bits: 6,
    })
}

fn default_tage() -> TagePredictor {
    TagePredictor::new(&CustomConfig::default())
}

/// Feeds `n` identical outcomes for one branch.
fn train<P: BranchPredictor>(bp: &mut P, pc: u64, taken: bool, n: usize) {
    for _ in 0..n {
        bp.update_branch(pc, taken);
    }
}

// ══════════════════════════════════════════════════════════
// 1. Static Predictor
// ══════════════════════════════════════════════════════════

#[test]
fn static_always_taken() {
    let bp = StaticPredictor::new();
    assert!(bp.predict_branch(0x1000));
    assert!(bp.predict_branch(0));
}

#[test]
fn static_ignores_training() {
    let mut bp = StaticPredictor::new();
    train(&mut bp, 0x1000, false, 100);
    assert!(bp.predict_branch(0x1000));
}

// ══════════════════════════════════════════════════════════
// 2. GShare Predictor
// ══════════════════════════════════════════════════════════

/// 4-entry table walk-through: index 1 trains to WeakTaken, then the new
/// history bit moves the same address onto index 0.
#[test]
fn gshare_four_entry_walkthrough() {
    let mut bp = GSharePredictor::new(2);
    let pc = 0b01;

    assert_eq!(bp.index(pc), 1);
    assert!(!bp.predict_branch(pc));

    bp.update_branch(pc, true);
    assert_eq!(bp.counter(1), Some(TwoBitCounter::WEAK_TAKEN));
    assert_eq!(bp.history().value(), 0b1);

    assert_eq!(bp.index(pc), 0);
    assert_eq!(bp.counter(0), Some(TwoBitCounter::WEAK_NOT_TAKEN));
    assert!(!bp.predict_branch(pc));
}

#[test]
fn gshare_predict_is_idempotent() {
    let mut bp = GSharePredictor::new(10);
    for rec in synthetic_trace(7, 200) {
        bp.update_branch(rec.pc, rec.taken);
    }
    let before = bp.clone();
    for pc in (0x8000_0000..0x8000_0040).step_by(4) {
        assert_eq!(bp.predict_branch(pc), bp.predict_branch(pc));
    }
    assert_eq!(bp.history(), before.history());
}

/// Once the history saturates at all ones the same entry is reinforced.
#[test]
fn gshare_learns_taken() {
    let mut bp = GSharePredictor::new(12);
    train(&mut bp, 0x1000, true, 20);
    assert!(bp.predict_branch(0x1000));
}

#[test]
fn gshare_learns_not_taken() {
    let mut bp = GSharePredictor::new(12);
    train(&mut bp, 0x1000, true, 20);
    train(&mut bp, 0x1000, false, 20);
    assert!(!bp.predict_branch(0x1000));
}

/// A strictly alternating branch becomes perfectly predictable.
#[test]
fn gshare_learns_alternation() {
    let mut bp = GSharePredictor::new(8);
    let pc = 0x44;
    for i in 0..64 {
        bp.update_branch(pc, i % 2 == 0);
    }
    for i in 64..80 {
        let taken = i % 2 == 0;
        assert_eq!(bp.predict_branch(pc), taken, "iteration {i}");
        bp.update_branch(pc, taken);
    }
}

// ══════════════════════════════════════════════════════════
// 3. Tournament Predictor
// ══════════════════════════════════════════════════════════

#[test]
fn tournament_initial_not_taken() {
    let bp = small_tournament();
    let snap = bp.lookup(0x1000);
    assert!(!snap.global_taken);
    assert!(!snap.local_taken);
    assert_eq!(snap.choice, ChoiceCounter::WeakGlobal);
    assert!(!bp.predict_branch(0x1000));
}

/// While both sides agree, no choice counter moves.
#[test]
fn tournament_choice_stable_when_sides_agree() {
    let mut bp = small_tournament();
    for i in 0..200u64 {
        let pc = 0x100 + 4 * (i % 13);
        let snap = bp.lookup(pc);
        assert_eq!(snap.global_taken, snap.local_taken);
        bp.update_branch(pc, false);
    }
    for idx in 0..64 {
        assert_eq!(bp.choice(idx), Some(ChoiceCounter::WeakGlobal));
    }
}

#[test]
fn tournament_learns_taken() {
    let mut bp = small_tournament();
    train(&mut bp, 0x2000, true, 30);
    assert!(bp.predict_branch(0x2000));
}

/// A period-3 loop branch (T, T, N) is captured by its local history.
#[test]
fn tournament_local_history_captures_loop() {
    let mut bp = small_tournament();
    let pc = 0x3000;
    let pattern = [true, true, false];
    for i in 0..300 {
        bp.update_branch(pc, pattern[i % 3]);
    }
    for i in 300..330 {
        let taken = pattern[i % 3];
        assert_eq!(bp.predict_branch(pc), taken, "iteration {i}");
        bp.update_branch(pc, taken);
    }
}

// ══════════════════════════════════════════════════════════
// 4. Tagged multi-table Predictor
// ══════════════════════════════════════════════════════════

#[test]
fn tage_initial_prediction_from_base() {
    let bp = default_tage();
    assert_eq!(bp.provider(0x1000), Provider::Base);
    assert!(!bp.predict_branch(0x1000));
}

/// The first global miss claims the indexed slot of the shortest table.
#[test]
fn tage_first_miss_claims_shortest_table() {
    let mut bp = default_tage();
    let pc = 0x400;
    let slot = bp.tables()[0].index(pc, bp.history());

    assert_eq!(
        bp.train(pc, true),
        Allocation::Claimed(SlotRef { table: 0, slot })
    );
    assert_eq!(bp.tables()[0].occupancy(), 1);
    assert_eq!(bp.history().value(), 1);
}

/// A correct base prediction never allocates.
#[test]
fn tage_no_allocation_while_base_is_right() {
    let mut bp = default_tage();
    for _ in 0..50 {
        assert_eq!(bp.train(0x1000, false), Allocation::NotNeeded);
    }
    assert!(bp.tables().iter().all(|t| t.occupancy() == 0));
    assert!(!bp.predict_branch(0x1000));
}

#[test]
fn tage_learns_taken() {
    let mut bp = default_tage();
    train(&mut bp, 0x1000, true, 20);
    assert!(bp.predict_branch(0x1000));
}

#[test]
fn tage_predict_is_side_effect_free() {
    let mut bp = default_tage();
    for rec in synthetic_trace(3, 500) {
        bp.update_branch(rec.pc, rec.taken);
    }
    let occupancy: Vec<usize> = bp.tables().iter().map(|t| t.occupancy()).collect();
    let history = bp.history();
    for rec in synthetic_trace(4, 100) {
        let _ = bp.predict_branch(rec.pc);
    }
    assert_eq!(
        bp.tables().iter().map(|t| t.occupancy()).collect::<Vec<_>>(),
        occupancy
    );
    assert_eq!(bp.history(), history);
}

// ══════════════════════════════════════════════════════════
// 5. All schemes
// ══════════════════════════════════════════════════════════

fn scheme(kind: BpType) -> BranchPredictorWrapper {
    BranchPredictorWrapper::new(&PredictorConfig {
        branch_predictor: kind,
        ..PredictorConfig::default()
    })
}

/// Two independent replays of the same trace give identical predictions.
#[rstest]
#[case(BpType::Static)]
#[case(BpType::GShare)]
#[case(BpType::Tournament)]
#[case(BpType::Custom)]
fn replay_is_deterministic(#[case] kind: BpType) {
    let replay = || {
        let mut bp = scheme(kind);
        synthetic_trace(0xC0FFEE, 2_000)
            .into_iter()
            .map(|rec| {
                let p = bp.predict_branch(rec.pc);
                bp.update_branch(rec.pc, rec.taken);
                p
            })
            .collect::<Vec<bool>>()
    };
    assert_eq!(replay(), replay());
}

/// Every learning scheme predicts a periodic loop body almost perfectly.
#[rstest]
#[case(BpType::GShare)]
#[case(BpType::Tournament)]
#[case(BpType::Custom)]
fn learning_schemes_track_loop(#[case] kind: BpType) {
    let mut bp = scheme(kind);
    assert_eq!(bp.kind(), kind);
    let trace = loop_trace(1_000);
    let correct = trace
        .iter()
        .filter(|rec| {
            let hit = bp.predict_branch(rec.pc) == rec.taken;
            bp.update_branch(rec.pc, rec.taken);
            hit
        })
        .count();
    assert!(
        correct * 10 > trace.len() * 9,
        "{kind}: {correct}/{} correct",
        trace.len()
    );
}
