//! Shared helpers for the predictor tests.

use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One retired conditional branch of a synthetic trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    /// Branch address.
    pub pc: u64,
    /// Resolved direction.
    pub taken: bool,
}

/// Generates a deterministic branch stream from `seed`.
///
/// Addresses come from a small pool of word-aligned PCs so that tables see
/// reuse; each address has its own bias so the stream is learnable.
pub fn synthetic_trace(seed: u64, len: usize) -> Vec<TraceRecord> {
    let mut state = seed | 1;
    let mut next = move || {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    (0..len)
        .map(|_| {
            let r = next();
            let site = r % 16;
            let pc = 0x8000_0000 + site * 4;
            // Sites 0..8 are mostly taken, 8..16 mostly not-taken.
            let bias = if site < 8 { 7 } else { 1 };
            TraceRecord {
                pc,
                taken: (r >> 32) % 8 < bias,
            }
        })
        .collect()
}

/// Replays a fixed 16-branch loop body `iterations` times.
///
/// Every branch has a fixed direction except the last one, the loop-closing
/// branch, which falls through every fourth iteration. The outcome sequence
/// is periodic, so every learning scheme can predict it almost perfectly.
pub fn loop_trace(iterations: usize) -> Vec<TraceRecord> {
    (0..iterations)
        .flat_map(|iter| {
            (0..16u64).map(move |site| TraceRecord {
                pc: 0x8000_0000 + site * 4,
                taken: if site == 15 { iter % 4 != 3 } else { site % 3 != 0 },
            })
        })
        .collect()
}
