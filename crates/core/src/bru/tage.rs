//! Tagged multi-table (TAGE-style) Branch Predictor.
//!
//! The predictor combines a base bimodal table with an ordered list of tagged
//! tables whose global history lengths strictly increase. Each tagged table is
//! indexed and tagged with the address XORed with its own fold of the global
//! history, so the same branch lands in different slots depending on how much
//! context a table considers.
//!
//! Prediction takes the longest-history table whose indexed entry carries the
//! matching tag (the provider) and falls back to the base table otherwise.
//!
//! Training policy:
//! - Provider correct: only the provider's counter is reinforced, and matching
//!   entries in shorter-history tables are evicted as stale.
//! - Every level wrong: the provider's counter is trained and the table one
//!   level above the provider is scanned for an entry not marked useful,
//!   starting at the branch's indexed slot and wrapping around. The first such
//!   entry is claimed. Useful entries are never overwritten; if the whole table
//!   is useful, allocation is skipped for that branch. Stale shorter-history
//!   matches are evicted as well.
//! - Provider wrong while a shorter level was right: only the provider's
//!   counter is trained.
//!
//! Usefulness is raised on allocation and cleared on eviction; there is no
//! periodic aging.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `predict()`: O(B) where B is the number of tagged tables
//!   - `update()`: O(B), plus one scan of the target table on a global miss
//! - **Space Complexity:** O(sum of table sizes)

use super::{
    BranchPredictor,
    counter::TwoBitCounter,
    history::{HistoryRegister, low_mask},
};
use crate::config::CustomConfig;

/// Usefulness flag of a tagged entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Usefulness {
    /// Free for allocation.
    #[default]
    NotUseful,
    /// Claimed; not replaceable until evicted.
    Useful,
}

/// An entry in a tagged table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaggedEntry {
    /// Tag of the context holding this entry; `None` when unallocated.
    pub tag: Option<u16>,
    /// 2-bit direction counter.
    pub ctr: TwoBitCounter,
    /// Replacement flag.
    pub useful: Usefulness,
}

impl TaggedEntry {
    /// True if the entry is allocated to `tag`.
    #[inline]
    pub fn matches(&self, tag: u16) -> bool {
        self.tag == Some(tag)
    }

    /// Returns the entry to its unallocated state.
    pub fn evict(&mut self) {
        *self = Self::default();
    }
}

/// A tagged table and its hashing parameters.
#[derive(Debug, Clone)]
pub struct TaggedTable {
    entries: Vec<TaggedEntry>,
    history_length: u32,
    index_bits: u32,
    tag_bits: u32,
}

impl TaggedTable {
    /// Creates an empty table of `size` entries (a power of two).
    ///
    /// A zero size is raised to one entry. Indexing only reaches the
    /// power-of-two prefix of any other size.
    pub fn new(size: usize, history_length: u32, tag_bits: u32) -> Self {
        let size = size.max(1);
        Self {
            entries: vec![TaggedEntry::default(); size],
            history_length,
            index_bits: size.trailing_zeros(),
            tag_bits,
        }
    }

    /// Slot for `pc` under history `ghr`.
    pub const fn index(&self, pc: u64, ghr: HistoryRegister) -> usize {
        let folded = ghr.fold(self.history_length, self.index_bits);
        ((pc ^ folded) & low_mask(self.index_bits)) as usize
    }

    /// Tag for `pc` under history `ghr`.
    pub const fn tag(&self, pc: u64, ghr: HistoryRegister) -> u16 {
        let folded = ghr.fold(self.history_length, self.tag_bits);
        ((pc ^ folded) & low_mask(self.tag_bits)) as u16
    }

    /// Global history bits folded into index and tag.
    pub const fn history_length(&self) -> u32 {
        self.history_length
    }

    /// Tag width in bits.
    pub const fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    /// All entries, by slot.
    pub fn entries(&self) -> &[TaggedEntry] {
        &self.entries
    }

    /// Entry at `slot`, if it exists.
    pub fn entry(&self, slot: usize) -> Option<&TaggedEntry> {
        self.entries.get(slot)
    }

    /// First slot not marked useful, scanning from `start` and wrapping around.
    pub fn free_slot_from(&self, start: usize) -> Option<usize> {
        let len = self.entries.len();
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&slot| self.entries[slot].useful == Usefulness::NotUseful)
    }

    /// Number of allocated entries.
    pub fn occupancy(&self) -> usize {
        self.entries.iter().filter(|e| e.tag.is_some()).count()
    }
}

/// Identifies one entry across all tagged tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    /// Table position, 0 being the shortest history.
    pub table: usize,
    /// Slot within the table.
    pub slot: usize,
}

/// The level that supplies a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// The base bimodal table.
    Base,
    /// The tagged table at this position.
    Tagged(usize),
}

/// What training did about allocating a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Allocation {
    /// Some level predicted correctly; nothing was allocated.
    NotNeeded,
    /// A fresh entry was claimed.
    Claimed(SlotRef),
    /// Every entry of the target table is marked useful; it was left untouched.
    /// Carries the branch's indexed slot in that table.
    NoFreeSlot(SlotRef),
    /// The provider is already the longest-history table.
    NoLongerTable,
}

/// Probe of one tagged table for one branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Probe {
    slot: usize,
    tag: u16,
    /// Counter prediction if the tag matched.
    hit: Option<bool>,
}

/// Snapshot of every level's view of a branch, taken before any update.
#[derive(Debug, Clone)]
struct Lookup {
    base_idx: usize,
    base_taken: bool,
    probes: Vec<Probe>,
}

impl Lookup {
    /// Longest-history table with a tag match, else the base table.
    fn provider(&self) -> Provider {
        self.probes
            .iter()
            .rposition(|p| p.hit.is_some())
            .map_or(Provider::Base, Provider::Tagged)
    }

    fn prediction(&self, provider: Provider) -> bool {
        match provider {
            Provider::Base => self.base_taken,
            Provider::Tagged(t) => self.probes[t].hit.unwrap_or(self.base_taken),
        }
    }

    /// Tables shorter than the provider whose entry matched.
    fn shadowed(&self, provider: Provider) -> impl Iterator<Item = usize> + '_ {
        let end = match provider {
            Provider::Base => 0,
            Provider::Tagged(t) => t,
        };
        (0..end).filter(move |&t| self.probes[t].hit.is_some())
    }

    /// True if any level (base included) predicted `taken`.
    fn any_correct(&self, taken: bool) -> bool {
        self.base_taken == taken || self.probes.iter().any(|p| p.hit == Some(taken))
    }
}

/// Tagged multi-table predictor structure.
#[derive(Debug, Clone)]
pub struct TagePredictor {
    /// Global History Register (64 bits; each table folds its own slice).
    ghr: HistoryRegister,
    /// Base bimodal predictor table.
    base: Vec<TwoBitCounter>,
    /// Mask for indexing the base table.
    base_mask: u64,
    /// Tagged tables, shortest history first.
    tables: Vec<TaggedTable>,
}

impl TagePredictor {
    /// Creates a new predictor from a validated configuration.
    ///
    /// An empty base table is raised to one entry.
    pub fn new(config: &CustomConfig) -> Self {
        let base_size = config.base_size.max(1);
        let tables = config
            .table_sizes
            .iter()
            .zip(&config.history_lengths)
            .zip(&config.tag_widths)
            .map(|((&size, &len), &tag)| TaggedTable::new(size, len, tag))
            .collect();

        Self {
            ghr: HistoryRegister::new(u64::BITS),
            base: vec![TwoBitCounter::WEAK_NOT_TAKEN; base_size],
            base_mask: low_mask(base_size.trailing_zeros()),
            tables,
        }
    }

    fn lookup(&self, pc: u64) -> Lookup {
        let base_idx = (pc & self.base_mask) as usize;
        let probes = self
            .tables
            .iter()
            .map(|table| {
                let slot = table.index(pc, self.ghr);
                let tag = table.tag(pc, self.ghr);
                let entry = &table.entries[slot];
                Probe {
                    slot,
                    tag,
                    hit: entry.matches(tag).then(|| entry.ctr.predict()),
                }
            })
            .collect();

        Lookup {
            base_idx,
            base_taken: self.base[base_idx].predict(),
            probes,
        }
    }

    /// Level that would provide the prediction for `pc` right now.
    pub fn provider(&self, pc: u64) -> Provider {
        self.lookup(pc).provider()
    }

    /// Current global history.
    pub const fn history(&self) -> HistoryRegister {
        self.ghr
    }

    /// Tagged tables, shortest history first.
    pub fn tables(&self) -> &[TaggedTable] {
        &self.tables
    }

    /// Base table counter for `pc`.
    pub fn base_counter(&self, pc: u64) -> TwoBitCounter {
        self.base[(pc & self.base_mask) as usize]
    }

    /// Trains with the resolved outcome and reports the allocation decision.
    pub fn train(&mut self, pc: u64, taken: bool) -> Allocation {
        let snap = self.lookup(pc);
        let provider = snap.provider();
        let provider_correct = snap.prediction(provider) == taken;

        match provider {
            Provider::Base => self.base[snap.base_idx].train(taken),
            Provider::Tagged(t) => self.tables[t].entries[snap.probes[t].slot]
                .ctr
                .train(taken),
        }

        let allocation = if provider_correct {
            self.evict_shadowed(&snap, provider);
            Allocation::NotNeeded
        } else if snap.any_correct(taken) {
            Allocation::NotNeeded
        } else {
            let allocation = self.allocate(&snap, provider, taken);
            self.evict_shadowed(&snap, provider);
            allocation
        };

        self.ghr.push(taken);
        allocation
    }

    fn evict_shadowed(&mut self, snap: &Lookup, provider: Provider) {
        for t in snap.shadowed(provider) {
            let slot = snap.probes[t].slot;
            tracing::trace!(table = t, slot, "evicting stale tagged entry");
            self.tables[t].entries[slot].evict();
        }
    }

    fn allocate(&mut self, snap: &Lookup, provider: Provider, taken: bool) -> Allocation {
        let target = match provider {
            Provider::Base => 0,
            Provider::Tagged(t) => t + 1,
        };
        let Some(probe) = snap.probes.get(target) else {
            return Allocation::NoLongerTable;
        };

        let Some(slot) = self.tables[target].free_slot_from(probe.slot) else {
            tracing::trace!(table = target, slot = probe.slot, "no free tagged entry");
            return Allocation::NoFreeSlot(SlotRef {
                table: target,
                slot: probe.slot,
            });
        };

        let at = SlotRef { table: target, slot };
        self.tables[target].entries[slot] = TaggedEntry {
            tag: Some(probe.tag),
            ctr: TwoBitCounter::weak(taken),
            useful: Usefulness::Useful,
        };
        tracing::trace!(table = at.table, slot = at.slot, tag = probe.tag, "allocated tagged entry");
        Allocation::Claimed(at)
    }
}

impl BranchPredictor for TagePredictor {
    /// Longest-history tag match, else the base table.
    fn predict_branch(&self, pc: u64) -> bool {
        let snap = self.lookup(pc);
        snap.prediction(snap.provider())
    }

    fn update_branch(&mut self, pc: u64, taken: bool) {
        let _ = self.train(pc, taken);
    }
}
