//! Branch History Registers.
//!
//! A history register is a fixed-width shift register of recent branch
//! outcomes: the newest outcome enters at bit 0 and bits beyond the width are
//! dropped. The same type serves as the global history and as each per-address
//! local history.
//!
//! Tagged tables need a long history compressed into a short index or tag.
//! [`HistoryRegister::fold`] XORs consecutive `width`-bit slices of the most
//! recent `length` outcomes together.

/// Returns a mask covering the low `width` bits.
#[inline]
pub const fn low_mask(width: u32) -> u64 {
    if width >= u64::BITS {
        u64::MAX
    } else {
        (1 << width) - 1
    }
}

/// A shift register holding the most recent `width` branch outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoryRegister {
    bits: u64,
    width: u32,
}

impl HistoryRegister {
    /// Creates an all-not-taken history of `width` bits (clamped to 64).
    pub const fn new(width: u32) -> Self {
        let width = if width > u64::BITS { u64::BITS } else { width };
        Self { bits: 0, width }
    }

    /// Register width in bits.
    #[inline]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Current contents; only the low `width` bits can be set.
    #[inline]
    pub const fn value(self) -> u64 {
        self.bits
    }

    /// Shifts `taken` in as the newest outcome.
    #[inline]
    pub const fn push(&mut self, taken: bool) {
        self.bits = ((self.bits << 1) | taken as u64) & low_mask(self.width);
    }

    /// The most recent `n` outcomes.
    #[inline]
    pub const fn low_bits(self, n: u32) -> u64 {
        self.bits & low_mask(n)
    }

    /// XOR-folds the most recent `length` outcomes down to `width` bits.
    ///
    /// A `width` of zero folds to zero.
    pub const fn fold(self, length: u32, width: u32) -> u64 {
        if width == 0 {
            return 0;
        }
        let mask = low_mask(width);
        let mut slice = self.low_bits(length);
        let mut folded = 0;
        while slice != 0 {
            folded ^= slice & mask;
            slice = if width >= u64::BITS { 0 } else { slice >> width };
        }
        folded
    }

    /// Forgets every recorded outcome.
    pub const fn clear(&mut self) {
        self.bits = 0;
    }
}
