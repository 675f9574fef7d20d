use crate::leaves::{MAX_EXTENDED_FUNCTION, MAX_FUNCTION};
use core::fmt;

/// One of the two contiguous CPUID leaf ranges.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LeafRange {
    /// Leaves `0..=max`.
    Standard,
    /// Leaves `0x8000_0000..=max`.
    Extended,
}

impl LeafRange {
    /// The first leaf of the range, which also reports the range maximum in EAX.
    #[must_use]
    pub const fn base(self) -> u32 {
        match self {
            Self::Standard => MAX_FUNCTION,
            Self::Extended => MAX_EXTENDED_FUNCTION,
        }
    }

    /// Whether `leaf` numerically belongs to this range.
    #[must_use]
    pub const fn contains(self, leaf: u32) -> bool {
        match self {
            Self::Standard => leaf < MAX_EXTENDED_FUNCTION,
            Self::Extended => leaf >= MAX_EXTENDED_FUNCTION,
        }
    }

    /// Number of leaves from the base up to and including `max`.
    ///
    /// An extended maximum below `0x8000_0000` means the range is absent.
    #[must_use]
    pub fn leaf_count(self, max: u32) -> u64 {
        let base = self.base();
        if max < base {
            0
        } else {
            u64::from(max - base) + 1
        }
    }
}

impl fmt::Display for LeafRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Extended => f.write_str("extended"),
        }
    }
}

/// The maximum leaves reported by leaf 0 and leaf `0x8000_0000`.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct LeafRanges {
    pub max_standard: u32,
    pub max_extended: u32,
}

impl LeafRanges {
    #[must_use]
    pub const fn max(&self, range: LeafRange) -> u32 {
        match range {
            LeafRange::Standard => self.max_standard,
            LeafRange::Extended => self.max_extended,
        }
    }

    /// Whether `leaf` is at or below the maximum of its range.
    #[must_use]
    pub const fn supports(&self, leaf: u32) -> bool {
        if LeafRange::Standard.contains(leaf) {
            leaf <= self.max_standard
        } else {
            self.max_extended >= MAX_EXTENDED_FUNCTION && leaf <= self.max_extended
        }
    }
}
