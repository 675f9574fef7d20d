//! Code and data segment descriptors.
//!
//! A legacy GDT/LDT entry is 8 bytes. Its base and limit are split across
//! several fields; [`SegmentDescriptor::base`] and [`SegmentDescriptor::limit`]
//! reassemble them.

use crate::Ring;
use bitfield_struct::bitfield;

/// Four-bit type field of a code or data descriptor (S = 1).
///
/// Bit 3 selects code (1) or data (0). For data, bit 2 is expand-down and
/// bit 1 writable; for code, bit 2 is conforming and bit 1 readable. Bit 0 is
/// the accessed flag for both.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct SegmentType(u8);

impl SegmentType {
    pub const DATA_READ_ONLY: Self = Self(0x0);
    pub const DATA_READ_ONLY_ACCESSED: Self = Self(0x1);
    pub const DATA_READ_WRITE: Self = Self(0x2);
    pub const DATA_READ_WRITE_ACCESSED: Self = Self(0x3);
    pub const DATA_READ_ONLY_EXPAND_DOWN: Self = Self(0x4);
    pub const DATA_READ_ONLY_EXPAND_DOWN_ACCESSED: Self = Self(0x5);
    pub const DATA_READ_WRITE_EXPAND_DOWN: Self = Self(0x6);
    pub const DATA_READ_WRITE_EXPAND_DOWN_ACCESSED: Self = Self(0x7);
    pub const CODE_EXECUTE_ONLY: Self = Self(0x8);
    pub const CODE_EXECUTE_ONLY_ACCESSED: Self = Self(0x9);
    pub const CODE_EXECUTE_READ: Self = Self(0xA);
    pub const CODE_EXECUTE_READ_ACCESSED: Self = Self(0xB);
    pub const CODE_EXECUTE_ONLY_CONFORMING: Self = Self(0xC);
    pub const CODE_EXECUTE_ONLY_CONFORMING_ACCESSED: Self = Self(0xD);
    pub const CODE_EXECUTE_READ_CONFORMING: Self = Self(0xE);
    pub const CODE_EXECUTE_READ_CONFORMING_ACCESSED: Self = Self(0xF);

    const ACCESSED: u8 = 1 << 0;
    const READ_WRITE: u8 = 1 << 1;
    const DIRECTION: u8 = 1 << 2;
    const CODE: u8 = 1 << 3;

    #[inline]
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn from_bits(v: u8) -> Self {
        Self(v & 0xF)
    }

    #[inline]
    #[must_use]
    pub const fn is_code(self) -> bool {
        self.0 & Self::CODE != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_accessed(self) -> bool {
        self.0 & Self::ACCESSED != 0
    }

    /// Readable for code segments. Data segments are always readable.
    #[inline]
    #[must_use]
    pub const fn is_readable(self) -> bool {
        !self.is_code() || self.0 & Self::READ_WRITE != 0
    }

    /// Writable data. Code segments are never writable.
    #[inline]
    #[must_use]
    pub const fn is_writable(self) -> bool {
        !self.is_code() && self.0 & Self::READ_WRITE != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_conforming(self) -> bool {
        self.is_code() && self.0 & Self::DIRECTION != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_expand_down(self) -> bool {
        !self.is_code() && self.0 & Self::DIRECTION != 0
    }

    #[inline]
    #[must_use]
    pub const fn with_accessed(self, accessed: bool) -> Self {
        if accessed {
            Self(self.0 | Self::ACCESSED)
        } else {
            Self(self.0 & !Self::ACCESSED)
        }
    }
}

impl core::fmt::Debug for SegmentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let kind = if self.is_code() { "Code" } else { "Data" };
        write!(f, "{kind}({:#x})", self.0)
    }
}

/// A code or data segment descriptor.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct SegmentDescriptor {
    /// Bits 0-15 - limit[15:0].
    #[bits(16)]
    limit_low: u16,

    /// Bits 16-39 - base[23:0].
    #[bits(24)]
    base_low: u32,

    /// Bits 40-43 - segment type.
    #[bits(4)]
    pub segment_type: SegmentType,

    /// Bit 44 - S: 1 for code/data, 0 for system descriptors.
    #[bits(default = true)]
    pub code_or_data: bool,

    /// Bits 45-46 - DPL.
    #[bits(2)]
    pub dpl: Ring,

    /// Bit 47 - P: segment present.
    pub present: bool,

    /// Bits 48-51 - limit[19:16].
    #[bits(4)]
    limit_high: u8,

    /// Bit 52 - AVL: available to software.
    pub available: bool,

    /// Bit 53 - L: 64-bit code segment. Requires `default_big == false`.
    pub long_mode: bool,

    /// Bit 54 - D/B: 32-bit default operand size (code) or upper bound (data).
    pub default_big: bool,

    /// Bit 55 - G: limit is scaled by 4 KiB.
    pub granularity: bool,

    /// Bits 56-63 - base[31:24].
    #[bits(8)]
    base_high: u8,
}

impl SegmentDescriptor {
    /// Largest raw limit (20 bits).
    pub const MAX_LIMIT: u32 = 0xF_FFFF;

    /// The all-zero null descriptor at GDT index 0.
    pub const NULL: Self = Self::from_bits(0);

    /// Flat 64-bit code segment, base 0, limit 4 GiB, `L = 1`.
    #[must_use]
    pub const fn code64(dpl: Ring) -> Self {
        Self::new()
            .with_segment_type(SegmentType::CODE_EXECUTE_READ_ACCESSED)
            .with_dpl(dpl)
            .with_present(true)
            .with_long_mode(true)
            .with_granularity(true)
            .with_limit(Self::MAX_LIMIT)
    }

    /// Flat 32-bit code segment, base 0, limit 4 GiB, `D = 1`.
    #[must_use]
    pub const fn code32(dpl: Ring) -> Self {
        Self::new()
            .with_segment_type(SegmentType::CODE_EXECUTE_READ_ACCESSED)
            .with_dpl(dpl)
            .with_present(true)
            .with_default_big(true)
            .with_granularity(true)
            .with_limit(Self::MAX_LIMIT)
    }

    /// Flat read/write data segment, base 0, limit 4 GiB.
    #[must_use]
    pub const fn data(dpl: Ring) -> Self {
        Self::new()
            .with_segment_type(SegmentType::DATA_READ_WRITE_ACCESSED)
            .with_dpl(dpl)
            .with_present(true)
            .with_default_big(true)
            .with_granularity(true)
            .with_limit(Self::MAX_LIMIT)
    }

    /// The 32-bit segment base.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn base(&self) -> u32 {
        ((self.base_high() as u32) << 24) | self.base_low()
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn with_base(self, base: u32) -> Self {
        self.with_base_low(base & 0x00FF_FFFF)
            .with_base_high((base >> 24) as u8)
    }

    /// The raw 20-bit limit, not scaled by granularity.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn limit(&self) -> u32 {
        ((self.limit_high() as u32) << 16) | self.limit_low() as u32
    }

    /// Set the raw limit. Bits above the 20-bit field are dropped.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn with_limit(self, limit: u32) -> Self {
        self.with_limit_low((limit & 0xFFFF) as u16)
            .with_limit_high(((limit >> 16) & 0xF) as u8)
    }

    /// The last valid offset, with granularity applied.
    #[must_use]
    pub const fn byte_limit(&self) -> u32 {
        if self.granularity() {
            (self.limit() << 12) | 0xFFF
        } else {
            self.limit()
        }
    }

    #[must_use]
    pub const fn is_code(&self) -> bool {
        self.code_or_data() && self.segment_type().is_code()
    }
}
