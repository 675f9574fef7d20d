use crate::Ring;
use bitfield_struct::bitfield;

/// Type field of a system descriptor (S = 0) in IA-32e mode.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[repr(u8)]
pub enum SystemType {
    Ldt = 0x2,
    TssAvailable = 0x9,
    TssBusy = 0xB,
    CallGate = 0xC,
    InterruptGate = 0xE,
    TrapGate = 0xF,
    /// Any encoding that is reserved in 64-bit mode.
    Reserved = 0x0,
}

impl SystemType {
    #[inline]
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }

    #[inline]
    #[must_use]
    pub const fn from_bits(v: u8) -> Self {
        match v & 0xF {
            0x2 => Self::Ldt,
            0x9 => Self::TssAvailable,
            0xB => Self::TssBusy,
            0xC => Self::CallGate,
            0xE => Self::InterruptGate,
            0xF => Self::TrapGate,
            _ => Self::Reserved,
        }
    }
}

/// 16-byte TSS or LDT descriptor used in long mode.
///
/// Occupies two consecutive GDT slots; the second slot carries base[63:32].
#[bitfield(u128)]
#[derive(PartialEq, Eq)]
pub struct SystemDescriptor {
    #[bits(16)]
    limit_low: u16,

    #[bits(24)]
    base_low: u32,

    #[bits(4)]
    pub system_type: SystemType,

    /// Bit 44 - S, always 0 for system descriptors.
    #[bits(default = false)]
    _code_or_data: bool,

    #[bits(2)]
    pub dpl: Ring,

    pub present: bool,

    #[bits(4)]
    limit_high: u8,

    pub available: bool,

    #[bits(2, default = 0)]
    _reserved_53_54: u8,

    pub granularity: bool,

    #[bits(8)]
    base_mid: u8,

    #[bits(32)]
    base_high: u32,

    #[bits(32, default = 0)]
    _reserved_96_127: u32,
}

impl SystemDescriptor {
    /// Present, available 64-bit TSS at `base` with byte-granular `limit`.
    #[must_use]
    pub const fn tss(base: u64, limit: u32) -> Self {
        Self::new()
            .with_system_type(SystemType::TssAvailable)
            .with_dpl(Ring::Ring0)
            .with_present(true)
            .with_base(base)
            .with_limit(limit)
    }

    #[must_use]
    pub const fn ldt(base: u64, limit: u32) -> Self {
        Self::tss(base, limit).with_system_type(SystemType::Ldt)
    }

    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn base(&self) -> u64 {
        ((self.base_high() as u64) << 32) | ((self.base_mid() as u64) << 24) | self.base_low() as u64
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn with_base(self, base: u64) -> Self {
        self.with_base_low((base & 0x00FF_FFFF) as u32)
            .with_base_mid(((base >> 24) & 0xFF) as u8)
            .with_base_high((base >> 32) as u32)
    }

    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn limit(&self) -> u32 {
        ((self.limit_high() as u32) << 16) | self.limit_low() as u32
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn with_limit(self, limit: u32) -> Self {
        self.with_limit_low((limit & 0xFFFF) as u16)
            .with_limit_high(((limit >> 16) & 0xF) as u8)
    }

    /// The two GDT slots, low then high.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn into_slots(self) -> [u64; 2] {
        let bits = self.into_bits();
        [bits as u64, (bits >> 64) as u64]
    }
}
