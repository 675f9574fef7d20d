use bitfield_struct::bitfield;

/// `IA32_EFER` (MSR `0xC000_0080`).
///
/// Several extended CPUID flags describe whether a bit here may be set:
/// SYSCALL gates `sce`, NX gates `nxe`, LM gates `lme`, SVM gates `svme`
/// and FFXSR gates `ffxsr`.
#[bitfield(u64, order = Lsb)]
#[derive(PartialEq, Eq)]
pub struct Efer {
    /// Bit 0 - SCE: SYSCALL/SYSRET enable.
    pub sce: bool,

    /// Bits 1-4 - AMD K6 cache controls, reserved elsewhere.
    #[bits(4)]
    pub k6_cache_controls: u8,

    #[bits(3, default = 0)]
    _reserved_5_7: u8,

    /// Bit 8 - LME: Long Mode Enable.
    pub lme: bool,

    #[bits(default = false)]
    _reserved_9: bool,

    /// Bit 10 - LMA: Long Mode Active. Set by the processor.
    pub lma: bool,

    /// Bit 11 - NXE: No-Execute Enable.
    pub nxe: bool,

    /// Bit 12 - SVME: Secure Virtual Machine Enable.
    pub svme: bool,

    /// Bit 13 - LMSLE: Long Mode Segment Limit Enable.
    pub lmsle: bool,

    /// Bit 14 - FFXSR: Fast FXSAVE/FXRSTOR.
    pub ffxsr: bool,

    /// Bit 15 - TCE: Translation Cache Extension.
    pub tce: bool,

    #[bits(default = false)]
    _reserved_16: bool,

    /// Bit 17 - MCOMMIT enable.
    pub mcommit: bool,

    /// Bit 18 - INTWB: interruptible WBINVD/WBNOINVD.
    pub intwb: bool,

    #[bits(default = false)]
    _reserved_19: bool,

    /// Bit 20 - UAIE: Upper Address Ignore Enable.
    pub uaie: bool,

    /// Bit 21 - AIBRSE: Automatic IBRS Enable.
    pub aibrse: bool,

    #[bits(42, default = 0)]
    _reserved_22_63: u64,
}

impl Efer {
    /// MSR index for `IA32_EFER`.
    pub const MSR: u32 = 0xC000_0080;

    pub const SCE: u64 = 1 << 0;
    pub const LME: u64 = 1 << 8;
    pub const LMA: u64 = 1 << 10;
    pub const NXE: u64 = 1 << 11;
    pub const SVME: u64 = 1 << 12;
    pub const LMSLE: u64 = 1 << 13;
    pub const FFXSR: u64 = 1 << 14;
    pub const TCE: u64 = 1 << 15;

    /// Split into the `EDX:EAX` halves `WRMSR` expects.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn to_edx_eax(self) -> (u32, u32) {
        let bits = self.into_bits();
        ((bits >> 32) as u32, bits as u32)
    }

    /// Rebuild from the `EDX:EAX` halves `RDMSR` returns.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn from_edx_eax(edx: u32, eax: u32) -> Self {
        Self::from_bits(((edx as u64) << 32) | eax as u64)
    }
}
