use bitfield_struct::bitfield;

/// CR4 - Control Register 4.
///
/// Enables architectural extensions. Several CPUID feature flags only become
/// usable once the matching CR4 bit is set by the operating system (for
/// example OSXSAVE mirrors `osxsave` and FSGSBASE needs `fsgsbase`).
#[bitfield(u64, order = Lsb)]
#[derive(PartialEq, Eq)]
pub struct Cr4 {
    /// Bit 0 - VME: Virtual-8086 Mode Extensions.
    pub vme: bool,

    /// Bit 1 - PVI: Protected-Mode Virtual Interrupts.
    pub pvi: bool,

    /// Bit 2 - TSD: RDTSC/RDTSCP restricted to CPL 0.
    pub tsd: bool,

    /// Bit 3 - DE: Debugging Extensions.
    pub de: bool,

    /// Bit 4 - PSE: Page Size Extensions.
    pub pse: bool,

    /// Bit 5 - PAE: Physical Address Extension.
    pub pae: bool,

    /// Bit 6 - MCE: Machine-Check Enable.
    pub mce: bool,

    /// Bit 7 - PGE: Page Global Enable.
    pub pge: bool,

    /// Bit 8 - PCE: RDPMC allowed at any CPL.
    pub pce: bool,

    /// Bit 9 - OSFXSR: OS supports FXSAVE/FXRSTOR.
    pub osfxsr: bool,

    /// Bit 10 - OSXMMEXCPT: OS handles unmasked SIMD FP exceptions.
    pub osxmmexcpt: bool,

    /// Bit 11 - UMIP: User-Mode Instruction Prevention.
    pub umip: bool,

    /// Bit 12 - LA57: 5-level paging.
    pub la57: bool,

    /// Bit 13 - VMXE: VMX Enable.
    pub vmxe: bool,

    /// Bit 14 - SMXE: SMX Enable.
    pub smxe: bool,

    #[bits(default = false)]
    _reserved_15: bool,

    /// Bit 16 - FSGSBASE: RD/WR FS/GS base instructions at CPL > 0.
    pub fsgsbase: bool,

    /// Bit 17 - PCIDE: Process-Context Identifiers.
    pub pcide: bool,

    /// Bit 18 - OSXSAVE: XSAVE and XCR0 enabled.
    pub osxsave: bool,

    /// Bit 19 - KL: Key Locker.
    pub kl: bool,

    /// Bit 20 - SMEP: Supervisor Mode Execution Prevention.
    pub smep: bool,

    /// Bit 21 - SMAP: Supervisor Mode Access Prevention.
    pub smap: bool,

    /// Bit 22 - PKE: user-mode Protection Keys.
    pub pke: bool,

    /// Bit 23 - CET: Control-flow Enforcement Technology.
    pub cet: bool,

    /// Bit 24 - PKS: supervisor Protection Keys.
    pub pks: bool,

    /// Bit 25 - UINTRE: User Interrupts.
    pub uintre: bool,

    #[bits(38, default = 0)]
    _reserved_26_63: u64,
}

impl Cr4 {
    pub const VME: u64 = 1 << 0;
    pub const PVI: u64 = 1 << 1;
    pub const TSD: u64 = 1 << 2;
    pub const DE: u64 = 1 << 3;
    pub const PSE: u64 = 1 << 4;
    pub const PAE: u64 = 1 << 5;
    pub const MCE: u64 = 1 << 6;
    pub const PGE: u64 = 1 << 7;
    pub const PCE: u64 = 1 << 8;
    pub const OSFXSR: u64 = 1 << 9;
    pub const OSXMMEXCPT: u64 = 1 << 10;
    pub const UMIP: u64 = 1 << 11;
    pub const LA57: u64 = 1 << 12;
    pub const VMXE: u64 = 1 << 13;
    pub const SMXE: u64 = 1 << 14;
    pub const FSGSBASE: u64 = 1 << 16;
    pub const PCIDE: u64 = 1 << 17;
    pub const OSXSAVE: u64 = 1 << 18;
    pub const KL: u64 = 1 << 19;
    pub const SMEP: u64 = 1 << 20;
    pub const SMAP: u64 = 1 << 21;
    pub const PKE: u64 = 1 << 22;
    pub const CET: u64 = 1 << 23;
    pub const PKS: u64 = 1 << 24;
    pub const UINTRE: u64 = 1 << 25;
}
