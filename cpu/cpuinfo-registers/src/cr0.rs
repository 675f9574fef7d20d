use bitfield_struct::bitfield;

/// Architectural model of CR0.
///
/// Exposes the defined control bits as booleans and keeps every reserved bit
/// as zero-defaulted padding. Bits 32-63 only exist in 64-bit mode and are
/// reserved there.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Cr0 {
    /// Bit 0 - Protection Enable (PE).
    ///
    /// - 0: Real mode.
    /// - 1: Protected mode (required for paging and long mode).
    pub pe_protection_enable: bool,

    /// Bit 1 - Monitor Coprocessor (MP).
    pub mp_monitor_coprocessor: bool,

    /// Bit 2 - Emulation (EM). When set, x87 instructions fault with #NM.
    pub em_emulation: bool,

    /// Bit 3 - Task Switched (TS).
    pub ts_task_switched: bool,

    /// Bit 4 - Extension Type (ET). Hardwired to 1 on anything newer than a 386.
    pub et_extension_type: bool,

    /// Bit 5 - Numeric Error (NE).
    pub ne_numeric_error: bool,

    #[bits(10, default = 0)]
    _reserved_6_15: u16,

    /// Bit 16 - Write Protect (WP).
    pub wp_write_protect: bool,

    #[bits(default = false)]
    _reserved_17: bool,

    /// Bit 18 - Alignment Mask (AM).
    pub am_alignment_mask: bool,

    #[bits(10, default = 0)]
    _reserved_19_28: u16,

    /// Bit 29 - Not Write-through (NW).
    pub nw_not_write_through: bool,

    /// Bit 30 - Cache Disable (CD).
    pub cd_cache_disable: bool,

    /// Bit 31 - Paging (PG). Requires PE.
    pub pg_paging: bool,

    #[bits(32, default = 0)]
    _reserved_32_63: u32,
}

impl Cr0 {
    pub const PE: u64 = 1 << 0;
    pub const MP: u64 = 1 << 1;
    pub const EM: u64 = 1 << 2;
    pub const TS: u64 = 1 << 3;
    pub const ET: u64 = 1 << 4;
    pub const NE: u64 = 1 << 5;
    pub const WP: u64 = 1 << 16;
    pub const AM: u64 = 1 << 18;
    pub const NW: u64 = 1 << 29;
    pub const CD: u64 = 1 << 30;
    pub const PG: u64 = 1 << 31;

    /// Union of every architecturally defined bit.
    pub const DEFINED: u64 = Self::PE
        | Self::MP
        | Self::EM
        | Self::TS
        | Self::ET
        | Self::NE
        | Self::WP
        | Self::AM
        | Self::NW
        | Self::CD
        | Self::PG;

    /// Whether loading this value into CR0 would be accepted.
    ///
    /// `MOV CR0` raises #GP when PG is set without PE, when NW is set
    /// without CD, or when any reserved bit is set.
    #[must_use]
    pub const fn is_loadable(&self) -> bool {
        let bits = self.into_bits();
        if bits & !Self::DEFINED != 0 {
            return false;
        }
        if self.pg_paging() && !self.pe_protection_enable() {
            return false;
        }
        !self.nw_not_write_through() || self.cd_cache_disable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_bits_match_fields() {
        assert_eq!(Cr0::new().with_pe_protection_enable(true).into_bits(), Cr0::PE);
        assert_eq!(Cr0::new().with_wp_write_protect(true).into_bits(), Cr0::WP);
        assert_eq!(Cr0::new().with_am_alignment_mask(true).into_bits(), Cr0::AM);
        assert_eq!(Cr0::new().with_pg_paging(true).into_bits(), Cr0::PG);
    }

    #[test]
    fn loadable_rules() {
        let long_mode = Cr0::from_bits(Cr0::PE | Cr0::PG | Cr0::ET | Cr0::NE | Cr0::WP);
        assert!(long_mode.is_loadable());

        assert!(!Cr0::from_bits(Cr0::PG).is_loadable());
        assert!(!Cr0::from_bits(Cr0::NW).is_loadable());
        assert!(Cr0::from_bits(Cr0::NW | Cr0::CD).is_loadable());
        assert!(!Cr0::from_bits(1 << 40).is_loadable());
    }
}
