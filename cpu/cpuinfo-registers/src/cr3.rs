use bitfield_struct::bitfield;

const PAGE_MASK: u64 = 0xFFF;

/// CR3 with PCIDs disabled (CR4.PCIDE = 0).
///
/// Holds the physical base address of the top-level paging structure plus the
/// cache-control bits used when walking it.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Cr3 {
    #[bits(3, default = 0)]
    _reserved_0_2: u8,

    /// Bit 3 - PWT: Page-level Write-Through.
    pub pwt: bool,

    /// Bit 4 - PCD: Page-level Cache Disable.
    pub pcd: bool,

    #[bits(7, default = 0)]
    _reserved_5_11: u8,

    /// Bits 12-51 - table base >> 12.
    #[bits(40)]
    base_4k: u64,

    #[bits(12, default = 0)]
    _reserved_52_63: u16,
}

impl Cr3 {
    pub const PWT: u64 = 1 << 3;
    pub const PCD: u64 = 1 << 4;

    /// Build a value from a 4 KiB aligned physical table address.
    ///
    /// Returns `None` when `base` is not page aligned or does not fit in 52 bits.
    #[must_use]
    pub const fn with_table(base: u64, pwt: bool, pcd: bool) -> Option<Self> {
        if base & PAGE_MASK != 0 || base >> 52 != 0 {
            return None;
        }
        Some(Self::new().with_pwt(pwt).with_pcd(pcd).with_base_4k(base >> 12))
    }

    /// Physical address of the top-level paging structure.
    #[must_use]
    pub const fn table(&self) -> u64 {
        self.base_4k() << 12
    }
}

/// CR3 with PCIDs enabled (CR4.PCIDE = 1).
///
/// The low 12 bits hold the process-context identifier instead of the
/// cache-control bits.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Cr3Pcid {
    /// Bits 0-11 - PCID.
    #[bits(12)]
    pub pcid: u16,

    #[bits(40)]
    base_4k: u64,

    #[bits(11, default = 0)]
    _reserved_52_62: u16,

    /// Bit 63 - when written, do not invalidate TLB entries tagged with `pcid`.
    pub no_flush: bool,
}

impl Cr3Pcid {
    /// Largest identifier that fits the 12-bit field.
    pub const MAX_PCID: u16 = 0xFFF;

    #[must_use]
    pub const fn with_table(base: u64, pcid: u16) -> Option<Self> {
        if base & PAGE_MASK != 0 || base >> 52 != 0 || pcid > Self::MAX_PCID {
            return None;
        }
        Some(Self::new().with_pcid(pcid).with_base_4k(base >> 12))
    }

    #[must_use]
    pub const fn table(&self) -> u64 {
        self.base_4k() << 12
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_form_keeps_base_and_flags() {
        let cr3 = Cr3::with_table(0x0012_3000, true, false).expect("aligned");
        assert_eq!(cr3.table(), 0x0012_3000);
        assert_eq!(cr3.into_bits(), 0x0012_3000 | Cr3::PWT);
        assert!(Cr3::with_table(0x0012_3004, false, false).is_none());
        assert!(Cr3::with_table(1 << 52, false, false).is_none());
    }

    #[test]
    fn pcid_form_layout() {
        let cr3 = Cr3Pcid::with_table(0x8000_0000, 0x2A)
            .expect("aligned")
            .with_no_flush(true);
        assert_eq!(cr3.into_bits(), (1 << 63) | 0x8000_0000 | 0x2A);
        assert_eq!(cr3.pcid(), 0x2A);
        assert_eq!(cr3.table(), 0x8000_0000);
        assert!(Cr3Pcid::with_table(0x1000, 0x1000).is_none());
    }
}
