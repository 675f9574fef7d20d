//! Segment selectors.
//!
//! ```text
//!  15            3 2  1  0
//! +----------------+--+----+
//! |   Index[12:0]  |TI| RPL|
//! +----------------+--+----+  (TI=0 -> GDT, TI=1 -> LDT)
//! ```

use crate::Ring;
use bitfield_struct::bitfield;

/// Which descriptor table a selector addresses.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum Table {
    /// Global Descriptor Table
    Gdt = 0,
    /// Local Descriptor Table
    Ldt = 1,
}

impl Table {
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        if bits == 0 { Self::Gdt } else { Self::Ldt }
    }

    #[inline]
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }
}

#[bitfield(u16)]
#[derive(Eq, PartialEq)]
pub struct SegmentSelector {
    /// Requested Privilege Level (bits 0..1).
    #[bits(2)]
    pub rpl: Ring,
    /// Table Indicator (bit 2).
    #[bits(1)]
    pub table: Table,
    /// Descriptor index (bits 3..15).
    #[bits(13)]
    pub index: u16,
}

impl SegmentSelector {
    /// Largest descriptor index a selector can address.
    pub const MAX_INDEX: u16 = 0x1FFF;

    /// Selector for `index` in the GDT.
    ///
    /// Returns `None` if `index` does not fit the 13-bit field.
    #[inline]
    #[must_use]
    pub const fn gdt(index: u16, rpl: Ring) -> Option<Self> {
        if index > Self::MAX_INDEX {
            return None;
        }
        Some(Self::new().with_index(index).with_table(Table::Gdt).with_rpl(rpl))
    }

    /// Byte offset of the addressed descriptor within its table.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> u16 {
        self.index() << 3
    }

    /// The null selector (index 0 in the GDT, any RPL).
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.index() == 0 && matches!(self.table(), Table::Gdt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_selectors() {
        let cs = SegmentSelector::gdt(4, Ring::Ring3).expect("index fits");
        assert_eq!(cs.into_bits(), 0x23);
        assert_eq!(cs.offset(), 0x20);
        assert!(!cs.is_null());
    }

    #[test]
    fn decoding() {
        let sel = SegmentSelector::from_bits(0x2F);
        assert_eq!(sel.index(), 5);
        assert_eq!(sel.table(), Table::Ldt);
        assert_eq!(sel.rpl(), Ring::Ring3);
        assert!(SegmentSelector::from_bits(0x3).is_null());
        assert!(SegmentSelector::gdt(0x2000, Ring::Ring0).is_none());
    }

    #[test]
    fn data_load_check() {
        assert!(Ring::Ring3.permits_data_load(Ring::Ring3, Ring::Ring3));
        assert!(!Ring::Ring0.permits_data_load(Ring::Ring3, Ring::Ring0));
        assert!(!Ring::Ring0.permits_data_load(Ring::Ring0, Ring::Ring3));
        assert!(Ring::Ring3.permits_data_load(Ring::Ring0, Ring::Ring0));
    }
}
