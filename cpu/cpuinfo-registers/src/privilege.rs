/// CPU privilege rings (0-3).
///
/// The same two-bit encoding is used for the **DPL** stored in a descriptor,
/// the **RPL** in the low bits of a selector and the **CPL** of running code.
/// When the CPU checks a data segment load it compares `max(CPL, RPL) <= DPL`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
#[repr(u8)]
pub enum Ring {
    /// Kernel / supervisor mode.
    Ring0 = 0,
    Ring1 = 1,
    Ring2 = 2,
    /// User mode.
    Ring3 = 3,
}

impl Ring {
    #[inline]
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }

    /// Decode the low two bits; higher bits are ignored.
    #[inline]
    #[must_use]
    pub const fn from_bits(v: u8) -> Self {
        match v & 0b11 {
            0 => Self::Ring0,
            1 => Self::Ring1,
            2 => Self::Ring2,
            _ => Self::Ring3,
        }
    }

    /// The less privileged of the two rings (`max(self, other)`).
    #[inline]
    #[must_use]
    pub const fn weakest(self, other: Self) -> Self {
        if (self as u8) >= (other as u8) {
            self
        } else {
            other
        }
    }

    /// Data segment access check: `max(CPL, RPL) <= DPL` with `self` as the DPL.
    #[inline]
    #[must_use]
    pub const fn permits_data_load(self, cpl: Self, rpl: Self) -> bool {
        (cpl.weakest(rpl) as u8) <= (self as u8)
    }
}
