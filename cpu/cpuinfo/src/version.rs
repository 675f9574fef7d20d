use bitfield_struct::bitfield;
use core::fmt;

/// CPUID.01H:EAX - version information.
///
/// Raw fields as the processor reports them; [`Leaf1Eax::effective_family`] and
/// [`Leaf1Eax::effective_model`] fold in the extended fields.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct Leaf1Eax {
    /// Stepping ID (bits 3:0).
    #[bits(4)]
    pub stepping: u8,
    /// Base model (bits 7:4).
    #[bits(4)]
    pub model: u8,
    /// Base family (bits 11:8).
    #[bits(4)]
    pub family: u8,
    /// Processor type (bits 13:12).
    #[bits(2)]
    pub cpu_type: u8,
    #[bits(2)]
    _rsv14_15: u8,
    /// Extended model (bits 19:16).
    #[bits(4)]
    pub ext_model: u8,
    /// Extended family (bits 27:20).
    #[bits(8)]
    pub ext_family: u16,
    #[bits(4)]
    _rsv28_31: u8,
}

impl Leaf1Eax {
    /// Base family, plus the extended family when the base family is 0x0F.
    #[inline]
    #[must_use]
    pub fn effective_family(self) -> u16 {
        let fam = u16::from(self.family());
        if fam == 0x0F {
            fam + self.ext_family()
        } else {
            fam
        }
    }

    /// Base model, extended by `ext_model << 4` for families 0x06 and 0x0F.
    #[inline]
    #[must_use]
    pub const fn effective_model(self) -> u8 {
        let fam = self.family();
        let base = self.model();
        if fam == 0x06 || fam == 0x0F {
            base | (self.ext_model() << 4)
        } else {
            base
        }
    }
}

/// CPUID.01H:EBX - brand index, CLFLUSH size, logical count and APIC ID.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct Leaf1Ebx {
    #[bits(8)]
    pub brand_index: u8,
    /// CLFLUSH line size in 8-byte units.
    #[bits(8)]
    pub clflush_line_size_8b: u8,
    /// Legacy maximum number of addressable logical processor IDs.
    #[bits(8)]
    pub logical_processor_count: u8,
    #[bits(8)]
    pub initial_apic_id: u8,
}

impl Leaf1Ebx {
    /// CLFLUSH line size in bytes.
    #[inline]
    #[must_use]
    pub fn clflush_line_bytes(self) -> u16 {
        u16::from(self.clflush_line_size_8b()) * 8
    }
}

/// Processor signature and identification from leaf 1.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct VersionInfo {
    pub eax: Leaf1Eax,
    pub ebx: Leaf1Ebx,
}

impl VersionInfo {
    pub const EMPTY: Self = Self {
        eax: Leaf1Eax::from_bits(0),
        ebx: Leaf1Ebx::from_bits(0),
    };

    #[must_use]
    pub const fn new(eax: u32, ebx: u32) -> Self {
        Self {
            eax: Leaf1Eax::from_bits(eax),
            ebx: Leaf1Ebx::from_bits(ebx),
        }
    }

    #[inline]
    #[must_use]
    pub fn family(&self) -> u16 {
        self.eax.effective_family()
    }

    #[inline]
    #[must_use]
    pub const fn model(&self) -> u8 {
        self.eax.effective_model()
    }

    #[inline]
    #[must_use]
    pub const fn stepping(&self) -> u8 {
        self.eax.stepping()
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "family {:#x} model {:#x} stepping {}",
            self.family(),
            self.model(),
            self.stepping()
        )
    }
}
