use core::fmt;

/// Processor manufacturer, identified by the leaf 0 signature.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Vendor {
    /// The signature matched no known vendor.
    #[default]
    Unknown,
    Intel,
    Amd,
    Centaur,
    Cyrix,
    Transmeta,
    Nsc,
    NexGen,
    Rise,
    Sis,
    Umc,
    Via,
    Vortex,
}

/// Known signatures, as the 12 bytes of EBX, EDX, ECX.
///
/// Transmeta shipped two different signatures.
pub const SIGNATURES: &[(&[u8; 12], Vendor)] = &[
    (b"GenuineIntel", Vendor::Intel),
    (b"AuthenticAMD", Vendor::Amd),
    (b"CentaurHauls", Vendor::Centaur),
    (b"CyrixInstead", Vendor::Cyrix),
    (b"TransmetaCPU", Vendor::Transmeta),
    (b"GenuineTMx86", Vendor::Transmeta),
    (b"Geode by NSC", Vendor::Nsc),
    (b"NexGenDriven", Vendor::NexGen),
    (b"RiseRiseRise", Vendor::Rise),
    (b"SiS SiS SiS ", Vendor::Sis),
    (b"UMC UMC UMC ", Vendor::Umc),
    (b"VIA VIA VIA ", Vendor::Via),
    (b"Vortex86 SoC", Vendor::Vortex),
];

impl Vendor {
    /// Identify a vendor by exact comparison of all 12 signature bytes.
    ///
    /// ```
    /// use cpuinfo::Vendor;
    ///
    /// assert_eq!(Vendor::from_signature(b"GenuineIntel"), Vendor::Intel);
    /// assert_eq!(Vendor::from_signature(b"GenuineIntex"), Vendor::Unknown);
    /// ```
    #[must_use]
    pub fn from_signature(signature: &[u8; 12]) -> Self {
        SIGNATURES
            .iter()
            .find(|(known, _)| *known == signature)
            .map_or(Self::Unknown, |&(_, vendor)| vendor)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Intel => "Intel",
            Self::Amd => "AMD",
            Self::Centaur => "Centaur",
            Self::Cyrix => "Cyrix",
            Self::Transmeta => "Transmeta",
            Self::Nsc => "National Semiconductor",
            Self::NexGen => "NexGen",
            Self::Rise => "Rise",
            Self::Sis => "SiS",
            Self::Umc => "UMC",
            Self::Via => "VIA",
            Self::Vortex => "Vortex",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
