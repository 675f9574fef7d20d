//! Named feature predicates.
//!
//! Each [`Feature`] is one bit in one [`FeatureWord`]; the table below is the
//! single source for names, aliases and bit positions.

use crate::error::UnknownFeature;
use crate::snapshot::{FeatureBit, FeatureSnapshot, FeatureWord};
use core::fmt;
use core::str::FromStr;
use cpuinfo_derive::FeatureTable;

/// A processor feature reported by CPUID.
///
/// ```
/// use cpuinfo::Feature;
///
/// assert_eq!(Feature::from_name("bmi"), Some(Feature::Bmi1));
/// assert_eq!(Feature::Sse41.name(), "SSE41");
/// assert_eq!("3dnow".parse::<Feature>(), Ok(Feature::Amd3dnow));
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FeatureTable)]
#[non_exhaustive]
pub enum Feature {
    // CPUID.01H:ECX
    #[cpuid(word = Leaf01Ecx, bit = 0)]
    Sse3,
    #[cpuid(word = Leaf01Ecx, bit = 1, alias = "PCLMUL")]
    Pclmulqdq,
    #[cpuid(word = Leaf01Ecx, bit = 3, alias = "MWAIT")]
    Monitor,
    #[cpuid(word = Leaf01Ecx, bit = 5)]
    Vmx,
    #[cpuid(word = Leaf01Ecx, bit = 6)]
    Smx,
    #[cpuid(word = Leaf01Ecx, bit = 7)]
    Eist,
    #[cpuid(word = Leaf01Ecx, bit = 9)]
    Ssse3,
    #[cpuid(word = Leaf01Ecx, bit = 12)]
    Fma,
    #[cpuid(word = Leaf01Ecx, bit = 13, alias = "CX16")]
    Cmpxchg16b,
    #[cpuid(word = Leaf01Ecx, bit = 17)]
    Pcid,
    #[cpuid(word = Leaf01Ecx, bit = 19, alias = "SSE4_1")]
    Sse41,
    #[cpuid(word = Leaf01Ecx, bit = 20, alias = "SSE4_2")]
    Sse42,
    #[cpuid(word = Leaf01Ecx, bit = 21)]
    X2apic,
    #[cpuid(word = Leaf01Ecx, bit = 22)]
    Movbe,
    #[cpuid(word = Leaf01Ecx, bit = 23)]
    Popcnt,
    #[cpuid(word = Leaf01Ecx, bit = 25, alias = "AESNI")]
    Aes,
    #[cpuid(word = Leaf01Ecx, bit = 26)]
    Xsave,
    #[cpuid(word = Leaf01Ecx, bit = 27)]
    Osxsave,
    #[cpuid(word = Leaf01Ecx, bit = 28)]
    Avx,
    #[cpuid(word = Leaf01Ecx, bit = 29)]
    F16c,
    #[cpuid(word = Leaf01Ecx, bit = 30, alias = "RDRND")]
    Rdrand,
    #[cpuid(word = Leaf01Ecx, bit = 31)]
    Hypervisor,

    // CPUID.01H:EDX
    #[cpuid(word = Leaf01Edx, bit = 0)]
    Fpu,
    #[cpuid(word = Leaf01Edx, bit = 4)]
    Tsc,
    #[cpuid(word = Leaf01Edx, bit = 5)]
    Msr,
    #[cpuid(word = Leaf01Edx, bit = 6)]
    Pae,
    #[cpuid(word = Leaf01Edx, bit = 8, alias = "CX8")]
    Cmpxchg8b,
    #[cpuid(word = Leaf01Edx, bit = 9)]
    Apic,
    #[cpuid(word = Leaf01Edx, bit = 11)]
    Sep,
    #[cpuid(word = Leaf01Edx, bit = 15)]
    Cmov,
    #[cpuid(word = Leaf01Edx, bit = 19)]
    Clfsh,
    #[cpuid(word = Leaf01Edx, bit = 23)]
    Mmx,
    #[cpuid(word = Leaf01Edx, bit = 24, alias = "FXSAVE")]
    Fxsr,
    #[cpuid(word = Leaf01Edx, bit = 25)]
    Sse,
    #[cpuid(word = Leaf01Edx, bit = 26)]
    Sse2,
    #[cpuid(word = Leaf01Edx, bit = 28)]
    Htt,

    // CPUID.(07H,0):EBX
    #[cpuid(word = Leaf07Ebx, bit = 0)]
    Fsgsbase,
    #[cpuid(word = Leaf07Ebx, bit = 1)]
    Tscadjust,
    #[cpuid(word = Leaf07Ebx, bit = 2)]
    Sgx,
    #[cpuid(word = Leaf07Ebx, bit = 3, alias = "BMI")]
    Bmi1,
    #[cpuid(word = Leaf07Ebx, bit = 4)]
    Hle,
    #[cpuid(word = Leaf07Ebx, bit = 5)]
    Avx2,
    #[cpuid(word = Leaf07Ebx, bit = 7)]
    Smep,
    #[cpuid(word = Leaf07Ebx, bit = 8)]
    Bmi2,
    #[cpuid(word = Leaf07Ebx, bit = 9)]
    Erms,
    #[cpuid(word = Leaf07Ebx, bit = 10)]
    Invpcid,
    #[cpuid(word = Leaf07Ebx, bit = 11)]
    Rtm,
    #[cpuid(word = Leaf07Ebx, bit = 14)]
    Mpx,
    #[cpuid(word = Leaf07Ebx, bit = 16)]
    Avx512f,
    #[cpuid(word = Leaf07Ebx, bit = 17)]
    Avx512dq,
    #[cpuid(word = Leaf07Ebx, bit = 18)]
    Rdseed,
    #[cpuid(word = Leaf07Ebx, bit = 19)]
    Adx,
    #[cpuid(word = Leaf07Ebx, bit = 20)]
    Smap,
    #[cpuid(word = Leaf07Ebx, bit = 21)]
    Avx512ifma,
    #[cpuid(word = Leaf07Ebx, bit = 23)]
    Clflushopt,
    #[cpuid(word = Leaf07Ebx, bit = 24)]
    Clwb,
    #[cpuid(word = Leaf07Ebx, bit = 26)]
    Avx512pf,
    #[cpuid(word = Leaf07Ebx, bit = 27)]
    Avx512er,
    #[cpuid(word = Leaf07Ebx, bit = 28)]
    Avx512cd,
    #[cpuid(word = Leaf07Ebx, bit = 29)]
    Sha,
    #[cpuid(word = Leaf07Ebx, bit = 30)]
    Avx512bw,
    #[cpuid(word = Leaf07Ebx, bit = 31)]
    Avx512vl,

    // CPUID.(07H,0):ECX
    #[cpuid(word = Leaf07Ecx, bit = 0)]
    Prefetchwt1,
    #[cpuid(word = Leaf07Ecx, bit = 1, alias = "AVX512VBMI1")]
    Avx512vbmi,
    #[cpuid(word = Leaf07Ecx, bit = 2)]
    Umip,
    #[cpuid(word = Leaf07Ecx, bit = 3)]
    Pku,
    #[cpuid(word = Leaf07Ecx, bit = 4)]
    Ospke,
    #[cpuid(word = Leaf07Ecx, bit = 6)]
    Avx512vbmi2,
    #[cpuid(word = Leaf07Ecx, bit = 8)]
    Gfni,
    #[cpuid(word = Leaf07Ecx, bit = 9)]
    Vaes,
    #[cpuid(word = Leaf07Ecx, bit = 10)]
    Vpclmulqdq,
    #[cpuid(word = Leaf07Ecx, bit = 11)]
    Avx512vnni,
    #[cpuid(word = Leaf07Ecx, bit = 12)]
    Avx512bitalg,
    #[cpuid(word = Leaf07Ecx, bit = 14)]
    Avx512vpopcntdq,
    #[cpuid(word = Leaf07Ecx, bit = 22)]
    Rdpid,
    #[cpuid(word = Leaf07Ecx, bit = 30)]
    Sgxlc,

    // CPUID.(07H,0):EDX
    #[cpuid(word = Leaf07Edx, bit = 2)]
    Avx5124vnniw,
    #[cpuid(word = Leaf07Edx, bit = 3)]
    Avx5124fmaps,
    #[cpuid(word = Leaf07Edx, bit = 18)]
    Pconfig,
    #[cpuid(word = Leaf07Edx, bit = 26, name = "IBRS_IBPB")]
    IbrsIbpb,
    #[cpuid(word = Leaf07Edx, bit = 27)]
    Stibp,
    #[cpuid(word = Leaf07Edx, bit = 29, name = "ARCH_CAPS")]
    ArchCaps,
    #[cpuid(word = Leaf07Edx, bit = 31)]
    Ssbd,

    // CPUID.(07H,1):EAX
    #[cpuid(word = Leaf07Sub1Eax, bit = 4, name = "AVX_VNNI", alias = "AVXVNNI")]
    AvxVnni,
    #[cpuid(word = Leaf07Sub1Eax, bit = 5, name = "AVX512_BF16", alias = "AVX512BF16")]
    Avx512Bf16,

    // CPUID.(0DH,1):EAX
    #[cpuid(word = Leaf0DSub1Eax, bit = 0)]
    Xsaveopt,
    #[cpuid(word = Leaf0DSub1Eax, bit = 1)]
    Xsavec,
    #[cpuid(word = Leaf0DSub1Eax, bit = 2, name = "XGETBV_ECX1")]
    XgetbvEcx1,
    #[cpuid(word = Leaf0DSub1Eax, bit = 3)]
    Xsaves,

    // CPUID.80000001H:ECX
    #[cpuid(word = Ext01Ecx, bit = 0, name = "LAHF_LM")]
    LahfLm,
    #[cpuid(word = Ext01Ecx, bit = 2)]
    Svm,
    #[cpuid(word = Ext01Ecx, bit = 5)]
    Abm,
    #[cpuid(word = Ext01Ecx, bit = 5)]
    Lzcnt,
    #[cpuid(word = Ext01Ecx, bit = 6, name = "SSE4a")]
    Sse4a,
    #[cpuid(word = Ext01Ecx, bit = 7, name = "MISALIGNSSE")]
    MisalignedSse,
    #[cpuid(word = Ext01Ecx, bit = 8, alias = "PREFETCHW")]
    Prfchw,
    #[cpuid(word = Ext01Ecx, bit = 11)]
    Xop,
    #[cpuid(word = Ext01Ecx, bit = 12)]
    Skinit,
    #[cpuid(word = Ext01Ecx, bit = 16)]
    Fma4,
    #[cpuid(word = Ext01Ecx, bit = 17)]
    Tce,
    #[cpuid(word = Ext01Ecx, bit = 21)]
    Tbm,
    #[cpuid(word = Ext01Ecx, bit = 26)]
    Dbx,
    #[cpuid(word = Ext01Ecx, bit = 29, alias = "MWAITX")]
    Monitorx,

    // CPUID.80000001H:EDX
    #[cpuid(word = Ext01Edx, bit = 11)]
    Syscall,
    #[cpuid(word = Ext01Edx, bit = 12)]
    Mtrr,
    #[cpuid(word = Ext01Edx, bit = 20, alias = "NX")]
    NoExecute,
    #[cpuid(word = Ext01Edx, bit = 22)]
    Mmxext,
    #[cpuid(word = Ext01Edx, bit = 25)]
    Ffxsr,
    #[cpuid(word = Ext01Edx, bit = 26)]
    Pdpe1gb,
    #[cpuid(word = Ext01Edx, bit = 27)]
    Rdtscp,
    #[cpuid(word = Ext01Edx, bit = 29, alias = "LM")]
    LongMode,
    #[cpuid(word = Ext01Edx, bit = 30, name = "3DNOWEXT")]
    Amd3dnowext,
    #[cpuid(word = Ext01Edx, bit = 31, name = "3DNOW")]
    Amd3dnow,

    // CPUID.80000008H:EBX
    #[cpuid(word = Ext08Ebx, bit = 0)]
    Clzero,
    #[cpuid(word = Ext08Ebx, bit = 1)]
    Instretcnt,
    #[cpuid(word = Ext08Ebx, bit = 2)]
    Rstrfperrptrs,
    #[cpuid(word = Ext08Ebx, bit = 9)]
    Wbnoinvd,
}

impl Feature {
    /// The word holding this feature's bit.
    #[must_use]
    pub const fn word(self) -> FeatureWord {
        self.location().word
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or(UnknownFeature)
    }
}

impl FeatureSnapshot {
    /// Whether `feature`'s bit is set. Pure and total.
    #[must_use]
    pub const fn has(&self, feature: Feature) -> bool {
        self.test(feature.location())
    }
}
