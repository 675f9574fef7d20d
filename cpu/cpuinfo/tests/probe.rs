use cpuinfo::{
    CpuInfo, CpuidResult, Feature, FeatureWord, LeafRange, ProbeConfig, ProbeError, StringError,
    TableCpuid, Vendor, probe_with,
};

const BRAND: &[u8] = b"Intel(R) Core(TM) i7-8700 CPU @ 3.20GHz";

/// A Coffee Lake desktop part, trimmed to the leaves the probe reads.
fn coffee_lake() -> TableCpuid {
    TableCpuid::new()
        .with_vendor(*b"GenuineIntel", 0x16)
        .with_leaf(0x01, 0x0009_06EA, 0x0010_0800, 0x7FFA_FBFF, 0xBFEB_FBFF)
        .with_leaf(0x07, 0, 0x029C_67AF, 0x4000_0000, 0xBC00_0400)
        .with_subleaf(0x0D, 1, CpuidResult::new(0x0F, 0x0340, 0, 0))
        .with_max_extended(0x8000_0008)
        .with_leaf(0x8000_0001, 0, 0, 0x0000_0121, 0x2C10_0800)
        .with_brand(BRAND)
        .with_leaf(0x8000_0008, 0x3027, 0, 0, 0)
}

#[test]
fn full_probe_decodes_everything() {
    let table = coffee_lake();
    let info = probe_with(&table, &ProbeConfig::default()).expect("probe succeeds");

    assert_eq!(info.vendor(), Vendor::Intel);
    assert_eq!(info.vendor_string().as_bytes(), b"GenuineIntel");
    assert_eq!(info.brand_string().as_bytes(), BRAND);
    assert_eq!(info.version().family(), 6);
    assert_eq!(info.version().model(), 0x9E);

    for feature in [
        Feature::Sse3,
        Feature::Sse41,
        Feature::Sse42,
        Feature::Avx,
        Feature::Avx2,
        Feature::Bmi1,
        Feature::Bmi2,
        Feature::Fma,
        Feature::Rdrand,
        Feature::Rdseed,
        Feature::Adx,
        Feature::Erms,
        Feature::Invpcid,
        Feature::Sgxlc,
        Feature::Xsaveopt,
        Feature::Xsaves,
        Feature::LahfLm,
        Feature::Abm,
        Feature::Lzcnt,
        Feature::Prfchw,
        Feature::Syscall,
        Feature::NoExecute,
        Feature::Rdtscp,
        Feature::LongMode,
        Feature::Pdpe1gb,
        Feature::Ssbd,
        Feature::Stibp,
    ] {
        assert!(info.has(feature), "{feature} should be supported");
    }

    for feature in [
        Feature::Avx512f,
        Feature::Sha,
        Feature::Sse4a,
        Feature::Xop,
        Feature::Tbm,
        Feature::Amd3dnow,
        Feature::Mmxext,
        Feature::Clzero,
        Feature::AvxVnni,
    ] {
        assert!(!info.has(feature), "{feature} should not be supported");
    }

    assert_eq!(info.features().word(FeatureWord::Leaf0DSub1Ebx), 0x0340);
}

#[test]
fn max_standard_leaf_zero_still_succeeds() {
    let table = TableCpuid::new()
        .with_vendor(*b"GenuineIntel", 0)
        .with_leaf(0x07, 0, u32::MAX, u32::MAX, u32::MAX)
        .with_max_extended(0);

    let info = probe_with(&table, &ProbeConfig::default()).expect("probe succeeds");

    assert_eq!(info.vendor(), Vendor::Intel);
    assert!(!info.has(Feature::Avx2));
    assert!(info.supported().next().is_none());
    // Leaf 0 is read once for the maximum and once more while filling the cache.
    assert_eq!(table.queries(), [(0, 0), (0, 0), (0x8000_0000, 0)]);
}

#[test]
fn leaves_are_never_read_past_the_maximum() {
    let table = TableCpuid::new()
        .with_vendor(*b"AuthenticAMD", 5)
        .with_leaf(0x07, 0, u32::MAX, u32::MAX, u32::MAX)
        .with_subleaf(0x0D, 1, CpuidResult::new(u32::MAX, 0, 0, 0))
        .with_max_extended(0x8000_0001)
        .with_leaf(0x8000_0008, 0, u32::MAX, 0, 0);

    let info = probe_with(&table, &ProbeConfig::default()).expect("probe succeeds");

    for (leaf, _) in table.queries() {
        assert!(
            leaf <= 5 || (0x8000_0000..=0x8000_0001).contains(&leaf),
            "queried leaf {leaf:#x}"
        );
    }
    assert!(!info.has(Feature::Avx2));
    assert!(!info.has(Feature::Xsaveopt));
    assert!(!info.has(Feature::Clzero));
    assert!(info.brand_string().is_empty());
}

#[test]
fn bogus_extended_maximum_reports_out_of_memory() {
    let table = coffee_lake().with_max_extended(0x8FFF_FFFF);

    let failure = probe_with(&table, &ProbeConfig::default()).expect_err("extended cache fails");

    assert_eq!(
        failure.error,
        ProbeError::OutOfMemory {
            range: LeafRange::Extended,
            leaves: 0x1000_0000,
        }
    );
    assert_eq!(failure.error.status().code(), -4);

    let partial = failure.partial;
    assert_eq!(partial.vendor(), Vendor::Intel);
    assert!(partial.has(Feature::Avx2));
    assert!(partial.has(Feature::Sse42));
    assert!(!partial.has(Feature::LahfLm));
    assert!(!partial.has(Feature::Rdtscp));
    assert!(partial.brand_string().is_empty());
    assert!(!partial.ranges().supports(0x8000_0001));
}

#[test]
fn cache_limit_is_configurable() {
    let table = coffee_lake().with_vendor(*b"GenuineIntel", 7);
    let config = ProbeConfig::default().with_cache_limit(8);

    let failure = probe_with(&table, &config).expect_err("9 extended leaves exceed 8");
    assert_eq!(
        failure.error,
        ProbeError::OutOfMemory {
            range: LeafRange::Extended,
            leaves: 9,
        }
    );
    assert!(failure.partial.has(Feature::Avx));

    let config = ProbeConfig::default().with_cache_limit(0x16);
    let failure = probe_with(&coffee_lake(), &config).expect_err("0x17 standard leaves exceed 0x16");
    assert_eq!(failure.partial, CpuInfo::EMPTY);
}

#[test]
fn extended_maximum_below_base_means_no_extended_leaves() {
    let table = TableCpuid::new()
        .with_vendor(*b"CyrixInstead", 1)
        .with_leaf(0x01, 0x0000_0520, 0, 0, 0x0080_8131)
        .with_max_extended(0x0000_0001);

    let info = probe_with(&table, &ProbeConfig::default()).expect("probe succeeds");

    assert_eq!(info.vendor(), Vendor::Cyrix);
    assert!(info.has(Feature::Mmx));
    assert!(!info.has(Feature::Syscall));
    assert_eq!(info.ranges().max_extended, 0);
    assert!(!table.queries().contains(&(0x8000_0001, 0)));
}

#[test]
fn vendor_matching_is_exact() {
    let cases: [(&[u8; 12], Vendor); 6] = [
        (b"GenuineIntel", Vendor::Intel),
        (b"AuthenticAMD", Vendor::Amd),
        (b"GenuineTMx86", Vendor::Transmeta),
        (b"GenuineIntex", Vendor::Unknown),
        (b"AUTHENTICAMD", Vendor::Unknown),
        (b"Microsoft Hv", Vendor::Unknown),
    ];

    for (signature, vendor) in cases {
        let table = TableCpuid::new().with_vendor(*signature, 0);
        let info = probe_with(&table, &ProbeConfig::default()).expect("probe succeeds");
        assert_eq!(info.vendor(), vendor);
        assert_eq!(info.vendor_string().as_bytes(), signature);
    }
}

#[test]
fn strings_round_trip_through_caller_buffers() {
    let info = probe_with(&coffee_lake(), &ProbeConfig::default()).expect("probe succeeds");

    let mut vendor = [0u8; 16];
    assert_eq!(info.copy_vendor_string(&mut vendor), Ok(12));
    assert_eq!(&vendor[..13], b"GenuineIntel\0");

    let mut brand = [0u8; 64];
    let len = info.copy_brand_string(&mut brand).expect("fits");
    assert_eq!(&brand[..len], BRAND);
    assert_eq!(brand[len], 0);
}

#[test]
fn too_small_buffer_is_left_untouched() {
    let info = probe_with(&coffee_lake(), &ProbeConfig::default()).expect("probe succeeds");

    let mut buf = [0xEEu8; 12];
    let err = info.copy_vendor_string(&mut buf).expect_err("no room for the terminator");
    assert_eq!(
        err,
        StringError::BufferTooSmall {
            required: 13,
            available: 12,
        }
    );
    assert_eq!(err.status().code(), -48);
    assert!(buf.iter().all(|&b| b == 0xEE));

    let mut buf = [0xEEu8; 16];
    assert!(info.copy_brand_string(&mut buf).is_err());
    assert!(buf.iter().all(|&b| b == 0xEE));
}

#[test]
fn repeated_probes_agree() {
    let table = coffee_lake();
    let first = probe_with(&table, &ProbeConfig::default()).expect("probe succeeds");
    let second = probe_with(&table, &ProbeConfig::default()).expect("probe succeeds");
    assert_eq!(first, second);
}

#[cfg(target_arch = "x86_64")]
mod host {
    use cpuinfo::{FeatureWord, HostCpuid, ProbeConfig, cpuid, probe, probe_with};

    #[test]
    fn cached_words_match_direct_cpuid() {
        let info = probe(&ProbeConfig::default()).expect("host probe succeeds");

        let leaf1 = unsafe { cpuid(1, 0) };
        assert_eq!(info.features().word(FeatureWord::Leaf01Ecx), leaf1.ecx);
        assert_eq!(info.features().word(FeatureWord::Leaf01Edx), leaf1.edx);
        assert_eq!(info.version().eax.into_bits(), leaf1.eax);

        let max = unsafe { cpuid(0, 0) }.eax;
        if max >= 7 {
            let leaf7 = unsafe { cpuid(7, 0) };
            assert_eq!(info.features().word(FeatureWord::Leaf07Ebx), leaf7.ebx);
        }
    }

    #[test]
    fn host_probe_is_deterministic() {
        let host = HostCpuid::detect().expect("x86-64 implements CPUID");
        let a = probe_with(&host, &ProbeConfig::default()).expect("host probe succeeds");
        let b = probe_with(&host, &ProbeConfig::default()).expect("host probe succeeds");

        assert_eq!(a.vendor(), b.vendor());
        assert_eq!(a.vendor_string(), b.vendor_string());
        assert_eq!(a.brand_string(), b.brand_string());
        assert_eq!(a.features(), b.features());
    }
}
