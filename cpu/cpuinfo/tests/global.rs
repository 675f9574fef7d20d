use cpuinfo::{Feature, ProbeState};

#[test]
fn initialization_is_idempotent() {
    let first = cpuinfo::initialize();
    assert_eq!(cpuinfo::state(), ProbeState::Ready);

    let second = cpuinfo::initialize_with(cpuinfo::ProbeConfig::default().with_cache_limit(1));
    assert_eq!(first, second);

    let info = cpuinfo::cpu_info();
    if let Ok(ready) = first {
        assert!(core::ptr::eq(ready, info));
    }

    for &feature in Feature::ALL {
        assert_eq!(cpuinfo::has_feature(feature), info.has(feature));
    }
}

#[cfg(target_arch = "x86_64")]
#[test]
fn host_initialization_succeeds() {
    let info = cpuinfo::initialize().expect("x86-64 implements CPUID");
    assert!(!info.vendor_string().is_empty());
    // Every x86-64 processor implements SSE2 and long mode.
    assert!(cpuinfo::has_feature(Feature::Sse2));
    assert!(cpuinfo::has_feature(Feature::LongMode));
}
