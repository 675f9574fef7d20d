//! The probe: one pass over the CPUID leaves producing an immutable [`CpuInfo`].

use crate::cache::{CacheError, LeafCache};
use crate::cpuid::{CpuidResult, CpuidSource, HostCpuid};
use crate::error::{ProbeError, StringError};
use crate::features::Feature;
use crate::leaves::{
    BRAND_STRING, EXTENDED_FEATURES, EXTENDED_FEATURES_EXTENSION, EXTENDED_STATE,
    EXTENDED_STATE_SUB_1, FEATURES, MAX_EXTENDED_FUNCTION, MAX_FUNCTION, SIGNATURE,
    STRUCTURED_EXTENDED_FEATURES, STRUCTURED_EXTENDED_FEATURES_SUB_1, VERSION_INFO,
};
use crate::ranges::{LeafRange, LeafRanges};
use crate::snapshot::FeatureSnapshot;
use crate::strings::{BrandString, VendorString};
use crate::vendor::Vendor;
use crate::version::VersionInfo;

/// Default upper bound on the number of leaves in one scratch cache.
pub const DEFAULT_CACHE_LIMIT: usize = 256;

/// Probe tuning.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ProbeConfig {
    /// Largest number of leaves a single range may report before the probe
    /// gives up with [`ProbeError::OutOfMemory`].
    pub cache_limit: usize,
}

impl ProbeConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cache_limit: DEFAULT_CACHE_LIMIT,
        }
    }

    #[must_use]
    pub const fn with_cache_limit(mut self, cache_limit: usize) -> Self {
        self.cache_limit = cache_limit;
        self
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the probe learned about the processor.
///
/// Built once and never mutated afterwards. [`CpuInfo::EMPTY`] is the state
/// before any probe: unknown vendor, empty strings and no features.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CpuInfo {
    ranges: LeafRanges,
    vendor: Vendor,
    vendor_string: VendorString,
    brand_string: BrandString,
    version: VersionInfo,
    features: FeatureSnapshot,
}

impl CpuInfo {
    pub const EMPTY: Self = Self {
        ranges: LeafRanges {
            max_standard: 0,
            max_extended: 0,
        },
        vendor: Vendor::Unknown,
        vendor_string: VendorString::EMPTY,
        brand_string: BrandString::EMPTY,
        version: VersionInfo::EMPTY,
        features: FeatureSnapshot::EMPTY,
    };

    #[must_use]
    pub const fn vendor(&self) -> Vendor {
        self.vendor
    }

    #[must_use]
    pub const fn vendor_string(&self) -> &VendorString {
        &self.vendor_string
    }

    #[must_use]
    pub const fn brand_string(&self) -> &BrandString {
        &self.brand_string
    }

    #[must_use]
    pub const fn version(&self) -> &VersionInfo {
        &self.version
    }

    #[must_use]
    pub const fn ranges(&self) -> &LeafRanges {
        &self.ranges
    }

    #[must_use]
    pub const fn features(&self) -> &FeatureSnapshot {
        &self.features
    }

    #[must_use]
    pub const fn has(&self, feature: Feature) -> bool {
        self.features.has(feature)
    }

    /// Every supported feature, in table order.
    pub fn supported(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL.iter().copied().filter(|&f| self.has(f))
    }

    /// Copy the NUL-terminated vendor string into `dest`.
    ///
    /// # Errors
    /// [`StringError::BufferTooSmall`] if `dest` cannot hold the string and its
    /// terminator; nothing is written.
    pub fn copy_vendor_string(&self, dest: &mut [u8]) -> Result<usize, StringError> {
        self.vendor_string.copy_to(dest)
    }

    /// Copy the NUL-terminated brand string into `dest`.
    ///
    /// # Errors
    /// [`StringError::BufferTooSmall`] if `dest` cannot hold the string and its
    /// terminator; nothing is written.
    pub fn copy_brand_string(&self, dest: &mut [u8]) -> Result<usize, StringError> {
        self.brand_string.copy_to(dest)
    }

    fn apply_standard<S: CpuidSource + ?Sized>(&mut self, source: &S, cache: &LeafCache) {
        let max = self.ranges.max_standard;

        if let Some(leaf0) = cache.get(SIGNATURE) {
            let mut signature = [0u8; 12];
            signature[..4].copy_from_slice(&leaf0.ebx.to_le_bytes());
            signature[4..8].copy_from_slice(&leaf0.edx.to_le_bytes());
            signature[8..].copy_from_slice(&leaf0.ecx.to_le_bytes());

            self.vendor_string = VendorString::from_bytes(&signature);
            self.vendor = Vendor::from_signature(&signature);
            if self.vendor == Vendor::Unknown {
                log::info!("unrecognized vendor signature {:?}", self.vendor_string);
            }
        }

        if let Some(leaf1) = cache.get(VERSION_INFO) {
            self.version = VersionInfo::new(leaf1.eax, leaf1.ebx);
            self.features.capture(FEATURES, 0, &leaf1);
        }

        if let Some(leaf7) = cache.get(STRUCTURED_EXTENDED_FEATURES) {
            self.features.capture(STRUCTURED_EXTENDED_FEATURES, 0, &leaf7);

            // EAX reports the highest valid sub-leaf.
            if leaf7.eax >= STRUCTURED_EXTENDED_FEATURES_SUB_1 {
                let sub1 = source.cpuid(
                    STRUCTURED_EXTENDED_FEATURES,
                    STRUCTURED_EXTENDED_FEATURES_SUB_1,
                );
                self.features.capture(
                    STRUCTURED_EXTENDED_FEATURES,
                    STRUCTURED_EXTENDED_FEATURES_SUB_1,
                    &sub1,
                );
            }
        }

        if max >= EXTENDED_STATE {
            let sub1 = source.cpuid(EXTENDED_STATE, EXTENDED_STATE_SUB_1);
            self.features.capture(EXTENDED_STATE, EXTENDED_STATE_SUB_1, &sub1);
        }
    }

    fn apply_extended(&mut self, cache: &LeafCache) {
        for leaf in [EXTENDED_FEATURES, EXTENDED_FEATURES_EXTENSION] {
            if let Some(regs) = cache.get(leaf) {
                self.features.capture(leaf, 0, &regs);
            }
        }

        if let [Some(a), Some(b), Some(c)] = BRAND_STRING.map(|leaf| cache.get(leaf)) {
            self.brand_string = BrandString::from_bytes(&brand_bytes([a, b, c]));
        }
    }
}

impl Default for CpuInfo {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// The 48 brand string bytes, each leaf contributing EAX, EBX, ECX, EDX.
fn brand_bytes(leaves: [CpuidResult; 3]) -> [u8; 48] {
    let mut out = [0u8; 48];
    for (chunk, regs) in out.chunks_exact_mut(16).zip(leaves) {
        chunk.copy_from_slice(&regs.to_bytes());
    }
    out
}

/// A probe that stopped early.
///
/// `partial` holds everything gathered before the failure; features from the
/// range that failed read as unsupported.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct ProbeFailure {
    pub error: ProbeError,
    pub partial: CpuInfo,
}

/// Probe the processor this code runs on.
///
/// # Errors
/// [`ProbeError::CpuidUnavailable`] when `CPUID` cannot be executed, or
/// [`ProbeError::OutOfMemory`] when a leaf cache cannot be allocated.
pub fn probe(config: &ProbeConfig) -> Result<CpuInfo, ProbeFailure> {
    let Some(host) = HostCpuid::detect() else {
        return Err(ProbeFailure {
            error: ProbeError::CpuidUnavailable,
            partial: CpuInfo::EMPTY,
        });
    };
    probe_with(&host, config)
}

/// Probe using an arbitrary `CPUID` source.
///
/// Both leaf caches are scratch buffers and are released before this returns,
/// on success and on failure alike.
///
/// ```
/// use cpuinfo::{Feature, ProbeConfig, TableCpuid, Vendor, probe_with};
///
/// let table = TableCpuid::new()
///     .with_vendor(*b"AuthenticAMD", 1)
///     .with_leaf(1, 0, 0, 1 << 28, 0)
///     .with_max_extended(0x8000_0000);
///
/// let info = probe_with(&table, &ProbeConfig::default()).unwrap();
/// assert_eq!(info.vendor(), Vendor::Amd);
/// assert!(info.has(Feature::Avx));
/// assert!(!info.has(Feature::Avx2));
/// ```
///
/// # Errors
/// [`ProbeError::OutOfMemory`] when a range reports more leaves than
/// [`ProbeConfig::cache_limit`] or the allocation itself fails.
pub fn probe_with<S: CpuidSource + ?Sized>(
    source: &S,
    config: &ProbeConfig,
) -> Result<CpuInfo, ProbeFailure> {
    let mut info = CpuInfo::EMPTY;

    let max_standard = source.cpuid(MAX_FUNCTION, 0).eax;
    log::debug!("maximum standard leaf {max_standard:#x}");

    let standard = load_cache(source, LeafRange::Standard, max_standard, *config, &info)?;
    info.ranges.max_standard = max_standard;
    info.apply_standard(source, &standard);
    log::debug!("{} {}", info.vendor, info.version);

    let max_extended = source.cpuid(MAX_EXTENDED_FUNCTION, 0).eax;
    log::debug!("maximum extended leaf {max_extended:#x}");

    if LeafRange::Extended.leaf_count(max_extended) == 0 {
        log::debug!("no extended leaves");
        return Ok(info);
    }

    let extended = load_cache(source, LeafRange::Extended, max_extended, *config, &info)?;
    info.ranges.max_extended = max_extended;
    info.apply_extended(&extended);

    Ok(info)
}

fn load_cache<S: CpuidSource + ?Sized>(
    source: &S,
    range: LeafRange,
    max: u32,
    config: ProbeConfig,
    partial: &CpuInfo,
) -> Result<LeafCache, ProbeFailure> {
    LeafCache::load(source, range, max, config.cache_limit).map_err(|err| {
        let leaves = match err {
            CacheError::LimitExceeded { leaves, limit } => {
                log::warn!("{range} range reports {leaves} leaves, limit is {limit}");
                leaves
            }
            CacheError::Alloc(e) => {
                let leaves = range.leaf_count(max);
                log::warn!("allocating {leaves} {range} leaves failed: {e}");
                leaves
            }
        };
        ProbeFailure {
            error: ProbeError::OutOfMemory { range, leaves },
            partial: *partial,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpuid::TableCpuid;

    #[test]
    fn brand_bytes_keep_register_order() {
        let leaf = |s: &[u8; 16]| {
            let w = |i: usize| u32::from_le_bytes([s[i], s[i + 1], s[i + 2], s[i + 3]]);
            CpuidResult::new(w(0), w(4), w(8), w(12))
        };
        let bytes = brand_bytes([
            leaf(b"Intel(R) Core(TM"),
            leaf(b") i7-8700 CPU @ "),
            leaf(b"3.20GHz\0\0\0\0\0\0\0\0\0"),
        ]);
        assert_eq!(&bytes[..39], b"Intel(R) Core(TM) i7-8700 CPU @ 3.20GHz");
    }

    #[test]
    fn leaf_7_sub_1_needs_sub_leaf_count() {
        let table = TableCpuid::new()
            .with_vendor(*b"GenuineIntel", 7)
            .with_leaf(7, 0, 0, 0, 0)
            .with_subleaf(7, 1, CpuidResult::new(1 << 4, 0, 0, 0));
        let info = probe_with(&table, &ProbeConfig::new()).expect("probe");
        assert!(!info.has(Feature::AvxVnni));
        assert!(!table.queries().contains(&(7, 1)));

        let table = TableCpuid::new()
            .with_vendor(*b"GenuineIntel", 7)
            .with_leaf(7, 1, 0, 0, 0)
            .with_subleaf(7, 1, CpuidResult::new(1 << 4, 0, 0, 0));
        let info = probe_with(&table, &ProbeConfig::new()).expect("probe");
        assert!(info.has(Feature::AvxVnni));
    }

    #[test]
    fn standard_over_limit_keeps_everything_empty() {
        let table = TableCpuid::new().with_vendor(*b"GenuineIntel", 0x400);
        let failure = probe_with(&table, &ProbeConfig::new()).expect_err("over limit");
        assert_eq!(
            failure.error,
            ProbeError::OutOfMemory {
                range: LeafRange::Standard,
                leaves: 0x401
            }
        );
        assert_eq!(failure.partial, CpuInfo::EMPTY);
        assert_eq!(table.queries(), [(0, 0)]);
    }
}
