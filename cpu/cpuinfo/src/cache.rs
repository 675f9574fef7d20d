use crate::cpuid::{CpuidResult, CpuidSource};
use crate::ranges::LeafRange;
use alloc::collections::TryReserveError;
use alloc::vec::Vec;

/// Sub-leaf 0 output of every leaf in one range, captured once.
///
/// Index `i` holds leaf `range.base() + i`. The cache is scratch state: it is
/// built at the start of a probe and dropped before the probe returns.
pub struct LeafCache {
    range: LeafRange,
    leaves: Vec<CpuidResult>,
}

/// Why a cache could not be built.
#[derive(Debug)]
pub enum CacheError {
    /// The range holds more leaves than the configured limit.
    LimitExceeded { leaves: u64, limit: usize },
    /// The allocator refused the request.
    Alloc(TryReserveError),
}

impl LeafCache {
    /// Query every leaf from the range base up to `max` at sub-leaf 0.
    ///
    /// Storage is reserved before the first query, so an allocation failure
    /// never leaves a partially filled cache behind.
    pub fn load<S: CpuidSource + ?Sized>(
        source: &S,
        range: LeafRange,
        max: u32,
        limit: usize,
    ) -> Result<Self, CacheError> {
        let count = range.leaf_count(max);
        let len = usize::try_from(count)
            .ok()
            .filter(|&len| len <= limit)
            .ok_or(CacheError::LimitExceeded {
                leaves: count,
                limit,
            })?;

        let mut leaves = Vec::new();
        leaves.try_reserve_exact(len).map_err(CacheError::Alloc)?;

        let base = range.base();
        leaves.extend((base..=max).map(|leaf| source.cpuid(leaf, 0)));
        debug_assert_eq!(leaves.len(), len);

        log::trace!("cached {len} {range} leaves up to {max:#x}");
        Ok(Self { range, leaves })
    }

    /// The cached result for `leaf`, or `None` when it is outside the cache.
    #[must_use]
    pub fn get(&self, leaf: u32) -> Option<CpuidResult> {
        let index = leaf.checked_sub(self.range.base())?;
        self.leaves.get(usize::try_from(index).ok()?).copied()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.leaves.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

impl Drop for LeafCache {
    fn drop(&mut self) {
        if !self.is_empty() {
            log::trace!("releasing {} cache ({} leaves)", self.range, self.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpuid::TableCpuid;

    #[test]
    fn standard_cache_indexes_by_leaf() {
        let table = TableCpuid::new()
            .with_leaf(0, 2, 0, 0, 0)
            .with_leaf(2, 0xAA, 0xBB, 0xCC, 0xDD);
        let cache = LeafCache::load(&table, LeafRange::Standard, 2, 16).expect("fits");

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(2), Some(CpuidResult::new(0xAA, 0xBB, 0xCC, 0xDD)));
        assert_eq!(cache.get(1), Some(CpuidResult::ZERO));
        assert_eq!(cache.get(3), None);
        assert_eq!(table.queries(), [(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn extended_cache_offsets_from_base() {
        let table = TableCpuid::new().with_leaf(0x8000_0001, 0, 0, 1, 2);
        let cache =
            LeafCache::load(&table, LeafRange::Extended, 0x8000_0001, 16).expect("fits");

        assert_eq!(cache.get(0x8000_0001), Some(CpuidResult::new(0, 0, 1, 2)));
        assert_eq!(cache.get(1), None);
        assert_eq!(cache.get(0x8000_0002), None);
    }

    #[test]
    fn limit_is_checked_before_any_query() {
        let table = TableCpuid::new();
        let err = LeafCache::load(&table, LeafRange::Extended, 0x8FFF_FFFF, 256);

        assert!(matches!(
            err,
            Err(CacheError::LimitExceeded {
                leaves: 0x1000_0000,
                limit: 256
            })
        ));
        assert!(table.queries().is_empty());
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn host_cache_matches_direct_cpuid() {
        use crate::cpuid::{HostCpuid, cpuid};

        // Leaves whose output depends on the core or core type executing them.
        const PER_CORE: [u32; 7] = [
            0x01,
            0x04,
            0x0B,
            0x1A,
            0x1F,
            0x8000_001E,
            0x8000_0026,
        ];

        let host = HostCpuid::detect().expect("x86-64 implements CPUID");
        for range in [LeafRange::Standard, LeafRange::Extended] {
            let max = unsafe { cpuid(range.base(), 0) }.eax;
            let Ok(cache) = LeafCache::load(&host, range, max, 256) else {
                continue;
            };
            for leaf in range.base()..=max {
                let direct = unsafe { cpuid(leaf, 0) };
                let cached = cache.get(leaf).expect("leaf within range");
                if leaf == 0x01 {
                    // Feature flags are uniform, the APIC ID in EBX is not.
                    assert_eq!(cached.ecx, direct.ecx, "leaf {leaf:#x}");
                    assert_eq!(cached.edx, direct.edx, "leaf {leaf:#x}");
                } else if !PER_CORE.contains(&leaf) {
                    assert_eq!(cached, direct, "leaf {leaf:#x}");
                }
            }
        }
    }
}
