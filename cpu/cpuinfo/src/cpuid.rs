//! Access to the `CPUID` instruction.
//!
//! The probe never executes `CPUID` directly; it goes through a [`CpuidSource`].
//! [`HostCpuid`] runs the real instruction, [`TableCpuid`] answers from a
//! recorded table.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::cell::RefCell;

/// The four registers written by one `CPUID` execution.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(C)]
pub struct CpuidResult {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
}

impl CpuidResult {
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    #[must_use]
    pub const fn new(eax: u32, ebx: u32, ecx: u32, edx: u32) -> Self {
        Self { eax, ebx, ecx, edx }
    }

    /// The registers as little-endian bytes in `EAX, EBX, ECX, EDX` order.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        let regs = [self.eax, self.ebx, self.ecx, self.edx];
        let mut i = 0;
        while i < 4 {
            let b = regs[i].to_le_bytes();
            out[i * 4] = b[0];
            out[i * 4 + 1] = b[1];
            out[i * 4 + 2] = b[2];
            out[i * 4 + 3] = b[3];
            i += 1;
        }
        out
    }
}

/// Anything that can answer `CPUID(leaf, subleaf)`.
pub trait CpuidSource {
    fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidResult;
}

impl<T: CpuidSource + ?Sized> CpuidSource for &T {
    #[inline]
    fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidResult {
        (**self).cpuid(leaf, subleaf)
    }
}

/// Execute `CPUID` with the given leaf and subleaf.
///
/// # Safety
/// The processor must implement `CPUID`. Every x86-64 processor does; see
/// [`HostCpuid::detect`] for the runtime check.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
#[allow(clippy::inline_always)]
#[must_use]
pub unsafe fn cpuid(leaf: u32, subleaf: u32) -> CpuidResult {
    let (eax, ebx, ecx, edx): (u32, u32, u32, u32);
    unsafe {
        // RBX may be reserved by LLVM, so it is swapped out around the instruction.
        core::arch::asm!(
            "mov {rbx_save:r}, rbx",
            "cpuid",
            "xchg {rbx_save:r}, rbx",
            rbx_save = out(reg) ebx,
            inout("eax") leaf => eax,
            inout("ecx") subleaf => ecx,
            out("edx") edx,
            options(nostack, preserves_flags),
        );
    }
    CpuidResult { eax, ebx, ecx, edx }
}

/// The `CPUID` instruction of the processor running this code.
#[derive(Debug, Copy, Clone)]
pub struct HostCpuid {
    _checked: (),
}

impl HostCpuid {
    /// Confirm `CPUID` is implemented by toggling `RFLAGS.ID`.
    ///
    /// Returns `None` when the flag cannot be toggled or the target is not
    /// x86-64.
    #[must_use]
    pub fn detect() -> Option<Self> {
        if cpuid_available() {
            Some(Self { _checked: () })
        } else {
            log::debug!("RFLAGS.ID cannot be toggled; CPUID unavailable");
            None
        }
    }
}

#[cfg(target_arch = "x86_64")]
fn cpuid_available() -> bool {
    use cpuinfo_registers::{LoadRegister, Rflags, StoreRegisterUnsafe};

    let original = Rflags::load();
    // Only the ID bit differs from the live value, which user mode may change.
    unsafe { original.with_id_cpuid(!original.id_cpuid()).store_unsafe() };
    let toggled = Rflags::load();
    unsafe { original.store_unsafe() };

    toggled.id_cpuid() != original.id_cpuid()
}

#[cfg(not(target_arch = "x86_64"))]
const fn cpuid_available() -> bool {
    false
}

impl CpuidSource for HostCpuid {
    #[cfg(target_arch = "x86_64")]
    #[inline]
    fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidResult {
        // A `HostCpuid` only exists after `detect` succeeded.
        unsafe { cpuid(leaf, subleaf) }
    }

    #[cfg(not(target_arch = "x86_64"))]
    fn cpuid(&self, _leaf: u32, _subleaf: u32) -> CpuidResult {
        CpuidResult::ZERO
    }
}

/// A `CPUID` source answering from a recorded table.
///
/// Leaves or subleaves that were never recorded read as all zeros, the same
/// way an unsupported subleaf behaves on most hardware. Every query is logged
/// and can be inspected with [`TableCpuid::queries`].
///
/// ```
/// use cpuinfo::{CpuidSource, TableCpuid};
///
/// let table = TableCpuid::new()
///     .with_vendor(*b"GenuineIntel", 1)
///     .with_leaf(1, 0x000906EA, 0, 0x7FFA_FBFF, 0xBFEB_FBFF);
///
/// assert_eq!(table.cpuid(0, 0).eax, 1);
/// assert_eq!(table.cpuid(2, 0).edx, 0);
/// assert_eq!(table.queries(), [(0, 0), (2, 0)]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct TableCpuid {
    entries: BTreeMap<(u32, u32), CpuidResult>,
    queries: RefCell<Vec<(u32, u32)>>,
}

impl TableCpuid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the sub-leaf 0 output of `leaf`.
    #[must_use]
    pub fn with_leaf(self, leaf: u32, eax: u32, ebx: u32, ecx: u32, edx: u32) -> Self {
        self.with_subleaf(leaf, 0, CpuidResult::new(eax, ebx, ecx, edx))
    }

    #[must_use]
    pub fn with_subleaf(mut self, leaf: u32, subleaf: u32, regs: CpuidResult) -> Self {
        self.entries.insert((leaf, subleaf), regs);
        self
    }

    /// Record leaf 0: the maximum standard leaf and a 12-byte vendor signature.
    #[must_use]
    pub fn with_vendor(self, signature: [u8; 12], max_standard: u32) -> Self {
        let word = |i: usize| {
            u32::from_le_bytes([
                signature[i],
                signature[i + 1],
                signature[i + 2],
                signature[i + 3],
            ])
        };
        // Signature order is EBX, EDX, ECX.
        self.with_leaf(0, max_standard, word(0), word(8), word(4))
    }

    /// Record leaf `0x8000_0000` with the given maximum extended leaf.
    #[must_use]
    pub fn with_max_extended(self, max_extended: u32) -> Self {
        self.with_leaf(crate::leaves::MAX_EXTENDED_FUNCTION, max_extended, 0, 0, 0)
    }

    /// Record a 48-byte brand string across leaves `0x8000_0002..=0x8000_0004`.
    #[must_use]
    pub fn with_brand(mut self, brand: &[u8]) -> Self {
        let mut bytes = [0u8; 48];
        let n = brand.len().min(48);
        bytes[..n].copy_from_slice(&brand[..n]);

        let word = |i: usize| {
            u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]])
        };
        for (k, leaf) in crate::leaves::BRAND_STRING.into_iter().enumerate() {
            let base = k * 16;
            self = self.with_leaf(
                leaf,
                word(base),
                word(base + 4),
                word(base + 8),
                word(base + 12),
            );
        }
        self
    }

    /// Every `(leaf, subleaf)` queried so far, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<(u32, u32)> {
        self.queries.borrow().clone()
    }
}

impl CpuidSource for TableCpuid {
    fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidResult {
        self.queries.borrow_mut().push((leaf, subleaf));
        self.entries
            .get(&(leaf, subleaf))
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_bytes_are_little_endian() {
        let regs = CpuidResult::new(0x6C65_746E, 0x2928_4320, 0, 0x4142_4344);
        let bytes = regs.to_bytes();
        assert_eq!(&bytes[..4], b"ntel");
        assert_eq!(&bytes[12..], b"DCBA");
    }

    #[test]
    fn vendor_registers_follow_ebx_edx_ecx() {
        let table = TableCpuid::new().with_vendor(*b"AuthenticAMD", 0x10);
        let leaf0 = table.cpuid(0, 0);
        assert_eq!(leaf0.eax, 0x10);
        assert_eq!(leaf0.ebx.to_le_bytes(), *b"Auth");
        assert_eq!(leaf0.edx.to_le_bytes(), *b"enti");
        assert_eq!(leaf0.ecx.to_le_bytes(), *b"cAMD");
    }

    #[test]
    fn unknown_subleaf_reads_zero() {
        let table = TableCpuid::new().with_leaf(7, 1, 2, 3, 4);
        assert_eq!(table.cpuid(7, 1), CpuidResult::ZERO);
        assert_eq!(table.cpuid(7, 0), CpuidResult::new(1, 2, 3, 4));
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn host_cpuid_is_available_on_x86_64() {
        let host = HostCpuid::detect().expect("x86-64 always implements CPUID");
        assert!(host.cpuid(0, 0).eax >= 1);
    }
}
