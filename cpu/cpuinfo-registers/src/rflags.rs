use bitfield_struct::bitfield;

/// Architectural RFLAGS model.
///
/// Bits that are fixed in 64-bit mode are padding with their fixed value as
/// default, so [`Rflags::new`] always yields a value the processor accepts.
#[bitfield(u64, order = Lsb)]
#[derive(PartialEq, Eq)]
pub struct Rflags {
    /// Carry Flag
    pub cf_carry: bool, // 0

    /// Always 1.
    #[bits(default = true)]
    _always1: bool, // 1

    /// Parity Flag
    pub pf_parity: bool, // 2

    #[bits(default = false)]
    _rsvd3: bool, // 3

    /// Adjust Flag
    pub af_adjust: bool, // 4

    #[bits(default = false)]
    _rsvd5: bool, // 5

    /// Zero Flag
    pub zf_zero: bool, // 6

    /// Sign Flag
    pub sf_sign: bool, // 7

    /// Trap Flag
    pub tf_trap: bool, // 8

    /// Interrupt Enable Flag
    pub if_interrupt_enable: bool, // 9

    /// Direction Flag
    pub df_direction: bool, // 10

    /// Overflow Flag
    pub of_overflow: bool, // 11

    /// I/O Privilege Level
    #[bits(2)]
    pub iopl: u8, // 12-13

    /// Nested Task
    pub nt_nested: bool, // 14

    #[bits(default = false)]
    _rsvd15: bool, // 15

    /// Resume Flag
    pub rf_resume: bool, // 16

    /// Virtual-8086 Mode
    pub vm_virtual_8086: bool, // 17

    /// Alignment Check
    pub ac_alignment_check: bool, // 18

    /// Virtual Interrupt Flag
    pub vif_virtual_interrupt: bool, // 19

    /// Virtual Interrupt Pending
    pub vip_virtual_interrupt_pending: bool, // 20

    /// ID Flag. Software can toggle it only if the processor implements CPUID.
    pub id_cpuid: bool, // 21

    #[bits(42, default = 0)]
    _reserved_rest: u64,
}

impl Rflags {
    pub const CF: u64 = 1 << 0;
    pub const PF: u64 = 1 << 2;
    pub const AF: u64 = 1 << 4;
    pub const ZF: u64 = 1 << 6;
    pub const SF: u64 = 1 << 7;
    pub const TF: u64 = 1 << 8;
    pub const IF: u64 = 1 << 9;
    pub const DF: u64 = 1 << 10;
    pub const OF: u64 = 1 << 11;
    pub const IOPL: u64 = 0b11 << 12;
    pub const NT: u64 = 1 << 14;
    pub const RF: u64 = 1 << 16;
    pub const VM: u64 = 1 << 17;
    pub const AC: u64 = 1 << 18;
    pub const VIF: u64 = 1 << 19;
    pub const VIP: u64 = 1 << 20;
    pub const ID: u64 = 1 << 21;
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl crate::LoadRegister for Rflags {
    #[inline]
    fn load() -> Self {
        let rflags: u64;
        unsafe {
            core::arch::asm!("pushfq", "pop {}", out(reg) rflags, options(nomem, preserves_flags));
        }
        Self::from_bits(rflags)
    }
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl crate::StoreRegisterUnsafe for Rflags {
    /// `POPFQ` silently ignores the bits the current privilege level may not
    /// change (IOPL and IF from user mode).
    #[inline]
    unsafe fn store_unsafe(self) {
        let rflags = self.into_bits();
        unsafe {
            core::arch::asm!("push {}", "popfq", in(reg) rflags, options(nomem));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_fixed_bit() {
        assert_eq!(Rflags::new().into_bits(), 0b10);
    }

    #[test]
    fn id_and_iopl_positions() {
        assert_eq!(Rflags::new().with_id_cpuid(true).into_bits(), Rflags::ID | 0b10);
        assert_eq!(Rflags::new().with_iopl(3).into_bits(), Rflags::IOPL | 0b10);
    }

    #[cfg(all(feature = "asm", target_arch = "x86_64"))]
    #[test]
    fn load_reports_fixed_bit() {
        use crate::LoadRegister;
        let rflags = Rflags::load();
        assert_eq!(rflags.into_bits() & 0b10, 0b10);
        assert!(!rflags.vm_virtual_8086());
    }
}
