//! # Typed x86 / x86-64 Registers and Descriptors
//!
//! Bit-level views over plain integers for the architectural registers and
//! descriptor formats a CPU identification tool needs to talk about:
//!
//! | Type | Width | Contents |
//! |------|-------|----------|
//! | [`Cr0`], [`Cr3`], [`Cr3Pcid`], [`Cr4`] | 64 | control registers |
//! | [`Efer`] | 64 | extended feature enable MSR |
//! | [`Rflags`] | 64 | flags register, loadable from user mode |
//! | [`SegmentDescriptor`] | 64 | code/data segment descriptor |
//! | [`SystemDescriptor`] | 128 | 64-bit TSS/LDT descriptor |
//! | [`SegmentSelector`] | 16 | selector index/TI/RPL |
//!
//! Every type is a `bitfield-struct` wrapper, so fields are read and written
//! through generated accessor/constructor pairs and never through overlaid
//! unions.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod cr0;
mod cr3;
mod cr4;
mod efer;
mod privilege;
mod rflags;
pub mod segment;
mod selector;
mod system;

pub use cr0::Cr0;
pub use cr3::{Cr3, Cr3Pcid};
pub use cr4::Cr4;
pub use efer::Efer;
pub use privilege::Ring;
pub use rflags::Rflags;
pub use segment::{SegmentDescriptor, SegmentType};
pub use selector::{SegmentSelector, Table};
pub use system::{SystemDescriptor, SystemType};

/// Registers that can be read at any privilege level.
pub trait LoadRegister {
    fn load() -> Self;
}

pub trait StoreRegisterUnsafe {
    /// # Safety
    /// The caller must uphold the implementation-specific safety requirements.
    /// For example, writing a flag such as `TF` changes how the following
    /// instructions execute.
    unsafe fn store_unsafe(self);
}
