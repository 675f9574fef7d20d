//! # CPU Identification
//!
//! Queries `CPUID` once, keeps the results in an immutable [`CpuInfo`] and
//! answers feature questions with a single bit test.
//!
//! ```no_run
//! use cpuinfo::Feature;
//!
//! let info = cpuinfo::initialize().expect("CPUID available");
//! println!("{} ({})", info.vendor_string(), info.brand_string());
//! if cpuinfo::has_feature(Feature::Avx2) {
//!     println!("AVX2 is supported");
//! }
//! ```
//!
//! The probe runs in two passes. The standard range `0..=max` and the
//! extended range `0x8000_0000..=max` are each captured into a scratch
//! leaf cache at sub-leaf 0, the feature words are copied out of them,
//! and both caches are dropped before the probe returns. Sub-leaves other
//! than 0 (`7.1` and `0xD.1`) are fetched with their own `CPUID` call.
//!
//! [`probe_with`] accepts any [`CpuidSource`], which makes the probe testable
//! against recorded tables ([`TableCpuid`]).

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

extern crate alloc;

mod cache;
mod cpuid;
mod error;
mod features;
#[cfg(feature = "ffi")]
pub mod ffi;
mod global;
pub mod leaves;
mod probe;
mod ranges;
mod snapshot;
mod strings;
mod vendor;
mod version;

pub use cpuid::{CpuidResult, CpuidSource, HostCpuid, TableCpuid};
pub use error::{ProbeError, Status, StringError, UnknownFeature};
pub use features::Feature;
pub use global::{ProbeState, cpu_info, has_feature, initialize, initialize_with, state};
pub use probe::{CpuInfo, DEFAULT_CACHE_LIMIT, ProbeConfig, ProbeFailure, probe, probe_with};
pub use ranges::{LeafRange, LeafRanges};
pub use snapshot::{FeatureBit, FeatureSnapshot, FeatureWord, Register};
pub use strings::{BrandString, FixedString, VendorString};
pub use vendor::{SIGNATURES, Vendor};
pub use version::{Leaf1Eax, Leaf1Ebx, VersionInfo};

#[cfg(target_arch = "x86_64")]
pub use cpuid::cpuid;
