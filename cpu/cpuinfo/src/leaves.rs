//! Well-known CPUID leaf and sub-leaf numbers.

/// Leaf 0: maximum standard leaf and vendor signature.
pub const SIGNATURE: u32 = 0x00;
pub const MAX_FUNCTION: u32 = 0x00;

/// Leaf 1: version information and the classic feature flags.
pub const VERSION_INFO: u32 = 0x01;
pub const FEATURES: u32 = 0x01;

pub const CACHE_INFO: u32 = 0x02;
pub const SERIAL_NUMBER: u32 = 0x03;
pub const CACHE_PARAMS: u32 = 0x04;
pub const MONITOR_MWAIT: u32 = 0x05;
pub const THERMAL_POWER_MANAGEMENT: u32 = 0x06;

/// Leaf 7: structured extended feature flags.
pub const STRUCTURED_EXTENDED_FEATURES: u32 = 0x07;
pub const STRUCTURED_EXTENDED_FEATURES_MAIN: u32 = 0x00;
pub const STRUCTURED_EXTENDED_FEATURES_SUB_1: u32 = 0x01;

pub const DIRECT_CACHE_ACCESS_INFO: u32 = 0x09;
pub const ARCHITECTURAL_PERFORMANCE_MONITORING: u32 = 0x0A;

pub const EXTENDED_TOPOLOGY: u32 = 0x0B;
pub const EXTENDED_TOPOLOGY_LEVEL_TYPE_INVALID: u32 = 0x00;
pub const EXTENDED_TOPOLOGY_LEVEL_TYPE_SMT: u32 = 0x01;
pub const EXTENDED_TOPOLOGY_LEVEL_TYPE_CORE: u32 = 0x02;

/// Leaf 0xD: processor extended state (XSAVE) enumeration.
pub const EXTENDED_STATE: u32 = 0x0D;
pub const EXTENDED_STATE_MAIN: u32 = 0x00;
pub const EXTENDED_STATE_SUB_1: u32 = 0x01;
pub const EXTENDED_STATE_SIZE_OFFSET: u32 = 0x02;

pub const RDT_MONITORING: u32 = 0x0F;
pub const RDT_MONITORING_ENUMERATION: u32 = 0x00;
pub const RDT_MONITORING_L3_CACHE: u32 = 0x01;

pub const RDT_ALLOCATION: u32 = 0x10;
pub const RDT_ALLOCATION_ENUMERATION: u32 = 0x00;
pub const RDT_ALLOCATION_L3_CACHE: u32 = 0x01;
pub const RDT_ALLOCATION_L2_CACHE: u32 = 0x02;

pub const SGX: u32 = 0x12;
pub const SGX_CAPABILITIES_0: u32 = 0x00;
pub const SGX_CAPABILITIES_1: u32 = 0x01;
pub const SGX_CAPABILITIES_RESOURCES: u32 = 0x02;

pub const PROCESSOR_TRACE: u32 = 0x14;
pub const PROCESSOR_TRACE_MAIN: u32 = 0x00;
pub const PROCESSOR_TRACE_SUB_1: u32 = 0x01;

pub const TIME_STAMP_COUNTER: u32 = 0x15;
pub const PROCESSOR_FREQUENCY: u32 = 0x16;

pub const SOC_VENDOR: u32 = 0x17;
pub const SOC_VENDOR_MAIN: u32 = 0x00;
pub const SOC_VENDOR_BRAND_STRING_1: u32 = 0x01;
pub const SOC_VENDOR_BRAND_STRING_2: u32 = 0x02;
pub const SOC_VENDOR_BRAND_STRING_3: u32 = 0x03;

/// First extended leaf; reports the maximum extended leaf in EAX.
pub const MAX_EXTENDED_FUNCTION: u32 = 0x8000_0000;
pub const EXTENDED_FEATURES: u32 = 0x8000_0001;

pub const BRAND_STRING_1: u32 = 0x8000_0002;
pub const BRAND_STRING_2: u32 = 0x8000_0003;
pub const BRAND_STRING_3: u32 = 0x8000_0004;

/// The three brand string leaves in concatenation order.
pub const BRAND_STRING: [u32; 3] = [BRAND_STRING_1, BRAND_STRING_2, BRAND_STRING_3];

pub const EXTENDED_CACHE_INFO: u32 = 0x8000_0006;
pub const EXTENDED_TIME_STAMP_COUNTER: u32 = 0x8000_0007;

/// Leaf `0x8000_0008`: address sizes and extended feature identifiers.
pub const VIR_PHY_ADDRESS_SIZE: u32 = 0x8000_0008;
pub const EXTENDED_FEATURES_EXTENSION: u32 = 0x8000_0008;
