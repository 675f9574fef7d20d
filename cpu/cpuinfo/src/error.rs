use crate::ranges::LeafRange;
use core::fmt;

/// Integer status code. Negative values are errors, zero and positive values
/// are success.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Status(pub i32);

impl Status {
    pub const SUCCESS: Self = Self(0);
    /// General invalid argument.
    pub const INVALID: Self = Self(-2);
    /// Memory allocation failed.
    pub const NOMEM: Self = Self(-4);
    /// Null pointer passed as a parameter.
    pub const NULLPARAM: Self = Self(-11);
    /// Input/output error.
    pub const IO: Self = Self(-25);
    /// Destination buffer too small.
    pub const OVERFLOW: Self = Self(-48);
    /// The `CPUID` instruction is not available.
    pub const CPUID: Self = Self(-51);

    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 0
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.0
    }
}

/// Why probing the processor failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ProbeError {
    #[error("the CPUID instruction is not available")]
    CpuidUnavailable,
    #[error("out of memory caching {leaves} {range} leaves")]
    OutOfMemory { range: LeafRange, leaves: u64 },
}

impl ProbeError {
    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::CpuidUnavailable => Status::CPUID,
            Self::OutOfMemory { .. } => Status::NOMEM,
        }
    }
}

impl From<ProbeError> for Status {
    fn from(err: ProbeError) -> Self {
        err.status()
    }
}

/// Why a vendor or brand string could not be copied out.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum StringError {
    #[error("buffer holds {available} bytes, {required} required")]
    BufferTooSmall { required: usize, available: usize },
    #[error("null destination buffer")]
    InvalidArgument,
}

impl StringError {
    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::BufferTooSmall { .. } => Status::OVERFLOW,
            Self::InvalidArgument => Status::NULLPARAM,
        }
    }
}

impl From<StringError> for Status {
    fn from(err: StringError) -> Self {
        err.status()
    }
}

/// A feature name that matches no known feature or alias.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("unknown feature name")]
pub struct UnknownFeature;

impl UnknownFeature {
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn status(&self) -> Status {
        Status::INVALID
    }
}

impl From<UnknownFeature> for Status {
    fn from(err: UnknownFeature) -> Self {
        err.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ProbeError::CpuidUnavailable.status().code(), -51);
        let oom = ProbeError::OutOfMemory {
            range: LeafRange::Extended,
            leaves: 9,
        };
        assert_eq!(Status::from(oom).code(), -4);
        let small = StringError::BufferTooSmall {
            required: 13,
            available: 4,
        };
        assert_eq!(i32::from(Status::from(small)), -48);
        assert_eq!(StringError::InvalidArgument.status().code(), -11);
        assert_eq!(UnknownFeature.status().code(), -2);
        assert!(!Status::NOMEM.is_success());
        assert!(Status::SUCCESS.is_success());
    }

    #[test]
    fn messages() {
        let oom = ProbeError::OutOfMemory {
            range: LeafRange::Extended,
            leaves: 9,
        };
        assert_eq!(alloc::format!("{oom}"), "out of memory caching 9 extended leaves");
    }
}
