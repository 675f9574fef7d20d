//! Fixed-capacity, NUL-terminated vendor and brand strings.

use crate::error::StringError;
use core::fmt;

/// An ASCII string stored in `N` bytes, including its NUL terminator.
///
/// The stored bytes are kept verbatim from the CPUID registers. The logical
/// string ends at the first NUL, so it is at most `N - 1` bytes long.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FixedString<const N: usize> {
    bytes: [u8; N],
}

/// Vendor signature string, up to 15 bytes plus terminator.
pub type VendorString = FixedString<16>;

/// Processor brand string, up to 63 bytes plus terminator.
pub type BrandString = FixedString<64>;

impl<const N: usize> FixedString<N> {
    pub const EMPTY: Self = Self { bytes: [0; N] };

    /// Store `src`, truncating so the last byte is always a terminator.
    #[must_use]
    pub fn from_bytes(src: &[u8]) -> Self {
        let mut bytes = [0; N];
        let n = src.len().min(N.saturating_sub(1));
        bytes[..n].copy_from_slice(&src[..n]);
        Self { bytes }
    }

    /// The string bytes up to, not including, the first NUL.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        let len = self.bytes.iter().position(|&b| b == 0).unwrap_or(N);
        &self.bytes[..len]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// The string as UTF-8, or `None` if the processor reported non-UTF-8 bytes.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    /// Copy the string and its terminator into `dest`.
    ///
    /// Returns the string length, excluding the terminator.
    ///
    /// # Errors
    /// [`StringError::BufferTooSmall`] if `dest` cannot hold the string plus
    /// terminator. `dest` is left untouched in that case.
    pub fn copy_to(&self, dest: &mut [u8]) -> Result<usize, StringError> {
        let src = self.as_bytes();
        let required = src.len() + 1;
        if dest.len() < required {
            return Err(StringError::BufferTooSmall {
                required,
                available: dest.len(),
            });
        }
        dest[..src.len()].copy_from_slice(src);
        dest[src.len()] = 0;
        Ok(src.len())
    }
}

impl<const N: usize> Default for FixedString<N> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<const N: usize> fmt::Display for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.as_bytes().utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_str("\u{FFFD}")?;
            }
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.as_bytes().escape_ascii())
    }
}
