//! Portable byte-at-a-time kernels.
//!
//! These are the Scalar entries of every variant table, the short-input
//! fallback of the vector kernels, and the oracle the other variants are
//! tested against.

/// Index of the first byte equal to `needle`.
#[inline]
#[must_use]
pub fn find(haystack: &[u8], needle: u8) -> Option<usize> {
  haystack.iter().position(|&b| b == needle)
}

/// Index of the last byte equal to `needle`.
#[inline]
#[must_use]
pub fn find_last(haystack: &[u8], needle: u8) -> Option<usize> {
  haystack.iter().rposition(|&b| b == needle)
}

/// Length of the longest common prefix of `a` and `b`.
#[inline]
#[must_use]
pub fn common_prefix(a: &[u8], b: &[u8]) -> usize {
  a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Fold `A..=Z` to `a..=z`.
#[inline]
pub fn lowercase(buf: &mut [u8]) {
  flip_range(buf, b'A');
}

/// Fold `a..=z` to `A..=Z`.
#[inline]
pub fn uppercase(buf: &mut [u8]) {
  flip_range(buf, b'a');
}

/// Flip bit 5 of every byte in `first..first + 26`.
///
/// Unsigned wrap-around keeps the range test to one compare.
#[inline(always)]
pub(crate) fn flip_range(buf: &mut [u8], first: u8) {
  for byte in buf {
    if byte.wrapping_sub(first) < 26 {
      *byte ^= 0x20;
    }
  }
}

/// Overwrite every `from` byte with `to`.
#[inline]
pub fn replace(buf: &mut [u8], from: u8, to: u8) {
  for byte in buf {
    if *byte == from {
      *byte = to;
    }
  }
}
