//! WebAssembly entry points: SIMD128.
//!
//! WebAssembly has no runtime probe, so these are only selected when the
//! module is built with `simd128`.

#![allow(unsafe_code)]

use crate::{
  portable,
  simd::{self, wasm32::Simd128},
};

#[target_feature(enable = "simd128")]
unsafe fn find_simd128_unchecked(haystack: &[u8], needle: u8) -> Option<usize> {
  if haystack.len() < 16 {
    return portable::find(haystack, needle);
  }
  // SAFETY: SIMD128 is enabled and the input holds a full vector.
  unsafe { simd::find::<Simd128>(haystack, needle) }
}

#[target_feature(enable = "simd128")]
unsafe fn common_prefix_simd128_unchecked(a: &[u8], b: &[u8]) -> usize {
  if a.len().min(b.len()) < 16 {
    return portable::common_prefix(a, b);
  }
  // SAFETY: SIMD128 is enabled and both inputs hold a full vector.
  unsafe { simd::common_prefix::<Simd128>(a, b) }
}

#[target_feature(enable = "simd128")]
unsafe fn flip_range_simd128_unchecked(buf: &mut [u8], first: u8) {
  if buf.len() < 16 {
    return portable::flip_range(buf, first);
  }
  // SAFETY: SIMD128 is enabled and the buffer holds a full vector.
  unsafe { simd::flip_range::<Simd128>(buf, first) }
}

/// Unconditional stores through `v128.bitselect`.
#[target_feature(enable = "simd128")]
unsafe fn replace_simd128_unchecked(buf: &mut [u8], from: u8, to: u8) {
  if buf.len() < 16 {
    return portable::replace(buf, from, to);
  }
  // SAFETY: SIMD128 is enabled and the buffer holds a full vector.
  unsafe { simd::replace::<Simd128, false>(buf, from, to) }
}

#[inline]
pub(crate) fn find_simd128(haystack: &[u8], needle: u8) -> Option<usize> {
  // SAFETY: selected only when the build enables SIMD128.
  unsafe { find_simd128_unchecked(haystack, needle) }
}

#[inline]
pub(crate) fn common_prefix_simd128(a: &[u8], b: &[u8]) -> usize {
  // SAFETY: selected only when the build enables SIMD128.
  unsafe { common_prefix_simd128_unchecked(a, b) }
}

#[inline]
pub(crate) fn lowercase_simd128(buf: &mut [u8]) {
  // SAFETY: selected only when the build enables SIMD128.
  unsafe { flip_range_simd128_unchecked(buf, b'A') }
}

#[inline]
pub(crate) fn uppercase_simd128(buf: &mut [u8]) {
  // SAFETY: selected only when the build enables SIMD128.
  unsafe { flip_range_simd128_unchecked(buf, b'a') }
}

#[inline]
pub(crate) fn replace_simd128(buf: &mut [u8], from: u8, to: u8) {
  // SAFETY: selected only when the build enables SIMD128.
  unsafe { replace_simd128_unchecked(buf, from, to) }
}
