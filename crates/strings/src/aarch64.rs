//! AArch64 entry points: NEON.
//!
//! Inputs shorter than a vector fall through to the portable kernels.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - The safe wrappers are registered only in variant tables whose
//!   requirement includes NEON; callers of a table entry's `func` must check
//!   it against the host.

#![allow(unsafe_code)]

use crate::{
  portable,
  simd::{self, aarch64::Neon},
};

#[target_feature(enable = "neon")]
unsafe fn find_neon_unchecked(haystack: &[u8], needle: u8) -> Option<usize> {
  if haystack.len() < 16 {
    return portable::find(haystack, needle);
  }
  // SAFETY: NEON is enabled and the input holds a full vector.
  unsafe { simd::find::<Neon>(haystack, needle) }
}

#[target_feature(enable = "neon")]
unsafe fn common_prefix_neon_unchecked(a: &[u8], b: &[u8]) -> usize {
  if a.len().min(b.len()) < 16 {
    return portable::common_prefix(a, b);
  }
  // SAFETY: NEON is enabled and both inputs hold a full vector.
  unsafe { simd::common_prefix::<Neon>(a, b) }
}

#[target_feature(enable = "neon")]
unsafe fn flip_range_neon_unchecked(buf: &mut [u8], first: u8) {
  if buf.len() < 16 {
    return portable::flip_range(buf, first);
  }
  // SAFETY: NEON is enabled and the buffer holds a full vector.
  unsafe { simd::flip_range::<Neon>(buf, first) }
}

/// Unconditional stores through `bsl`.
#[target_feature(enable = "neon")]
unsafe fn replace_neon_unchecked(buf: &mut [u8], from: u8, to: u8) {
  if buf.len() < 16 {
    return portable::replace(buf, from, to);
  }
  // SAFETY: NEON is enabled and the buffer holds a full vector.
  unsafe { simd::replace::<Neon, false>(buf, from, to) }
}

#[inline]
pub(crate) fn find_neon(haystack: &[u8], needle: u8) -> Option<usize> {
  // SAFETY: selected only when the runtime feature set includes NEON.
  unsafe { find_neon_unchecked(haystack, needle) }
}

#[inline]
pub(crate) fn common_prefix_neon(a: &[u8], b: &[u8]) -> usize {
  // SAFETY: selected only when the runtime feature set includes NEON.
  unsafe { common_prefix_neon_unchecked(a, b) }
}

#[inline]
pub(crate) fn lowercase_neon(buf: &mut [u8]) {
  // SAFETY: selected only when the runtime feature set includes NEON.
  unsafe { flip_range_neon_unchecked(buf, b'A') }
}

#[inline]
pub(crate) fn uppercase_neon(buf: &mut [u8]) {
  // SAFETY: selected only when the runtime feature set includes NEON.
  unsafe { flip_range_neon_unchecked(buf, b'a') }
}

#[inline]
pub(crate) fn replace_neon(buf: &mut [u8], from: u8, to: u8) {
  // SAFETY: selected only when the runtime feature set includes NEON.
  unsafe { replace_neon_unchecked(buf, from, to) }
}
