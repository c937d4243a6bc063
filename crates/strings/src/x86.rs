//! x86/x86_64 entry points: SSE2, SSE4.1 and AVX2.
//!
//! Each primitive has a `#[target_feature]` unchecked kernel and a safe
//! wrapper that the variant tables register. Inputs shorter than a vector
//! fall through to the next-poorer kernel: AVX2 to SSE (SSE4.1 for replace),
//! SSE to portable.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - The safe wrappers are registered only in variant tables whose
//!   requirement includes the wrapper's target feature. Callers of a table
//!   entry's `func` must check that requirement against the host (see
//!   `kernels`).

#![allow(unsafe_code)]

use crate::{
  portable,
  simd::{
    self,
    x86::{Avx2, Sse2, Sse41},
  },
};

// ─────────────────────────────────────────────────────────────────────────────
// Unchecked kernels
// ─────────────────────────────────────────────────────────────────────────────

#[target_feature(enable = "sse2")]
unsafe fn find_sse2_unchecked(haystack: &[u8], needle: u8) -> Option<usize> {
  if haystack.len() < 16 {
    return portable::find(haystack, needle);
  }
  // SAFETY: SSE2 is enabled and the input holds a full vector.
  unsafe { simd::find::<Sse2>(haystack, needle) }
}

#[target_feature(enable = "avx2")]
unsafe fn find_avx2_unchecked(haystack: &[u8], needle: u8) -> Option<usize> {
  if haystack.len() < 32 {
    // SAFETY: AVX2 implies SSE2.
    return unsafe { find_sse2_unchecked(haystack, needle) };
  }
  // SAFETY: AVX2 is enabled and the input holds a full vector.
  unsafe { simd::find::<Avx2>(haystack, needle) }
}

#[target_feature(enable = "sse2")]
unsafe fn common_prefix_sse2_unchecked(a: &[u8], b: &[u8]) -> usize {
  if a.len().min(b.len()) < 16 {
    return portable::common_prefix(a, b);
  }
  // SAFETY: SSE2 is enabled and both inputs hold a full vector.
  unsafe { simd::common_prefix::<Sse2>(a, b) }
}

#[target_feature(enable = "avx2")]
unsafe fn common_prefix_avx2_unchecked(a: &[u8], b: &[u8]) -> usize {
  if a.len().min(b.len()) < 32 {
    // SAFETY: AVX2 implies SSE2.
    return unsafe { common_prefix_sse2_unchecked(a, b) };
  }
  // SAFETY: AVX2 is enabled and both inputs hold a full vector.
  unsafe { simd::common_prefix::<Avx2>(a, b) }
}

#[target_feature(enable = "sse2")]
unsafe fn flip_range_sse2_unchecked(buf: &mut [u8], first: u8) {
  if buf.len() < 16 {
    return portable::flip_range(buf, first);
  }
  // SAFETY: SSE2 is enabled and the buffer holds a full vector.
  unsafe { simd::flip_range::<Sse2>(buf, first) }
}

#[target_feature(enable = "avx2")]
unsafe fn flip_range_avx2_unchecked(buf: &mut [u8], first: u8) {
  if buf.len() < 32 {
    // SAFETY: AVX2 implies SSE2.
    return unsafe { flip_range_sse2_unchecked(buf, first) };
  }
  // SAFETY: AVX2 is enabled and the buffer holds a full vector.
  unsafe { simd::flip_range::<Avx2>(buf, first) }
}

/// Unconditional stores: and/andnot/or blend on every vector.
#[target_feature(enable = "sse2")]
unsafe fn replace_sse2_unchecked(buf: &mut [u8], from: u8, to: u8) {
  if buf.len() < 16 {
    return portable::replace(buf, from, to);
  }
  // SAFETY: SSE2 is enabled and the buffer holds a full vector.
  unsafe { simd::replace::<Sse2, false>(buf, from, to) }
}

/// Conditional stores: `pblendvb` only on vectors that hold a match.
#[target_feature(enable = "sse4.1")]
unsafe fn replace_sse41_unchecked(buf: &mut [u8], from: u8, to: u8) {
  if buf.len() < 16 {
    return portable::replace(buf, from, to);
  }
  // SAFETY: SSE4.1 is enabled and the buffer holds a full vector.
  unsafe { simd::replace::<Sse41, true>(buf, from, to) }
}

#[target_feature(enable = "avx2")]
unsafe fn replace_avx2_unchecked(buf: &mut [u8], from: u8, to: u8) {
  if buf.len() < 32 {
    // SAFETY: AVX2 implies SSE4.1.
    return unsafe { replace_sse41_unchecked(buf, from, to) };
  }
  // SAFETY: AVX2 is enabled and the buffer holds a full vector.
  unsafe { simd::replace::<Avx2, true>(buf, from, to) }
}

// ─────────────────────────────────────────────────────────────────────────────
// Safe wrappers
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! runtime {
  ($(fn $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)? => $unchecked:ident($($call:expr),*);)+) => {
    $(
      #[inline]
      pub(crate) fn $name($($arg: $ty),*) $(-> $ret)? {
        // SAFETY: selected only when the runtime feature set includes the
        // kernel's target feature.
        unsafe { $unchecked($($call),*) }
      }
    )+
  };
}

runtime! {
  fn find_sse2(haystack: &[u8], needle: u8) -> Option<usize> => find_sse2_unchecked(haystack, needle);
  fn find_avx2(haystack: &[u8], needle: u8) -> Option<usize> => find_avx2_unchecked(haystack, needle);
  fn common_prefix_sse2(a: &[u8], b: &[u8]) -> usize => common_prefix_sse2_unchecked(a, b);
  fn common_prefix_avx2(a: &[u8], b: &[u8]) -> usize => common_prefix_avx2_unchecked(a, b);
  fn lowercase_sse2(buf: &mut [u8]) => flip_range_sse2_unchecked(buf, b'A');
  fn lowercase_avx2(buf: &mut [u8]) => flip_range_avx2_unchecked(buf, b'A');
  fn uppercase_sse2(buf: &mut [u8]) => flip_range_sse2_unchecked(buf, b'a');
  fn uppercase_avx2(buf: &mut [u8]) => flip_range_avx2_unchecked(buf, b'a');
  fn replace_sse2(buf: &mut [u8], from: u8, to: u8) => replace_sse2_unchecked(buf, from, to);
  fn replace_sse41(buf: &mut [u8], from: u8, to: u8) => replace_sse41_unchecked(buf, from, to);
  fn replace_avx2(buf: &mut [u8], from: u8, to: u8) => replace_avx2_unchecked(buf, from, to);
}
