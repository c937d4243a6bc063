//! WebAssembly helper set: SIMD128 (16 lanes).

use core::arch::wasm32::*;

use super::{BitMask, Vector};

#[derive(Clone, Copy, Debug)]
pub(crate) struct Simd128(v128);

// SAFETY: loads and stores move exactly 16 bytes.
unsafe impl Vector for Simd128 {
  const BYTES: usize = 16;

  type Mask = BitMask;

  #[inline(always)]
  unsafe fn splat(byte: u8) -> Self {
    // SAFETY: the caller enables SIMD128.
    Self(unsafe { u8x16_splat(byte) })
  }

  #[inline(always)]
  unsafe fn load_unaligned(ptr: *const u8) -> Self {
    // SAFETY: the caller guarantees 16 readable bytes at `ptr`; `v128.load`
    // has no alignment requirement.
    Self(unsafe { v128_load(ptr.cast()) })
  }

  #[inline(always)]
  unsafe fn load_aligned(ptr: *const u8) -> Self {
    // SAFETY: forwarded from the caller.
    unsafe { Self::load_unaligned(ptr) }
  }

  #[inline(always)]
  unsafe fn store_unaligned(self, ptr: *mut u8) {
    // SAFETY: the caller guarantees 16 writable bytes at `ptr`.
    unsafe { v128_store(ptr.cast(), self.0) }
  }

  #[inline(always)]
  unsafe fn store_aligned(self, ptr: *mut u8) {
    // SAFETY: forwarded from the caller.
    unsafe { self.store_unaligned(ptr) }
  }

  #[inline(always)]
  unsafe fn cmpeq(self, other: Self) -> Self {
    // SAFETY: the caller enables SIMD128.
    Self(unsafe { u8x16_eq(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn or(self, other: Self) -> Self {
    // SAFETY: the caller enables SIMD128.
    Self(unsafe { v128_or(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn and(self, other: Self) -> Self {
    // SAFETY: the caller enables SIMD128.
    Self(unsafe { v128_and(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn xor(self, other: Self) -> Self {
    // SAFETY: the caller enables SIMD128.
    Self(unsafe { v128_xor(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn sub(self, other: Self) -> Self {
    // SAFETY: the caller enables SIMD128.
    Self(unsafe { u8x16_sub(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn le_unsigned(self, other: Self) -> Self {
    // SAFETY: the caller enables SIMD128.
    Self(unsafe { u8x16_le(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn blend(mask: Self, if_set: Self, if_clear: Self) -> Self {
    // SAFETY: the caller enables SIMD128.
    Self(unsafe { v128_bitselect(if_set.0, if_clear.0, mask.0) })
  }

  #[inline(always)]
  unsafe fn not(self) -> Self {
    // SAFETY: the caller enables SIMD128.
    Self(unsafe { v128_not(self.0) })
  }

  #[inline(always)]
  unsafe fn movemask(self) -> BitMask {
    // SAFETY: the caller enables SIMD128.
    BitMask(u32::from(unsafe { u8x16_bitmask(self.0) }))
  }
}
