//! AArch64 helper set: NEON (16 lanes).

use core::arch::aarch64::*;

use super::{NibbleMask, Vector};

#[derive(Clone, Copy, Debug)]
pub(crate) struct Neon(uint8x16_t);

// SAFETY: loads and stores move exactly 16 bytes.
unsafe impl Vector for Neon {
  const BYTES: usize = 16;

  type Mask = NibbleMask;

  #[inline(always)]
  unsafe fn splat(byte: u8) -> Self {
    // SAFETY: the caller enables NEON.
    Self(unsafe { vdupq_n_u8(byte) })
  }

  #[inline(always)]
  unsafe fn load_unaligned(ptr: *const u8) -> Self {
    // SAFETY: the caller guarantees 16 readable bytes at `ptr`.
    Self(unsafe { vld1q_u8(ptr) })
  }

  #[inline(always)]
  unsafe fn load_aligned(ptr: *const u8) -> Self {
    // `ld1` has no alignment requirement.
    // SAFETY: forwarded from the caller.
    unsafe { Self::load_unaligned(ptr) }
  }

  #[inline(always)]
  unsafe fn store_unaligned(self, ptr: *mut u8) {
    // SAFETY: the caller guarantees 16 writable bytes at `ptr`.
    unsafe { vst1q_u8(ptr, self.0) }
  }

  #[inline(always)]
  unsafe fn store_aligned(self, ptr: *mut u8) {
    // SAFETY: forwarded from the caller.
    unsafe { self.store_unaligned(ptr) }
  }

  #[inline(always)]
  unsafe fn cmpeq(self, other: Self) -> Self {
    // SAFETY: the caller enables NEON.
    Self(unsafe { vceqq_u8(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn or(self, other: Self) -> Self {
    // SAFETY: the caller enables NEON.
    Self(unsafe { vorrq_u8(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn and(self, other: Self) -> Self {
    // SAFETY: the caller enables NEON.
    Self(unsafe { vandq_u8(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn xor(self, other: Self) -> Self {
    // SAFETY: the caller enables NEON.
    Self(unsafe { veorq_u8(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn sub(self, other: Self) -> Self {
    // SAFETY: the caller enables NEON.
    Self(unsafe { vsubq_u8(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn le_unsigned(self, other: Self) -> Self {
    // SAFETY: the caller enables NEON.
    Self(unsafe { vcleq_u8(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn blend(mask: Self, if_set: Self, if_clear: Self) -> Self {
    // SAFETY: the caller enables NEON.
    Self(unsafe { vbslq_u8(mask.0, if_set.0, if_clear.0) })
  }

  #[inline(always)]
  unsafe fn not(self) -> Self {
    // SAFETY: the caller enables NEON.
    Self(unsafe { vmvnq_u8(self.0) })
  }

  #[inline(always)]
  unsafe fn movemask(self) -> NibbleMask {
    // Shift each 16-bit lane right by 4 and narrow: byte lane i lands in
    // bits 4i..4i+4 of the result.
    // SAFETY: the caller enables NEON.
    let packed = unsafe { vshrn_n_u16::<4>(vreinterpretq_u16_u8(self.0)) };
    // SAFETY: the caller enables NEON.
    NibbleMask(unsafe { vget_lane_u64::<0>(vreinterpret_u64_u8(packed)) })
  }
}
