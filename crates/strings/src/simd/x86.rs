//! x86/x86_64 helper sets: SSE2 and SSE4.1 (16 lanes), AVX2 (32 lanes).

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use super::{BitMask, Vector};

/// 16 byte lanes, SSE2 only. Blends with and/andnot/or.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Sse2(__m128i);

/// 16 byte lanes with SSE4.1 `pblendvb`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Sse41(__m128i);

/// 32 byte lanes, AVX2.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Avx2(__m256i);

// SSE2 and SSE4.1 share everything except the blend.
macro_rules! sse_vector {
  ($name:ident, |$mask:ident, $set:ident, $clear:ident| $blend:expr) => {
    // SAFETY: loads and stores move exactly 16 bytes.
    unsafe impl Vector for $name {
      const BYTES: usize = 16;

      type Mask = BitMask;

      #[inline(always)]
      unsafe fn splat(byte: u8) -> Self {
        // SAFETY: the caller enables the target features.
        Self(unsafe { _mm_set1_epi8(byte as i8) })
      }

      #[inline(always)]
      unsafe fn load_unaligned(ptr: *const u8) -> Self {
        // SAFETY: the caller guarantees 16 readable bytes at `ptr`.
        Self(unsafe { _mm_loadu_si128(ptr.cast()) })
      }

      #[inline(always)]
      unsafe fn load_aligned(ptr: *const u8) -> Self {
        // SAFETY: the caller guarantees 16 readable, 16-aligned bytes at `ptr`.
        Self(unsafe { _mm_load_si128(ptr.cast()) })
      }

      #[inline(always)]
      unsafe fn store_unaligned(self, ptr: *mut u8) {
        // SAFETY: the caller guarantees 16 writable bytes at `ptr`.
        unsafe { _mm_storeu_si128(ptr.cast(), self.0) }
      }

      #[inline(always)]
      unsafe fn store_aligned(self, ptr: *mut u8) {
        // SAFETY: the caller guarantees 16 writable, 16-aligned bytes at `ptr`.
        unsafe { _mm_store_si128(ptr.cast(), self.0) }
      }

      #[inline(always)]
      unsafe fn cmpeq(self, other: Self) -> Self {
        // SAFETY: the caller enables the target features.
        Self(unsafe { _mm_cmpeq_epi8(self.0, other.0) })
      }

      #[inline(always)]
      unsafe fn or(self, other: Self) -> Self {
        // SAFETY: the caller enables the target features.
        Self(unsafe { _mm_or_si128(self.0, other.0) })
      }

      #[inline(always)]
      unsafe fn and(self, other: Self) -> Self {
        // SAFETY: the caller enables the target features.
        Self(unsafe { _mm_and_si128(self.0, other.0) })
      }

      #[inline(always)]
      unsafe fn xor(self, other: Self) -> Self {
        // SAFETY: the caller enables the target features.
        Self(unsafe { _mm_xor_si128(self.0, other.0) })
      }

      #[inline(always)]
      unsafe fn sub(self, other: Self) -> Self {
        // SAFETY: the caller enables the target features.
        Self(unsafe { _mm_sub_epi8(self.0, other.0) })
      }

      #[inline(always)]
      unsafe fn le_unsigned(self, other: Self) -> Self {
        // a <= b exactly when min(a, b) == a.
        // SAFETY: the caller enables the target features.
        Self(unsafe { _mm_cmpeq_epi8(_mm_min_epu8(self.0, other.0), self.0) })
      }

      #[inline(always)]
      unsafe fn blend($mask: Self, $set: Self, $clear: Self) -> Self {
        // SAFETY: the caller enables the target features.
        Self(unsafe { $blend })
      }

      #[inline(always)]
      unsafe fn movemask(self) -> BitMask {
        // SAFETY: the caller enables the target features.
        BitMask(unsafe { _mm_movemask_epi8(self.0) } as u32)
      }
    }
  };
}

sse_vector!(Sse2, |mask, set, clear| _mm_or_si128(
  _mm_and_si128(mask.0, set.0),
  _mm_andnot_si128(mask.0, clear.0)
));

sse_vector!(Sse41, |mask, set, clear| _mm_blendv_epi8(clear.0, set.0, mask.0));

// SAFETY: loads and stores move exactly 32 bytes.
unsafe impl Vector for Avx2 {
  const BYTES: usize = 32;

  type Mask = BitMask;

  #[inline(always)]
  unsafe fn splat(byte: u8) -> Self {
    // SAFETY: the caller enables AVX2.
    Self(unsafe { _mm256_set1_epi8(byte as i8) })
  }

  #[inline(always)]
  unsafe fn load_unaligned(ptr: *const u8) -> Self {
    // SAFETY: the caller guarantees 32 readable bytes at `ptr`.
    Self(unsafe { _mm256_loadu_si256(ptr.cast()) })
  }

  #[inline(always)]
  unsafe fn load_aligned(ptr: *const u8) -> Self {
    // SAFETY: the caller guarantees 32 readable, 32-aligned bytes at `ptr`.
    Self(unsafe { _mm256_load_si256(ptr.cast()) })
  }

  #[inline(always)]
  unsafe fn store_unaligned(self, ptr: *mut u8) {
    // SAFETY: the caller guarantees 32 writable bytes at `ptr`.
    unsafe { _mm256_storeu_si256(ptr.cast(), self.0) }
  }

  #[inline(always)]
  unsafe fn store_aligned(self, ptr: *mut u8) {
    // SAFETY: the caller guarantees 32 writable, 32-aligned bytes at `ptr`.
    unsafe { _mm256_store_si256(ptr.cast(), self.0) }
  }

  #[inline(always)]
  unsafe fn cmpeq(self, other: Self) -> Self {
    // SAFETY: the caller enables AVX2.
    Self(unsafe { _mm256_cmpeq_epi8(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn or(self, other: Self) -> Self {
    // SAFETY: the caller enables AVX2.
    Self(unsafe { _mm256_or_si256(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn and(self, other: Self) -> Self {
    // SAFETY: the caller enables AVX2.
    Self(unsafe { _mm256_and_si256(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn xor(self, other: Self) -> Self {
    // SAFETY: the caller enables AVX2.
    Self(unsafe { _mm256_xor_si256(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn sub(self, other: Self) -> Self {
    // SAFETY: the caller enables AVX2.
    Self(unsafe { _mm256_sub_epi8(self.0, other.0) })
  }

  #[inline(always)]
  unsafe fn le_unsigned(self, other: Self) -> Self {
    // SAFETY: the caller enables AVX2.
    Self(unsafe { _mm256_cmpeq_epi8(_mm256_min_epu8(self.0, other.0), self.0) })
  }

  #[inline(always)]
  unsafe fn blend(mask: Self, if_set: Self, if_clear: Self) -> Self {
    // SAFETY: the caller enables AVX2.
    Self(unsafe { _mm256_blendv_epi8(if_clear.0, if_set.0, mask.0) })
  }

  #[inline(always)]
  unsafe fn movemask(self) -> BitMask {
    // SAFETY: the caller enables AVX2.
    BitMask(unsafe { _mm256_movemask_epi8(self.0) } as u32)
  }
}
