//! Vector helper sets and the kernel skeletons written against them.
//!
//! Every vector kernel follows the same phases over a buffer of at least one
//! vector width `W`:
//!
//! | Phase | Action |
//! |-------|--------|
//! | head | one unaligned vector at the first byte |
//! | align | advance to the next `W`-byte boundary strictly past the start |
//! | block | four aligned vectors per iteration while `4W` bytes remain |
//! | body | one aligned vector while `W` bytes remain |
//! | tail | one unaligned vector ending at the last byte |
//!
//! Head, align and tail revisit some bytes. The searches only read, and the
//! in-place transforms are idempotent, so revisiting never changes a result.
//!
//! A helper set is a [`Vector`] implementation; the skeletons are generic
//! over it and are `#[inline(always)]`, so they compile into the
//! `#[target_feature]` entry points of each ISA module with that ISA's
//! instructions.
//!
//! Safety:
//! - This module is allowed to use `unsafe` for raw-pointer vector access.
//! - All skeletons require the helper set's target features to be enabled in
//!   the calling function and the input to hold at least one full vector.

#![allow(unsafe_code)]

#[cfg(target_arch = "aarch64")]
pub(crate) mod aarch64;
#[cfg(target_arch = "wasm32")]
pub(crate) mod wasm32;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub(crate) mod x86;

// ─────────────────────────────────────────────────────────────────────────────
// Helper traits
// ─────────────────────────────────────────────────────────────────────────────

/// Per-lane match bits extracted from a comparison vector.
pub(crate) trait MoveMask: Copy {
  /// Whether any lane matched.
  fn has_match(self) -> bool;

  /// Byte offset of the lowest matching lane. Only meaningful when
  /// [`has_match`](Self::has_match) is true.
  fn first_offset(self) -> usize;

  /// Lanes matching in either mask.
  fn or(self, other: Self) -> Self;
}

/// One bit per byte lane (x86 `movemask`, wasm `bitmask`).
#[cfg(any(target_arch = "x86", target_arch = "x86_64", target_arch = "wasm32"))]
#[derive(Clone, Copy, Debug)]
pub(crate) struct BitMask(pub(crate) u32);

#[cfg(any(target_arch = "x86", target_arch = "x86_64", target_arch = "wasm32"))]
impl MoveMask for BitMask {
  #[inline(always)]
  fn has_match(self) -> bool {
    self.0 != 0
  }

  #[inline(always)]
  fn first_offset(self) -> usize {
    self.0.trailing_zeros() as usize
  }

  #[inline(always)]
  fn or(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }
}

/// Four bits per byte lane, from a shift-right-and-narrow of the comparison.
///
/// NEON has no byte-granular movemask; narrowing each 16-bit lane by 4 packs
/// the 128-bit comparison into one 64-bit word.
#[cfg(target_arch = "aarch64")]
#[derive(Clone, Copy, Debug)]
pub(crate) struct NibbleMask(pub(crate) u64);

#[cfg(target_arch = "aarch64")]
impl MoveMask for NibbleMask {
  #[inline(always)]
  fn has_match(self) -> bool {
    self.0 != 0
  }

  #[inline(always)]
  fn first_offset(self) -> usize {
    (self.0.trailing_zeros() / 4) as usize
  }

  #[inline(always)]
  fn or(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }
}

/// A SIMD register of `BYTES` byte lanes and the operations the kernels use.
///
/// Comparison results are lane masks: all ones where true, zero elsewhere.
///
/// # Safety
///
/// Implementations must read and write exactly `BYTES` bytes in their load
/// and store methods; the skeletons rely on it to stay inside the buffer.
/// Every method requires the implementation's target features.
pub(crate) unsafe trait Vector: Copy {
  const BYTES: usize;

  type Mask: MoveMask;

  unsafe fn splat(byte: u8) -> Self;

  unsafe fn load_unaligned(ptr: *const u8) -> Self;

  /// `ptr` must be aligned to `BYTES`.
  unsafe fn load_aligned(ptr: *const u8) -> Self;

  unsafe fn store_unaligned(self, ptr: *mut u8);

  /// `ptr` must be aligned to `BYTES`.
  unsafe fn store_aligned(self, ptr: *mut u8);

  unsafe fn cmpeq(self, other: Self) -> Self;

  unsafe fn or(self, other: Self) -> Self;

  unsafe fn and(self, other: Self) -> Self;

  unsafe fn xor(self, other: Self) -> Self;

  /// Lane-wise wrapping subtraction.
  unsafe fn sub(self, other: Self) -> Self;

  /// Lane-wise unsigned `self <= other`.
  unsafe fn le_unsigned(self, other: Self) -> Self;

  /// Lanes of `if_set` where `mask` is set, lanes of `if_clear` elsewhere.
  unsafe fn blend(mask: Self, if_set: Self, if_clear: Self) -> Self;

  unsafe fn movemask(self) -> Self::Mask;

  #[inline(always)]
  unsafe fn not(self) -> Self {
    // SAFETY: forwarded from the caller.
    unsafe { self.xor(Self::splat(0xFF)) }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pointer helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Bytes from `from` to `to`; `to` must not precede `from`.
#[inline(always)]
fn distance(from: *const u8, to: *const u8) -> usize {
  debug_assert!(to.addr() >= from.addr());
  to.addr() - from.addr()
}

/// Offset from `ptr` to the next `V::BYTES` boundary strictly past it, in
/// `1..=V::BYTES`.
#[inline(always)]
fn align_step<V: Vector>(ptr: *const u8) -> usize {
  V::BYTES - (ptr.addr() & (V::BYTES - 1))
}

/// Offset of the first match in four consecutive vectors, given that at
/// least one of them has a match.
#[inline(always)]
unsafe fn first_in_block<V: Vector>(vectors: [V; 4]) -> usize {
  let mut base = 0;
  for vector in vectors {
    // SAFETY: forwarded from the caller.
    let mask = unsafe { vector.movemask() };
    if mask.has_match() {
      return base + mask.first_offset();
    }
    base += V::BYTES;
  }
  base
}

// ─────────────────────────────────────────────────────────────────────────────
// Skeletons
// ─────────────────────────────────────────────────────────────────────────────

/// First index of `needle` in `haystack`.
///
/// # Safety
///
/// `V`'s target features must be enabled and `haystack.len() >= V::BYTES`.
#[inline(always)]
pub(crate) unsafe fn find<V: Vector>(haystack: &[u8], needle: u8) -> Option<usize> {
  debug_assert!(haystack.len() >= V::BYTES);
  let start = haystack.as_ptr();
  let end = start.wrapping_add(haystack.len());

  // SAFETY: the caller enables `V`'s features. Every load below reads
  // `V::BYTES` bytes at an address between `start` and `end - V::BYTES`:
  // the head at `start`, the aligned loops only while a full vector (or four)
  // remains before `end`, and the tail ending exactly at `end`.
  unsafe {
    let splat = V::splat(needle);

    let mask = V::load_unaligned(start).cmpeq(splat).movemask();
    if mask.has_match() {
      return Some(mask.first_offset());
    }

    let mut cur = start.add(align_step::<V>(start));

    while distance(cur, end) >= 4 * V::BYTES {
      let a = V::load_aligned(cur).cmpeq(splat);
      let b = V::load_aligned(cur.add(V::BYTES)).cmpeq(splat);
      let c = V::load_aligned(cur.add(2 * V::BYTES)).cmpeq(splat);
      let d = V::load_aligned(cur.add(3 * V::BYTES)).cmpeq(splat);
      if a.or(b).or(c).or(d).movemask().has_match() {
        return Some(distance(start, cur) + first_in_block([a, b, c, d]));
      }
      cur = cur.add(4 * V::BYTES);
    }

    while distance(cur, end) >= V::BYTES {
      let mask = V::load_aligned(cur).cmpeq(splat).movemask();
      if mask.has_match() {
        return Some(distance(start, cur) + mask.first_offset());
      }
      cur = cur.add(V::BYTES);
    }

    if cur < end {
      let tail = end.sub(V::BYTES);
      let mask = V::load_unaligned(tail).cmpeq(splat).movemask();
      if mask.has_match() {
        return Some(distance(start, tail) + mask.first_offset());
      }
    }
  }

  None
}

/// Length of the common prefix of `a` and `b`.
///
/// Only `a` is aligned; `b` is read unaligned throughout.
///
/// # Safety
///
/// `V`'s target features must be enabled and both inputs must hold at least
/// `V::BYTES` bytes.
#[inline(always)]
pub(crate) unsafe fn common_prefix<V: Vector>(a: &[u8], b: &[u8]) -> usize {
  let len = a.len().min(b.len());
  debug_assert!(len >= V::BYTES);
  let pa = a.as_ptr();
  let pb = b.as_ptr();

  // SAFETY: the caller enables `V`'s features. Every load reads `V::BYTES`
  // bytes at offset `i` with `i + V::BYTES <= len`, and `len` bounds both
  // inputs.
  unsafe {
    let mask = differ(V::load_unaligned(pa), pb).movemask();
    if mask.has_match() {
      return mask.first_offset();
    }

    let mut i = align_step::<V>(pa);

    while len - i >= 4 * V::BYTES {
      let x0 = differ(V::load_aligned(pa.add(i)), pb.add(i));
      let x1 = differ(V::load_aligned(pa.add(i + V::BYTES)), pb.add(i + V::BYTES));
      let x2 = differ(V::load_aligned(pa.add(i + 2 * V::BYTES)), pb.add(i + 2 * V::BYTES));
      let x3 = differ(V::load_aligned(pa.add(i + 3 * V::BYTES)), pb.add(i + 3 * V::BYTES));
      if x0.or(x1).or(x2).or(x3).movemask().has_match() {
        return i + first_in_block([x0, x1, x2, x3]);
      }
      i += 4 * V::BYTES;
    }

    while len - i >= V::BYTES {
      let mask = differ(V::load_aligned(pa.add(i)), pb.add(i)).movemask();
      if mask.has_match() {
        return i + mask.first_offset();
      }
      i += V::BYTES;
    }

    if i < len {
      let tail = len - V::BYTES;
      let mask = differ(V::load_unaligned(pa.add(tail)), pb.add(tail)).movemask();
      if mask.has_match() {
        return tail + mask.first_offset();
      }
    }
  }

  len
}

/// Lanes of `va` that differ from the vector at `pb`.
#[inline(always)]
unsafe fn differ<V: Vector>(va: V, pb: *const u8) -> V {
  // SAFETY: forwarded from the caller.
  unsafe { va.cmpeq(V::load_unaligned(pb)).not() }
}

/// Flip bit 5 of every byte in `first..first + 26`.
///
/// # Safety
///
/// `V`'s target features must be enabled and `buf.len() >= V::BYTES`.
#[inline(always)]
pub(crate) unsafe fn flip_range<V: Vector>(buf: &mut [u8], first: u8) {
  // SAFETY: forwarded from the caller; flipping a range is idempotent.
  unsafe {
    let op = FlipRange {
      first: V::splat(first),
      last: V::splat(25),
      bit: V::splat(0x20),
    };
    map_in_place(buf, op);
  }
}

/// Overwrite every `from` byte with `to`.
///
/// With `CONDITIONAL`, a vector is only stored back when it held a match.
///
/// # Safety
///
/// `V`'s target features must be enabled and `buf.len() >= V::BYTES`.
#[inline(always)]
pub(crate) unsafe fn replace<V: Vector, const CONDITIONAL: bool>(buf: &mut [u8], from: u8, to: u8) {
  // SAFETY: forwarded from the caller; replacing is idempotent.
  unsafe {
    let op = Replace {
      from: V::splat(from),
      to: V::splat(to),
    };
    if CONDITIONAL {
      map_in_place_conditional(buf, op);
    } else {
      map_in_place(buf, op);
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-place traversal
// ─────────────────────────────────────────────────────────────────────────────

/// An idempotent lane transform: `apply(apply(v)) == apply(v)`.
trait LaneMap<V: Vector>: Copy {
  /// The transformed vector and the lanes it changed.
  unsafe fn apply(self, v: V) -> (V, V);
}

#[derive(Clone, Copy)]
struct FlipRange<V> {
  first: V,
  last: V,
  bit: V,
}

impl<V: Vector> LaneMap<V> for FlipRange<V> {
  #[inline(always)]
  unsafe fn apply(self, v: V) -> (V, V) {
    // SAFETY: forwarded from the caller.
    unsafe {
      let hits = v.sub(self.first).le_unsigned(self.last);
      (v.xor(hits.and(self.bit)), hits)
    }
  }
}

#[derive(Clone, Copy)]
struct Replace<V> {
  from: V,
  to: V,
}

impl<V: Vector> LaneMap<V> for Replace<V> {
  #[inline(always)]
  unsafe fn apply(self, v: V) -> (V, V) {
    // SAFETY: forwarded from the caller.
    unsafe {
      let hits = v.cmpeq(self.from);
      (V::blend(hits, self.to, v), hits)
    }
  }
}

/// Apply `op` to every byte of `buf`, storing every vector back.
///
/// # Safety
///
/// `V`'s target features must be enabled and `buf.len() >= V::BYTES`.
#[inline(always)]
unsafe fn map_in_place<V: Vector, M: LaneMap<V>>(buf: &mut [u8], op: M) {
  let len = buf.len();
  debug_assert!(len >= V::BYTES);
  let start = buf.as_mut_ptr();

  // SAFETY: the caller enables `V`'s features. Each access covers
  // `V::BYTES` bytes at offset `i` with `i + V::BYTES <= len`; all accesses
  // go through `start`, the only pointer derived from `buf`. Revisited bytes
  // are unchanged because `op` is idempotent.
  unsafe {
    op.apply(V::load_unaligned(start)).0.store_unaligned(start);

    let mut i = align_step::<V>(start);

    while len - i >= 4 * V::BYTES {
      let p0 = start.add(i);
      let p1 = p0.add(V::BYTES);
      let p2 = p0.add(2 * V::BYTES);
      let p3 = p0.add(3 * V::BYTES);
      let v0 = op.apply(V::load_aligned(p0)).0;
      let v1 = op.apply(V::load_aligned(p1)).0;
      let v2 = op.apply(V::load_aligned(p2)).0;
      let v3 = op.apply(V::load_aligned(p3)).0;
      v0.store_aligned(p0);
      v1.store_aligned(p1);
      v2.store_aligned(p2);
      v3.store_aligned(p3);
      i += 4 * V::BYTES;
    }

    while len - i >= V::BYTES {
      let p = start.add(i);
      op.apply(V::load_aligned(p)).0.store_aligned(p);
      i += V::BYTES;
    }

    if i < len {
      let tail = start.add(len - V::BYTES);
      op.apply(V::load_unaligned(tail)).0.store_unaligned(tail);
    }
  }
}

/// Apply `op` to every byte of `buf`, storing a vector back only when `op`
/// changed one of its lanes.
///
/// # Safety
///
/// Same as [`map_in_place`].
#[inline(always)]
unsafe fn map_in_place_conditional<V: Vector, M: LaneMap<V>>(buf: &mut [u8], op: M) {
  #[inline(always)]
  unsafe fn step<V: Vector, M: LaneMap<V>, const ALIGNED: bool>(ptr: *mut u8, op: M) {
    // SAFETY: forwarded from the caller.
    unsafe {
      let v = if ALIGNED { V::load_aligned(ptr) } else { V::load_unaligned(ptr) };
      let (out, hits) = op.apply(v);
      if hits.movemask().has_match() {
        if ALIGNED {
          out.store_aligned(ptr);
        } else {
          out.store_unaligned(ptr);
        }
      }
    }
  }

  let len = buf.len();
  debug_assert!(len >= V::BYTES);
  let start = buf.as_mut_ptr();

  // SAFETY: same bounds as `map_in_place`.
  unsafe {
    step::<V, M, false>(start, op);

    let mut i = align_step::<V>(start);

    while len - i >= 4 * V::BYTES {
      let p0 = start.add(i);
      let p1 = p0.add(V::BYTES);
      let p2 = p0.add(2 * V::BYTES);
      let p3 = p0.add(3 * V::BYTES);
      let (v0, h0) = op.apply(V::load_aligned(p0));
      let (v1, h1) = op.apply(V::load_aligned(p1));
      let (v2, h2) = op.apply(V::load_aligned(p2));
      let (v3, h3) = op.apply(V::load_aligned(p3));
      let (m0, m1, m2, m3) = (h0.movemask(), h1.movemask(), h2.movemask(), h3.movemask());
      if m0.or(m1).or(m2).or(m3).has_match() {
        if m0.has_match() {
          v0.store_aligned(p0);
        }
        if m1.has_match() {
          v1.store_aligned(p1);
        }
        if m2.has_match() {
          v2.store_aligned(p2);
        }
        if m3.has_match() {
          v3.store_aligned(p3);
        }
      }
      i += 4 * V::BYTES;
    }

    while len - i >= V::BYTES {
      step::<V, M, true>(start.add(i), op);
      i += V::BYTES;
    }

    if i < len {
      step::<V, M, false>(start.add(len - V::BYTES), op);
    }
  }
}
