//! Variant tables and dispatch cells for the primitives.
//!
//! The tables are public so callers can dispatch at compile time:
//!
//! ```
//! use backend::dispatch_static;
//! use platform::declare;
//! use strings::kernels::FIND;
//!
//! let find = dispatch_static!(FIND, declare!());
//! assert_eq!(find(b"Lorem ipsum", b' '), Some(5));
//! ```
//!
//! Runtime callers go through the crate-level functions, which call through
//! the cells below.
//!
//! A table entry's `func` may only be called on a host that supports the
//! entry's `requires`. [`VariantList::select`](backend::VariantList::select)
//! over `platform::runtime_features()` and `dispatch_static!` both uphold
//! this; picking an entry by name or from a hand-built feature set does not.

use backend::{dispatcher, variants};
use platform::declare;

#[cfg(target_arch = "aarch64")]
use crate::aarch64;
#[cfg(target_arch = "wasm32")]
use crate::wasm32;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::x86;
use crate::{config::selection_features, portable};

/// Signature of `find` and `find_last` variants.
pub type FindFn = fn(&[u8], u8) -> Option<usize>;

/// Signature of `common_prefix` variants.
pub type CommonPrefixFn = fn(&[u8], &[u8]) -> usize;

/// Signature of the in-place case-folding variants.
pub type CaseFn = fn(&mut [u8]);

/// Signature of `replace_in_place` variants.
pub type ReplaceFn = fn(&mut [u8], u8, u8);

// ─────────────────────────────────────────────────────────────────────────────
// Variant tables
// ─────────────────────────────────────────────────────────────────────────────

variants! {
  /// First byte equal to a needle.
  pub const FIND: FindFn = [
    "scalar" => declare!() => portable::find,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    "sse2" => declare!(platform::Sse2) => x86::find_sse2,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    "avx2" => declare!(platform::Avx2) => x86::find_avx2,
    #[cfg(target_arch = "aarch64")]
    "neon" => declare!(platform::Neon) => aarch64::find_neon,
    #[cfg(target_arch = "wasm32")]
    "simd128" => declare!(platform::Simd128) => wasm32::find_simd128,
  ];
}

variants! {
  /// Last byte equal to a needle. Scalar only.
  pub const FIND_LAST: FindFn = [
    "scalar" => declare!() => portable::find_last,
  ];
}

variants! {
  /// Common prefix length of two buffers.
  pub const COMMON_PREFIX: CommonPrefixFn = [
    "scalar" => declare!() => portable::common_prefix,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    "sse2" => declare!(platform::Sse2) => x86::common_prefix_sse2,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    "avx2" => declare!(platform::Avx2) => x86::common_prefix_avx2,
    #[cfg(target_arch = "aarch64")]
    "neon" => declare!(platform::Neon) => aarch64::common_prefix_neon,
    #[cfg(target_arch = "wasm32")]
    "simd128" => declare!(platform::Simd128) => wasm32::common_prefix_simd128,
  ];
}

variants! {
  /// ASCII lowercase in place.
  pub const LOWERCASE: CaseFn = [
    "scalar" => declare!() => portable::lowercase,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    "sse2" => declare!(platform::Sse2) => x86::lowercase_sse2,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    "avx2" => declare!(platform::Avx2) => x86::lowercase_avx2,
    #[cfg(target_arch = "aarch64")]
    "neon" => declare!(platform::Neon) => aarch64::lowercase_neon,
    #[cfg(target_arch = "wasm32")]
    "simd128" => declare!(platform::Simd128) => wasm32::lowercase_simd128,
  ];
}

variants! {
  /// ASCII uppercase in place.
  pub const UPPERCASE: CaseFn = [
    "scalar" => declare!() => portable::uppercase,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    "sse2" => declare!(platform::Sse2) => x86::uppercase_sse2,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    "avx2" => declare!(platform::Avx2) => x86::uppercase_avx2,
    #[cfg(target_arch = "aarch64")]
    "neon" => declare!(platform::Neon) => aarch64::uppercase_neon,
    #[cfg(target_arch = "wasm32")]
    "simd128" => declare!(platform::Simd128) => wasm32::uppercase_simd128,
  ];
}

variants! {
  /// Single-byte replace in place.
  ///
  /// `sse2`, `neon` and `simd128` store every vector; `sse4.1` and `avx2`
  /// only store vectors that held a match.
  pub const REPLACE: ReplaceFn = [
    "scalar" => declare!() => portable::replace,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    "sse2" => declare!(platform::Sse2) => x86::replace_sse2,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    "sse4.1" => declare!(platform::Sse41) => x86::replace_sse41,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    "avx2" => declare!(platform::Avx2) => x86::replace_avx2,
    #[cfg(target_arch = "aarch64")]
    "neon" => declare!(platform::Neon) => aarch64::replace_neon,
    #[cfg(target_arch = "wasm32")]
    "simd128" => declare!(platform::Simd128) => wasm32::replace_simd128,
  ];
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch cells
// ─────────────────────────────────────────────────────────────────────────────

dispatcher! {
  pub(crate) static FIND_DISPATCH: FindFn = FIND, features = selection_features;
}

dispatcher! {
  pub(crate) static FIND_LAST_DISPATCH: FindFn = FIND_LAST, features = selection_features;
}

dispatcher! {
  pub(crate) static COMMON_PREFIX_DISPATCH: CommonPrefixFn = COMMON_PREFIX, features = selection_features;
}

dispatcher! {
  pub(crate) static LOWERCASE_DISPATCH: CaseFn = LOWERCASE, features = selection_features;
}

dispatcher! {
  pub(crate) static UPPERCASE_DISPATCH: CaseFn = UPPERCASE, features = selection_features;
}

dispatcher! {
  pub(crate) static REPLACE_DISPATCH: ReplaceFn = REPLACE, features = selection_features;
}

/// Apply `op` to every dispatch cell.
macro_rules! for_each_cell {
  (|$cell:ident| $body:expr) => {{
    {
      let $cell = &$crate::kernels::FIND_DISPATCH;
      $body;
    }
    {
      let $cell = &$crate::kernels::FIND_LAST_DISPATCH;
      $body;
    }
    {
      let $cell = &$crate::kernels::COMMON_PREFIX_DISPATCH;
      $body;
    }
    {
      let $cell = &$crate::kernels::LOWERCASE_DISPATCH;
      $body;
    }
    {
      let $cell = &$crate::kernels::UPPERCASE_DISPATCH;
      $body;
    }
    {
      let $cell = &$crate::kernels::REPLACE_DISPATCH;
      $body;
    }
  }};
}

pub(crate) use for_each_cell;

#[cfg(test)]
mod tests {
  use platform::{FeatureSet, runtime_features};

  use super::*;

  #[test]
  fn test_tables_start_with_scalar() {
    assert_eq!(FIND.scalar().name, "scalar");
    assert_eq!(FIND_LAST.len(), 1);
    assert_eq!(COMMON_PREFIX.scalar().name, "scalar");
    assert_eq!(LOWERCASE.scalar().name, "scalar");
    assert_eq!(UPPERCASE.scalar().name, "scalar");
    assert_eq!(REPLACE.scalar().name, "scalar");
  }

  #[test]
  fn test_empty_features_select_scalar() {
    assert_eq!(FIND.select(FeatureSet::EMPTY).name, "scalar");
    assert_eq!(REPLACE.select(FeatureSet::EMPTY).name, "scalar");
  }

  #[test]
  #[cfg(target_arch = "x86_64")]
  fn test_x86_64_tables() {
    use platform::{Avx2, Sse41};

    assert_eq!(FIND.select(declare!(Sse41)).name, "sse2");
    assert_eq!(REPLACE.select(declare!(Sse41)).name, "sse4.1");
    assert_eq!(REPLACE.select(declare!(Avx2)).name, "avx2");
    assert_eq!(LOWERCASE.len(), 3);
  }

  #[test]
  #[cfg(target_arch = "aarch64")]
  fn test_aarch64_tables() {
    assert_eq!(FIND.select(runtime_features()).name, "neon");
    assert_eq!(REPLACE.len(), 2);
  }

  #[test]
  fn test_cells_pick_supported_variants() {
    let features = runtime_features();
    assert!(features.has(FIND_DISPATCH.variant().requires));
    assert!(features.has(COMMON_PREFIX_DISPATCH.variant().requires));
    assert!(features.has(REPLACE_DISPATCH.variant().requires));
    assert_eq!(FIND_LAST_DISPATCH.backend_name(), "scalar");
  }

  #[test]
  fn test_callable_picks_are_host_supported() {
    let host = runtime_features();
    let picked = [
      FIND.select(host).requires,
      COMMON_PREFIX.select(host).requires,
      LOWERCASE.select(host).requires,
      UPPERCASE.select(host).requires,
      REPLACE.select(host).requires,
    ];
    assert!(picked.iter().all(|&requires| host.has(requires)));

    let compiled = backend::dispatch_static!(REPLACE, FeatureSet::ALL);
    let mut buf = *b"a_b_c_d_e_f_g_h_i_j_k_l_m_n_o_p_q_r_s_t";
    compiled(&mut buf, b'_', b'-');
    assert!(!buf.contains(&b'_'));
  }

  #[test]
  #[cfg(all(feature = "load-time", any(target_os = "linux", target_os = "android")))]
  fn test_cells_resolved_before_first_call() {
    let mut unresolved = 0;
    for_each_cell!(|cell| {
      if !cell.is_resolved() {
        unresolved += 1;
      }
    });
    assert_eq!(unresolved, 0);
    assert!(REPLACE_DISPATCH.is_resolved());
    assert!(runtime_features().has(REPLACE_DISPATCH.variant().requires));
  }
}
