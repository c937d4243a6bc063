//! Runtime-dispatched SIMD byte-string primitives.
//!
//! Every primitive has a portable scalar variant plus vector variants per ISA
//! family. The first call to a primitive selects the richest variant the host
//! supports and caches it; later calls go straight through the cached
//! function pointer.
//!
//! # Primitives
//!
//! | Function | Variants |
//! |----------|----------|
//! | [`find`] | scalar, sse2, avx2, neon, simd128 |
//! | [`find_last`] | scalar |
//! | [`common_prefix`] | scalar, sse2, avx2, neon, simd128 |
//! | [`lowercase_in_place`] / [`uppercase_in_place`] | scalar, sse2, avx2, neon, simd128 |
//! | [`replace_in_place`] | scalar, sse2, sse4.1, avx2, neon, simd128 |
//!
//! Case folding is ASCII only: bytes outside `A..=Z` / `a..=z` are never
//! modified, so UTF-8 sequences pass through untouched.
//!
//! # Example
//!
//! ```rust
//! let text = b"Lorem ipsum dolor";
//! assert_eq!(strings::find(text, b' '), Some(5));
//! assert_eq!(strings::common_prefix(b"abcdef", b"abcxyz"), 3);
//!
//! let mut buf = *b"Hello, World! 42";
//! strings::lowercase_in_place(&mut buf);
//! assert_eq!(&buf, b"hello, world! 42");
//!
//! let mut buf = *b"a_b_c_d";
//! strings::replace_in_place(&mut buf, b'_', b'-');
//! assert_eq!(&buf, b"a-b-c-d");
//! ```
//!
//! # Forcing a variant
//!
//! ```rust
//! use strings::Force;
//!
//! strings::force(Force::Scalar);
//! assert_eq!(strings::find_backend_name(), "scalar");
//! strings::force(Force::Auto);
//! ```
//!
//! The `SIMDKIT_STRINGS_FORCE` environment variable sets a process-wide cap
//! read on first use (`std` only).
//!
//! # no_std Support
//!
//! Disable default features for embedded use; the runtime probe then falls
//! back to the compile-time feature set unless a pre-init override is set
//! through `platform::set_override`.
//!
//! ```toml
//! [dependencies]
//! strings = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(any(feature = "alloc", test))]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod portable;

mod simd;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "wasm32")]
mod wasm32;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86;

mod affix;
pub mod config;
mod introspect;
pub mod kernels;
#[cfg(feature = "alloc")]
mod owned;
mod search;


#[cfg(all(test, not(miri)))]
mod proptests;

pub use affix::{
  WHITESPACE, has_prefix, has_prefix_byte, has_suffix, has_suffix_byte, trimmed, trimmed_prefix,
  trimmed_prefix_with, trimmed_suffix, trimmed_suffix_with, trimmed_with,
};
pub use config::{FORCE_ENV, Force, ParseForceError, StringsConfig};
pub use introspect::{
  DispatchInfo, common_prefix_backend_name, find_backend_name, find_last_backend_name, lowercase_backend_name,
  replace_backend_name, uppercase_backend_name,
};
#[cfg(feature = "alloc")]
pub use owned::{replace_all, to_lowercase, to_uppercase};
pub use search::{find_any, find_last_any, find_last_not_any, find_not_any, find_last_substring, find_substring};

use crate::kernels::{
  COMMON_PREFIX_DISPATCH, FIND_DISPATCH, FIND_LAST_DISPATCH, LOWERCASE_DISPATCH, REPLACE_DISPATCH, UPPERCASE_DISPATCH,
};

// ─────────────────────────────────────────────────────────────────────────────
// Primitives
// ─────────────────────────────────────────────────────────────────────────────

/// Index of the first byte of `haystack` equal to `needle`.
#[inline]
#[must_use]
pub fn find(haystack: &[u8], needle: u8) -> Option<usize> {
  (FIND_DISPATCH.get())(haystack, needle)
}

/// Index of the last byte of `haystack` equal to `needle`.
#[inline]
#[must_use]
pub fn find_last(haystack: &[u8], needle: u8) -> Option<usize> {
  (FIND_LAST_DISPATCH.get())(haystack, needle)
}

/// Number of leading bytes `a` and `b` have in common.
///
/// Bounded by the shorter of the two.
#[inline]
#[must_use]
pub fn common_prefix(a: &[u8], b: &[u8]) -> usize {
  (COMMON_PREFIX_DISPATCH.get())(a, b)
}

/// Fold ASCII `A..=Z` to lowercase in place.
#[inline]
pub fn lowercase_in_place(buf: &mut [u8]) {
  (LOWERCASE_DISPATCH.get())(buf);
}

/// Fold ASCII `a..=z` to uppercase in place.
#[inline]
pub fn uppercase_in_place(buf: &mut [u8]) {
  (UPPERCASE_DISPATCH.get())(buf);
}

/// Overwrite every `from` byte of `buf` with `to`.
#[inline]
pub fn replace_in_place(buf: &mut [u8], from: u8, to: u8) {
  if from == to {
    return;
  }
  (REPLACE_DISPATCH.get())(buf, from, to);
}

/// Force every primitive to select within `mode`'s ceiling.
///
/// The mode is clamped to the host's features (and to the
/// `SIMDKIT_STRINGS_FORCE` cap), so forcing an unsupported ISA selects the
/// richest supported variant below it. [`Force::Auto`] restores automatic
/// selection.
///
/// Intended for tests, benchmarks and diagnostics; calls already in flight
/// finish on the variant they loaded.
pub fn force(mode: Force) {
  config::record_programmatic(mode);
  let requested = match mode {
    Force::Auto => config::selection_features(),
    _ => mode.features(),
  };
  kernels::for_each_cell!(|cell| {
    cell.force(requested);
  });
}
