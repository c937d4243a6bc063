//! CPU feature sets and detection for simdkit.
//!
//! This crate is the single source of truth for which CPU capabilities a
//! build targets and which ones the running host provides.
//!
//! # Core Types
//!
//! - [`FeatureSet`]: a set of named capabilities with union, intersection,
//!   difference and the subset order
//! - Tag types ([`Sse2`], [`Avx2`], [`Neon`], [`Simd128`], ...): one zero-sized
//!   type per capability, promoted to sets with [`features_of`] or combined into
//!   requirements with [`declare!`]
//!
//! # Main Entry Points
//!
//! ```
//! use platform::{Avx2, declare};
//!
//! const AVX2: platform::FeatureSet = declare!(Avx2);
//!
//! let host = platform::runtime_features();
//! assert!(host.has(platform::compiled_features()));
//! if host.has(AVX2) {
//!   // AVX2 kernels are safe to run.
//! }
//! println!("running with: {host}");
//! ```
//!
//! # Design
//!
//! 1. **Zero-cost when possible**: [`compiled_features()`] is a `const fn` over `cfg!`.
//! 2. **Cached otherwise**: [`runtime_features()`] probes once and publishes through a single atomic
//!    word.
//! 3. **Miri-safe**: under Miri the probe is skipped.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

// ─────────────────────────────────────────────────────────────────────────────
// Core modules
// ─────────────────────────────────────────────────────────────────────────────

pub mod detect;
pub mod features;

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(any(test, feature = "testing"))]
pub use detect::reset_for_testing;
pub use detect::{
  OverrideError, clear_override, compiled_features, default_base, has_override, probe, runtime_features,
  set_override, try_set_override,
};
pub use features::{
  Avx, Avx2, Avx512f, AvxF16c, AvxFma, Bmi1, Bmi2, Family, FeatureSet, Lzcnt, Neon, NeonFma, NeonFp16, Popcnt, Sha,
  Simd128, Sse2, Sse3, Sse41, Sse42, Ssse3, Tag, features_of,
};
