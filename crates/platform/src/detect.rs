//! Runtime CPU feature detection.
//!
//! [`runtime_features()`] probes the host once and caches the result:
//!
//! - x86/x86_64: CPUID leaves 1, 7 and 0x80000001, with AVX-class bits gated
//!   on XGETBV(XCR0)
//! - ARM on Linux/Android: `AT_HWCAP` from `/proc/self/auxv`
//! - aarch64 elsewhere with `std`: `is_aarch64_feature_detected!`
//! - WebAssembly and everything else: the compile-time set
//!
//! The result is always a superset of [`compiled_features()`]. Under Miri the
//! probe is skipped and the compile-time set is returned.
//!
//! # Overrides
//!
//! Bare-metal targets and tests can supply the set instead of probing, as long
//! as it happens before the first [`runtime_features()`] call:
//!
//! ```
//! use platform::declare;
//!
//! if platform::try_set_override(Some(declare!())).is_ok() {
//!   assert!(platform::runtime_features().has(platform::compiled_features()));
//! }
//! ```

use core::{
  fmt,
  sync::atomic::{AtomicU32, Ordering},
};

use crate::features::FeatureSet;

mod compile_time;

pub use compile_time::{compiled_features, default_base};

mod arch {
  #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
  pub(super) mod x86;

  #[cfg(any(target_arch = "arm", target_arch = "aarch64", target_arch = "arm64ec"))]
  pub(super) mod arm;
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache
// ─────────────────────────────────────────────────────────────────────────────
//
// Both words keep the feature bits in the low 31 bits; bit 31 marks a valid
// value. Racing first calls each probe and store the same bits, so the cache
// needs no lock: release on store, acquire on load.

const VALID: u32 = 1 << 31;

static CACHED: AtomicU32 = AtomicU32::new(0);
static OVERRIDE: AtomicU32 = AtomicU32::new(0);

/// Features available on the running host.
///
/// The first call probes the CPU; later calls are a single acquire load.
/// Thread-safe and idempotent.
#[inline]
#[must_use]
pub fn runtime_features() -> FeatureSet {
  let word = CACHED.load(Ordering::Acquire);
  if word & VALID != 0 {
    return FeatureSet::from_word(word & !VALID);
  }
  init()
}

#[cold]
fn init() -> FeatureSet {
  let features = match load_override() {
    Some(set) => set,
    None => probe(),
  }
  .union(compiled_features());

  CACHED.store(features.bits() | VALID, Ordering::Release);
  features
}

/// Probe the host, bypassing the cache and any override.
#[must_use]
pub fn probe() -> FeatureSet {
  #[cfg(miri)]
  {
    compiled_features()
  }

  #[cfg(all(not(miri), any(target_arch = "x86", target_arch = "x86_64")))]
  {
    compiled_features().union(arch::x86::probe())
  }

  #[cfg(all(
    not(miri),
    any(target_arch = "arm", target_arch = "aarch64", target_arch = "arm64ec")
  ))]
  {
    compiled_features().union(arch::arm::probe())
  }

  #[cfg(all(
    not(miri),
    not(any(
      target_arch = "x86",
      target_arch = "x86_64",
      target_arch = "arm",
      target_arch = "aarch64",
      target_arch = "arm64ec"
    ))
  ))]
  {
    compiled_features()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Override System
// ─────────────────────────────────────────────────────────────────────────────

/// Error returned by [`try_set_override`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum OverrideError {
  /// [`runtime_features()`] already cached a value.
  AlreadyInitialized,
  /// The override names capabilities from more than one family.
  MixedFamilies,
}

impl fmt::Display for OverrideError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::AlreadyInitialized => f.write_str("runtime features were already detected"),
      Self::MixedFamilies => f.write_str("override mixes feature families"),
    }
  }
}

impl core::error::Error for OverrideError {}

/// Set the features [`runtime_features()`] reports instead of probing.
///
/// Pass `None` to clear the override. The override is unioned with
/// [`compiled_features()`] when it is applied.
///
/// # Panics
///
/// Panics if [`try_set_override`] fails.
#[cold]
pub fn set_override(value: Option<FeatureSet>) {
  if let Err(err) = try_set_override(value) {
    panic!("platform::set_override failed: {err}");
  }
}

/// Try to set the detection override.
///
/// Contract: pre-init only. Once [`runtime_features()`] has cached a value,
/// this returns [`OverrideError::AlreadyInitialized`].
#[cold]
pub fn try_set_override(value: Option<FeatureSet>) -> Result<(), OverrideError> {
  if CACHED.load(Ordering::Acquire) & VALID != 0 {
    return Err(OverrideError::AlreadyInitialized);
  }
  let word = match value {
    Some(set) if set.family().is_none() => return Err(OverrideError::MixedFamilies),
    Some(set) => set.bits() | VALID,
    None => 0,
  };
  OVERRIDE.store(word, Ordering::Release);
  Ok(())
}

/// Clear the detection override.
#[cold]
pub fn clear_override() {
  set_override(None);
}

/// Check if an override is set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  OVERRIDE.load(Ordering::Acquire) & VALID != 0
}

fn load_override() -> Option<FeatureSet> {
  let word = OVERRIDE.load(Ordering::Acquire);
  (word & VALID != 0).then(|| FeatureSet::from_word(word & !VALID))
}

/// Drop the cached value so the next [`runtime_features()`] call probes again.
///
/// Only available with the `testing` feature or in test builds.
#[cfg(any(test, feature = "testing"))]
pub fn reset_for_testing() {
  CACHED.store(0, Ordering::Release);
}
