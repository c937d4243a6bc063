//! Runtime configuration: forced variant selection.
//!
//! Selection is automatic by default. It can be narrowed per process:
//!
//! - programmatically, with [`force`](crate::force)
//! - from the `SIMDKIT_STRINGS_FORCE` environment variable (read once, `std`
//!   only), which caps every selection including programmatic ones
//!
//! Safety note: forced modes are always clamped to the detected features; a
//! force never installs a variant the host cannot run.

use core::{
  fmt,
  str::FromStr,
  sync::atomic::{AtomicU8, Ordering},
};

use platform::{FeatureSet, declare};

/// Environment variable read for a process-wide force mode.
pub const FORCE_ENV: &str = "SIMDKIT_STRINGS_FORCE";

/// Forced variant selection for every primitive.
///
/// Each mode names a ceiling: a primitive uses its richest variant within
/// the mode's features, so [`Force::Sse41`] picks `sse2` for primitives
/// without an SSE4.1 variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Force {
  /// Use the default auto selector.
  #[default]
  Auto,
  /// Force the portable byte-at-a-time kernels.
  Scalar,
  Sse2,
  Sse41,
  Avx2,
  Neon,
  Simd128,
}

impl Force {
  /// Every mode, in declaration order.
  pub const ALL: [Self; 7] = [
    Self::Auto,
    Self::Scalar,
    Self::Sse2,
    Self::Sse41,
    Self::Avx2,
    Self::Neon,
    Self::Simd128,
  ];

  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Scalar => "scalar",
      Self::Sse2 => "sse2",
      Self::Sse41 => "sse4.1",
      Self::Avx2 => "avx2",
      Self::Neon => "neon",
      Self::Simd128 => "simd128",
    }
  }

  /// The feature ceiling this mode selects within.
  #[must_use]
  pub const fn features(self) -> FeatureSet {
    match self {
      Self::Auto => FeatureSet::ALL,
      Self::Scalar => FeatureSet::EMPTY,
      Self::Sse2 => declare!(platform::Sse2),
      Self::Sse41 => declare!(platform::Sse41),
      Self::Avx2 => declare!(platform::Avx2),
      Self::Neon => declare!(platform::Neon),
      Self::Simd128 => declare!(platform::Simd128),
    }
  }

  /// The next-poorer mode of the same family.
  #[must_use]
  pub const fn poorer(self) -> Self {
    match self {
      Self::Auto => Self::Auto,
      Self::Avx2 => Self::Sse41,
      Self::Sse41 => Self::Sse2,
      Self::Scalar | Self::Sse2 | Self::Neon | Self::Simd128 => Self::Scalar,
    }
  }

  /// Parse a mode name, ignoring ASCII case and surrounding whitespace.
  ///
  /// # Errors
  ///
  /// Returns [`ParseForceError`] for an unknown name.
  pub fn parse(value: &str) -> Result<Self, ParseForceError> {
    let value = value.trim();
    let is = |name: &str| value.eq_ignore_ascii_case(name);

    if is("auto") || value.is_empty() {
      Ok(Self::Auto)
    } else if is("scalar") || is("portable") {
      Ok(Self::Scalar)
    } else if is("sse2") {
      Ok(Self::Sse2)
    } else if is("sse4.1") || is("sse41") {
      Ok(Self::Sse41)
    } else if is("avx2") {
      Ok(Self::Avx2)
    } else if is("neon") || is("asimd") {
      Ok(Self::Neon)
    } else if is("simd128") || is("wasm") {
      Ok(Self::Simd128)
    } else {
      Err(ParseForceError::new())
    }
  }

  /// Clamp to the richest mode at or below `self` that `features` supports.
  #[must_use]
  pub const fn clamp_to(self, features: FeatureSet) -> Self {
    let mut mode = self;
    while !matches!(mode, Self::Auto) && !features.has(mode.features()) {
      mode = mode.poorer();
    }
    mode
  }

  const fn from_u8(value: u8) -> Option<Self> {
    match value {
      0 => Some(Self::Auto),
      1 => Some(Self::Scalar),
      2 => Some(Self::Sse2),
      3 => Some(Self::Sse41),
      4 => Some(Self::Avx2),
      5 => Some(Self::Neon),
      6 => Some(Self::Simd128),
      _ => None,
    }
  }
}

impl fmt::Display for Force {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Force {
  type Err = ParseForceError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

/// Error returned when a force-mode name is not recognized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct ParseForceError;

impl ParseForceError {
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self
  }
}

impl Default for ParseForceError {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for ParseForceError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("unknown force mode (expected auto, scalar, sse2, sse4.1, avx2, neon or simd128)")
  }
}

impl core::error::Error for ParseForceError {}

// ─────────────────────────────────────────────────────────────────────────────
// Overrides
// ─────────────────────────────────────────────────────────────────────────────

/// Last programmatic force; `u8::MAX` when none was applied.
static PROGRAMMATIC: AtomicU8 = AtomicU8::new(u8::MAX);

pub(crate) fn record_programmatic(mode: Force) {
  PROGRAMMATIC.store(mode as u8, Ordering::Release);
}

fn programmatic() -> Option<Force> {
  Force::from_u8(PROGRAMMATIC.load(Ordering::Acquire))
}

#[cfg(feature = "std")]
fn read_env_force() -> Force {
  let Ok(value) = std::env::var(FORCE_ENV) else {
    return Force::Auto;
  };
  match Force::parse(&value) {
    Ok(mode) => mode,
    Err(_err) => {
      #[cfg(feature = "tracing")]
      tracing::warn!(var = FORCE_ENV, value = %value, error = %_err, "ignoring invalid force mode");
      Force::Auto
    }
  }
}

/// Force mode from the environment, read once.
#[cfg(feature = "std")]
#[must_use]
pub fn env_force() -> Force {
  use std::sync::OnceLock;
  static ENV: OnceLock<Force> = OnceLock::new();
  *ENV.get_or_init(read_env_force)
}

/// Force mode from the environment; always [`Force::Auto`] without `std`.
#[cfg(not(feature = "std"))]
#[must_use]
pub fn env_force() -> Force {
  Force::Auto
}

/// Features the dispatch cells select against: the runtime set, capped by
/// the environment force.
#[must_use]
pub fn selection_features() -> FeatureSet {
  platform::runtime_features() & env_force().features()
}

/// Effective string-primitive configuration (after applying overrides).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StringsConfig {
  /// Requested force mode (programmatic, else environment).
  pub requested_force: Force,
  /// Force mode clamped to the detected features.
  pub effective_force: Force,
  /// The feature set variants are selected within.
  pub features: FeatureSet,
}

/// Get the effective configuration for the current process.
#[must_use]
pub fn get() -> StringsConfig {
  let env = env_force();
  let requested_force = programmatic().unwrap_or(env);
  let features = selection_features();
  StringsConfig {
    requested_force,
    effective_force: requested_force.clamp_to(features),
    features: features & requested_force.features(),
  }
}

#[cfg(test)]
mod tests {
  use platform::{Avx2, Neon, Sse2, Sse41};

  use super::*;

  #[test]
  fn test_parse_names_and_aliases() {
    for mode in Force::ALL {
      assert_eq!(Force::parse(mode.as_str()), Ok(mode));
      assert_eq!(mode.as_str().parse::<Force>(), Ok(mode));
    }
    assert_eq!(Force::parse("  AVX2 "), Ok(Force::Avx2));
    assert_eq!(Force::parse("Portable"), Ok(Force::Scalar));
    assert_eq!(Force::parse("sse41"), Ok(Force::Sse41));
    assert_eq!(Force::parse(""), Ok(Force::Auto));
    assert_eq!(Force::parse("avx512"), Err(ParseForceError::new()));
  }

  #[test]
  fn test_features_are_ceilings() {
    assert_eq!(Force::Scalar.features(), FeatureSet::EMPTY);
    assert!(Force::Avx2.features().has(declare!(Sse41)));
    assert!(Force::Auto.features().has(declare!(Avx2)));
    assert!(Force::Auto.features().has(declare!(Neon)));
  }

  #[test]
  fn test_clamp_walks_down_the_family() {
    let sse2_host = declare!(Sse2);
    assert_eq!(Force::Avx2.clamp_to(sse2_host), Force::Sse2);
    assert_eq!(Force::Sse41.clamp_to(sse2_host), Force::Sse2);
    assert_eq!(Force::Neon.clamp_to(sse2_host), Force::Scalar);
    assert_eq!(Force::Auto.clamp_to(FeatureSet::EMPTY), Force::Auto);
    assert_eq!(Force::Avx2.clamp_to(declare!(Avx2)), Force::Avx2);
  }

  #[test]
  fn test_from_u8_round_trips_discriminants() {
    for mode in Force::ALL {
      assert_eq!(Force::from_u8(mode as u8), Some(mode));
    }
    assert_eq!(Force::from_u8(u8::MAX), None);
  }

  #[test]
  fn test_error_display() {
    let msg = alloc::format!("{}", ParseForceError::new());
    assert!(msg.contains("sse4.1"));
  }
}
