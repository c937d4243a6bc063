//! Error types for variant selection.
//!
//! Both errors describe programming mistakes in a variant table, not runtime
//! conditions. [`VariantList::new`](crate::VariantList::new) turns them into
//! compile errors; the fallible forms exist for tables built at runtime.

use core::fmt;

/// No variant's requirement is satisfied by the supplied features.
///
/// Only possible for a slice without a Scalar fallback.
///
/// ```
/// use backend::{NoCompatibleVariant, Variant, try_select};
/// use platform::{Avx2, FeatureSet, declare};
///
/// fn fast() {}
///
/// let table = [Variant::new("avx2", declare!(Avx2), fast as fn())];
/// let err = try_select(FeatureSet::EMPTY, &table).unwrap_err();
/// assert_eq!(err, NoCompatibleVariant::new(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct NoCompatibleVariant {
  /// Number of variants that were considered.
  pub candidates: usize,
}

impl NoCompatibleVariant {
  #[inline]
  #[must_use]
  pub const fn new(candidates: usize) -> Self {
    Self { candidates }
  }
}

impl fmt::Display for NoCompatibleVariant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "no compatible variant among {} candidates (missing scalar fallback)",
      self.candidates
    )
  }
}

impl core::error::Error for NoCompatibleVariant {}

/// A variant table violates the list contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum VariantListError {
  /// The table has no entries.
  Empty,
  /// The first entry requires features; it must be the Scalar baseline.
  MissingScalar,
  /// Entry `index` is not strictly richer than the one before it.
  NotStrictlyIncreasing {
    index: usize,
  },
}

impl VariantListError {
  /// Static description, usable from `const` panics.
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Empty => "variant list is empty",
      Self::MissingScalar => "variant list must start with a scalar variant requiring no features",
      Self::NotStrictlyIncreasing { .. } => "variant list must be sorted by strictly increasing requirements",
    }
  }
}

impl fmt::Display for VariantListError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NotStrictlyIncreasing { index } => write!(f, "{} (at index {index})", self.as_str()),
      _ => f.write_str(self.as_str()),
    }
  }
}

impl core::error::Error for VariantListError {}
