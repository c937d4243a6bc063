//! Variant tables and selection.
//!
//! This module provides the selection half of dispatch:
//!
//! - [`Variant`]: one implementation with the features it requires
//! - [`VariantList`]: a validated table, Scalar first, strictly increasing
//! - [`VariantList::select`]: the richest variant a feature set supports
//! - [`VariantList::select_const`]: the same, evaluated at compile time
//! - [`try_select`]: selection over an unvalidated slice
//!
//! # Usage
//!
//! Algorithm crates register implementations as an ordered table with the
//! [`variants!`](crate::variants) macro:
//!
//! ```
//! use backend::variants;
//! use platform::{Avx2, Sse2, declare};
//!
//! type CountFn = fn(&[u8]) -> usize;
//!
//! fn count_scalar(data: &[u8]) -> usize {
//!   data.len()
//! }
//! # fn count_sse2(data: &[u8]) -> usize { data.len() }
//! # fn count_avx2(data: &[u8]) -> usize { data.len() }
//!
//! variants! {
//!   const COUNT: CountFn = [
//!     "scalar" => declare!() => count_scalar,
//!     "sse2" => declare!(Sse2) => count_sse2,
//!     "avx2" => declare!(Avx2) => count_avx2,
//!   ];
//! }
//!
//! let chosen = COUNT.select(declare!(Sse2));
//! assert_eq!(chosen.name, "sse2");
//! assert_eq!(COUNT.select(declare!()).name, "scalar");
//! ```

use platform::{Family, FeatureSet, compiled_features};

use crate::error::{NoCompatibleVariant, VariantListError};

// ─────────────────────────────────────────────────────────────────────────────
// Core Types
// ─────────────────────────────────────────────────────────────────────────────

/// One implementation of a primitive and the features it requires.
#[derive(Clone, Copy, Debug)]
pub struct Variant<F> {
  /// Human-readable name for diagnostics (e.g., `"avx2"`).
  pub name: &'static str,
  /// Required CPU features. Must be a subset of the host's features.
  pub requires: FeatureSet,
  /// The implementation.
  ///
  /// Vector variants wrap `#[target_feature]` code. Only call `func` on a
  /// host whose features include [`requires`](Self::requires), e.g. after
  /// selecting it with [`VariantList::select`] over
  /// `platform::runtime_features()`.
  pub func: F,
  /// Family key of `requires`.
  pub family: Family,
}

impl<F> Variant<F> {
  /// Create a new variant.
  ///
  /// # Panics
  ///
  /// Panics (at compile time when used in a constant) if `requires` mixes
  /// feature families.
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, requires: FeatureSet, func: F) -> Self {
    let family = match requires.family() {
      Some(family) => family,
      None => panic!("variant requirement mixes feature families"),
    };
    Self {
      name,
      requires,
      func,
      family,
    }
  }

  /// Whether `features` can run this variant.
  #[inline]
  #[must_use]
  pub const fn is_supported_by(&self, features: FeatureSet) -> bool {
    features.has(self.requires)
  }
}

/// A validated, static variant table.
///
/// Contract, checked on construction:
/// - the first entry requires no features (the Scalar baseline)
/// - every later entry is strictly richer than the one before it
///
/// All entries share the signature `F`.
pub struct VariantList<F: 'static> {
  variants: &'static [Variant<F>],
  scalar: &'static Variant<F>,
}

impl<F: 'static> Clone for VariantList<F> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<F: 'static> Copy for VariantList<F> {}

impl<F: 'static> VariantList<F> {
  /// Validate `variants`, panicking on a contract violation.
  ///
  /// In a `const` this turns a malformed table into a compile error.
  ///
  /// # Panics
  ///
  /// Panics if [`VariantList::try_new`] fails.
  #[must_use]
  pub const fn new(variants: &'static [Variant<F>]) -> Self {
    match Self::try_new(variants) {
      Ok(list) => list,
      Err(err) => panic!("{}", err.as_str()),
    }
  }

  /// Validate `variants`.
  #[allow(clippy::indexing_slicing)] // index < len
  pub const fn try_new(variants: &'static [Variant<F>]) -> Result<Self, VariantListError> {
    let Some(scalar) = variants.first() else {
      return Err(VariantListError::Empty);
    };
    if !scalar.requires.is_empty() {
      return Err(VariantListError::MissingScalar);
    }

    let mut index = 1;
    while index < variants.len() {
      let richer = variants[index].requires;
      let poorer = variants[index - 1].requires;
      if !richer.is_richer_than(poorer) {
        return Err(VariantListError::NotStrictlyIncreasing { index });
      }
      index += 1;
    }

    Ok(Self { variants, scalar })
  }

  /// All variants, poorest first.
  #[inline]
  #[must_use]
  pub const fn as_slice(&self) -> &'static [Variant<F>] {
    self.variants
  }

  /// The Scalar baseline.
  #[inline]
  #[must_use]
  pub const fn scalar(&self) -> &'static Variant<F> {
    self.scalar
  }

  #[inline]
  #[must_use]
  pub const fn len(&self) -> usize {
    self.variants.len()
  }

  /// Always `false`: a validated list holds at least the Scalar variant.
  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.variants.is_empty()
  }

  /// The richest variant whose requirement is a subset of `features`.
  ///
  /// Scans from the richest end; O(N) in the number of variants.
  #[inline]
  #[must_use]
  pub fn select(&self, features: FeatureSet) -> &'static Variant<F> {
    self
      .variants
      .iter()
      .rev()
      .find(|variant| variant.is_supported_by(features))
      .unwrap_or(self.scalar)
  }

  /// [`select`](Self::select) as a `const fn`, for compile-time dispatch.
  #[must_use]
  #[allow(clippy::indexing_slicing)] // 1 <= index < len
  pub const fn select_const(&self, features: FeatureSet) -> &'static Variant<F> {
    let mut index = self.variants.len();
    while index > 1 {
      index -= 1;
      let variant = &self.variants[index];
      if variant.is_supported_by(features) {
        return variant;
      }
    }
    self.scalar
  }

  /// Compile-time selection clamped to what the build targets.
  ///
  /// `requested` only narrows the choice: a variant is never picked unless
  /// [`compiled_features()`] guarantees it can run.
  #[must_use]
  pub const fn select_compiled(&self, requested: FeatureSet) -> &'static Variant<F> {
    self.select_const(requested.intersection(compiled_features()))
  }

  /// Find a variant by name.
  #[must_use]
  pub fn by_name(&self, name: &str) -> Option<&'static Variant<F>> {
    self.variants.iter().find(|variant| variant.name == name)
  }
}

impl<F: 'static> core::fmt::Debug for VariantList<F> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_list()
      .entries(self.variants.iter().map(|variant| (variant.name, variant.requires)))
      .finish()
  }
}

/// Select from an unvalidated slice.
///
/// Returns the last entry whose requirement `features` satisfies, which is
/// the richest one for a well-formed table.
///
/// # Errors
///
/// Returns [`NoCompatibleVariant`] if no entry matches, which for a
/// well-formed table cannot happen because the Scalar entry always does.
pub fn try_select<F>(features: FeatureSet, variants: &[Variant<F>]) -> Result<&Variant<F>, NoCompatibleVariant> {
  variants
    .iter()
    .rev()
    .find(|variant| variant.is_supported_by(features))
    .ok_or(NoCompatibleVariant::new(variants.len()))
}

#[cfg(test)]
mod tests {
  use platform::{Avx2, Neon, NeonFma, Popcnt, Sse2, Sse41, Tag, declare};

  use super::*;

  type TestFn = fn(u32) -> u32;

  fn scalar(x: u32) -> u32 {
    x
  }

  fn sse2(x: u32) -> u32 {
    x + 1
  }

  fn sse41(x: u32) -> u32 {
    x + 2
  }

  fn avx2(x: u32) -> u32 {
    x + 3
  }

  crate::variants! {
    const X86: TestFn = [
      "scalar" => declare!() => scalar,
      "sse2" => declare!(Sse2) => sse2,
      "sse4.1" => declare!(Sse41) => sse41,
      "avx2" => declare!(Avx2) => avx2,
    ];
  }

  #[test]
  fn test_variant_creation() {
    let v: Variant<TestFn> = Variant::new("test", FeatureSet::EMPTY, scalar);
    assert_eq!(v.name, "test");
    assert_eq!(v.requires, FeatureSet::EMPTY);
    assert_eq!(v.family, Family::Scalar);
    assert_eq!(Variant::new("neon", declare!(Neon), scalar as TestFn).family, Family::Arm);
  }

  #[test]
  fn test_select_richest_supported() {
    assert_eq!(X86.select(declare!(Sse41, Popcnt)).name, "sse4.1");
    assert_eq!(X86.select(declare!(Avx2)).name, "avx2");
    assert_eq!((X86.select(declare!(Sse2)).func)(10), 11);
  }

  #[test]
  fn test_select_portable_fallback() {
    assert_eq!(X86.select(FeatureSet::EMPTY).name, "scalar");
    assert_eq!(X86.select(declare!(NeonFma)).name, "scalar");
  }

  #[test]
  fn test_select_skips_unavailable() {
    // AVX2 bit without the lower tiers does not satisfy the AVX2 requirement.
    let features = Sse2::BIT | Avx2::BIT;
    assert_eq!(X86.select(features).name, "sse2");
  }

  #[test]
  fn test_select_const_matches_select() {
    for features in [
      FeatureSet::EMPTY,
      declare!(Sse2),
      declare!(Sse41),
      declare!(Avx2),
      declare!(Popcnt),
      declare!(Neon),
    ] {
      assert_eq!(X86.select_const(features).name, X86.select(features).name);
    }
  }

  #[test]
  fn test_select_const_in_const_context() {
    const CHOSEN: &Variant<TestFn> = X86.select_const(declare!(Sse41));
    assert_eq!(CHOSEN.name, "sse4.1");
  }

  #[test]
  fn test_select_compiled_never_exceeds_build() {
    let chosen = X86.select_compiled(FeatureSet::ALL);
    assert!(compiled_features().has(chosen.requires));
  }

  #[test]
  fn test_try_new_errors() {
    static EMPTY: [Variant<TestFn>; 0] = [];
    static NO_SCALAR: [Variant<TestFn>; 1] = [Variant {
      name: "sse2",
      requires: Sse2::BIT,
      func: sse2,
      family: Family::X86,
    }];
    static UNSORTED: [Variant<TestFn>; 3] = [
      Variant {
        name: "scalar",
        requires: FeatureSet::EMPTY,
        func: scalar,
        family: Family::Scalar,
      },
      Variant {
        name: "avx2",
        requires: declare!(Avx2),
        func: avx2,
        family: Family::X86,
      },
      Variant {
        name: "sse2",
        requires: Sse2::BIT,
        func: sse2,
        family: Family::X86,
      },
    ];

    assert_eq!(VariantList::try_new(&EMPTY).err(), Some(VariantListError::Empty));
    assert_eq!(VariantList::try_new(&NO_SCALAR).err(), Some(VariantListError::MissingScalar));
    assert_eq!(
      VariantList::try_new(&UNSORTED).err(),
      Some(VariantListError::NotStrictlyIncreasing { index: 2 })
    );
  }

  #[test]
  fn test_try_select() {
    let table = [Variant::new("sse2", Sse2::BIT, sse2 as TestFn)];
    assert_eq!(try_select(Sse2::BIT, &table).map(|v| v.name), Ok("sse2"));
    assert_eq!(
      try_select(FeatureSet::EMPTY, &table).map(|v| v.name),
      Err(NoCompatibleVariant::new(1))
    );
    assert_eq!(try_select(declare!(Avx2), X86.as_slice()).map(|v| v.name), Ok("avx2"));
  }

  #[test]
  fn test_by_name() {
    assert_eq!(X86.by_name("sse4.1").map(|v| v.requires), Some(declare!(Sse41)));
    assert!(X86.by_name("neon").is_none());
    assert_eq!(X86.len(), 4);
    assert!(!X86.is_empty());
    assert_eq!(X86.scalar().name, "scalar");
  }
}

#[cfg(all(test, not(miri)))]
mod proptests {
  use platform::{Avx2, Sse2, Sse3, Sse41, Sse42, Ssse3, declare};
  use proptest::prelude::*;

  use super::*;

  type TestFn = fn() -> u8;

  fn f() -> u8 {
    0
  }

  crate::variants! {
    const CHAIN: TestFn = [
      "scalar" => declare!() => f,
      "sse2" => declare!(Sse2) => f,
      "sse3" => declare!(Sse3) => f,
      "ssse3" => declare!(Ssse3) => f,
      "sse4.1" => declare!(Sse41) => f,
      "sse4.2" => declare!(Sse42) => f,
      "avx2" => declare!(Avx2) => f,
    ];
  }

  proptest! {
    #[test]
    fn selected_is_supported_and_richest(bits in any::<u32>()) {
      let features = FeatureSet::from_bits_truncate(bits);
      let chosen = CHAIN.select(features);
      prop_assert!(features.has(chosen.requires));
      for variant in CHAIN.as_slice() {
        if features.has(variant.requires) {
          prop_assert!(chosen.requires >= variant.requires);
        }
      }
    }

    #[test]
    fn selection_is_monotonic(a in any::<u32>(), b in any::<u32>()) {
      let small = FeatureSet::from_bits_truncate(a);
      let large = small | FeatureSet::from_bits_truncate(b);
      prop_assert!(CHAIN.select(large).requires >= CHAIN.select(small).requires);
    }
  }
}
