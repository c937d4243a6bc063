//! CPU feature tags and the [`FeatureSet`] bitset.
//!
//! Every named capability is a zero-sized tag type implementing [`Tag`]. A tag
//! can be promoted to a one-bit [`FeatureSet`] with [`features_of`], and a list
//! of tags can be turned into a variant requirement with [`declare!`].
//!
//! # Bit Layout
//!
//! - Bits 0-15: x86/x86_64 (base tiers 0-7, AVX extras 8-9, orthogonal extras 10-14)
//! - Bits 16-23: ARM (base tiers 16-18)
//! - Bits 24-31: WebAssembly (24)
//!
//! # Tiers
//!
//! Base-ISA tiers of one family form a strict chain. A requirement built with
//! [`declare!`] includes every poorer tier of the named one:
//!
//! ```
//! use platform::{Avx2, Sse2, Sse42, declare, features_of};
//!
//! const REQ: platform::FeatureSet = declare!(Avx2);
//! assert!(REQ.has(features_of::<Sse2>()));
//! assert!(REQ.has(features_of::<Sse42>()));
//! assert!(!features_of::<Avx2>().has(features_of::<Sse2>()));
//! ```

use core::{cmp::Ordering, fmt, ops};

// ─────────────────────────────────────────────────────────────────────────────
// Core Feature Set Type
// ─────────────────────────────────────────────────────────────────────────────

/// A set of CPU capabilities.
///
/// `FeatureSet` is `Copy` and compares with the subset order: `a <= b` means
/// every capability in `a` is also in `b`. Two sets where neither contains the
/// other are unordered.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct FeatureSet(u32);

impl FeatureSet {
  /// The empty set: the scalar baseline.
  pub const EMPTY: Self = Self(0);

  /// Every named capability.
  pub const ALL: Self = Self(0x0000_7FFF | 0x0007_0000 | 0x0100_0000);

  /// Build a set from raw bits, keeping only known capability bits.
  ///
  /// Only available with the `testing` feature or in test builds.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn from_bits_truncate(bits: u32) -> Self {
    Self(bits & Self::ALL.0)
  }

  #[inline]
  pub(crate) const fn from_word(bits: u32) -> Self {
    Self(bits & Self::ALL.0)
  }

  /// The raw bit representation.
  #[inline]
  #[must_use]
  pub const fn bits(self) -> u32 {
    self.0
  }

  /// Check if all features in `required` are present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    self.0 & required.0 == required.0
  }

  /// `self` is a strict superset of `other`.
  #[inline]
  #[must_use]
  pub const fn is_richer_than(self, other: Self) -> bool {
    self.has(other) && self.0 != other.0
  }

  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self(self.0 & other.0)
  }

  /// Features in `self` that are not in `other`.
  #[inline]
  #[must_use]
  pub const fn difference(self, other: Self) -> Self {
    Self(self.0 & !other.0)
  }

  #[inline]
  #[must_use]
  pub const fn symmetric_difference(self, other: Self) -> Self {
    Self(self.0 ^ other.0)
  }

  /// Every known capability not in `self`.
  #[inline]
  #[must_use]
  pub const fn complement(self) -> Self {
    Self(!self.0 & Self::ALL.0)
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Number of capabilities present.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0.count_ones()
  }

  /// The family the set belongs to, or `None` when it mixes families.
  ///
  /// The empty set belongs to [`Family::Scalar`].
  #[must_use]
  pub const fn family(self) -> Option<Family> {
    let x86 = self.0 & X86_MASK != 0;
    let arm = self.0 & ARM_MASK != 0;
    let wasm = self.0 & WASM_MASK != 0;
    match (x86, arm, wasm) {
      (false, false, false) => Some(Family::Scalar),
      (true, false, false) => Some(Family::X86),
      (false, true, false) => Some(Family::Arm),
      (false, false, true) => Some(Family::Wasm),
      _ => None,
    }
  }

  /// The richest base-ISA tier present, as a one-bit set.
  ///
  /// Orthogonal extras are ignored. Returns [`FeatureSet::EMPTY`] when no base
  /// tier is present.
  #[must_use]
  pub const fn base_tier(self) -> Self {
    let tiers = self.0 & BASE_TIER_MASK;
    if tiers == 0 {
      return Self::EMPTY;
    }
    Self(1 << (31 - tiers.leading_zeros()))
  }

  /// Iterate over the names of the capabilities present, poorest first.
  pub fn iter(self) -> impl Iterator<Item = &'static str> {
    NAMES
      .iter()
      .filter_map(move |&(bit, name)| if self.0 & bit != 0 { Some(name) } else { None })
  }
}

impl<T: Tag> From<T> for FeatureSet {
  #[inline]
  fn from(_: T) -> Self {
    T::BIT
  }
}

impl ops::BitOr for FeatureSet {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl ops::BitAnd for FeatureSet {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self::Output {
    self.intersection(rhs)
  }
}

impl ops::BitXor for FeatureSet {
  type Output = Self;

  #[inline]
  fn bitxor(self, rhs: Self) -> Self::Output {
    self.symmetric_difference(rhs)
  }
}

impl ops::Not for FeatureSet {
  type Output = Self;

  #[inline]
  fn not(self) -> Self::Output {
    self.complement()
  }
}

impl ops::BitOrAssign for FeatureSet {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl ops::BitAndAssign for FeatureSet {
  #[inline]
  fn bitand_assign(&mut self, rhs: Self) {
    *self = self.intersection(rhs);
  }
}

impl ops::BitXorAssign for FeatureSet {
  #[inline]
  fn bitxor_assign(&mut self, rhs: Self) {
    *self = self.symmetric_difference(rhs);
  }
}

impl PartialOrd for FeatureSet {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    if self.0 == other.0 {
      Some(Ordering::Equal)
    } else if other.has(*self) {
      Some(Ordering::Less)
    } else if self.has(*other) {
      Some(Ordering::Greater)
    } else {
      None
    }
  }
}

impl fmt::Display for FeatureSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut names = self.iter();
    let Some(first) = names.next() else {
      return f.write_str("scalar");
    };
    f.write_str(first)?;
    for name in names {
      write!(f, ", {name}")?;
    }
    Ok(())
  }
}

impl fmt::Debug for FeatureSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "FeatureSet({self})")
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Families
// ─────────────────────────────────────────────────────────────────────────────

/// Instruction-set family a tag or a variant belongs to.
///
/// Tags of different families never combine into one requirement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Family {
  /// No optional features.
  #[default]
  Scalar,
  X86,
  Arm,
  Wasm,
}

impl Family {
  /// The family matching the compilation target.
  #[must_use]
  pub const fn current() -> Self {
    if cfg!(any(target_arch = "x86", target_arch = "x86_64")) {
      Self::X86
    } else if cfg!(any(target_arch = "arm", target_arch = "aarch64", target_arch = "arm64ec")) {
      Self::Arm
    } else if cfg!(any(target_arch = "wasm32", target_arch = "wasm64")) {
      Self::Wasm
    } else {
      Self::Scalar
    }
  }

  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Scalar => "scalar",
      Self::X86 => "x86",
      Self::Arm => "arm",
      Self::Wasm => "wasm",
    }
  }

  /// Whether a set of this family can be combined with one of `other`.
  ///
  /// Scalar combines with everything.
  #[inline]
  #[must_use]
  pub const fn combines_with(self, other: Self) -> bool {
    matches!(self, Self::Scalar) || matches!(other, Self::Scalar) || self as u8 == other as u8
  }
}

impl fmt::Display for Family {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tags
// ─────────────────────────────────────────────────────────────────────────────

/// A named CPU capability.
///
/// Implemented by zero-sized tag types only. Tags carry their bit, the set
/// they imply when used as a requirement, and their family.
pub trait Tag: Copy + Default + fmt::Debug + 'static {
  /// The tag's own bit.
  const BIT: FeatureSet;
  /// The tag plus every poorer tier it implies.
  const IMPLIED: FeatureSet;
  /// Lowercase diagnostic name.
  const NAME: &'static str;
  const FAMILY: Family;
}

/// Promote a tag to its one-bit feature set.
#[inline]
#[must_use]
pub const fn features_of<T: Tag>() -> FeatureSet {
  T::BIT
}

/// The requirement a tag contributes to a [`declare!`] list.
#[doc(hidden)]
#[inline]
#[must_use]
pub const fn implied_by<T: Tag>() -> (FeatureSet, Family) {
  (T::IMPLIED, T::FAMILY)
}

/// Combine `(requirement, family)` pairs, panicking on mixed families.
///
/// Called from [`declare!`] inside a `const` block, so a mixed-family list is
/// rejected at compile time.
#[doc(hidden)]
#[must_use]
pub const fn combine(parts: &[(FeatureSet, Family)]) -> FeatureSet {
  let mut set = FeatureSet::EMPTY;
  let mut family = Family::Scalar;
  let mut i = 0;
  while i < parts.len() {
    let (bits, fam) = parts[i];
    assert!(family.combines_with(fam), "feature tags from different families cannot be combined");
    if !matches!(fam, Family::Scalar) {
      family = fam;
    }
    set = set.union(bits);
    i += 1;
  }
  set
}

/// Build a compile-time [`FeatureSet`] requirement from a list of tags.
///
/// Base tiers pull in every poorer tier of their family. Mixing tags from
/// different families fails const evaluation.
///
/// ```
/// use platform::{Avx2, Bmi1, FeatureSet, Popcnt, declare};
///
/// const AVX2_BMI: FeatureSet = declare!(Avx2, Bmi1);
/// const POPCNT: FeatureSet = declare!(Popcnt);
/// assert!(AVX2_BMI.is_richer_than(declare!(Avx2)));
/// assert_eq!(POPCNT.count(), 1);
/// assert_eq!(declare!(), FeatureSet::EMPTY);
/// ```
///
/// ```compile_fail
/// use platform::{Avx2, Neon, declare};
///
/// const MIXED: platform::FeatureSet = declare!(Avx2, Neon);
/// ```
#[macro_export]
macro_rules! declare {
  () => {
    $crate::FeatureSet::EMPTY
  };
  ($($tag:ty),+ $(,)?) => {
    const { $crate::features::combine(&[$($crate::features::implied_by::<$tag>()),+]) }
  };
}

macro_rules! tags {
  ($(
    $(#[$meta:meta])*
    $name:ident => bit $bit:literal, $label:literal, $family:ident $(, implies [$($implied:ident),+])?;
  )+) => {
    $(
      $(#[$meta])*
      #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
      pub struct $name;

      impl Tag for $name {
        const BIT: FeatureSet = FeatureSet(1 << $bit);
        const IMPLIED: FeatureSet = FeatureSet((1 << $bit) $($(| <$implied as Tag>::IMPLIED.0)+)?);
        const NAME: &'static str = $label;
        const FAMILY: Family = Family::$family;
      }
    )+

    /// `(bit, name)` pairs, poorest first.
    const NAMES: &[(u32, &str)] = &[$((1 << $bit, $label)),+];
  };
}

tags! {
  // ─── x86 base tiers ───
  /// SSE2, the x86_64 baseline.
  Sse2 => bit 0, "sse2", X86;
  Sse3 => bit 1, "sse3", X86, implies [Sse2];
  Ssse3 => bit 2, "ssse3", X86, implies [Sse3];
  Sse41 => bit 3, "sse4.1", X86, implies [Ssse3];
  Sse42 => bit 4, "sse4.2", X86, implies [Sse41];
  Avx => bit 5, "avx", X86, implies [Sse42];
  Avx2 => bit 6, "avx2", X86, implies [Avx];
  /// AVX-512 Foundation.
  Avx512f => bit 7, "avx512f", X86, implies [Avx2];

  // ─── x86 AVX extras ───
  /// 16-bit float conversion; requires AVX.
  AvxF16c => bit 8, "f16c", X86, implies [Avx];
  /// Fused multiply-add; requires AVX.
  AvxFma => bit 9, "fma", X86, implies [Avx];

  // ─── x86 orthogonal extras ───
  Popcnt => bit 10, "popcnt", X86;
  Lzcnt => bit 11, "lzcnt", X86;
  Bmi1 => bit 12, "bmi1", X86;
  Bmi2 => bit 13, "bmi2", X86;
  Sha => bit 14, "sha", X86;

  // ─── ARM base tiers ───
  /// Advanced SIMD.
  Neon => bit 16, "neon", Arm;
  NeonFma => bit 17, "neon-fma", Arm, implies [Neon];
  /// Half-precision arithmetic on NEON registers.
  NeonFp16 => bit 18, "neon-fp16", Arm, implies [NeonFma];

  // ─── WebAssembly ───
  /// 128-bit packed SIMD.
  Simd128 => bit 24, "simd128", Wasm;
}

const X86_MASK: u32 = 0x0000_FFFF;
const ARM_MASK: u32 = 0x00FF_0000;
const WASM_MASK: u32 = 0xFF00_0000 & !(1 << 31);
const BASE_TIER_MASK: u32 = 0x00FF | (0b111 << 16) | (1 << 24);

/// The x86 base tiers, poorest first.
pub const X86_TIERS: [FeatureSet; 8] = [
  Sse2::BIT,
  Sse3::BIT,
  Ssse3::BIT,
  Sse41::BIT,
  Sse42::BIT,
  Avx::BIT,
  Avx2::BIT,
  Avx512f::BIT,
];

/// The ARM base tiers, poorest first.
pub const ARM_TIERS: [FeatureSet; 3] = [Neon::BIT, NeonFma::BIT, NeonFp16::BIT];

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::{format, string::ToString, vec::Vec};

  use super::*;

  #[test]
  fn test_one_bit_per_tag() {
    let all = [
      Sse2::BIT,
      Sse3::BIT,
      Ssse3::BIT,
      Sse41::BIT,
      Sse42::BIT,
      Avx::BIT,
      Avx2::BIT,
      Avx512f::BIT,
      AvxF16c::BIT,
      AvxFma::BIT,
      Popcnt::BIT,
      Lzcnt::BIT,
      Bmi1::BIT,
      Bmi2::BIT,
      Sha::BIT,
      Neon::BIT,
      NeonFma::BIT,
      NeonFp16::BIT,
      Simd128::BIT,
    ];
    let mut seen = FeatureSet::EMPTY;
    for set in all {
      assert_eq!(set.count(), 1);
      assert!(!seen.has(set), "bit reused: {set:?}");
      seen |= set;
    }
    assert_eq!(seen, FeatureSet::ALL);
    assert_eq!(NAMES.len(), all.len());
  }

  #[test]
  fn test_tiers_form_chains() {
    let mut below = FeatureSet::EMPTY;
    for tier in X86_TIERS {
      assert!(!below.has(tier));
      below |= tier;
    }
    assert_eq!(declare!(Avx512f), below);
    assert!(Avx512f::IMPLIED.has(Sse2::BIT | Sse42::BIT | Avx::BIT | Avx2::BIT));
    assert_eq!(Avx512f::IMPLIED.count(), 8);
    assert_eq!(NeonFp16::IMPLIED, Neon::BIT | NeonFma::BIT | NeonFp16::BIT);
    assert_eq!(Sse2::IMPLIED, Sse2::BIT);
  }

  #[test]
  fn test_extras_imply_avx_only_where_required() {
    assert!(AvxFma::IMPLIED.has(declare!(Avx)));
    assert!(!AvxFma::IMPLIED.has(Avx2::BIT));
    assert_eq!(declare!(Popcnt), Popcnt::BIT);
    assert_eq!(declare!(Bmi1, Bmi2).count(), 2);
  }

  #[test]
  fn test_declare_combines_implied_sets() {
    const REQ: FeatureSet = declare!(Avx2, Popcnt);
    assert_eq!(REQ, Avx2::IMPLIED | Popcnt::BIT);
    assert_eq!(REQ.family(), Some(Family::X86));
    assert_eq!(declare!(), FeatureSet::EMPTY);
  }

  #[test]
  fn test_features_of_is_one_bit() {
    assert_eq!(features_of::<Avx2>().count(), 1);
    assert_eq!(FeatureSet::from(Neon), Neon::BIT);
  }

  #[test]
  fn test_family_of_sets() {
    assert_eq!(FeatureSet::EMPTY.family(), Some(Family::Scalar));
    assert_eq!(declare!(NeonFma).family(), Some(Family::Arm));
    assert_eq!(declare!(Simd128).family(), Some(Family::Wasm));
    assert_eq!((Sse2::BIT | Neon::BIT).family(), None);
  }

  #[test]
  #[should_panic(expected = "different families")]
  fn test_combine_rejects_mixed_families_at_runtime() {
    let parts = [implied_by::<Sse41>(), implied_by::<Neon>()];
    let _ = core::hint::black_box(combine(&parts));
  }

  #[test]
  fn test_subset_order() {
    let sse = declare!(Sse42);
    let avx2 = declare!(Avx2);
    assert!(sse < avx2);
    assert!(avx2 > sse);
    assert!(sse <= sse);
    assert_eq!(Popcnt::BIT.partial_cmp(&Lzcnt::BIT), None);
    assert!(avx2.is_richer_than(sse));
    assert!(!sse.is_richer_than(sse));
  }

  #[test]
  fn test_operators() {
    let a = declare!(Sse3);
    let b = declare!(Ssse3);
    assert_eq!(a | b, b);
    assert_eq!(a & b, a);
    assert_eq!(b ^ a, Ssse3::BIT);
    assert_eq!(b.difference(a), Ssse3::BIT);
    assert!(!(!a).has(Sse2::BIT));
    assert_eq!(!FeatureSet::EMPTY, FeatureSet::ALL);
  }

  #[test]
  fn test_base_tier() {
    assert_eq!(declare!(Avx2, Bmi2).base_tier(), Avx2::BIT);
    assert_eq!(declare!(Popcnt).base_tier(), FeatureSet::EMPTY);
    assert_eq!(declare!(NeonFp16).base_tier(), NeonFp16::BIT);
    assert_eq!(declare!(AvxFma).base_tier(), Avx::BIT);
  }

  #[test]
  fn test_display() {
    assert_eq!(FeatureSet::EMPTY.to_string(), "scalar");
    assert_eq!(declare!(Sse3).to_string(), "sse2, sse3");
    assert_eq!(declare!(Sse41, Popcnt).to_string(), "sse2, sse3, ssse3, sse4.1, popcnt");
    assert_eq!(format!("{:?}", declare!(Neon)), "FeatureSet(neon)");
  }

  #[test]
  fn test_iter_names() {
    let names: Vec<_> = declare!(NeonFma).iter().collect();
    assert_eq!(names, ["neon", "neon-fma"]);
    assert_eq!(FeatureSet::EMPTY.iter().count(), 0);
  }

  #[test]
  fn test_family_combines() {
    assert!(Family::Scalar.combines_with(Family::Arm));
    assert!(Family::X86.combines_with(Family::X86));
    assert!(!Family::X86.combines_with(Family::Wasm));
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Property-Based Tests (proptest)
// Note: proptest uses filesystem for failure persistence, which Miri doesn't support.
// ─────────────────────────────────────────────────────────────────────────────
