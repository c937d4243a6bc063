// ─────────────────────────────────────────────────────────────────────────────
// Compile-Time Static Detection
// ─────────────────────────────────────────────────────────────────────────────

use crate::features::FeatureSet;

/// Features the build is compiled to target.
///
/// Detects features enabled via `-C target-feature=...` or `-C target-cpu=...`.
/// This is the "Default" set: code compiled into this binary may already use
/// every feature in it, so the host must support all of them.
///
/// ```
/// const BUILD: platform::FeatureSet = platform::compiled_features();
///
/// #[cfg(target_arch = "x86_64")]
/// assert!(BUILD.has(platform::declare!(platform::Sse2)));
///
/// #[cfg(target_arch = "aarch64")]
/// assert!(BUILD.has(platform::declare!(platform::NeonFma)));
/// ```
#[inline(always)]
#[must_use]
pub const fn compiled_features() -> FeatureSet {
  #[allow(unused_macros)]
  macro_rules! detect {
    ($set:ident; $($feature:literal => $tag:ty),+ $(,)?) => {
      $(if cfg!(target_feature = $feature) { $set = $set.union(<$tag as crate::Tag>::IMPLIED); })+
    };
  }

  #[allow(unused_mut)]
  let mut result = FeatureSet::EMPTY;

  #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
  {
    use crate::features::*;

    detect!(result;
      "sse2" => Sse2,
      "sse3" => Sse3,
      "ssse3" => Ssse3,
      "sse4.1" => Sse41,
      "sse4.2" => Sse42,
      "avx" => Avx,
      "avx2" => Avx2,
      "avx512f" => Avx512f,
      "f16c" => AvxF16c,
      "fma" => AvxFma,
      "popcnt" => Popcnt,
      "lzcnt" => Lzcnt,
      "bmi1" => Bmi1,
      "bmi2" => Bmi2,
      "sha" => Sha,
    );
  }

  // AArch64 Advanced SIMD always includes fused multiply-add.
  #[cfg(any(target_arch = "aarch64", target_arch = "arm64ec"))]
  {
    use crate::features::*;

    detect!(result;
      "neon" => NeonFma,
      "fp16" => NeonFp16,
    );
  }

  #[cfg(target_arch = "arm")]
  {
    use crate::features::*;

    detect!(result; "neon" => Neon);
    if cfg!(all(target_feature = "neon", target_feature = "vfp4")) {
      result = result.union(<NeonFma as crate::Tag>::IMPLIED);
    }
  }

  #[cfg(any(target_arch = "wasm32", target_arch = "wasm64"))]
  {
    use crate::features::*;

    detect!(result; "simd128" => Simd128);
  }

  result
}

/// The richest base-ISA tier the build targets, as a one-bit set.
///
/// [`FeatureSet::EMPTY`] on targets with no SIMD baseline.
#[inline]
#[must_use]
pub const fn default_base() -> FeatureSet {
  compiled_features().base_tier()
}
