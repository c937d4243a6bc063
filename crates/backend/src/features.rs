//! Re-exported feature types and tags.
//!
//! Algorithm crates can import everything they need to declare variant
//! requirements from `backend::features` instead of reaching into `platform`.
//!
//! ```
//! use backend::features::{Avx2, FeatureSet, declare};
//!
//! const REQ: FeatureSet = declare!(Avx2);
//! assert!(!REQ.is_empty());
//! ```

pub use platform::{
  Avx, Avx2, Avx512f, AvxF16c, AvxFma, Bmi1, Bmi2, Family, FeatureSet, Lzcnt, Neon, NeonFma, NeonFp16, Popcnt, Sha,
  Simd128, Sse2, Sse3, Sse41, Sse42, Ssse3, Tag, compiled_features, declare, features_of, runtime_features,
};
