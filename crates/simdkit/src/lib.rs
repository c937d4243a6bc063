//! CPU feature detection, cached function dispatch, and SIMD byte-string
//! primitives under one name.
//!
//! # Quick Start
//!
//! ```
//! use simdkit::{Force, find, lowercase_in_place};
//!
//! assert_eq!(find(b"Lorem ipsum dolor", b' '), Some(5));
//!
//! let mut buf = *b"Hello, World! 42";
//! lowercase_in_place(&mut buf);
//! assert_eq!(&buf, b"hello, world! 42");
//!
//! println!("{}", simdkit::DispatchInfo::current());
//! # let _ = Force::Auto;
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std` | Yes | Runtime CPU detection through OS facilities |
//! | `alloc` | Yes | Owned string helpers (implied by `std`) |
//! | `tracing` | Yes | Dispatch events through the `tracing` crate |
//! | `strings` | Yes | The byte-string primitives |
//! | `load-time` | No | Resolve dispatch cells from an ELF constructor |
//!
//! ## `no_std` Usage
//!
//! ```toml
//! [dependencies]
//! simdkit = { version = "0.1", default-features = false, features = ["strings"] }
//! ```
//!
//! Without `std`, selection uses compile-time features unless a pre-init
//! override is installed with [`platform::set_override`].
#![cfg_attr(not(feature = "std"), no_std)]

// =============================================================================
// Feature detection and dispatch
// =============================================================================

pub use backend::{
  self, DispatchCell, NoCompatibleVariant, Variant, VariantList, VariantListError, dispatch_static, dispatcher,
  try_select, variants,
};
pub use platform::{self, FeatureSet, Tag, compiled_features, declare, runtime_features};

// =============================================================================
// Strings
// =============================================================================

#[cfg(feature = "strings")]
pub use strings::{
  self,
  // Primitives
  common_prefix,
  find,
  find_last,
  lowercase_in_place,
  replace_in_place,
  uppercase_in_place,
  // Searches
  find_any,
  find_last_any,
  find_last_not_any,
  find_last_substring,
  find_not_any,
  find_substring,
  // Affixes
  has_prefix,
  has_suffix,
  trimmed,
  // Configuration
  Force,
  force,
  // Introspection
  DispatchInfo,
};
#[cfg(all(feature = "strings", feature = "alloc"))]
pub use strings::{replace_all, to_lowercase, to_uppercase};
