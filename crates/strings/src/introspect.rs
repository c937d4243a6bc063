//! Dispatch introspection for verifying which variants run.
//!
//! ```
//! use strings::DispatchInfo;
//!
//! let info = DispatchInfo::current();
//! println!("{info}");
//! assert_eq!(info.find_last, "scalar");
//! ```

use core::fmt;

use platform::FeatureSet;

use crate::{
  config::{self, Force},
  kernels::{
    COMMON_PREFIX_DISPATCH, FIND_DISPATCH, FIND_LAST_DISPATCH, LOWERCASE_DISPATCH, REPLACE_DISPATCH,
    UPPERCASE_DISPATCH,
  },
};

/// The detected features and the variant each primitive resolved to.
///
/// Building one resolves every dispatch cell that was still unresolved.
#[derive(Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct DispatchInfo {
  /// Features detected on the running host.
  pub features: FeatureSet,
  /// Active force mode after clamping.
  pub force: Force,
  pub find: &'static str,
  pub find_last: &'static str,
  pub common_prefix: &'static str,
  pub lowercase: &'static str,
  pub uppercase: &'static str,
  pub replace: &'static str,
}

impl DispatchInfo {
  /// Snapshot the current dispatch state.
  #[must_use]
  pub fn current() -> Self {
    Self {
      features: platform::runtime_features(),
      force: config::get().effective_force,
      find: FIND_DISPATCH.backend_name(),
      find_last: FIND_LAST_DISPATCH.backend_name(),
      common_prefix: COMMON_PREFIX_DISPATCH.backend_name(),
      lowercase: LOWERCASE_DISPATCH.backend_name(),
      uppercase: UPPERCASE_DISPATCH.backend_name(),
      replace: REPLACE_DISPATCH.backend_name(),
    }
  }

  /// `(primitive, variant)` pairs in a fixed order.
  #[must_use]
  pub const fn variants(&self) -> [(&'static str, &'static str); 6] {
    [
      ("find", self.find),
      ("find_last", self.find_last),
      ("common_prefix", self.common_prefix),
      ("lowercase", self.lowercase),
      ("uppercase", self.uppercase),
      ("replace", self.replace),
    ]
  }

  /// Emit the snapshot as one `info` event.
  pub fn log(&self) {
    #[cfg(feature = "tracing")]
    tracing::info!(
      features = %self.features,
      force = %self.force,
      find = self.find,
      find_last = self.find_last,
      common_prefix = self.common_prefix,
      lowercase = self.lowercase,
      uppercase = self.uppercase,
      replace = self.replace,
      "string primitive dispatch"
    );
  }
}

impl fmt::Display for DispatchInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "features: {}; force: {}", self.features, self.force)?;
    for (primitive, variant) in self.variants() {
      write!(f, "; {primitive}: {variant}")?;
    }
    Ok(())
  }
}

impl fmt::Debug for DispatchInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut s = f.debug_struct("DispatchInfo");
    s.field("features", &format_args!("{}", self.features));
    s.field("force", &self.force);
    for (primitive, variant) in self.variants() {
      s.field(primitive, &variant);
    }
    s.finish()
  }
}

/// Variant `find` dispatches to.
#[must_use]
pub fn find_backend_name() -> &'static str {
  FIND_DISPATCH.backend_name()
}

/// Variant `find_last` dispatches to.
#[must_use]
pub fn find_last_backend_name() -> &'static str {
  FIND_LAST_DISPATCH.backend_name()
}

/// Variant `common_prefix` dispatches to.
#[must_use]
pub fn common_prefix_backend_name() -> &'static str {
  COMMON_PREFIX_DISPATCH.backend_name()
}

/// Variant `lowercase_in_place` dispatches to.
#[must_use]
pub fn lowercase_backend_name() -> &'static str {
  LOWERCASE_DISPATCH.backend_name()
}

/// Variant `uppercase_in_place` dispatches to.
#[must_use]
pub fn uppercase_backend_name() -> &'static str {
  UPPERCASE_DISPATCH.backend_name()
}

/// Variant `replace_in_place` dispatches to.
#[must_use]
pub fn replace_backend_name() -> &'static str {
  REPLACE_DISPATCH.backend_name()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dispatch_info_display_lists_every_primitive() {
    let info = DispatchInfo::current();
    let s = alloc::format!("{info}");
    for (primitive, variant) in info.variants() {
      assert!(s.contains(&alloc::format!("{primitive}: {variant}")));
    }
  }

  #[test]
  fn dispatch_info_debug_not_empty() {
    let s = alloc::format!("{:?}", DispatchInfo::current());
    assert!(s.contains("DispatchInfo"));
    assert!(s.contains("common_prefix"));
  }

  #[test]
  fn backend_names_match_snapshot() {
    let info = DispatchInfo::current();
    assert_eq!(info.find, find_backend_name());
    assert_eq!(info.find_last, find_last_backend_name());
    assert_eq!(info.common_prefix, common_prefix_backend_name());
    assert_eq!(info.lowercase, lowercase_backend_name());
    assert_eq!(info.uppercase, uppercase_backend_name());
    assert_eq!(info.replace, replace_backend_name());
  }
}
