//! Declaration macros for variant tables and the three dispatch shapes.
//!
//! | Shape | Macro | Cost per call |
//! |-------|-------|---------------|
//! | compile-time | [`dispatch_static!`](crate::dispatch_static) | direct call |
//! | function pointer | [`dispatcher!`](crate::dispatcher) | acquire load + indirect call |
//! | load-time resolution | [`dispatcher!`](crate::dispatcher) with the `load-time` feature | the cell is filled before `main` |

/// Declare a validated [`VariantList`](crate::VariantList) constant.
///
/// Each entry is `"name" => requirement => function`. Entries are listed
/// poorest first, starting with a Scalar entry whose requirement is
/// `declare!()`. A malformed table fails to compile. Entries may carry
/// `#[cfg(...)]` attributes to exist only on some targets.
///
/// ```compile_fail
/// use backend::variants;
/// use platform::{Sse2, declare};
///
/// fn f() {}
///
/// variants! {
///   // Missing the Scalar entry.
///   const BAD: fn() = ["sse2" => declare!(Sse2) => f];
/// }
/// let _ = BAD;
/// ```
#[macro_export]
macro_rules! variants {
  (
    $(#[$meta:meta])*
    $vis:vis const $name:ident : $ty:ty = [
      $($(#[$attr:meta])* $label:literal => $req:expr => $func:path),+ $(,)?
    ];
  ) => {
    $(#[$meta])*
    $vis const $name: $crate::VariantList<$ty> = {
      const LIST: &[$crate::Variant<$ty>] = &[$($(#[$attr])* $crate::Variant::new($label, $req, $func as $ty)),+];
      $crate::VariantList::new(LIST)
    };
  };
}

/// Declare a `static` [`DispatchCell`](crate::DispatchCell) for a variant
/// list.
///
/// The cell is named after the static. An optional `features = path`
/// replaces [`runtime_features`](platform::runtime_features) as the selection
/// source.
///
/// With the `load-time` cargo feature on Linux and Android, the cell is also
/// resolved from an ELF `.init_array` constructor, so the first call already
/// finds it resolved. Elsewhere the cell resolves on first call.
///
/// ```
/// use backend::{dispatcher, variants};
/// use platform::declare;
///
/// type IdFn = fn(u8) -> u8;
///
/// fn id(x: u8) -> u8 {
///   x
/// }
///
/// variants! {
///   const ID: IdFn = ["scalar" => declare!() => id];
/// }
///
/// dispatcher! {
///   static ID_CELL: IdFn = ID;
/// }
///
/// assert_eq!((ID_CELL.get())(7), 7);
/// assert_eq!(ID_CELL.name(), "ID_CELL");
/// ```
#[macro_export]
macro_rules! dispatcher {
  (
    $(#[$meta:meta])*
    $vis:vis static $name:ident : $ty:ty = $list:expr $(, features = $features:path)?;
  ) => {
    $(#[$meta])*
    $vis static $name: $crate::DispatchCell<$ty> =
      $crate::__dispatch_cell!(::core::stringify!($name), $list $(, $features)?);

    $crate::__resolve_at_load!($name);
  };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __dispatch_cell {
  ($label:expr, $list:expr) => {
    $crate::DispatchCell::new($label, $list)
  };
  ($label:expr, $list:expr, $features:path) => {
    $crate::DispatchCell::with_features($label, $list, $features)
  };
}

/// Compile-time dispatch: select from a variant list during const
/// evaluation and yield the chosen function.
///
/// The requested set is intersected with
/// [`compiled_features()`](platform::compiled_features), so the result is
/// always safe to call on any host the binary runs on. Requesting more than
/// the build targets degrades to the richest variant the build guarantees.
///
/// ```
/// use backend::{dispatch_static, variants};
/// use platform::{Sse2, declare};
///
/// type IdFn = fn(u8) -> u8;
///
/// fn id(x: u8) -> u8 {
///   x
/// }
///
/// variants! {
///   const ID: IdFn = [
///     "scalar" => declare!() => id,
///     "sse2" => declare!(Sse2) => id,
///   ];
/// }
///
/// let f = dispatch_static!(ID, declare!(Sse2));
/// assert_eq!(f(3), 3);
/// ```
#[macro_export]
macro_rules! dispatch_static {
  ($list:expr, $features:expr $(,)?) => {
    const { $list.select_compiled($features).func }
  };
}

/// Register a load-time constructor that resolves a dispatch cell.
#[cfg(all(feature = "load-time", any(target_os = "linux", target_os = "android")))]
#[doc(hidden)]
#[macro_export]
macro_rules! __resolve_at_load {
  ($name:ident) => {
    const _: () = {
      #[used]
      #[unsafe(link_section = ".init_array")]
      static RESOLVE: extern "C" fn() = {
        extern "C" fn resolve() {
          let _ = $name.variant();
        }
        resolve
      };
    };
  };
}

/// Without load-time support, cells resolve on first call.
#[cfg(not(all(feature = "load-time", any(target_os = "linux", target_os = "android"))))]
#[doc(hidden)]
#[macro_export]
macro_rules! __resolve_at_load {
  ($name:ident) => {};
}

#[cfg(test)]
mod tests {
  extern crate std;

  use std::vec::Vec;

  use platform::{FeatureSet, Sse2, Sse41, declare};

  type TagFn = fn() -> &'static str;

  fn tag_scalar() -> &'static str {
    "scalar"
  }

  fn tag_sse2() -> &'static str {
    "sse2"
  }

  fn tag_sse41() -> &'static str {
    "sse4.1"
  }

  crate::variants! {
    /// Test table.
    pub(crate) const TAGS: TagFn = [
      "scalar" => declare!() => tag_scalar,
      "sse2" => declare!(Sse2) => tag_sse2,
      "sse4.1" => declare!(Sse41) => tag_sse41,
    ];
  }

  crate::variants! {
    const GATED: TagFn = [
      "scalar" => declare!() => tag_scalar,
      #[cfg(any())]
      "sse2" => declare!(Sse2) => tag_sse2,
      "sse4.1" => declare!(Sse41) => tag_sse41,
    ];
  }

  fn only_sse2() -> FeatureSet {
    declare!(Sse2)
  }

  crate::dispatcher! {
    static TAGS_RUNTIME: TagFn = TAGS;
  }

  crate::dispatcher! {
    static TAGS_SSE2_HOST: TagFn = TAGS, features = only_sse2;
  }

  #[test]
  fn test_variants_macro_builds_ordered_list() {
    let names: Vec<&str> = TAGS.as_slice().iter().map(|v| v.name).collect();
    assert_eq!(names, ["scalar", "sse2", "sse4.1"]);
    assert!(TAGS.as_slice().iter().all(|v| (v.func)() == v.name));
  }

  #[test]
  fn test_cfg_gated_entries_are_dropped() {
    assert_eq!(GATED.len(), 2);
    assert!(GATED.by_name("sse2").is_none());
    assert_eq!(GATED.select(declare!(Sse2)).name, "scalar");
  }

  #[test]
  fn test_dispatcher_names_cell_after_static() {
    assert_eq!(TAGS_RUNTIME.name(), "TAGS_RUNTIME");
    assert_eq!((TAGS_RUNTIME.get())(), TAGS_RUNTIME.backend_name());
  }

  #[test]
  fn test_dispatcher_with_feature_source() {
    assert_eq!(TAGS_SSE2_HOST.backend_name(), "sse2");
    assert_eq!((TAGS_SSE2_HOST.get())(), "sse2");
  }

  #[test]
  fn test_dispatch_static_scalar() {
    let f = crate::dispatch_static!(TAGS, FeatureSet::EMPTY);
    assert_eq!(f(), "scalar");
  }

  #[test]
  fn test_dispatch_static_clamps_to_build() {
    let f = crate::dispatch_static!(TAGS, FeatureSet::ALL);
    assert_eq!(f(), TAGS.select(platform::compiled_features()).name);
  }

  #[test]
  #[cfg(target_arch = "x86_64")]
  fn test_dispatch_static_uses_sse2_baseline() {
    let f = crate::dispatch_static!(TAGS, declare!(Sse2));
    assert_eq!(f(), "sse2");
  }
}
