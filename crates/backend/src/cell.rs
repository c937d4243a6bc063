//! Cached runtime dispatch.
//!
//! A [`DispatchCell`] is the function-pointer dispatch shape: a static word
//! that starts unresolved, is resolved against [`runtime_features()`] on
//! first use, and from then on is a single acquire load before the indirect
//! call.
//!
//! ```
//! use backend::{DispatchCell, variants};
//! use platform::{Sse2, declare};
//!
//! type SumFn = fn(&[u8]) -> u64;
//!
//! fn sum_scalar(data: &[u8]) -> u64 {
//!   data.iter().map(|&b| u64::from(b)).sum()
//! }
//!
//! variants! {
//!   const SUM: SumFn = [
//!     "scalar" => declare!() => sum_scalar,
//!     "sse2" => declare!(Sse2) => sum_scalar,
//!   ];
//! }
//!
//! static SUM_CELL: DispatchCell<SumFn> = DispatchCell::new("sum", SUM);
//!
//! assert_eq!((SUM_CELL.get())(&[1, 2, 3]), 6);
//! assert!(SUM_CELL.is_resolved());
//! ```
//!
//! [`runtime_features()`]: platform::runtime_features

#![allow(unsafe_code)]

use core::{
  fmt, ptr,
  sync::atomic::{AtomicPtr, Ordering},
};

use platform::{FeatureSet, runtime_features};

use crate::dispatch::{Variant, VariantList};

/// A lazily resolved, process-wide variant choice.
///
/// The cell holds a pointer to one entry of its [`VariantList`], or null
/// while unresolved. Racing first calls each select; the first
/// compare-exchange wins and every other thread adopts its choice, so a
/// resolved cell never changes except through [`force`](Self::force).
pub struct DispatchCell<F: 'static> {
  name: &'static str,
  variants: VariantList<F>,
  features: fn() -> FeatureSet,
  current: AtomicPtr<Variant<F>>,
}

impl<F: Copy + Sync + 'static> DispatchCell<F> {
  /// An unresolved cell that selects against [`runtime_features()`].
  ///
  /// [`runtime_features()`]: platform::runtime_features
  #[must_use]
  pub const fn new(name: &'static str, variants: VariantList<F>) -> Self {
    Self::with_features(name, variants, runtime_features)
  }

  /// An unresolved cell that selects against `features()` instead.
  ///
  /// `features` must never report a capability the host lacks.
  #[must_use]
  pub const fn with_features(name: &'static str, variants: VariantList<F>, features: fn() -> FeatureSet) -> Self {
    Self {
      name,
      variants,
      features,
      current: AtomicPtr::new(ptr::null_mut()),
    }
  }

  /// The selected implementation, resolving on first call.
  #[inline]
  #[must_use]
  pub fn get(&self) -> F {
    self.variant().func
  }

  /// The selected variant record, resolving on first call.
  #[inline]
  #[must_use]
  pub fn variant(&self) -> &'static Variant<F> {
    let current = self.current.load(Ordering::Acquire);
    if current.is_null() {
      return self.resolve();
    }
    // SAFETY: non-null values stored in `current` are derived from
    // `&'static Variant<F>` entries of `self.variants`.
    unsafe { &*current }
  }

  /// Name of the selected variant, resolving on first call.
  #[inline]
  #[must_use]
  pub fn backend_name(&self) -> &'static str {
    self.variant().name
  }

  /// Name of the primitive this cell dispatches.
  #[inline]
  #[must_use]
  pub const fn name(&self) -> &'static str {
    self.name
  }

  /// The candidate table.
  #[inline]
  #[must_use]
  pub const fn variants(&self) -> VariantList<F> {
    self.variants
  }

  /// Whether a variant has been selected.
  #[inline]
  #[must_use]
  pub fn is_resolved(&self) -> bool {
    !self.current.load(Ordering::Acquire).is_null()
  }

  /// Select against the cell's feature source and publish the choice.
  ///
  /// Returns the published variant, which is another thread's choice if that
  /// thread got there first.
  #[cold]
  #[inline(never)]
  pub fn resolve(&self) -> &'static Variant<F> {
    let features = (self.features)();
    let chosen = self.variants.select(features);

    match self.current.compare_exchange(
      ptr::null_mut(),
      ptr::from_ref(chosen).cast_mut(),
      Ordering::AcqRel,
      Ordering::Acquire,
    ) {
      Ok(_) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(cell = self.name, variant = chosen.name, features = %features, "dispatch resolved");
        chosen
      }
      // SAFETY: the competing store came from this function or `force`, both
      // of which store `&'static Variant<F>` entries of `self.variants`.
      Err(winner) => unsafe { &*winner },
    }
  }

  /// Select the richest variant within `requested` and publish it, replacing
  /// any earlier choice.
  ///
  /// `requested` is intersected with the cell's feature source first, so a
  /// variant the host cannot run is never installed. Passing
  /// [`FeatureSet::EMPTY`] forces the Scalar variant.
  pub fn force(&self, requested: FeatureSet) -> &'static Variant<F> {
    let available = (self.features)();
    let chosen = self.variants.select(requested & available);

    #[cfg(feature = "tracing")]
    if !available.has(requested) {
      tracing::warn!(
        cell = self.name,
        requested = %requested,
        missing = %requested.difference(available),
        "forced features not supported by this host; clamped"
      );
    }

    self.current.store(ptr::from_ref(chosen).cast_mut(), Ordering::Release);
    chosen
  }

  /// Return the cell to the unresolved state.
  ///
  /// Only available with the `testing` feature or in test builds.
  #[cfg(any(test, feature = "testing"))]
  pub fn reset(&self) {
    self.current.store(ptr::null_mut(), Ordering::Release);
  }
}

impl<F: 'static> fmt::Debug for DispatchCell<F> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let current = self.current.load(Ordering::Acquire);
    let selected = if current.is_null() {
      None
    } else {
      // SAFETY: see `DispatchCell::variant`.
      Some(unsafe { &*current }.name)
    };
    f.debug_struct("DispatchCell")
      .field("name", &self.name)
      .field("variants", &self.variants)
      .field("selected", &selected)
      .finish_non_exhaustive()
  }
}
