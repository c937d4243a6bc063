use alloc::vec::Vec;

use proptest::prelude::*;

use super::*;
use crate::kernel_test::{
  assert_all_agree, run_all_common_prefix, run_all_find, run_all_find_last, run_all_lowercase, run_all_replace,
  run_all_uppercase,
};

/// Bytes biased toward letters and the bytes bordering the letter ranges.
fn text() -> impl Strategy<Value = Vec<u8>> {
  proptest::collection::vec(
    prop_oneof![
      4 => b'A'..=b'Z',
      4 => b'a'..=b'z',
      1 => prop::sample::select(&b"@[`{ \x00\xC3\x9F\xFF"[..]),
      1 => any::<u8>(),
    ],
    0..=300,
  )
}

/// Two buffers sharing a random-length prefix.
fn prefixed_pair() -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
  (
    proptest::collection::vec(any::<u8>(), 0..=200),
    proptest::collection::vec(any::<u8>(), 0..=80),
    proptest::collection::vec(any::<u8>(), 0..=80),
  )
    .prop_map(|(shared, a, b)| {
      let mut left = shared.clone();
      left.extend(a);
      let mut right = shared;
      right.extend(b);
      (left, right)
    })
}

proptest! {
  // ─────────────────────────────────────────────────────────────────────────────
  // Primitive properties
  // ─────────────────────────────────────────────────────────────────────────────

  #[test]
  fn find_returns_first_occurrence(data in proptest::collection::vec(0u8..8, 0..=300), needle in 0u8..8) {
    match find(&data, needle) {
      None => prop_assert!(!data.contains(&needle)),
      Some(at) => {
        prop_assert_eq!(data[at], needle);
        prop_assert!(!data[..at].contains(&needle));
      }
    }
  }

  #[test]
  fn find_last_returns_last_occurrence(data in proptest::collection::vec(0u8..8, 0..=300), needle in 0u8..8) {
    match find_last(&data, needle) {
      None => prop_assert!(!data.contains(&needle)),
      Some(at) => {
        prop_assert_eq!(data[at], needle);
        prop_assert!(!data[at + 1..].contains(&needle));
      }
    }
  }

  #[test]
  fn case_fold_composes(data in text()) {
    let mut upper = data.clone();
    uppercase_in_place(&mut upper);

    let mut lower_then_upper = data.clone();
    lowercase_in_place(&mut lower_then_upper);
    uppercase_in_place(&mut lower_then_upper);
    prop_assert_eq!(&lower_then_upper, &upper);

    let mut lower = data.clone();
    lowercase_in_place(&mut lower);
    let mut upper_then_lower = data;
    uppercase_in_place(&mut upper_then_lower);
    lowercase_in_place(&mut upper_then_lower);
    prop_assert_eq!(upper_then_lower, lower);
  }

  #[test]
  fn in_place_transforms_are_idempotent(data in text(), from in any::<u8>(), to in any::<u8>()) {
    let mut once = data.clone();
    lowercase_in_place(&mut once);
    let mut twice = once.clone();
    lowercase_in_place(&mut twice);
    prop_assert_eq!(&once, &twice);

    let mut once = data.clone();
    uppercase_in_place(&mut once);
    let mut twice = once.clone();
    uppercase_in_place(&mut twice);
    prop_assert_eq!(&once, &twice);

    let mut once = data;
    replace_in_place(&mut once, from, to);
    let mut twice = once.clone();
    replace_in_place(&mut twice, from, to);
    prop_assert_eq!(once, twice);
  }

  #[test]
  fn common_prefix_is_maximal((a, b) in prefixed_pair()) {
    let k = common_prefix(&a, &b);
    prop_assert!(k <= a.len().min(b.len()));
    prop_assert_eq!(&a[..k], &b[..k]);
    if k < a.len().min(b.len()) {
      prop_assert_ne!(a[k], b[k]);
    }
  }

  #[test]
  fn replace_round_trips_when_target_absent(data in text(), x in any::<u8>(), y in any::<u8>()) {
    prop_assume!(!data.contains(&y));
    let mut buf = data.clone();
    replace_in_place(&mut buf, x, y);
    replace_in_place(&mut buf, y, x);
    prop_assert_eq!(buf, data);
  }

  #[test]
  fn dispatch_is_stable(data in text(), needle in any::<u8>()) {
    let name = find_backend_name();
    let first = find(&data, needle);
    prop_assert_eq!(find(&data, needle), first);
    prop_assert_eq!(find_backend_name(), name);
  }

  // ─────────────────────────────────────────────────────────────────────────────
  // Variant equivalence
  // ─────────────────────────────────────────────────────────────────────────────

  #[test]
  fn search_variants_agree(data in proptest::collection::vec(0u8..4, 0..=300), needle in 0u8..4) {
    assert_all_agree(&run_all_find(&data, needle), "find");
    assert_all_agree(&run_all_find_last(&data, needle), "find_last");
  }

  #[test]
  fn common_prefix_variants_agree((a, b) in prefixed_pair()) {
    assert_all_agree(&run_all_common_prefix(&a, &b), "common_prefix");
  }

  #[test]
  fn transform_variants_agree(data in text(), from in any::<u8>(), to in any::<u8>()) {
    assert_all_agree(&run_all_lowercase(&data), "lowercase");
    assert_all_agree(&run_all_uppercase(&data), "uppercase");
    assert_all_agree(&run_all_replace(&data, from, to), "replace");
  }
}
