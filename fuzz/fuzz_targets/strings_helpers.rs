//! Fuzz target for the search and replace helpers against naive loops.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  haystack: Vec<u8>,
  needle: Vec<u8>,
  replacement: Vec<u8>,
}

fuzz_target!(|input: Input| {
  let Input {
    haystack,
    needle,
    replacement,
  } = input;

  let naive_first = if needle.is_empty() {
    Some(0)
  } else {
    haystack.windows(needle.len()).position(|w| w == needle.as_slice())
  };
  assert_eq!(strings::find_substring(&haystack, &needle), naive_first);

  let naive_last = if needle.is_empty() {
    Some(haystack.len())
  } else {
    haystack.windows(needle.len()).rposition(|w| w == needle.as_slice())
  };
  assert_eq!(strings::find_last_substring(&haystack, &needle), naive_last);

  let member = |b: &u8| needle.contains(b);
  assert_eq!(strings::find_any(&haystack, &needle), haystack.iter().position(member));
  assert_eq!(strings::find_last_not_any(&haystack, &needle), haystack.iter().rposition(|b| !member(b)));

  let replaced = strings::replace_all(&haystack, &needle, &replacement);
  if needle.is_empty() {
    assert_eq!(replaced, haystack);
    return;
  }

  // Count the non-overlapping matches the replacement should have consumed.
  let mut matches = 0usize;
  let mut rest = haystack.as_slice();
  while let Some(at) = strings::find_substring(rest, &needle) {
    matches += 1;
    rest = &rest[at + needle.len()..];
  }
  assert_eq!(
    replaced.len() + matches * needle.len(),
    haystack.len() + matches * replacement.len(),
    "replace_all length accounting"
  );
});
