//! Differential fuzzing: every available variant against scalar.
//!
//! Each primitive runs through all variants the host supports on slices
//! starting at a fuzzer-chosen offset, so misaligned heads and tails are
//! covered.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use strings::kernel_test::{
  assert_all_agree, run_all_common_prefix, run_all_find, run_all_find_last, run_all_lowercase, run_all_replace,
  run_all_uppercase,
};

#[derive(Arbitrary, Debug)]
struct Input {
  offset: u8,
  needle: u8,
  from: u8,
  to: u8,
  split: u16,
  data: Vec<u8>,
}

fuzz_target!(|input: Input| {
  let start = usize::from(input.offset % 64).min(input.data.len());
  let data = &input.data[start..];

  assert_all_agree(&run_all_find(data, input.needle), "find");
  assert_all_agree(&run_all_find_last(data, input.needle), "find_last");
  assert_all_agree(&run_all_lowercase(data), "lowercase");
  assert_all_agree(&run_all_uppercase(data), "uppercase");
  assert_all_agree(&run_all_replace(data, input.from, input.to), "replace");

  // Compare the data against a copy that diverges at `split`.
  let mut other = data.to_vec();
  if !other.is_empty() {
    let at = usize::from(input.split) % other.len();
    other[at] = other[at].wrapping_add(1);
  }
  assert_all_agree(&run_all_common_prefix(data, &other), "common_prefix");
  assert_all_agree(&run_all_common_prefix(data, data), "common_prefix equal");
});
