//! Owned-output helpers on top of the in-place primitives.

use alloc::vec::Vec;

use crate::{find_substring, lowercase_in_place, replace_in_place, uppercase_in_place};

/// ASCII-lowercased copy of `bytes`.
#[must_use]
pub fn to_lowercase(bytes: &[u8]) -> Vec<u8> {
  let mut out = bytes.to_vec();
  lowercase_in_place(&mut out);
  out
}

/// ASCII-uppercased copy of `bytes`.
#[must_use]
pub fn to_uppercase(bytes: &[u8]) -> Vec<u8> {
  let mut out = bytes.to_vec();
  uppercase_in_place(&mut out);
  out
}

/// Copy of `haystack` with every non-overlapping occurrence of `search`,
/// scanned left to right, replaced by `replacement`.
///
/// An empty `search` returns an unchanged copy. Single-byte substitutions go
/// through the dispatched [`replace_in_place`].
///
/// ```
/// assert_eq!(strings::replace_all(b"aaaa", b"aa", b"b"), b"bb");
/// assert_eq!(strings::replace_all(b"a_b", b"_", b"::"), b"a::b");
/// ```
#[must_use]
pub fn replace_all(haystack: &[u8], search: &[u8], replacement: &[u8]) -> Vec<u8> {
  match (search, replacement) {
    ([], _) => haystack.to_vec(),
    ([from], [to]) => {
      let mut out = haystack.to_vec();
      replace_in_place(&mut out, *from, *to);
      out
    }
    _ => {
      let mut out = Vec::with_capacity(haystack.len());
      let mut rest = haystack;
      while let Some(at) = find_substring(rest, search) {
        let (before, after) = rest.split_at(at);
        out.extend_from_slice(before);
        out.extend_from_slice(replacement);
        rest = after.get(search.len()..).unwrap_or_default();
      }
      out.extend_from_slice(rest);
      out
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_case_copies() {
    assert_eq!(to_lowercase(b"Hello, World! 42"), b"hello, world! 42");
    assert_eq!(to_uppercase("straße".as_bytes()), "STRAßE".as_bytes());
    assert!(to_lowercase(b"").is_empty());
  }

  #[test]
  fn test_replace_all() {
    assert_eq!(replace_all(b"a_b_c_d", b"_", b"-"), b"a-b-c-d");
    assert_eq!(replace_all(b"one two two", b"two", b"2"), b"one 2 2");
    assert_eq!(replace_all(b"abc", b"", b"x"), b"abc");
    assert_eq!(replace_all(b"abc", b"b", b""), b"ac");
    assert_eq!(replace_all(b"aaa", b"aa", b"a"), b"aa");
    assert_eq!(replace_all(b"xyz", b"q", b"r"), b"xyz");
  }
}
