//! Prefix and suffix tests, and whitespace trimming.

use crate::common_prefix;

/// Default trim set: space, tab, line feed, vertical tab, form feed and
/// carriage return.
pub const WHITESPACE: &[u8] = b" \t\n\x0B\x0C\r";

/// Whether `haystack` starts with `prefix`.
///
/// ```
/// assert!(strings::has_prefix(b"simdkit", b"simd"));
/// assert!(strings::has_prefix(b"simdkit", b""));
/// assert!(!strings::has_prefix(b"sim", b"simd"));
/// ```
#[inline]
#[must_use]
pub fn has_prefix(haystack: &[u8], prefix: &[u8]) -> bool {
  prefix.len() <= haystack.len() && common_prefix(haystack, prefix) == prefix.len()
}

/// Whether `haystack` ends with `suffix`.
#[inline]
#[must_use]
pub fn has_suffix(haystack: &[u8], suffix: &[u8]) -> bool {
  haystack
    .len()
    .checked_sub(suffix.len())
    .and_then(|start| haystack.get(start..))
    .is_some_and(|tail| common_prefix(tail, suffix) == suffix.len())
}

#[inline]
#[must_use]
pub fn has_prefix_byte(haystack: &[u8], byte: u8) -> bool {
  haystack.first() == Some(&byte)
}

#[inline]
#[must_use]
pub fn has_suffix_byte(haystack: &[u8], byte: u8) -> bool {
  haystack.last() == Some(&byte)
}

// ─────────────────────────────────────────────────────────────────────────────
// Trimming
// ─────────────────────────────────────────────────────────────────────────────

/// `bytes` without leading bytes from `set`.
#[must_use]
pub fn trimmed_prefix_with<'a>(bytes: &'a [u8], set: &[u8]) -> &'a [u8] {
  let start = bytes.iter().position(|b| !set.contains(b)).unwrap_or(bytes.len());
  bytes.get(start..).unwrap_or_default()
}

/// `bytes` without trailing bytes from `set`.
#[must_use]
pub fn trimmed_suffix_with<'a>(bytes: &'a [u8], set: &[u8]) -> &'a [u8] {
  let end = bytes.iter().rposition(|b| !set.contains(b)).map_or(0, |last| last + 1);
  bytes.get(..end).unwrap_or_default()
}

/// `bytes` without leading or trailing bytes from `set`.
#[must_use]
pub fn trimmed_with<'a>(bytes: &'a [u8], set: &[u8]) -> &'a [u8] {
  trimmed_suffix_with(trimmed_prefix_with(bytes, set), set)
}

/// `bytes` without leading [`WHITESPACE`].
#[inline]
#[must_use]
pub fn trimmed_prefix(bytes: &[u8]) -> &[u8] {
  trimmed_prefix_with(bytes, WHITESPACE)
}

/// `bytes` without trailing [`WHITESPACE`].
#[inline]
#[must_use]
pub fn trimmed_suffix(bytes: &[u8]) -> &[u8] {
  trimmed_suffix_with(bytes, WHITESPACE)
}

/// `bytes` without leading or trailing [`WHITESPACE`].
///
/// ```
/// assert_eq!(strings::trimmed(b"\t key = value \r\n"), b"key = value");
/// assert_eq!(strings::trimmed(b"   "), b"");
/// ```
#[inline]
#[must_use]
pub fn trimmed(bytes: &[u8]) -> &[u8] {
  trimmed_with(bytes, WHITESPACE)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_prefix_suffix() {
    let s = b"Lorem ipsum dolor";
    assert!(has_prefix(s, b"Lorem"));
    assert!(!has_prefix(s, b"lorem"));
    assert!(has_suffix(s, b"dolor"));
    assert!(has_suffix(s, b""));
    assert!(has_suffix(s, s));
    assert!(!has_suffix(b"or", b"dolor"));
    assert!(has_prefix_byte(s, b'L'));
    assert!(has_suffix_byte(s, b'r'));
    assert!(!has_prefix_byte(b"", b'L'));
    assert!(!has_suffix_byte(b"", b'r'));
  }

  #[test]
  fn test_long_prefix() {
    let long = [b'x'; 200];
    let mut other = long;
    assert!(has_prefix(&long, &other[..150]));
    other[149] = b'y';
    assert!(!has_prefix(&long, &other[..150]));
    assert!(has_suffix(&long, &other[150..]));
  }

  #[test]
  fn test_trim_variants() {
    let s = b" \x0B\x0Cabc d\t\n";
    assert_eq!(trimmed_prefix(s), b"abc d\t\n");
    assert_eq!(trimmed_suffix(s), b" \x0B\x0Cabc d");
    assert_eq!(trimmed(s), b"abc d");
    assert_eq!(trimmed(b""), b"");
    assert_eq!(trimmed_suffix(b" \r\n"), b"");
    assert_eq!(trimmed_with(b"--x--", b"-"), b"x");
    assert_eq!(trimmed_prefix_with(b"xyz", b""), b"xyz");
  }
}
