//! Searches built on the dispatched primitives: character classes and
//! substrings.

use crate::{find, find_last};

// ─────────────────────────────────────────────────────────────────────────────
// Character classes
// ─────────────────────────────────────────────────────────────────────────────

/// Membership table for a set of bytes.
#[derive(Clone, Copy)]
struct ByteSet([u64; 4]);

impl ByteSet {
  #[inline]
  fn new(bytes: &[u8]) -> Self {
    let mut words = [0u64; 4];
    for &b in bytes {
      if let Some(word) = words.get_mut(usize::from(b >> 6)) {
        *word |= 1 << (b & 63);
      }
    }
    Self(words)
  }

  #[inline(always)]
  fn contains(&self, b: u8) -> bool {
    self.0.get(usize::from(b >> 6)).is_some_and(|word| word & (1 << (b & 63)) != 0)
  }
}

/// Index of the first byte of `haystack` that is in `set`.
///
/// A one-byte set uses the dispatched [`find`].
///
/// ```
/// assert_eq!(strings::find_any(b"key=value;", b"=;"), Some(3));
/// assert_eq!(strings::find_any(b"plain", b""), None);
/// ```
#[must_use]
pub fn find_any(haystack: &[u8], set: &[u8]) -> Option<usize> {
  match set {
    [] => None,
    [byte] => find(haystack, *byte),
    _ => {
      let set = ByteSet::new(set);
      haystack.iter().position(|&b| set.contains(b))
    }
  }
}

/// Index of the last byte of `haystack` that is in `set`.
#[must_use]
pub fn find_last_any(haystack: &[u8], set: &[u8]) -> Option<usize> {
  match set {
    [] => None,
    [byte] => find_last(haystack, *byte),
    _ => {
      let set = ByteSet::new(set);
      haystack.iter().rposition(|&b| set.contains(b))
    }
  }
}

/// Index of the first byte of `haystack` that is not in `set`.
#[must_use]
pub fn find_not_any(haystack: &[u8], set: &[u8]) -> Option<usize> {
  let set = ByteSet::new(set);
  haystack.iter().position(|&b| !set.contains(b))
}

/// Index of the last byte of `haystack` that is not in `set`.
#[must_use]
pub fn find_last_not_any(haystack: &[u8], set: &[u8]) -> Option<usize> {
  let set = ByteSet::new(set);
  haystack.iter().rposition(|&b| !set.contains(b))
}

// ─────────────────────────────────────────────────────────────────────────────
// Substrings
// ─────────────────────────────────────────────────────────────────────────────

/// Index of the first occurrence of `needle` in `haystack`.
///
/// Candidates are located with the dispatched [`find`] on the needle's first
/// byte. An empty needle matches at 0.
///
/// ```
/// assert_eq!(strings::find_substring(b"abcabc", b"ca"), Some(2));
/// assert_eq!(strings::find_substring(b"abc", b""), Some(0));
/// assert_eq!(strings::find_substring(b"abc", b"abcd"), None);
/// ```
#[must_use]
pub fn find_substring(haystack: &[u8], needle: &[u8]) -> Option<usize> {
  let Some((&first, rest)) = needle.split_first() else {
    return Some(0);
  };
  let last_start = haystack.len().checked_sub(needle.len())?;

  let mut offset = 0;
  while offset <= last_start {
    let window = haystack.get(offset..=last_start)?;
    let candidate = offset + find(window, first)?;
    let tail = haystack.get(candidate + 1..candidate + needle.len())?;
    if tail == rest {
      return Some(candidate);
    }
    offset = candidate + 1;
  }
  None
}

/// Index of the last occurrence of `needle` in `haystack`.
///
/// An empty needle matches at `haystack.len()`.
///
/// ```
/// assert_eq!(strings::find_last_substring(b"abcabc", b"bc"), Some(4));
/// assert_eq!(strings::find_last_substring(b"abc", b""), Some(3));
/// ```
#[must_use]
pub fn find_last_substring(haystack: &[u8], needle: &[u8]) -> Option<usize> {
  let Some((&first, rest)) = needle.split_first() else {
    return Some(haystack.len());
  };
  let mut end = haystack.len().checked_sub(needle.len())? + 1;

  while end > 0 {
    let window = haystack.get(..end)?;
    let candidate = find_last(window, first)?;
    let tail = haystack.get(candidate + 1..candidate + needle.len())?;
    if tail == rest {
      return Some(candidate);
    }
    end = candidate;
  }
  None
}
