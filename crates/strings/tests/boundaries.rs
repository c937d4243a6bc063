//! Boundary lengths and misalignments for every available variant.
//!
//! Lengths cover 0, 1, W-1, W, W+1, 4W-1, 4W and 4W+1 for W in {16, 32};
//! every slice start modulo 32 is tried. In-place variants must not touch
//! bytes outside the slice they are given.

use strings::{
  kernel_test::{
    assert_all_agree, available_variants, run_all_common_prefix, run_all_find, run_all_find_last,
    run_all_lowercase, run_all_replace, run_all_uppercase,
  },
  kernels, portable,
};

const WIDTHS: [usize; 2] = [16, 32];
const GUARD: u8 = 0xA5;

fn lengths() -> Vec<usize> {
  let mut out = vec![0, 1];
  for w in WIDTHS {
    out.extend([w - 1, w, w + 1, 4 * w - 1, 4 * w, 4 * w + 1]);
  }
  out.extend([2 * 64 + 17, 1000]);
  out.sort_unstable();
  out.dedup();
  out
}

/// Deterministic mixed-case text with some non-ASCII bytes.
fn pattern(len: usize) -> Vec<u8> {
  const ALPHABET: &[u8] = b"aZ_b@Y [c`X{d0W\xC3\x9F e";
  (0..len).map(|i| ALPHABET[(i * 7 + i / 3) % ALPHABET.len()]).collect()
}

/// `len` bytes starting `misalign` bytes into a guarded allocation.
fn guarded(len: usize, misalign: usize) -> Vec<u8> {
  let mut storage = vec![GUARD; misalign + len + 64];
  storage[misalign..misalign + len].copy_from_slice(&pattern(len));
  storage
}

// ─────────────────────────────────────────────────────────────────────────────
// Searches
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn find_at_every_position() {
  for len in lengths() {
    for misalign in 0..32 {
      let mut storage = vec![b'.'; misalign + len];
      let hay = misalign..misalign + len;

      assert_all_agree(&run_all_find(&storage[hay.clone()], b'x'), "find absent");
      for at in [0, len / 2, len.saturating_sub(1)] {
        if len == 0 {
          break;
        }
        storage[misalign + at] = b'x';
        let results = run_all_find(&storage[hay.clone()], b'x');
        assert_all_agree(&results, &format!("find len={len} misalign={misalign} at={at}"));
        assert_eq!(results[0].output, Some(at));
        assert_all_agree(&run_all_find_last(&storage[hay.clone()], b'x'), "find_last");
        storage[misalign + at] = b'.';
      }
    }
  }
}

#[test]
fn find_every_offset_in_four_blocks() {
  for w in WIDTHS {
    let len = 4 * w + 1;
    for at in 0..len {
      let mut hay = vec![0u8; len];
      hay[at] = 1;
      let results = run_all_find(&hay, 1);
      assert_all_agree(&results, &format!("find w={w} at={at}"));
      assert_eq!(results[0].output, Some(at));
    }
  }
}

#[test]
fn common_prefix_every_divergence() {
  for len in lengths() {
    for misalign in [0, 1, 7, 15, 16, 31] {
      let a = guarded(len, misalign);
      let a = &a[misalign..misalign + len];
      assert_all_agree(&run_all_common_prefix(a, a), "equal buffers");

      for diverge in [0, len / 3, len.saturating_sub(1)] {
        if diverge >= len {
          break;
        }
        let mut b = a.to_vec();
        b[diverge] ^= 0x01;
        let results = run_all_common_prefix(a, &b);
        assert_all_agree(&results, &format!("common_prefix len={len} misalign={misalign} diverge={diverge}"));
        assert_eq!(results[0].output, diverge);
      }
      if len > 0 {
        assert_all_agree(&run_all_common_prefix(a, &a[..len - 1]), "shorter b");
      }
    }
  }
}

#[test]
fn common_prefix_with_differently_aligned_inputs() {
  let base = pattern(300);
  for offset_a in 0..32 {
    for offset_b in [0, 5, 16, 31] {
      let mut shifted = vec![0u8; offset_b];
      shifted.extend_from_slice(&base[offset_a..]);
      let a = &base[offset_a..];
      let b = &shifted[offset_b..];
      let results = run_all_common_prefix(a, b);
      assert_all_agree(&results, "aligned copies");
      assert_eq!(results[0].output, a.len());
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-place transforms
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn in_place_variants_agree_across_lengths_and_alignments() {
  for len in lengths() {
    for misalign in 0..32 {
      let storage = guarded(len, misalign);
      let slice = &storage[misalign..misalign + len];
      let context = format!("len={len} misalign={misalign}");
      assert_all_agree(&run_all_lowercase(slice), &context);
      assert_all_agree(&run_all_uppercase(slice), &context);
      assert_all_agree(&run_all_replace(slice, b'_', b'-'), &context);
      assert_all_agree(&run_all_replace(slice, b' ', 0xC3), &context);
    }
  }
}

#[test]
fn in_place_variants_stay_inside_the_slice() {
  for len in lengths() {
    for misalign in 0..32 {
      let expected_lower = {
        let mut s = pattern(len);
        portable::lowercase(&mut s);
        s
      };

      for variant in available_variants(kernels::LOWERCASE) {
        let mut storage = guarded(len, misalign);
        (variant.func)(&mut storage[misalign..misalign + len]);
        assert!(storage[..misalign].iter().all(|&b| b == GUARD), "{} wrote before slice", variant.name);
        assert!(storage[misalign + len..].iter().all(|&b| b == GUARD), "{} wrote past slice", variant.name);
        assert_eq!(storage[misalign..misalign + len], expected_lower[..], "{} len={len}", variant.name);
      }

      for variant in available_variants(kernels::REPLACE) {
        let mut storage = guarded(len, misalign);
        (variant.func)(&mut storage[misalign..misalign + len], GUARD, 0);
        assert!(storage[..misalign].iter().all(|&b| b == GUARD), "{} wrote before slice", variant.name);
        assert!(storage[misalign + len..].iter().all(|&b| b == GUARD), "{} wrote past slice", variant.name);
      }
    }
  }
}

#[test]
fn case_fold_covers_every_byte_value() {
  let all: Vec<u8> = (0..=255).collect();
  for variant in available_variants(kernels::UPPERCASE) {
    let mut buf = all.clone();
    (variant.func)(&mut buf);
    assert_eq!(buf, all.to_ascii_uppercase(), "{}", variant.name);
  }
  for variant in available_variants(kernels::LOWERCASE) {
    let mut buf = all.clone();
    (variant.func)(&mut buf);
    assert_eq!(buf, all.to_ascii_lowercase(), "{}", variant.name);
  }
}

#[test]
fn replace_every_byte_value() {
  let all: Vec<u8> = (0..=255).cycle().take(600).collect();
  for from in [0u8, b'a', 0x7F, 0x80, 0xFF] {
    let results = run_all_replace(&all, from, from.wrapping_add(1));
    assert_all_agree(&results, &format!("replace {from:#04x}"));
    assert!(!results[0].output.contains(&from));
  }
}

#[test]
fn conditional_replace_covers_every_vector_of_the_four_block() {
  let features = platform::runtime_features();
  for name in ["sse4.1", "avx2"] {
    let Some(variant) = kernels::REPLACE.by_name(name) else {
      continue;
    };
    if !features.has(variant.requires) {
      continue;
    }

    for w in WIDTHS {
      for len in [4 * w + 1, 8 * w + 1] {
        for misalign in 0..32 {
          let mut storage = vec![GUARD; misalign + len + 64];
          let slice = misalign..misalign + len;
          storage[slice.clone()].fill(b'.');
          // One match per vector-sized quarter, off the vector edges.
          let quarter = len / 4;
          let hits: Vec<usize> = (0..4).map(|q| q * quarter + quarter / 2).collect();
          for &at in &hits {
            storage[misalign + at] = b'_';
          }

          (variant.func)(&mut storage[slice.clone()], b'_', b'-');

          let out = &storage[slice];
          let context = format!("{name} w={w} len={len} misalign={misalign}");
          assert!(!out.contains(&b'_'), "{context}: match left behind");
          for &at in &hits {
            assert_eq!(out[at], b'-', "{context}: at={at}");
          }
          assert_eq!(out.iter().filter(|&&b| b == b'-').count(), 4, "{context}");
          assert!(storage[..misalign].iter().all(|&b| b == GUARD), "{context}: wrote before slice");
          assert!(storage[misalign + len..].iter().all(|&b| b == GUARD), "{context}: wrote past slice");
        }
      }
    }
  }
}
