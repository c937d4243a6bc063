//! Fuzz target for `FeatureSet` algebra.
//!
//! Checks the lattice laws of union and intersection, the subset order used
//! by variant selection, and that `difference` and `complement` agree.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use platform::FeatureSet;

#[derive(Arbitrary, Debug)]
struct Input {
  a: u32,
  b: u32,
  c: u32,
}

fuzz_target!(|input: Input| {
  let a = FeatureSet::from_bits_truncate(input.a);
  let b = FeatureSet::from_bits_truncate(input.b);
  let c = FeatureSet::from_bits_truncate(input.c);

  // ─── Commutativity and associativity ───
  assert_eq!(a | b, b | a, "union must be commutative");
  assert_eq!(a & b, b & a, "intersection must be commutative");
  assert_eq!((a | b) | c, a | (b | c), "union must be associative");
  assert_eq!((a & b) & c, a & (b & c), "intersection must be associative");

  // ─── Distributivity and absorption ───
  assert_eq!(a & (b | c), (a & b) | (a & c), "intersection must distribute over union");
  assert_eq!(a | (a & b), a, "absorption over union");
  assert_eq!(a & (a | b), a, "absorption over intersection");

  // ─── Subset order ───
  let ab = a | b;
  assert!(ab.has(a) && ab.has(b), "union must contain both operands");
  assert!(a >= (a & b), "operand must contain the intersection");
  assert_eq!(a.has(b), b <= a, "has() must agree with the partial order");
  assert_eq!(a.is_richer_than(b), a.has(b) && a != b, "richer means strict superset");
  if a.is_richer_than(b) {
    assert!(!b.is_richer_than(a), "richness must be antisymmetric");
  }

  // ─── Difference and complement ───
  assert_eq!(a.difference(b), a & !b, "difference must be a & !b");
  assert!((a.difference(b) & b).is_empty(), "difference must exclude b");
  assert_eq!(!!a, a, "complement must be an involution");
  assert_eq!(a ^ b, (a | b).difference(a & b), "xor must be the symmetric difference");

  // ─── Count bounds ───
  assert!((a | b).count() >= a.count().max(b.count()));
  assert!((a & b).count() <= a.count().min(b.count()));
  assert_eq!(a.iter().count(), a.count() as usize, "iter must yield one name per bit");
});
