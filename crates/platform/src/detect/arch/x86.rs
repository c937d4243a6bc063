// x86/x86_64 Detection
// ─────────────────────────────────────────────────────────────────────────────

#![allow(unsafe_code)]

#[cfg(target_arch = "x86")]
use core::arch::x86::{__cpuid, __cpuid_count, _xgetbv, has_cpuid};
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{__cpuid, __cpuid_count, _xgetbv};

use crate::features::*;

// XCR0 bits 1-2: XMM + YMM state, required for AVX.
const XCR0_AVX_MASK: u64 = 0x6;
// XCR0 bits 5-7: opmask + ZMM_Hi256 + Hi16_ZMM state, required for AVX-512.
const XCR0_AVX512_MASK: u64 = 0xE0;

/// Raw CPUID/XGETBV words the probe reads.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Registers {
  pub max_leaf: u32,
  pub leaf1_ecx: u32,
  pub leaf1_edx: u32,
  pub leaf7_ebx: u32,
  pub max_ext_leaf: u32,
  pub ext1_ecx: u32,
  pub xcr0: u64,
}

/// Read the registers and decode them.
pub(crate) fn probe() -> FeatureSet {
  #[cfg(target_arch = "x86")]
  if !has_cpuid() {
    return FeatureSet::EMPTY;
  }
  decode(read())
}

#[allow(unused_unsafe)]
fn read() -> Registers {
  let mut regs = Registers::default();

  // SAFETY: CPUID is available (checked above on 32-bit x86, always on x86_64).
  let leaf0 = unsafe { __cpuid(0) };
  regs.max_leaf = leaf0.eax;
  if regs.max_leaf < 1 {
    return regs;
  }

  // SAFETY: leaf 1 is within the reported range.
  let leaf1 = unsafe { __cpuid(1) };
  regs.leaf1_ecx = leaf1.ecx;
  regs.leaf1_edx = leaf1.edx;

  // OSXSAVE (ECX bit 27): the OS enabled XSAVE, so XGETBV is legal.
  if leaf1.ecx & (1 << 27) != 0 {
    // SAFETY: OSXSAVE is set, so XGETBV with XCR0 does not fault.
    regs.xcr0 = unsafe { _xgetbv(0) };
  }

  if regs.max_leaf >= 7 {
    // SAFETY: leaf 7 is within the reported range.
    regs.leaf7_ebx = unsafe { __cpuid_count(7, 0) }.ebx;
  }

  // SAFETY: the extended range base leaf is always queryable.
  regs.max_ext_leaf = unsafe { __cpuid(0x8000_0000) }.eax;
  if regs.max_ext_leaf >= 0x8000_0001 {
    // SAFETY: leaf 0x80000001 is within the reported extended range.
    regs.ext1_ecx = unsafe { __cpuid(0x8000_0001) }.ecx;
  }

  regs
}

/// Translate CPUID bits to features, gating AVX-class bits on XCR0.
pub(crate) fn decode(regs: Registers) -> FeatureSet {
  macro_rules! bits {
    ($set:ident, $word:expr; $($bit:literal => $tag:ty),+ $(,)?) => {
      $(if $word & (1 << $bit) != 0 { $set |= <$tag as Tag>::BIT; })+
    };
  }

  let mut set = FeatureSet::EMPTY;
  if regs.max_leaf < 1 {
    return set;
  }

  let os_avx = regs.xcr0 & XCR0_AVX_MASK == XCR0_AVX_MASK;
  let os_avx512 = os_avx && regs.xcr0 & XCR0_AVX512_MASK == XCR0_AVX512_MASK;

  bits!(set, regs.leaf1_edx; 26 => Sse2);
  bits!(set, regs.leaf1_ecx;
    0 => Sse3,
    9 => Ssse3,
    19 => Sse41,
    20 => Sse42,
    23 => Popcnt,
  );
  if os_avx {
    bits!(set, regs.leaf1_ecx;
      28 => Avx,
      12 => AvxFma,
      29 => AvxF16c,
    );
  }

  bits!(set, regs.leaf7_ebx;
    3 => Bmi1,
    8 => Bmi2,
    29 => Sha,
  );
  if os_avx {
    bits!(set, regs.leaf7_ebx; 5 => Avx2);
  }
  if os_avx512 {
    bits!(set, regs.leaf7_ebx; 16 => Avx512f);
  }

  bits!(set, regs.ext1_ecx; 5 => Lzcnt);

  set
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
