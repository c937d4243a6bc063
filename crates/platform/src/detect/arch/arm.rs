// ARM / AArch64 Detection
// ─────────────────────────────────────────────────────────────────────────────

use crate::features::*;

/// Runtime ARM detection.
///
/// Linux and Android read `AT_HWCAP` from `/proc/self/auxv`. Other aarch64
/// systems with `std` fall back to `is_aarch64_feature_detected!`. Without a
/// way to ask the OS the compile-time set stands.
pub(crate) fn probe() -> FeatureSet {
  #[cfg(all(feature = "std", any(target_os = "linux", target_os = "android")))]
  {
    read_hwcap().map_or(FeatureSet::EMPTY, decode_hwcap)
  }

  #[cfg(all(
    feature = "std",
    any(target_arch = "aarch64", target_arch = "arm64ec"),
    not(any(target_os = "linux", target_os = "android"))
  ))]
  {
    let mut set = FeatureSet::EMPTY;
    if std::arch::is_aarch64_feature_detected!("neon") {
      set |= NeonFma::IMPLIED;
    }
    if std::arch::is_aarch64_feature_detected!("fp16") {
      set |= NeonFp16::IMPLIED;
    }
    set
  }

  #[cfg(not(all(
    feature = "std",
    any(
      target_os = "linux",
      target_os = "android",
      target_arch = "aarch64",
      target_arch = "arm64ec"
    )
  )))]
  {
    FeatureSet::EMPTY
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// HWCAP decoding
// ─────────────────────────────────────────────────────────────────────────────

// From linux/arch/arm64/include/uapi/asm/hwcap.h.
#[cfg(any(target_arch = "aarch64", target_arch = "arm64ec"))]
mod bits {
  pub const HWCAP_ASIMD: usize = 1 << 1;
  pub const HWCAP_FPHP: usize = 1 << 9;
  pub const HWCAP_ASIMDHP: usize = 1 << 10;
}

// From linux/arch/arm/include/uapi/asm/hwcap.h.
#[cfg(target_arch = "arm")]
mod bits {
  pub const HWCAP_NEON: usize = 1 << 12;
  pub const HWCAP_VFPV4: usize = 1 << 16;
}

/// Map the `AT_HWCAP` word to features.
#[cfg(any(target_arch = "aarch64", target_arch = "arm64ec"))]
#[cfg_attr(not(all(feature = "std", any(target_os = "linux", target_os = "android"))), allow(dead_code))]
pub(crate) fn decode_hwcap(hwcap: usize) -> FeatureSet {
  use bits::*;

  let mut set = FeatureSet::EMPTY;
  // AArch64 Advanced SIMD always has fused multiply-add.
  if hwcap & HWCAP_ASIMD != 0 {
    set |= NeonFma::IMPLIED;
    if hwcap & (HWCAP_FPHP | HWCAP_ASIMDHP) == HWCAP_FPHP | HWCAP_ASIMDHP {
      set |= NeonFp16::IMPLIED;
    }
  }
  set
}

/// Map the `AT_HWCAP` word to features.
#[cfg(target_arch = "arm")]
#[cfg_attr(not(all(feature = "std", any(target_os = "linux", target_os = "android"))), allow(dead_code))]
pub(crate) fn decode_hwcap(hwcap: usize) -> FeatureSet {
  use bits::*;

  let mut set = FeatureSet::EMPTY;
  if hwcap & HWCAP_NEON != 0 {
    set |= Neon::IMPLIED;
    if hwcap & HWCAP_VFPV4 != 0 {
      set |= NeonFma::IMPLIED;
    }
  }
  set
}

/// Read `AT_HWCAP` from `/proc/self/auxv`.
///
/// The auxiliary vector is a sequence of native-word `(type, value)` pairs
/// ending with `AT_NULL`. Pure Rust, no libc dependency.
#[cfg(all(feature = "std", any(target_os = "linux", target_os = "android")))]
fn read_hwcap() -> Option<usize> {
  use std::{fs::File, io::Read};

  let mut file = File::open("/proc/self/auxv").ok()?;
  let mut buf = [0u8; 4096];
  let n = file.read(&mut buf).ok()?;
  parse_auxv(buf.get(..n)?)
}

const AT_NULL: usize = 0;
const AT_HWCAP: usize = 16;

/// Find `AT_HWCAP` in a raw auxiliary vector.
#[cfg_attr(not(all(feature = "std", any(target_os = "linux", target_os = "android"))), allow(dead_code))]
pub(crate) fn parse_auxv(raw: &[u8]) -> Option<usize> {
  const WORD: usize = size_of::<usize>();

  for entry in raw.chunks_exact(2 * WORD) {
    let (key, value) = entry.split_at(WORD);
    let key = usize::from_ne_bytes(key.try_into().ok()?);
    let value = usize::from_ne_bytes(value.try_into().ok()?);
    match key {
      AT_HWCAP => return Some(value),
      AT_NULL => break,
      _ => {}
    }
  }
  None
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::vec::Vec;

  use super::*;

  fn auxv(entries: &[(usize, usize)]) -> Vec<u8> {
    let mut raw = Vec::new();
    for &(key, value) in entries {
      raw.extend_from_slice(&key.to_ne_bytes());
      raw.extend_from_slice(&value.to_ne_bytes());
    }
    raw
  }

  #[test]
  fn test_parse_auxv_finds_hwcap() {
    let raw = auxv(&[(6, 4096), (AT_HWCAP, 0xABCD), (AT_NULL, 0)]);
    assert_eq!(parse_auxv(&raw), Some(0xABCD));
  }

  #[test]
  fn test_parse_auxv_stops_at_null() {
    let raw = auxv(&[(6, 4096), (AT_NULL, 0), (AT_HWCAP, 0xABCD)]);
    assert_eq!(parse_auxv(&raw), None);
  }

  #[test]
  fn test_parse_auxv_ignores_truncated_tail() {
    let mut raw = auxv(&[(6, 4096)]);
    raw.extend_from_slice(&AT_HWCAP.to_ne_bytes());
    assert_eq!(parse_auxv(&raw), None);
  }

  #[test]
  #[cfg(any(target_arch = "aarch64", target_arch = "arm64ec"))]
  fn test_decode_aarch64_hwcap() {
    use bits::*;

    assert_eq!(decode_hwcap(0), FeatureSet::EMPTY);
    assert_eq!(decode_hwcap(HWCAP_ASIMD), NeonFma::IMPLIED);
    assert_eq!(decode_hwcap(HWCAP_ASIMD | HWCAP_FPHP), NeonFma::IMPLIED);
    assert_eq!(
      decode_hwcap(HWCAP_ASIMD | HWCAP_FPHP | HWCAP_ASIMDHP),
      NeonFp16::IMPLIED
    );
  }

  #[test]
  #[cfg(target_arch = "arm")]
  fn test_decode_arm_hwcap() {
    use bits::*;

    assert_eq!(decode_hwcap(HWCAP_VFPV4), FeatureSet::EMPTY);
    assert_eq!(decode_hwcap(HWCAP_NEON), Neon::IMPLIED);
    assert_eq!(decode_hwcap(HWCAP_NEON | HWCAP_VFPV4), NeonFma::IMPLIED);
  }
}
