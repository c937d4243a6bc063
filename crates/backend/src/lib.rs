//! Backend crate: variant selection and cached dispatch for simdkit.
//!
//! This crate turns a table of implementations, each tagged with the CPU
//! features it needs, into a single callable:
//!
//! - **Selection**: [`VariantList::select`] picks the richest variant a
//!   feature set supports
//! - **Dispatch**: [`DispatchCell`] caches that choice process-wide
//! - **Features**: re-exports from `platform` for declaring requirements
//!
//! # Architecture
//!
//! There are three dispatch shapes:
//!
//! 1. **Compile-time selection** ([`dispatch_static!`]): the requested set is
//!    known at the call site, the selector runs during const evaluation and
//!    the compiler emits a direct call.
//!
//! 2. **Function-pointer dispatch** ([`dispatcher!`]): a static cell selects
//!    against [`runtime_features()`](platform::runtime_features) on first
//!    use. Subsequent calls are one acquire load and an indirect call.
//!
//! 3. **Load-time resolution** (`load-time` feature, Linux/Android): the
//!    same cell, resolved from an `.init_array` constructor before `main`.
//!
//! # Usage
//!
//! ```
//! use backend::{dispatcher, variants};
//! use platform::{Avx2, Sse2, declare};
//!
//! type XorFn = fn(&mut [u8], u8);
//!
//! fn xor_scalar(data: &mut [u8], key: u8) {
//!   data.iter_mut().for_each(|b| *b ^= key);
//! }
//! # fn xor_sse2(data: &mut [u8], key: u8) { xor_scalar(data, key) }
//! # fn xor_avx2(data: &mut [u8], key: u8) { xor_scalar(data, key) }
//!
//! variants! {
//!   const XOR: XorFn = [
//!     "scalar" => declare!() => xor_scalar,
//!     "sse2" => declare!(Sse2) => xor_sse2,
//!     "avx2" => declare!(Avx2) => xor_avx2,
//!   ];
//! }
//!
//! dispatcher! {
//!   static XOR_CELL: XorFn = XOR;
//! }
//!
//! let mut data = *b"abc";
//! (XOR_CELL.get())(&mut data, 0x20);
//! assert_eq!(&data, b"ABC");
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod cell;
pub mod dispatch;
pub mod error;
pub mod features;
mod macros;

pub use cell::DispatchCell;
pub use dispatch::{Variant, VariantList, try_select};
pub use error::{NoCompatibleVariant, VariantListError};
pub use platform;
