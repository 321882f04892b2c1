//! # rotorfft - radix-2 FFT and FFT convolution for Rust
//!
//! An in-place radix-2 Cooley–Tukey FFT over interleaved complex buffers, and
//! the circular and linear convolutions built on it. Everything is generic
//! over `f32` and `f64`.
//!
//! ## Features
//!
//! - **In-place transforms** on `[re, im, re, im, ...]` slices, no allocation
//! - **Forward / inverse** with the `e^{-iθk}` / `e^{+iθk}` convention and `1/n`
//!   inverse scaling, so `inverse(forward(x)) ≈ x`
//! - **Circular and linear convolution** with zero-padding handled for you
//! - **Direct convolution** with selectable Kahan-compensated summation
//! - **SIMD butterflies** (x86_64 SSE2, AArch64 NEON) that are bit-identical to
//!   the scalar path
//!
//! ## Cargo Features
//!
//! - `std` (default): Enable standard library features (runtime CPU probe,
//!   `ROTORFFT_KERNEL` override, `std::error::Error`). Without it, math comes
//!   from `libm`.
//! - `simd` (default): Compile the SSE2 / NEON butterfly kernels
//! - `verbose-logging`: Emit `log` records for kernel selection and
//!   convolution sizing
//! - `internal-tests`: Property tests inside the crate
//!
//! ## Example
//!
//! ```
//! use rotorfft::{convolve, fft};
//!
//! let mut data = [1.0f32, 0.0, 2.0, 0.0, 3.0, 0.0, 4.0, 0.0];
//! fft::forward(&mut data).unwrap();
//! fft::inverse(&mut data).unwrap();
//! assert!((data[2] - 2.0).abs() < 1e-6);
//!
//! let a = [1.0f64, 0.0, 1.0, 0.0];
//! let b = [1.0f64, 0.0, -1.0, 0.0, 2.0, 0.0];
//! let out = convolve::linear_vec(&a, &b).unwrap();
//! assert_eq!(out.len(), 8);
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

/// Fast Fourier Transform (FFT) engine
///
/// Radix-2 transforms over interleaved complex buffers, plus kernel
/// selection.
pub mod fft;

mod fft_kernels;

/// Complex numbers and the float abstraction used throughout the crate.
pub mod num;

/// FFT-based circular and linear convolution
///
/// Also provides schoolbook convolution with a summation policy.
pub mod convolve;

pub use convolve::{circular, linear, ConvolveOptions, Summation};
pub use fft::{forward, inverse, is_power_of_two_size, transform, Direction, FftError, Kernel};
pub use num::{Complex, Complex32, Complex64, Float};
