//! Fast Fourier Transform (FFT) engine.
//!
//! This module implements an in-place radix-2
//! [Cooley–Tukey](https://en.wikipedia.org/wiki/Cooley%E2%80%93Tukey_FFT_algorithm)
//! transform over interleaved `[re, im, re, im, ...]` buffers of `f32` or
//! `f64`. The forward transform multiplies by `e^{-iθk}`, the inverse by
//! `e^{+iθk}` and scales the result by `1/n`.
//!
//! Twiddle factors are produced by a running rotor updated with angle
//! addition once per butterfly, rather than one `sin`/`cos` call per
//! twiddle. Results therefore carry the rounding drift of that recurrence,
//! and every [`Kernel`] reproduces it bit for bit.

use core::fmt;

#[cfg(feature = "std")]
use std::sync::OnceLock;

use crate::fft_kernels::{stages, ScalarButterfly};
#[cfg(all(feature = "simd", any(target_arch = "x86_64", target_arch = "aarch64")))]
use crate::fft_kernels::cast_mut;
#[cfg(all(feature = "simd", target_arch = "aarch64"))]
use crate::fft_kernels::NeonButterfly;
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
use crate::fft_kernels::Sse2Butterfly;

pub use crate::num::{Complex, Complex32, Complex64, Float};

/// Environment variable consulted once to force a butterfly kernel.
///
/// Accepts the names understood by [`Kernel::from_name`].
pub const KERNEL_ENV: &str = "ROTORFFT_KERNEL";

/// Invalid-argument faults reported by the transform and convolution entry
/// points. All of them are caller errors and are raised before any buffer is
/// modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    /// A buffer held no samples.
    EmptyInput,
    /// An interleaved buffer had an odd number of scalars.
    OddLength,
    /// The complex sample count was not a power of two.
    NonPowerOfTwo,
    /// Buffers that must be the same length were not.
    MismatchedLengths,
    /// The destination cannot hold the full result.
    DestinationTooSmall,
}

impl fmt::Display for FftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FftError::EmptyInput => write!(f, "input buffer is empty"),
            FftError::OddLength => {
                write!(f, "interleaved complex buffer must have an even length")
            }
            FftError::NonPowerOfTwo => {
                write!(f, "complex sample count must be a power of two")
            }
            FftError::MismatchedLengths => write!(f, "buffer lengths do not match"),
            FftError::DestinationTooSmall => {
                write!(f, "destination buffer is too small for the result")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FftError {}

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Multiply by `e^{-iθk}`, unscaled.
    Forward,
    /// Multiply by `e^{+iθk}` and scale by `1/n`.
    Inverse,
}

/// Butterfly implementation used for the radix-2 stages.
///
/// Kernels differ only in how a butterfly block is evaluated; all of them
/// produce identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kernel {
    /// Portable scalar code.
    #[default]
    Scalar,
    /// SSE2 butterflies on x86_64.
    Sse2,
    /// NEON butterflies on AArch64.
    Neon,
}

impl Kernel {
    /// Parse a kernel name as accepted by [`KERNEL_ENV`].
    ///
    /// `scalar`, `sse2` and `neon` name a kernel directly; `auto` and `simd`
    /// pick the best kernel available on this machine. Matching is
    /// case-insensitive and ignores surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Kernel> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("scalar") {
            Some(Kernel::Scalar)
        } else if name.eq_ignore_ascii_case("sse2") {
            Some(Kernel::Sse2)
        } else if name.eq_ignore_ascii_case("neon") {
            Some(Kernel::Neon)
        } else if name.eq_ignore_ascii_case("auto") || name.eq_ignore_ascii_case("simd") {
            Some(Kernel::best_available())
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Kernel::Scalar => "scalar",
            Kernel::Sse2 => "sse2",
            Kernel::Neon => "neon",
        }
    }

    /// Whether this kernel was compiled in and the CPU supports it.
    pub fn is_available(self) -> bool {
        match self {
            Kernel::Scalar => true,
            Kernel::Sse2 => sse2_available(),
            Kernel::Neon => neon_available(),
        }
    }

    /// The fastest kernel usable on this machine.
    pub fn best_available() -> Kernel {
        if Kernel::Sse2.is_available() {
            Kernel::Sse2
        } else if Kernel::Neon.is_available() {
            Kernel::Neon
        } else {
            Kernel::Scalar
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(all(feature = "simd", target_arch = "x86_64", feature = "std"))]
fn sse2_available() -> bool {
    std::arch::is_x86_feature_detected!("sse2")
}

#[cfg(all(feature = "simd", target_arch = "x86_64", not(feature = "std")))]
fn sse2_available() -> bool {
    cfg!(target_feature = "sse2")
}

#[cfg(not(all(feature = "simd", target_arch = "x86_64")))]
fn sse2_available() -> bool {
    false
}

#[cfg(all(feature = "simd", target_arch = "aarch64", feature = "std"))]
fn neon_available() -> bool {
    std::arch::is_aarch64_feature_detected!("neon")
}

#[cfg(all(feature = "simd", target_arch = "aarch64", not(feature = "std")))]
fn neon_available() -> bool {
    cfg!(target_feature = "neon")
}

#[cfg(not(all(feature = "simd", target_arch = "aarch64")))]
fn neon_available() -> bool {
    false
}

/// Kernel used by [`forward`], [`inverse`], [`transform`] and the
/// convolution routines.
///
/// With `std`, the choice is made on first use from [`KERNEL_ENV`] and the
/// CPU, then cached for the life of the process.
pub fn default_kernel() -> Kernel {
    #[cfg(feature = "std")]
    {
        static KERNEL: OnceLock<Kernel> = OnceLock::new();
        *KERNEL.get_or_init(|| {
            let requested = std::env::var(KERNEL_ENV).ok();
            select_kernel(requested.as_deref())
        })
    }
    #[cfg(not(feature = "std"))]
    {
        Kernel::best_available()
    }
}

/// Resolve an optional kernel request to a usable kernel.
#[cfg(feature = "std")]
fn select_kernel(requested: Option<&str>) -> Kernel {
    let kernel = match requested.map(|name| (name, Kernel::from_name(name))) {
        Some((_, Some(kernel))) if kernel.is_available() => kernel,
        Some((_name, Some(_kernel))) => {
            #[cfg(feature = "verbose-logging")]
            log::debug!(
                "{}={} requests the {} kernel, which is unavailable here",
                KERNEL_ENV,
                _name,
                _kernel
            );
            Kernel::best_available()
        }
        Some((_name, None)) => {
            #[cfg(feature = "verbose-logging")]
            log::debug!("ignoring unknown {} value {:?}", KERNEL_ENV, _name);
            Kernel::best_available()
        }
        None => Kernel::best_available(),
    };
    #[cfg(feature = "verbose-logging")]
    log::debug!("using the {} butterfly kernel", kernel);
    kernel
}

/// Returns true iff `n` is a positive power of two.
///
/// ```
/// use rotorfft::fft::is_power_of_two_size;
/// assert!(is_power_of_two_size(1024));
/// assert!(!is_power_of_two_size(6));
/// assert!(!is_power_of_two_size(-4));
/// ```
pub fn is_power_of_two_size(n: i64) -> bool {
    n > 0 && (n & (n - 1)) == 0
}

/// Validate an interleaved transform buffer of `len` scalars and return its
/// complex sample count.
pub(crate) fn complex_len(len: usize) -> Result<usize, FftError> {
    if len == 0 {
        return Err(FftError::EmptyInput);
    }
    if len % 2 != 0 {
        return Err(FftError::OddLength);
    }
    let n = len / 2;
    if !n.is_power_of_two() {
        return Err(FftError::NonPowerOfTwo);
    }
    Ok(n)
}

/// In-place forward transform using [`default_kernel`].
pub fn forward<T: Float>(buffer: &mut [T]) -> Result<(), FftError> {
    transform(buffer, Direction::Forward)
}

/// In-place inverse transform (scaled by `1/n`) using [`default_kernel`].
pub fn inverse<T: Float>(buffer: &mut [T]) -> Result<(), FftError> {
    transform(buffer, Direction::Inverse)
}

/// In-place transform of an interleaved complex buffer.
///
/// The buffer length must be even and its complex count `len/2` a power of
/// two. On error the buffer is left untouched.
///
/// ```
/// use rotorfft::fft::{transform, Direction};
/// let mut data = [1.0f64, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
/// transform(&mut data, Direction::Forward).unwrap();
/// assert!((data[0] - 4.0).abs() < 1e-12);
/// assert!(data[2..].iter().all(|x| x.abs() < 1e-12));
/// ```
pub fn transform<T: Float>(buffer: &mut [T], direction: Direction) -> Result<(), FftError> {
    transform_with_kernel(buffer, direction, default_kernel())
}

/// [`transform`] with an explicit butterfly kernel. An unavailable kernel
/// falls back to [`Kernel::Scalar`].
pub fn transform_with_kernel<T: Float>(
    buffer: &mut [T],
    direction: Direction,
    kernel: Kernel,
) -> Result<(), FftError> {
    let n = complex_len(buffer.len())?;
    run(buffer, n, direction, kernel);
    Ok(())
}

/// Transform a buffer already validated to hold `n` (a power of two) samples.
pub(crate) fn run<T: Float>(buffer: &mut [T], n: usize, direction: Direction, kernel: Kernel) {
    debug_assert_eq!(buffer.len(), 2 * n);
    bit_reverse(buffer, n);
    let inverse = direction == Direction::Inverse;
    run_stages(buffer, n, inverse, kernel);
    if inverse {
        let scale = T::from_f64(n as f64);
        for x in buffer.iter_mut() {
            *x = *x / scale;
        }
    }
}

fn run_stages<T: Float>(buffer: &mut [T], n: usize, inverse: bool, kernel: Kernel) {
    match kernel {
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        Kernel::Sse2 if kernel.is_available() => {
            if let Some(buf) = cast_mut::<T, f64>(buffer) {
                return stages::<f64, Sse2Butterfly>(buf, n, inverse);
            }
            if let Some(buf) = cast_mut::<T, f32>(buffer) {
                return stages::<f32, Sse2Butterfly>(buf, n, inverse);
            }
        }
        #[cfg(all(feature = "simd", target_arch = "aarch64"))]
        Kernel::Neon if kernel.is_available() => {
            if let Some(buf) = cast_mut::<T, f64>(buffer) {
                return stages::<f64, NeonButterfly>(buf, n, inverse);
            }
            if let Some(buf) = cast_mut::<T, f32>(buffer) {
                return stages::<f32, NeonButterfly>(buf, n, inverse);
            }
        }
        _ => {}
    }
    stages::<T, ScalarButterfly>(buffer, n, inverse);
}

/// Bit-reversal permutation of `n` interleaved samples using the incremental
/// bit-toggle walk: `j` tracks the reversed counterpart of `i` in O(1)
/// amortized steps.
fn bit_reverse<T: Float>(buffer: &mut [T], n: usize) {
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            buffer.swap(2 * i, 2 * j);
            buffer.swap(2 * i + 1, 2 * j + 1);
        }
    }
}


#[cfg(all(feature = "internal-tests", test))]
mod coverage_tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn naive_dft(input: &[f64], sign: f64) -> Vec<f64> {
        let n = input.len() / 2;
        let mut out = alloc::vec![0.0; input.len()];
        for k in 0..n {
            let (mut re, mut im) = (0.0, 0.0);
            for t in 0..n {
                let angle = sign * 2.0 * core::f64::consts::PI * (k * t) as f64 / n as f64;
                let (s, c) = angle.sin_cos();
                re += input[2 * t] * c - input[2 * t + 1] * s;
                im += input[2 * t] * s + input[2 * t + 1] * c;
            }
            out[2 * k] = re;
            out[2 * k + 1] = im;
        }
        out
    }

    #[test]
    fn forward_matches_naive_dft() {
        let mut rng = StdRng::seed_from_u64(7);
        for log_n in 0..8 {
            let n = 1usize << log_n;
            let input: Vec<f64> = (0..2 * n).map(|_| rng.gen_range(-1.0..1.0)).collect();
            let expected = naive_dft(&input, -1.0);
            let mut data = input.clone();
            forward(&mut data).unwrap();
            for (a, b) in data.iter().zip(expected.iter()) {
                assert!((a - b).abs() < 1e-9, "n = {n}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn inverse_uses_positive_rotation() {
        let mut rng = StdRng::seed_from_u64(11);
        let input: Vec<f64> = (0..32).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let expected: Vec<f64> = naive_dft(&input, 1.0).iter().map(|x| x / 16.0).collect();
        let mut data = input;
        inverse(&mut data).unwrap();
        for (a, b) in data.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-10, "{a} vs {b}");
        }
    }

    proptest! {
        #[test]
        fn prop_roundtrip_f64(log_n in 0usize..10, seed in any::<u64>()) {
            let n = 1usize << log_n;
            let mut rng = StdRng::seed_from_u64(seed);
            let orig: Vec<f64> = (0..2 * n).map(|_| rng.gen_range(-1000.0..1000.0)).collect();
            let mut data = orig.clone();
            forward(&mut data).unwrap();
            inverse(&mut data).unwrap();
            for (a, b) in orig.iter().zip(data.iter()) {
                prop_assert!((a - b).abs() <= 1e-9 * (1.0 + a.abs()));
            }
        }

        #[test]
        fn prop_kernels_agree(log_n in 0usize..9, seed in any::<u64>()) {
            let n = 1usize << log_n;
            let mut rng = StdRng::seed_from_u64(seed);
            let orig: Vec<f32> = (0..2 * n).map(|_| rng.gen_range(-10.0..10.0)).collect();
            let mut scalar = orig.clone();
            let mut best = orig;
            transform_with_kernel(&mut scalar, Direction::Forward, Kernel::Scalar).unwrap();
            transform_with_kernel(&mut best, Direction::Forward, Kernel::best_available()).unwrap();
            prop_assert_eq!(scalar, best);
        }
    }
}
