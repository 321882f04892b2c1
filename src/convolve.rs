//! Convolution of interleaved complex sequences.
//!
//! [`circular`] and [`linear`] are built on the radix-2 engine in
//! [`crate::fft`]: both operands are transformed, multiplied sample by sample
//! and transformed back. [`linear`] zero-pads to the next power of two at or
//! above `na + nb - 1` samples, which removes wrap-around aliasing.
//! [`linear_direct`] is the `O(na·nb)` schoolbook form with an explicit
//! [`Summation`] policy.

use alloc::vec;
use alloc::vec::Vec;

use crate::fft::{self, default_kernel, Direction, FftError};
use crate::num::{Complex, Float};

/// Accumulation policy for sums of products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Summation {
    /// Plain left-to-right accumulation.
    #[default]
    Fast,
    /// Kahan-compensated accumulation.
    Strict,
}

/// Options for the convolution entry points that accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvolveOptions {
    pub summation: Summation,
}

impl ConvolveOptions {
    pub fn new(summation: Summation) -> Self {
        Self { summation }
    }
}

/// Interleaved length of the linear convolution of `na` and `nb` samples,
/// `2 * (na + nb - 1)`, or `0` if either operand is empty.
pub fn linear_len(na: usize, nb: usize) -> usize {
    if na == 0 || nb == 0 {
        0
    } else {
        2 * (na + nb - 1)
    }
}

/// Transform size used to compute `out_len` samples of linear convolution:
/// the smallest power of two `>= out_len` (and at least 1).
pub fn padded_len(out_len: usize) -> usize {
    out_len.max(1).next_power_of_two()
}

/// Multiply `a` by `b` sample by sample, in place.
pub fn pointwise_mul<T: Float>(a: &mut [T], b: &[T]) -> Result<(), FftError> {
    if a.len() % 2 != 0 || b.len() % 2 != 0 {
        return Err(FftError::OddLength);
    }
    if a.len() != b.len() {
        return Err(FftError::MismatchedLengths);
    }
    mul_samples(a, b);
    Ok(())
}

fn mul_samples<T: Float>(a: &mut [T], b: &[T]) {
    for (x, y) in a.chunks_exact_mut(2).zip(b.chunks_exact(2)) {
        let p = Complex::new(x[0], x[1]).mul(Complex::new(y[0], y[1]));
        x[0] = p.re;
        x[1] = p.im;
    }
}

/// Forward both buffers, multiply, and inverse the product into `fa`.
/// Both hold `n` samples, `n` a power of two.
fn convolve_spectra<T: Float>(fa: &mut [T], fb: &mut [T], n: usize) {
    let kernel = default_kernel();
    fft::run(fa, n, Direction::Forward, kernel);
    fft::run(fb, n, Direction::Forward, kernel);
    mul_samples(fa, fb);
    fft::run(fa, n, Direction::Inverse, kernel);
}

fn check_even(lens: &[usize]) -> Result<(), FftError> {
    if lens.iter().any(|len| len % 2 != 0) {
        Err(FftError::OddLength)
    } else {
        Ok(())
    }
}

/// Circular convolution of two equal-length interleaved sequences.
///
/// `a`, `b` and `dest` must share one length whose complex count is a power
/// of two. The inputs are not modified.
///
/// ```
/// use rotorfft::convolve::circular;
/// let a = [1.0f64, 0.0, 2.0, 0.0];
/// let b = [3.0f64, 0.0, 4.0, 0.0];
/// let mut dest = [0.0f64; 4];
/// circular(&a, &b, &mut dest).unwrap();
/// // [1*3 + 2*4, 1*4 + 2*3]
/// assert!((dest[0] - 11.0).abs() < 1e-12);
/// assert!((dest[2] - 10.0).abs() < 1e-12);
/// ```
pub fn circular<T: Float>(a: &[T], b: &[T], dest: &mut [T]) -> Result<(), FftError> {
    check_even(&[a.len(), b.len(), dest.len()])?;
    if a.len() != b.len() || a.len() != dest.len() {
        return Err(FftError::MismatchedLengths);
    }
    let n = fft::complex_len(a.len())?;
    #[cfg(feature = "verbose-logging")]
    log::trace!("circular convolution of {} samples", n);

    // `dest` doubles as the working buffer for `a`.
    dest.copy_from_slice(a);
    let mut fb = b.to_vec();
    convolve_spectra(dest, &mut fb, n);
    Ok(())
}

/// Validate linear convolution operands and return `(na, nb, needed)` where
/// `needed` is the interleaved result length.
fn linear_shape<T: Float>(
    a: &[T],
    b: &[T],
    dest: &[T],
) -> Result<(usize, usize, usize), FftError> {
    if a.is_empty() || b.is_empty() {
        return Err(FftError::EmptyInput);
    }
    check_even(&[a.len(), b.len()])?;
    let (na, nb) = (a.len() / 2, b.len() / 2);
    let needed = linear_len(na, nb);
    if dest.len() < needed {
        return Err(FftError::DestinationTooSmall);
    }
    Ok((na, nb, needed))
}

/// Linear (non-wrapping) convolution of two interleaved sequences of any
/// length.
///
/// The first `2 * (na + nb - 1)` elements of `dest` receive the result; the
/// rest of `dest` is left as is. Nothing is written on error.
///
/// ```
/// use rotorfft::convolve::linear;
/// let a = [1.0f64, 0.0, 2.0, 0.0, 3.0, 0.0];
/// let b = [0.0f64, 0.0, 1.0, 0.0, 0.5, 0.0];
/// let mut dest = [0.0f64; 10];
/// linear(&a, &b, &mut dest).unwrap();
/// let real: Vec<f64> = dest.chunks(2).map(|c| c[0]).collect();
/// for (got, want) in real.iter().zip([0.0, 1.0, 2.5, 4.0, 1.5]) {
///     assert!((got - want).abs() < 1e-12);
/// }
/// ```
pub fn linear<T: Float>(a: &[T], b: &[T], dest: &mut [T]) -> Result<(), FftError> {
    let (na, nb, needed) = linear_shape(a, b, dest)?;
    let fft_n = padded_len(na + nb - 1);
    #[cfg(feature = "verbose-logging")]
    log::trace!(
        "linear convolution of {} x {} samples, padded to {}",
        na,
        nb,
        fft_n
    );

    let mut fa = vec![T::zero(); 2 * fft_n];
    let mut fb = vec![T::zero(); 2 * fft_n];
    fa[..a.len()].copy_from_slice(a);
    fb[..b.len()].copy_from_slice(b);
    convolve_spectra(&mut fa, &mut fb, fft_n);
    dest[..needed].copy_from_slice(&fa[..needed]);
    Ok(())
}

/// Running complex sum under a [`Summation`] policy.
struct Accumulator<T: Float> {
    sum: Complex<T>,
    compensation: Complex<T>,
    summation: Summation,
}

impl<T: Float> Accumulator<T> {
    fn new(summation: Summation) -> Self {
        Self {
            sum: Complex::zero(),
            compensation: Complex::zero(),
            summation,
        }
    }

    #[inline(always)]
    fn push(&mut self, x: Complex<T>) {
        match self.summation {
            Summation::Fast => self.sum = self.sum.add(x),
            Summation::Strict => {
                let y = x.sub(self.compensation);
                let t = self.sum.add(y);
                self.compensation = t.sub(self.sum).sub(y);
                self.sum = t;
            }
        }
    }
}

/// Linear convolution by direct summation, `O(na·nb)`.
///
/// Same preconditions and output layout as [`linear`]. Suited to short
/// operands, and with [`Summation::Strict`] to sums that would lose
/// precision when accumulated naively.
pub fn linear_direct<T: Float>(
    a: &[T],
    b: &[T],
    dest: &mut [T],
    options: ConvolveOptions,
) -> Result<(), FftError> {
    let (na, nb, _) = linear_shape(a, b, dest)?;
    for k in 0..na + nb - 1 {
        let lo = k.saturating_sub(nb - 1);
        let hi = k.min(na - 1);
        let mut acc = Accumulator::new(options.summation);
        for i in lo..=hi {
            acc.push(Complex::load(a, i).mul(Complex::load(b, k - i)));
        }
        acc.sum.store(dest, k);
    }
    Ok(())
}

/// [`circular`] into a newly allocated buffer.
pub fn circular_vec<T: Float>(a: &[T], b: &[T]) -> Result<Vec<T>, FftError> {
    let mut dest = vec![T::zero(); a.len()];
    circular(a, b, &mut dest)?;
    Ok(dest)
}

/// [`linear`] into a newly allocated buffer of exactly
/// `2 * (na + nb - 1)` elements.
pub fn linear_vec<T: Float>(a: &[T], b: &[T]) -> Result<Vec<T>, FftError> {
    let mut dest = vec![T::zero(); linear_len(a.len() / 2, b.len() / 2)];
    linear(a, b, &mut dest)?;
    Ok(dest)
}
