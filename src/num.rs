//! Scalar and complex number vocabulary shared by the transform engine and
//! the convolution routines.

#[cfg(not(feature = "std"))]
use libm::{sincos, sincosf};

// Minimal float trait for the generic engine (no_std math comes from libm)
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + core::fmt::Debug
    + core::ops::Add<Output = Self>
    + core::ops::Sub<Output = Self>
    + core::ops::Mul<Output = Self>
    + core::ops::Div<Output = Self>
    + core::ops::Neg<Output = Self>
    + 'static
{
    fn zero() -> Self;
    fn one() -> Self;
    /// Convert from `f64`, rounding to the nearest representable value.
    fn from_f64(x: f64) -> Self;
    /// Returns `(sin, cos)`.
    fn sin_cos(self) -> (Self, Self);
    fn pi() -> Self;
}

///
/// # Note
/// `#[allow(unconditional_recursion)]` silences a Clippy false positive: the
/// call below resolves to the inherent `f32::sin_cos`, not to this trait.
#[allow(unconditional_recursion)]
impl Float for f32 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn from_f64(x: f64) -> Self {
        x as f32
    }
    #[cfg(feature = "std")]
    fn sin_cos(self) -> (Self, Self) {
        f32::sin_cos(self)
    }
    #[cfg(not(feature = "std"))]
    fn sin_cos(self) -> (Self, Self) {
        sincosf(self)
    }
    fn pi() -> Self {
        core::f32::consts::PI
    }
}

#[allow(unconditional_recursion)]
impl Float for f64 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn from_f64(x: f64) -> Self {
        x
    }
    #[cfg(feature = "std")]
    fn sin_cos(self) -> (Self, Self) {
        f64::sin_cos(self)
    }
    #[cfg(not(feature = "std"))]
    fn sin_cos(self) -> (Self, Self) {
        sincos(self)
    }
    fn pi() -> Self {
        core::f64::consts::PI
    }
}

/// A complex value with value semantics.
///
/// The `*_into` operations write into an explicit destination. Because the
/// receiver and operands are copied before the destination is borrowed, the
/// destination may be one of the operands:
///
/// ```
/// use rotorfft::Complex64;
/// let mut a = Complex64::new(1.0, 2.0);
/// let b = Complex64::new(3.0, 4.0);
/// a.mul_into(b, &mut a);
/// assert_eq!(a, Complex64::new(-5.0, 10.0));
/// ```
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex<T: Float> {
    pub re: T,
    pub im: T,
}

impl<T: Float> Default for Complex<T> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Float> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
    pub fn zero() -> Self {
        Self {
            re: T::zero(),
            im: T::zero(),
        }
    }
    /// Unit rotor `e^{iθ}`.
    #[inline(always)]
    pub fn expi(theta: T) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self { re: cos, im: sin }
    }

    /// Read sample `index` from an interleaved `[re, im, re, im, ...]` buffer.
    ///
    /// # Panics
    /// Panics if `2 * index + 1` is out of bounds.
    #[inline(always)]
    pub fn load(buf: &[T], index: usize) -> Self {
        Self {
            re: buf[2 * index],
            im: buf[2 * index + 1],
        }
    }

    /// Write this value to sample `index` of an interleaved buffer.
    ///
    /// # Panics
    /// Panics if `2 * index + 1` is out of bounds.
    #[inline(always)]
    pub fn store(self, buf: &mut [T], index: usize) {
        buf[2 * index] = self.re;
        buf[2 * index + 1] = self.im;
    }

    #[inline(always)]
    pub fn set(&mut self, re: T, im: T) {
        self.re = re;
        self.im = im;
    }

    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    pub fn add(self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }
    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    pub fn sub(self, other: Self) -> Self {
        Self {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }
    /// `(a+bi)(c+di) = (ac-bd) + (ad+bc)i`, evaluated without fused
    /// multiply-add.
    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    pub fn mul(self, other: Self) -> Self {
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }
    #[inline(always)]
    pub fn scale(self, s: T) -> Self {
        Self {
            re: self.re * s,
            im: self.im * s,
        }
    }
    #[inline(always)]
    pub fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }
    #[inline(always)]
    pub fn norm_sqr(self) -> T {
        self.re * self.re + self.im * self.im
    }

    #[inline(always)]
    pub fn add_into(self, other: Self, dest: &mut Self) {
        *dest = self.add(other);
    }
    #[inline(always)]
    pub fn sub_into(self, other: Self, dest: &mut Self) {
        *dest = self.sub(other);
    }
    #[inline(always)]
    pub fn mul_into(self, other: Self, dest: &mut Self) {
        *dest = self.mul(other);
    }
    #[inline(always)]
    pub fn scale_into(self, s: T, dest: &mut Self) {
        *dest = self.scale(s);
    }
    #[inline(always)]
    pub fn conj_into(self, dest: &mut Self) {
        *dest = self.conj();
    }
}

impl<T: Float> core::ops::Neg for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

impl<T: Float> core::ops::Add for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Complex::<T>::add(self, other)
    }
}

impl<T: Float> core::ops::Sub for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Complex::<T>::sub(self, other)
    }
}

impl<T: Float> core::ops::Mul for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        Complex::<T>::mul(self, other)
    }
}

pub type Complex32 = Complex<f32>;
pub type Complex64 = Complex<f64>;
