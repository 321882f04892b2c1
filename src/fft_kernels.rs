//! Butterfly block kernels for the radix-2 stages.
//!
//! A block kernel combines the low and high halves of one butterfly block,
//! walking the twiddle rotor by angle addition. Every kernel performs the same
//! IEEE operations in the same order (no fused multiply-add), so the vectorized
//! kernels are bit-identical to the scalar one.

#[cfg(all(feature = "simd", any(target_arch = "x86_64", target_arch = "aarch64")))]
use core::any::TypeId;

use crate::num::{Complex, Float};

pub(crate) trait Butterfly<T: Float> {
    /// `lo` and `hi` are interleaved halves of equal length holding `half`
    /// samples each. `step` is the stage's unit rotor `e^{±iθ}`.
    fn block(lo: &mut [T], hi: &mut [T], step: Complex<T>);
}

/// Run every butterfly stage over an already bit-reversed buffer.
#[inline]
pub(crate) fn stages<T: Float, B: Butterfly<T>>(buffer: &mut [T], n: usize, inverse: bool) {
    let two_pi = T::from_f64(2.0) * T::pi();
    let mut len = 2;
    while len <= n {
        let theta = two_pi / T::from_f64(len as f64);
        let theta = if inverse { theta } else { -theta };
        let step = Complex::expi(theta);
        // `len` complex samples per block, `len` scalars per half.
        for block in buffer.chunks_exact_mut(2 * len) {
            let (lo, hi) = block.split_at_mut(len);
            B::block(lo, hi, step);
        }
        len <<= 1;
    }
}

/// Reinterpret a buffer of `T` as `U` when both are the same type.
#[cfg(all(feature = "simd", any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
pub(crate) fn cast_mut<T: Float, U: Float>(buf: &mut [T]) -> Option<&mut [U]> {
    if TypeId::of::<T>() == TypeId::of::<U>() {
        // SAFETY: `T` and `U` are the same type, so layout and validity match.
        Some(unsafe { &mut *(buf as *mut [T] as *mut [U]) })
    } else {
        None
    }
}

pub(crate) struct ScalarButterfly;

impl<T: Float> Butterfly<T> for ScalarButterfly {
    #[inline(always)]
    fn block(lo: &mut [T], hi: &mut [T], step: Complex<T>) {
        let mut w = Complex::new(T::one(), T::zero());
        for (u, v) in lo.chunks_exact_mut(2).zip(hi.chunks_exact_mut(2)) {
            let a = Complex::new(u[0], u[1]);
            let t = Complex::new(v[0], v[1]).mul(w);
            let sum = a.add(t);
            let diff = a.sub(t);
            u[0] = sum.re;
            u[1] = sum.im;
            v[0] = diff.re;
            v[1] = diff.im;
            w = w.mul(step);
        }
    }
}

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub(crate) struct Sse2Butterfly;

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
impl Butterfly<f64> for Sse2Butterfly {
    #[inline(always)]
    fn block(lo: &mut [f64], hi: &mut [f64], step: Complex<f64>) {
        use core::arch::x86_64::*;
        let mut w = Complex::new(1.0f64, 0.0);
        for (u, v) in lo.chunks_exact_mut(2).zip(hi.chunks_exact_mut(2)) {
            // SAFETY: SSE2 is part of the x86_64 baseline and each chunk holds
            // exactly two f64 values.
            unsafe {
                let sign = _mm_set_pd(0.0, -0.0);
                let a = _mm_loadu_pd(u.as_ptr());
                let b = _mm_loadu_pd(v.as_ptr());
                let swapped = _mm_shuffle_pd::<0b01>(b, b);
                let re_part = _mm_mul_pd(b, _mm_set1_pd(w.re));
                let im_part = _mm_xor_pd(_mm_mul_pd(swapped, _mm_set1_pd(w.im)), sign);
                let t = _mm_add_pd(re_part, im_part);
                _mm_storeu_pd(u.as_mut_ptr(), _mm_add_pd(a, t));
                _mm_storeu_pd(v.as_mut_ptr(), _mm_sub_pd(a, t));
            }
            w = w.mul(step);
        }
    }
}

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
impl Butterfly<f32> for Sse2Butterfly {
    #[inline(always)]
    fn block(lo: &mut [f32], hi: &mut [f32], step: Complex<f32>) {
        use core::arch::x86_64::*;
        let mut w = Complex::new(1.0f32, 0.0);
        for (u, v) in lo.chunks_exact_mut(2).zip(hi.chunks_exact_mut(2)) {
            // SAFETY: SSE2 is part of the x86_64 baseline. Only the low 64 bits
            // (two f32 values) of each chunk are loaded and stored.
            unsafe {
                let sign = _mm_setr_ps(-0.0, 0.0, 0.0, 0.0);
                let a = _mm_castsi128_ps(_mm_loadl_epi64(u.as_ptr() as *const __m128i));
                let b = _mm_castsi128_ps(_mm_loadl_epi64(v.as_ptr() as *const __m128i));
                let swapped = _mm_shuffle_ps::<0b11_10_00_01>(b, b);
                let re_part = _mm_mul_ps(b, _mm_set1_ps(w.re));
                let im_part = _mm_xor_ps(_mm_mul_ps(swapped, _mm_set1_ps(w.im)), sign);
                let t = _mm_add_ps(re_part, im_part);
                _mm_storel_epi64(
                    u.as_mut_ptr() as *mut __m128i,
                    _mm_castps_si128(_mm_add_ps(a, t)),
                );
                _mm_storel_epi64(
                    v.as_mut_ptr() as *mut __m128i,
                    _mm_castps_si128(_mm_sub_ps(a, t)),
                );
            }
            w = w.mul(step);
        }
    }
}

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
pub(crate) struct NeonButterfly;

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
impl Butterfly<f64> for NeonButterfly {
    #[inline(always)]
    fn block(lo: &mut [f64], hi: &mut [f64], step: Complex<f64>) {
        use core::arch::aarch64::*;
        let mut w = Complex::new(1.0f64, 0.0);
        for (u, v) in lo.chunks_exact_mut(2).zip(hi.chunks_exact_mut(2)) {
            // SAFETY: NEON is part of the aarch64 baseline and each chunk holds
            // exactly two f64 values.
            unsafe {
                let sign = vld1q_f64([-1.0f64, 1.0].as_ptr());
                let a = vld1q_f64(u.as_ptr());
                let b = vld1q_f64(v.as_ptr());
                let swapped = vextq_f64::<1>(b, b);
                let re_part = vmulq_n_f64(b, w.re);
                let im_part = vmulq_f64(vmulq_n_f64(swapped, w.im), sign);
                let t = vaddq_f64(re_part, im_part);
                vst1q_f64(u.as_mut_ptr(), vaddq_f64(a, t));
                vst1q_f64(v.as_mut_ptr(), vsubq_f64(a, t));
            }
            w = w.mul(step);
        }
    }
}

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
impl Butterfly<f32> for NeonButterfly {
    #[inline(always)]
    fn block(lo: &mut [f32], hi: &mut [f32], step: Complex<f32>) {
        use core::arch::aarch64::*;
        let mut w = Complex::new(1.0f32, 0.0);
        for (u, v) in lo.chunks_exact_mut(2).zip(hi.chunks_exact_mut(2)) {
            // SAFETY: NEON is part of the aarch64 baseline and each chunk holds
            // exactly two f32 values.
            unsafe {
                let sign = vld1_f32([-1.0f32, 1.0].as_ptr());
                let a = vld1_f32(u.as_ptr());
                let b = vld1_f32(v.as_ptr());
                let swapped = vrev64_f32(b);
                let re_part = vmul_n_f32(b, w.re);
                let im_part = vmul_f32(vmul_n_f32(swapped, w.im), sign);
                let t = vadd_f32(re_part, im_part);
                vst1_f32(u.as_mut_ptr(), vadd_f32(a, t));
                vst1_f32(v.as_mut_ptr(), vsub_f32(a, t));
            }
            w = w.mul(step);
        }
    }
}
