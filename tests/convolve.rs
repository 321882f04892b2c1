use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rotorfft::convolve::{
    circular, circular_vec, linear, linear_direct, linear_len, linear_vec, pointwise_mul,
    ConvolveOptions, Summation,
};
use rotorfft::FftError;

fn random_buffer(rng: &mut StdRng, n: usize) -> Vec<f64> {
    (0..2 * n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn assert_close(got: &[f64], want: &[f64], tol: f64) {
    assert_eq!(got.len(), want.len());
    for (i, (g, w)) in got.iter().zip(want).enumerate() {
        assert!((g - w).abs() < tol, "index {i}: {g} vs {w}");
    }
}

/// Circular convolution by its definition.
fn naive_circular(a: &[f64], b: &[f64]) -> Vec<f64> {
    let n = a.len() / 2;
    let mut out = vec![0.0; a.len()];
    for k in 0..n {
        for i in 0..n {
            let j = (k + n - i) % n;
            let (ar, ai) = (a[2 * i], a[2 * i + 1]);
            let (br, bi) = (b[2 * j], b[2 * j + 1]);
            out[2 * k] += ar * br - ai * bi;
            out[2 * k + 1] += ar * bi + ai * br;
        }
    }
    out
}

#[test]
fn circular_matches_definition() {
    let mut rng = StdRng::seed_from_u64(3);
    for n in [1usize, 2, 4, 16, 64] {
        let a = random_buffer(&mut rng, n);
        let b = random_buffer(&mut rng, n);
        let mut dest = vec![0.0; 2 * n];
        circular(&a, &b, &mut dest).unwrap();
        assert_close(&dest, &naive_circular(&a, &b), 1e-10);
    }
}

#[test]
fn circular_is_commutative() {
    let mut rng = StdRng::seed_from_u64(5);
    let a = random_buffer(&mut rng, 32);
    let b = random_buffer(&mut rng, 32);
    let ab = circular_vec(&a, &b).unwrap();
    let ba = circular_vec(&b, &a).unwrap();
    assert_close(&ab, &ba, 1e-12);
}

#[test]
fn circular_wraps_around() {
    // Shifting [1, 2, 3, 4] by one sample moves the last sample to the front.
    let a = [1.0f64, 0.0, 2.0, 0.0, 3.0, 0.0, 4.0, 0.0];
    let shift = [0.0f64, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let out = circular_vec(&a, &shift).unwrap();
    assert_close(&out, &[4.0, 0.0, 1.0, 0.0, 2.0, 0.0, 3.0, 0.0], 1e-12);
}

#[test]
fn circular_rejects_bad_shapes() {
    let a = [1.0f64; 8];
    let mut dest = [0.0f64; 8];
    assert_eq!(
        circular(&a, &[1.0; 4], &mut dest),
        Err(FftError::MismatchedLengths)
    );
    assert_eq!(
        circular(&a, &a, &mut [0.0; 4]),
        Err(FftError::MismatchedLengths)
    );
    assert_eq!(
        circular(&[1.0f64; 7], &[1.0; 7], &mut [0.0; 7]),
        Err(FftError::OddLength)
    );
    let six = [1.0f64; 12];
    let mut six_dest = [7.0f64; 12];
    assert_eq!(
        circular(&six, &six, &mut six_dest),
        Err(FftError::NonPowerOfTwo)
    );
    assert!(six_dest.iter().all(|&x| x == 7.0));
    assert_eq!(
        circular::<f64>(&[], &[], &mut []),
        Err(FftError::EmptyInput)
    );
}

#[test]
fn linear_matches_schoolbook() {
    let a = [1.0f64, 0.0, 2.0, 0.0, 3.0, 0.0];
    let b = [0.0f64, 0.0, 1.0, 0.0, 0.5, 0.0];
    let mut dest = vec![0.0f64; linear_len(3, 3)];
    linear(&a, &b, &mut dest).unwrap();
    let expected = [0.0, 0.0, 1.0, 0.0, 2.5, 0.0, 4.0, 0.0, 1.5, 0.0];
    assert_close(&dest, &expected, 1e-12);
}

#[test]
fn linear_agrees_with_direct_on_random_lengths() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..20 {
        let na = rng.gen_range(1..40);
        let nb = rng.gen_range(1..40);
        let a = random_buffer(&mut rng, na);
        let b = random_buffer(&mut rng, nb);
        let fft = linear_vec(&a, &b).unwrap();
        let mut direct = vec![0.0; linear_len(na, nb)];
        linear_direct(&a, &b, &mut direct, ConvolveOptions::default()).unwrap();
        assert_close(&fft, &direct, 1e-10);
    }
}

#[test]
fn linear_leaves_tail_of_dest_alone() {
    let a = [1.0f64, 0.0];
    let b = [2.0f64, 1.0];
    let mut dest = [9.0f64; 6];
    linear(&a, &b, &mut dest).unwrap();
    assert_close(&dest[..2], &[2.0, 1.0], 1e-12);
    assert_eq!(&dest[2..], &[9.0; 4]);
}

#[test]
fn linear_undersized_dest_is_rejected_unwritten() {
    let a = [1.0f64, 0.0, 2.0, 0.0, 3.0, 0.0];
    let b = [0.0f64, 0.0, 1.0, 0.0, 0.5, 0.0];
    let mut dest = [5.0f64; 9];
    assert_eq!(
        linear(&a, &b, &mut dest),
        Err(FftError::DestinationTooSmall)
    );
    assert_eq!(dest, [5.0; 9]);
    assert_eq!(
        linear_direct(&a, &b, &mut dest, ConvolveOptions::default()),
        Err(FftError::DestinationTooSmall)
    );
    assert_eq!(dest, [5.0; 9]);
}

#[test]
fn linear_rejects_empty_and_odd() {
    let mut dest = [0.0f64; 8];
    assert_eq!(linear(&[], &[1.0, 0.0], &mut dest), Err(FftError::EmptyInput));
    assert_eq!(
        linear(&[1.0, 0.0, 1.0], &[1.0, 0.0], &mut dest),
        Err(FftError::OddLength)
    );
    assert_eq!(linear_vec::<f64>(&[1.0, 0.0], &[]), Err(FftError::EmptyInput));
}

#[test]
fn inputs_are_not_modified() {
    let a = vec![1.0f64, -1.0, 0.5, 2.0, 3.0, 0.0, -2.0, 1.0];
    let b = vec![0.25f64, 0.0, 1.0, 1.0, 0.0, -1.0, 2.0, 0.0];
    let (a0, b0) = (a.clone(), b.clone());
    circular_vec(&a, &b).unwrap();
    linear_vec(&a, &b).unwrap();
    assert_eq!(a, a0);
    assert_eq!(b, b0);
}

#[test]
fn f32_circular() {
    let a = [1.0f32, 0.0, 2.0, 0.0, 3.0, 0.0, 4.0, 0.0];
    let b = [0.5f32, 0.0, -1.0, 0.0, 0.0, 0.0, 2.0, 0.0];
    let ab = circular_vec(&a, &b).unwrap();
    let ba = circular_vec(&b, &a).unwrap();
    // [1, 2, 3, 4] (*) [0.5, -1, 0, 2], wrapping at 4 samples
    let expected = [0.5f32, 6.0, 7.5, 1.0];
    for (k, want) in expected.iter().enumerate() {
        assert!((ab[2 * k] - want).abs() < 1e-5, "sample {k}: {}", ab[2 * k]);
        assert!(ab[2 * k + 1].abs() < 1e-5, "sample {k}: {}", ab[2 * k + 1]);
    }
    for (x, y) in ab.iter().zip(&ba) {
        assert!((x - y).abs() < 1e-5, "{x} vs {y}");
    }
}

#[test]
fn f32_linear() {
    let a = [1.0f32, 0.0, 2.0, 0.0, 3.0, 0.0];
    let b = [0.0f32, 0.0, 1.0, 0.0, 0.5, 0.0];
    let out = linear_vec(&a, &b).unwrap();
    let real: Vec<f32> = out.chunks(2).map(|c| c[0]).collect();
    for (got, want) in real.iter().zip([0.0f32, 1.0, 2.5, 4.0, 1.5]) {
        assert!((got - want).abs() < 1e-5, "{got} vs {want}");
    }
    for c in out.chunks(2) {
        assert!(c[1].abs() < 1e-5);
    }
}

#[test]
fn same_inputs_same_output() {
    let mut rng = StdRng::seed_from_u64(21);
    let a = random_buffer(&mut rng, 33);
    let b = random_buffer(&mut rng, 17);
    assert_eq!(linear_vec(&a, &b).unwrap(), linear_vec(&a, &b).unwrap());

    let options = ConvolveOptions::new(Summation::Strict);
    let mut d1 = vec![0.0; linear_len(33, 17)];
    let mut d2 = vec![0.0; linear_len(33, 17)];
    linear_direct(&a, &b, &mut d1, options).unwrap();
    linear_direct(&a, &b, &mut d2, options).unwrap();
    assert_eq!(d1, d2);
}

#[test]
fn strict_and_fast_agree_on_benign_input() {
    let a = [1.0f64, 0.0, 2.0, 0.0, 3.0, 0.0];
    let b = [0.0f64, 0.0, 1.0, 0.0, 0.5, 0.0];
    let mut fast = [0.0f64; 10];
    let mut strict = [0.0f64; 10];
    linear_direct(&a, &b, &mut fast, ConvolveOptions::new(Summation::Fast)).unwrap();
    linear_direct(&a, &b, &mut strict, ConvolveOptions::new(Summation::Strict)).unwrap();
    assert_eq!(fast, strict);
    assert_close(&fast, &[0.0, 0.0, 1.0, 0.0, 2.5, 0.0, 4.0, 0.0, 1.5, 0.0], 1e-15);
}

#[test]
fn strict_summation_keeps_small_products() {
    // One large product followed by many below half an ulp of it.
    let n = 2048;
    let mut a = vec![0.0f32; 2 * n];
    let mut b = vec![0.0f32; 2 * n];
    for i in 0..n {
        a[2 * i] = if i == 0 { 1.0 } else { 1.0e-8 };
        b[2 * (n - 1 - i)] = 1.0;
    }
    let mut fast = vec![0.0f32; linear_len(n, n)];
    let mut strict = vec![0.0f32; linear_len(n, n)];
    linear_direct(&a, &b, &mut fast, ConvolveOptions::new(Summation::Fast)).unwrap();
    linear_direct(&a, &b, &mut strict, ConvolveOptions::new(Summation::Strict)).unwrap();
    // Output sample n-1 sums every a[i] * 1.
    let exact = 1.0f64 + (n - 1) as f64 * 1.0e-8;
    let k = 2 * (n - 1);
    assert_eq!(fast[k], 1.0);
    assert!(((strict[k] as f64) - exact).abs() < 1e-6);
}

#[test]
fn pointwise_mul_multiplies_samples() {
    let mut a = [1.0f64, 1.0, 0.0, 2.0];
    pointwise_mul(&mut a, &[1.0, -1.0, 0.0, 2.0]).unwrap();
    // (1+i)(1-i) = 2, (2i)(2i) = -4
    assert_eq!(a, [2.0, 0.0, -4.0, 0.0]);
}
