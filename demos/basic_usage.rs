//! Basic usage example for rotorfft
//!
//! Walks through the transforms, kernel selection and both convolutions.

use rotorfft::convolve::{circular, linear, linear_direct, linear_len, ConvolveOptions, Summation};
use rotorfft::fft::{default_kernel, forward, inverse, is_power_of_two_size, Kernel};
use rotorfft::FftError;

fn show(label: &str, data: &[f64]) {
    let samples: Vec<String> = data
        .chunks(2)
        .map(|c| format!("{:.2}{:+.2}i", c[0], c[1]))
        .collect();
    println!("   {}: [{}]", label, samples.join(", "));
}

fn main() {
    println!("=== rotorfft Basic Usage Example ===\n");

    // 1. Forward and inverse transform
    println!("1. Fast Fourier Transform (FFT)");
    let mut data = vec![1.0f64, 0.0, 2.0, 0.0, 3.0, 0.0, 4.0, 0.0];
    show("Input", &data);
    forward(&mut data).unwrap();
    show("FFT", &data);
    inverse(&mut data).unwrap();
    show("IFFT", &data);

    // 2. Sizes
    println!("\n2. Sizes");
    for n in [0i64, 1, 6, 8, -8] {
        println!("   {} is a power of two: {}", n, is_power_of_two_size(n));
    }
    let mut bad = vec![0.0f32; 12];
    match forward(&mut bad) {
        Err(FftError::NonPowerOfTwo) => println!("   6 samples rejected, buffer untouched"),
        other => println!("   unexpected: {:?}", other),
    }

    // 3. Kernels
    println!("\n3. Butterfly kernels");
    println!("   selected: {}", default_kernel());
    for kernel in [Kernel::Scalar, Kernel::Sse2, Kernel::Neon] {
        println!("   {:>6} available: {}", kernel.name(), kernel.is_available());
    }

    // 4. Circular convolution
    println!("\n4. Circular convolution");
    let a = [1.0f64, 0.0, 2.0, 0.0, 3.0, 0.0, 4.0, 0.0];
    let b = [0.0f64, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let mut dest = [0.0f64; 8];
    circular(&a, &b, &mut dest).unwrap();
    show("a (*) shift-by-one", &dest);

    // 5. Linear convolution
    println!("\n5. Linear convolution");
    let a = [1.0f64, 0.0, 2.0, 0.0, 3.0, 0.0];
    let b = [0.0f64, 0.0, 1.0, 0.0, 0.5, 0.0];
    let mut dest = vec![0.0f64; linear_len(3, 3)];
    linear(&a, &b, &mut dest).unwrap();
    show("FFT", &dest);
    linear_direct(&a, &b, &mut dest, ConvolveOptions::new(Summation::Strict)).unwrap();
    show("direct (Kahan)", &dest);

    println!("\n=== Done ===");
}
