//! Demonstrates enabling verbose logging for rotorfft.
use rotorfft::convolve::linear_vec;
use rotorfft::fft::forward;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .init();

    // Logs the kernel choice the first time a transform runs.
    let mut data = vec![1.0f32, 0.0, 2.0, 0.0, 3.0, 0.0, 4.0, 0.0];
    forward(&mut data).unwrap();

    // Logs the padded transform size.
    let out = linear_vec(&[1.0f64, 0.0, 2.0, 0.0, 3.0, 0.0], &[0.5f64, 0.0, 0.5, 0.0]).unwrap();
    println!("{:?}", out);
}
