use rand::Rng;
use std::f64::consts::PI;

/// Samples a single value from N(0, 1) using the Box-Muller transform.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // Both uniforms on (0, 1] so ln() never sees zero.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// `len` weights drawn from N(0, scale²).
///
/// Every stage draws from the same generator in construction order, so a
/// network built from one seed is reproducible.
pub fn scaled_normal<R: Rng + ?Sized>(len: usize, scale: f64, rng: &mut R) -> Vec<f64> {
    (0..len).map(|_| standard_normal(rng) * scale).collect()
}
