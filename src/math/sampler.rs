//! Discrete Gaussian sampling for noise generation.
//!
//! Implements D_{Z^N,r}: draw i.i.d. normals with standard deviation
//! σ = r/√(2π), round componentwise to the nearest integer, reduce mod the
//! ring modulus. Key material (sk, e) and encryption noise (u, v, w) all
//! come from this distribution.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use super::ring::{from_signed, CyclotomicRing, RingElement};

/// Gaussian sampler over Z with parameter r (σ = r/√(2π)).
pub struct GaussianSampler {
    sigma: f64,
    rng: ChaCha20Rng,
}

impl GaussianSampler {
    /// Create a sampler for the Gaussian parameter `r`.
    pub fn new(r: f64) -> Self {
        Self {
            sigma: r / (2.0 * std::f64::consts::PI).sqrt(),
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Create a seeded sampler for reproducibility.
    pub fn with_seed(r: f64, seed: u64) -> Self {
        Self {
            sigma: r / (2.0 * std::f64::consts::PI).sqrt(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Sample one rounded Gaussian integer using Box-Muller.
    pub fn sample(&mut self) -> i64 {
        let u1: f64 = self.rng.gen_range(0.0001..1.0);
        let u2: f64 = self.rng.gen_range(0.0..1.0);

        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        (z * self.sigma).round() as i64
    }

    /// Sample a ring element with Gaussian coefficients reduced into [0, n).
    pub fn sample_element(&mut self, ring: &CyclotomicRing) -> RingElement {
        let coeffs: Vec<i64> = (0..ring.degree()).map(|_| self.sample()).collect();
        let lifted: Vec<u64> = coeffs
            .into_iter()
            .map(|c| from_signed(c, ring.modulus()))
            .collect();
        ring.reduce(lifted)
    }

    /// Standard deviation σ of the underlying continuous Gaussian.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::CyclotomicRing;

    #[test]
    fn test_samples_are_small() {
        let mut sampler = GaussianSampler::with_seed(3.2, 42);
        // σ ≈ 1.28; a 20σ outlier would indicate a broken transform
        for _ in 0..1000 {
            assert!(sampler.sample().abs() < 26);
        }
    }

    #[test]
    fn test_sample_element_centered_lift() {
        let ring = CyclotomicRing::new(1 << 20, &[1, 0, 0, 0, 1]).unwrap();
        let mut sampler = GaussianSampler::with_seed(3.2, 7);
        let e = sampler.sample_element(&ring);
        // Every coefficient is either small or small-negative (near n)
        for c in ring.centered(&e) {
            assert!(c.abs() < 26);
        }
    }

    #[test]
    fn test_seeded_sampler_reproducible() {
        let mut a = GaussianSampler::with_seed(3.2, 9);
        let mut b = GaussianSampler::with_seed(3.2, 9);
        for _ in 0..32 {
            assert_eq!(a.sample(), b.sample());
        }
    }
}
