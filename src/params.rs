//! Parameter sets for the SHE preprocessing engine.
//!
//! The numeric search that produces these bundles (cyclotomic index search,
//! Monte-Carlo estimation of the ring expansion factor C_m, fixed-point
//! derivation of q and r) runs offline and is not part of this crate; the
//! engine consumes its output as an opaque record. The toy presets below are
//! hand-checked configurations for tests and examples and offer **no
//! cryptographic security**.

use serde::{Deserialize, Serialize};

use crate::error::SheError;

/// Configuration bundle produced by the offline parameter search.
///
/// # Fields
///
/// * `m` - Cyclotomic index; plaintext and ciphertext rings are quotients by Φ_m
/// * `ring_degree` - N = φ(m), degree of the cyclotomic polynomial
/// * `phi_coeffs` - Coefficients of Φ_m in ascending order (length N + 1, monic)
/// * `p` - Plaintext modulus (odd prime)
/// * `q` - Ciphertext modulus; typically a power of two but the ring
///   arithmetic is modulus-agnostic
/// * `r` - Gaussian parameter of the noise distribution D_{Z^N,r}
/// * `c_m` - Multiplicative expansion factor of the ring (informational)
/// * `num_slots` - Number s of SIMD slots (irreducible factors of Φ_m mod p)
/// * `ext_degree` - Extension degree k; every factor of Φ_m mod p has degree
///   a multiple of k
/// * `n_parties` - Number n of MPC parties simulated in a session
/// * `sec` - Statistical security parameter of the ZK proof
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheParams {
    pub m: usize,
    pub ring_degree: usize,
    pub phi_coeffs: Vec<i64>,
    pub p: u64,
    pub q: u64,
    pub r: f64,
    pub c_m: f64,
    pub num_slots: usize,
    pub ext_degree: usize,
    pub n_parties: usize,
    pub sec: usize,
}

impl SheParams {
    /// Toy parameters with two slots: m = 4, Φ_4 = x² + 1, p = 17.
    ///
    /// 17 ≡ 1 (mod 4), so Φ_4 splits into two linear factors mod 17 and the
    /// plaintext ring carries s = 2 slots over F_17.
    pub fn toy_m4() -> Self {
        Self {
            m: 4,
            ring_degree: 2,
            phi_coeffs: vec![1, 0, 1],
            p: 17,
            q: 1 << 50,
            r: 3.2,
            c_m: 8.6,
            num_slots: 2,
            ext_degree: 1,
            n_parties: 3,
            sec: 8,
        }
    }

    /// Toy parameters with four slots: m = 8, Φ_8 = x⁴ + 1, p = 17.
    pub fn toy_m8() -> Self {
        Self {
            m: 8,
            ring_degree: 4,
            phi_coeffs: vec![1, 0, 0, 0, 1],
            p: 17,
            q: 1 << 50,
            r: 3.2,
            c_m: 8.6,
            num_slots: 4,
            ext_degree: 1,
            n_parties: 3,
            sec: 8,
        }
    }

    /// Toy parameters with extension degree 2: m = 8, p = 5.
    ///
    /// 5 has multiplicative order 2 mod 8, so Φ_8 factors into two quadratics
    /// mod 5 and each slot lives in F_{5²}.
    pub fn toy_m8_k2() -> Self {
        Self {
            m: 8,
            ring_degree: 4,
            phi_coeffs: vec![1, 0, 0, 0, 1],
            p: 5,
            q: 1 << 50,
            r: 3.2,
            c_m: 8.6,
            num_slots: 2,
            ext_degree: 2,
            n_parties: 3,
            sec: 8,
        }
    }

    /// Check internal consistency of the bundle.
    pub fn validate(&self) -> Result<(), SheError> {
        if self.phi_coeffs.len() != self.ring_degree + 1 {
            return Err(SheError::Configuration(format!(
                "phi_coeffs has {} entries, expected ring_degree + 1 = {}",
                self.phi_coeffs.len(),
                self.ring_degree + 1
            )));
        }
        if self.phi_coeffs.last() != Some(&1) {
            return Err(SheError::Configuration(
                "cyclotomic polynomial must be monic".into(),
            ));
        }
        if self.p < 3 || self.p % 2 == 0 {
            return Err(SheError::Configuration(format!(
                "plaintext modulus must be an odd prime, got {}",
                self.p
            )));
        }
        if self.q <= self.p {
            return Err(SheError::Configuration("q must exceed p".into()));
        }
        if self.q >= 1 << 62 {
            return Err(SheError::Configuration(
                "q must fit below 2^62 so intermediate products fit in 128 bits".into(),
            ));
        }
        if gcd(self.m as u64, self.p) != 1 {
            return Err(SheError::Configuration(
                "m and p must be coprime for Φ_m to be squarefree mod p".into(),
            ));
        }
        if self.r <= 0.0 {
            return Err(SheError::Configuration(
                "noise parameter r must be positive".into(),
            ));
        }
        if self.num_slots == 0 || self.ext_degree == 0 {
            return Err(SheError::Configuration(
                "num_slots and ext_degree must be positive".into(),
            ));
        }
        if self.num_slots * self.ext_degree > self.ring_degree {
            return Err(SheError::Configuration(format!(
                "s·k = {} exceeds φ(m) = {}",
                self.num_slots * self.ext_degree,
                self.ring_degree
            )));
        }
        if self.n_parties < 2 {
            return Err(SheError::Configuration("at least two parties required".into()));
        }
        if self.sec == 0 {
            return Err(SheError::Configuration("sec must be positive".into()));
        }
        Ok(())
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toy_presets_valid() {
        assert!(SheParams::toy_m4().validate().is_ok());
        assert!(SheParams::toy_m8().validate().is_ok());
        assert!(SheParams::toy_m8_k2().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_monic_phi() {
        let mut params = SheParams::toy_m4();
        params.phi_coeffs = vec![1, 0, 2];
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_even_p() {
        let mut params = SheParams::toy_m4();
        params.p = 16;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_slot_overcommit() {
        let mut params = SheParams::toy_m4();
        params.num_slots = 5;
        assert!(params.validate().is_err());
    }
}
