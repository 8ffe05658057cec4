//! Cyclotomic ring arithmetic over Z_n[x]/Φ_m(x).
//!
//! Unlike power-of-two negacyclic rings, Φ_m is an arbitrary monic
//! polynomial here, so multiplication is a length-(2N−1) convolution
//! followed by long division by Φ_m. The modulus n is fully generic: the
//! same type serves the plaintext ring (n = p) and the ciphertext ring
//! (n = q, which need not be prime or NTT-friendly).
//!
//! Elements carry only their coefficient vector; every operation takes the
//! ring as an explicit parameter and two elements are compatible exactly
//! when their rings have equal configuration (modulus, Φ_m, degree).
//!
//! # Example
//!
//! ```
//! use spdz_she::math::CyclotomicRing;
//!
//! // Z_17[x]/(x^2 + 1): x * x = -1
//! let ring = CyclotomicRing::new(17, &[1, 0, 1]).unwrap();
//! let x = ring.from_signed_coeffs(&[0, 1]);
//! let x2 = ring.mul(&x, &x);
//! assert_eq!(x2, ring.constant(-1));
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SheError;

/// The quotient ring Z_n[x]/Φ_m(x) of degree N = φ(m).
///
/// Holds the modulus and the reduction polynomial; elements are plain
/// coefficient vectors (see [`RingElement`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclotomicRing {
    /// Coefficient modulus n.
    modulus: u64,
    /// Φ_m coefficients reduced mod n, ascending order, length N + 1, monic.
    phi: Vec<u64>,
    /// Ring degree N = φ(m).
    degree: usize,
}

/// Element of a [`CyclotomicRing`]: a coefficient vector of length N with
/// every entry canonicalized to [0, n).
///
/// Immutable value type; arithmetic produces new instances. The element does
/// not reference its ring — callers pass the ring explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RingElement {
    coeffs: Vec<u64>,
}

impl RingElement {
    /// Coefficients in [0, n), ascending degree, length N.
    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }

    /// Number of coefficients.
    pub fn dim(&self) -> usize {
        self.coeffs.len()
    }

    /// True if every coefficient is zero.
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|&c| c == 0)
    }
}

/// Map a signed integer to its canonical residue in [0, n).
pub fn from_signed(value: i64, modulus: u64) -> u64 {
    let n = modulus as i128;
    (((value as i128 % n) + n) % n) as u64
}

impl CyclotomicRing {
    /// Build the ring Z_n[x]/Φ(x).
    ///
    /// `phi_coeffs` are the coefficients of Φ_m in ascending order; the
    /// polynomial must be monic of degree at least 1 and the modulus at
    /// least 2. Malformed input is a configuration error — arithmetic never
    /// fails after construction.
    pub fn new(modulus: u64, phi_coeffs: &[i64]) -> Result<Self, SheError> {
        if modulus < 2 {
            return Err(SheError::Configuration(format!(
                "ring modulus must be at least 2, got {modulus}"
            )));
        }
        if phi_coeffs.len() < 2 {
            return Err(SheError::Configuration(
                "cyclotomic polynomial must have degree at least 1".into(),
            ));
        }
        if *phi_coeffs.last().unwrap() != 1 {
            return Err(SheError::Configuration(
                "cyclotomic polynomial must be monic".into(),
            ));
        }
        let phi: Vec<u64> = phi_coeffs.iter().map(|&c| from_signed(c, modulus)).collect();
        Ok(Self {
            modulus,
            degree: phi.len() - 1,
            phi,
        })
    }

    /// Coefficient modulus n.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Ring degree N = φ(m).
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Φ_m coefficients reduced mod n.
    pub fn phi(&self) -> &[u64] {
        &self.phi
    }

    /// The zero element.
    pub fn zero(&self) -> RingElement {
        RingElement {
            coeffs: vec![0; self.degree],
        }
    }

    /// Constant polynomial from a signed value.
    pub fn constant(&self, value: i64) -> RingElement {
        let mut coeffs = vec![0; self.degree];
        coeffs[0] = from_signed(value, self.modulus);
        RingElement { coeffs }
    }

    /// Element from signed coefficients of arbitrary length (reduced mod Φ
    /// and mod n).
    pub fn from_signed_coeffs(&self, coeffs: &[i64]) -> RingElement {
        let lifted: Vec<u64> = coeffs.iter().map(|&c| from_signed(c, self.modulus)).collect();
        self.reduce(lifted)
    }

    /// Lift a coefficient vector of arbitrary length into canonical
    /// degree-<N form: long division by the monic Φ_m, then each coefficient
    /// reduced into [0, n).
    pub fn reduce(&self, mut coeffs: Vec<u64>) -> RingElement {
        let n = self.modulus;
        for c in coeffs.iter_mut() {
            *c %= n;
        }
        for i in (self.degree..coeffs.len()).rev() {
            let c = coeffs[i];
            if c == 0 {
                continue;
            }
            // Φ is monic, so subtracting c·x^{i-N}·Φ clears coefficient i.
            coeffs[i] = 0;
            let base = i - self.degree;
            for (j, &pj) in self.phi[..self.degree].iter().enumerate() {
                if pj == 0 {
                    continue;
                }
                let t = ((c as u128 * pj as u128) % n as u128) as u64;
                coeffs[base + j] = sub_mod(coeffs[base + j], t, n);
            }
        }
        coeffs.resize(self.degree, 0);
        RingElement { coeffs }
    }

    /// Componentwise sum.
    pub fn add(&self, a: &RingElement, b: &RingElement) -> RingElement {
        assert_eq!(a.dim(), self.degree, "element degree mismatch");
        assert_eq!(b.dim(), self.degree, "element degree mismatch");
        let coeffs = a
            .coeffs
            .iter()
            .zip(b.coeffs.iter())
            .map(|(&x, &y)| add_mod(x, y, self.modulus))
            .collect();
        RingElement { coeffs }
    }

    /// Componentwise difference.
    pub fn sub(&self, a: &RingElement, b: &RingElement) -> RingElement {
        assert_eq!(a.dim(), self.degree, "element degree mismatch");
        assert_eq!(b.dim(), self.degree, "element degree mismatch");
        let coeffs = a
            .coeffs
            .iter()
            .zip(b.coeffs.iter())
            .map(|(&x, &y)| sub_mod(x, y, self.modulus))
            .collect();
        RingElement { coeffs }
    }

    /// Additive inverse.
    pub fn neg(&self, a: &RingElement) -> RingElement {
        assert_eq!(a.dim(), self.degree, "element degree mismatch");
        let coeffs = a
            .coeffs
            .iter()
            .map(|&c| if c == 0 { 0 } else { self.modulus - c })
            .collect();
        RingElement { coeffs }
    }

    /// Full product: length-(2N−1) convolution, reduction mod Φ_m, then
    /// coefficient reduction into [0, n).
    pub fn mul(&self, a: &RingElement, b: &RingElement) -> RingElement {
        assert_eq!(a.dim(), self.degree, "element degree mismatch");
        assert_eq!(b.dim(), self.degree, "element degree mismatch");
        let n = self.modulus as u128;
        let mut conv = vec![0u64; 2 * self.degree - 1];
        for (i, &ai) in a.coeffs.iter().enumerate() {
            if ai == 0 {
                continue;
            }
            for (j, &bj) in b.coeffs.iter().enumerate() {
                let t = (ai as u128 * bj as u128) % n;
                let acc = (conv[i + j] as u128 + t) % n;
                conv[i + j] = acc as u64;
            }
        }
        self.reduce(conv)
    }

    /// Product with a scalar in [0, n).
    pub fn scalar_mul(&self, a: &RingElement, scalar: u64) -> RingElement {
        assert_eq!(a.dim(), self.degree, "element degree mismatch");
        let n = self.modulus as u128;
        let s = scalar as u128 % n;
        let coeffs = a
            .coeffs
            .iter()
            .map(|&c| ((c as u128 * s) % n) as u64)
            .collect();
        RingElement { coeffs }
    }

    /// Draw N independent uniform residues mod n.
    pub fn random_uniform<R: Rng>(&self, rng: &mut R) -> RingElement {
        let coeffs = (0..self.degree)
            .map(|_| rng.gen_range(0..self.modulus))
            .collect();
        RingElement { coeffs }
    }

    /// Signed representatives in (−n/2, n/2]: the smallest-magnitude lift of
    /// each coefficient into Z.
    pub fn centered(&self, a: &RingElement) -> Vec<i64> {
        assert_eq!(a.dim(), self.degree, "element degree mismatch");
        let limit = self.modulus / 2;
        a.coeffs
            .iter()
            .map(|&c| {
                if c > limit {
                    c as i64 - self.modulus as i64
                } else {
                    c as i64
                }
            })
            .collect()
    }
}

#[inline]
fn add_mod(a: u64, b: u64, n: u64) -> u64 {
    let s = a as u128 + b as u128;
    (s % n as u128) as u64
}

#[inline]
fn sub_mod(a: u64, b: u64, n: u64) -> u64 {
    if a >= b {
        a - b
    } else {
        n - b + a
    }
}
