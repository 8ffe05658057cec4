//! SIMD slot encoding and decoding via the polynomial CRT.
//!
//! Φ_m factors mod p into irreducible polynomials f_1, …, f_s (the moduli
//! list); by the Chinese Remainder Theorem the plaintext ring Z_p[x]/Φ_m is
//! the product of the residue fields Z_p[x]/f_i, and each factor carries one
//! independent message slot.
//!
//! Encoding combines per-slot residues with the CRT basis
//! e_i = (M/f_i)·((M/f_i)^{-1} mod f_i) and centers every coefficient into
//! (−p/2, p/2] before lifting into the ciphertext ring — this centering is
//! what keeps the encoded plaintext small enough not to eat the noise
//! budget. Decoding applies the **double centering**: first mod q (smallest
//! integer representative, essential once noise approaches q), then mod p
//! per slot.

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::SheError;
use crate::math::gf;
use crate::math::ring::{from_signed, CyclotomicRing, RingElement};

/// A vector of slot values, one per CRT factor, as centered representatives
/// in (−p/2, p/2]. Unused trailing slots are implicitly zero.
pub type SlotVector = Vec<i64>;

/// Precomputed CRT data for a plaintext modulus p and cyclotomic index m.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotCodec {
    p: u64,
    /// Irreducible factors of Φ_m mod p, in deterministic factorization order.
    moduli: Vec<Vec<u64>>,
    /// CRT basis: e_i = (M/f_i)·((M/f_i)^{-1} mod f_i) mod M.
    basis: Vec<Vec<u64>>,
    /// M = Φ_m mod p, the product of the moduli.
    product: Vec<u64>,
}

impl SlotCodec {
    /// Factor Φ_m mod p and precompute the CRT reconstruction basis.
    pub fn new(p: u64, phi_coeffs: &[i64]) -> Result<Self, SheError> {
        if p < 3 || p % 2 == 0 {
            return Err(SheError::Configuration(format!(
                "slot preparation requires an odd prime plaintext modulus, got {p}"
            )));
        }
        let product = gf::trim(phi_coeffs.iter().map(|&c| from_signed(c, p)).collect());
        if gf::deg(&product) < 1 || product.last() != Some(&1) {
            return Err(SheError::Configuration(
                "Φ_m must reduce to a monic non-constant polynomial mod p".into(),
            ));
        }
        let moduli = gf::factor_squarefree(&product, p);
        let mut basis = Vec::with_capacity(moduli.len());
        for f in &moduli {
            let mi = gf::divmod(&product, f, p).0;
            let inv = gf::inv_mod(&mi, f, p).ok_or_else(|| {
                SheError::Configuration("Φ_m is not squarefree mod p (is gcd(m, p) = 1?)".into())
            })?;
            basis.push(gf::rem(&gf::mul(&mi, &inv, p), &product, p));
        }
        Ok(Self {
            p,
            moduli,
            basis,
            product,
        })
    }

    /// Plaintext modulus p.
    pub fn p(&self) -> u64 {
        self.p
    }

    /// Number of available slots.
    pub fn num_slots(&self) -> usize {
        self.moduli.len()
    }

    /// The irreducible factors of Φ_m mod p, in slot order.
    pub fn moduli(&self) -> &[Vec<u64>] {
        &self.moduli
    }

    /// Encode up to `num_slots` messages into one ring element over q.
    ///
    /// Missing slots are zero-padded. The combined polynomial is centered
    /// coefficientwise into (−p/2, p/2] and lifted into `ring_q`; the
    /// centering of independent coefficients fans out across threads.
    pub fn encode(
        &self,
        messages: &[i64],
        ring_q: &CyclotomicRing,
    ) -> Result<RingElement, SheError> {
        if messages.len() > self.moduli.len() {
            return Err(SheError::SlotOverflow {
                messages: messages.len(),
                slots: self.moduli.len(),
            });
        }
        let mut combined: Vec<u64> = Vec::new();
        for (msg, e) in messages.iter().zip(self.basis.iter()) {
            let residue = from_signed(*msg, self.p);
            combined = gf::add(&combined, &gf::scalar_mul(e, residue, self.p), self.p);
        }
        combined.resize(gf::deg(&self.product), 0);

        let limit = self.p / 2;
        let centered: Vec<i64> = combined
            .par_iter()
            .map(|&c| {
                if c > limit {
                    c as i64 - self.p as i64
                } else {
                    c as i64
                }
            })
            .collect();
        Ok(ring_q.from_signed_coeffs(&centered))
    }

    /// Decode a ciphertext-ring element into its slot values.
    ///
    /// Centers mod q first (the smallest integer lift — skipping this step
    /// corrupts every slot once the accumulated noise exceeds p/2), reduces
    /// mod p, then takes each residue's constant term re-centered into
    /// (−p/2, p/2].
    pub fn decode(&self, element: &RingElement, ring_q: &CyclotomicRing) -> SlotVector {
        let centered_q = ring_q.centered(element);
        let poly_p = gf::trim(
            centered_q
                .iter()
                .map(|&c| from_signed(c, self.p))
                .collect(),
        );
        self.moduli
            .iter()
            .map(|f| {
                let residue = gf::rem(&poly_p, f, self.p);
                let constant = residue.first().copied().unwrap_or(0);
                center_residue(constant, self.p)
            })
            .collect()
    }
}

/// Center a residue in [0, p) into (−p/2, p/2].
pub fn center_residue(value: u64, p: u64) -> i64 {
    if value > p / 2 {
        value as i64 - p as i64
    } else {
        value as i64
    }
}

/// Elementwise sum of two slot vectors mod p, centered.
pub fn slot_add(a: &[i64], b: &[i64], p: u64) -> SlotVector {
    assert_eq!(a.len(), b.len(), "slot count mismatch");
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| center_residue(from_signed(x + y, p), p))
        .collect()
}

/// Elementwise difference of two slot vectors mod p, centered.
pub fn slot_sub(a: &[i64], b: &[i64], p: u64) -> SlotVector {
    assert_eq!(a.len(), b.len(), "slot count mismatch");
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| center_residue(from_signed(x - y, p), p))
        .collect()
}

/// Elementwise negation of a slot vector mod p, centered.
pub fn slot_neg(a: &[i64], p: u64) -> SlotVector {
    a.iter()
        .map(|&x| center_residue(from_signed(-x, p), p))
        .collect()
}

/// Elementwise product of two slot vectors mod p, centered.
pub fn slot_mul(a: &[i64], b: &[i64], p: u64) -> SlotVector {
    assert_eq!(a.len(), b.len(), "slot count mismatch");
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let prod = (x as i128 * y as i128).rem_euclid(p as i128) as i64;
            center_residue(prod as u64, p)
        })
        .collect()
}

/// Uniform slot vector with entries in (−p/2, p/2].
pub fn random_slots<R: Rng>(len: usize, p: u64, rng: &mut R) -> SlotVector {
    (0..len)
        .map(|_| center_residue(rng.gen_range(0..p), p))
        .collect()
}

/// Diagonal replication: the same scalar in every slot.
pub fn replicate(value: i64, len: usize) -> SlotVector {
    vec![value; len]
}
