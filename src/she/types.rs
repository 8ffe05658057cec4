//! Key and ciphertext types for the somewhat-homomorphic cryptosystem.
//!
//! Ciphertexts live in A_q³ where A_q = Z_q[x]/Φ_m(x): a fixed 3-tuple
//! (c0, c1, c2). Freshly encrypted or added ciphertexts have c2 = 0
//! ("degree 1"); one homomorphic multiplication produces c2 ≠ 0
//! ("degree 2") and such a ciphertext cannot be multiplied again without
//! resharing first.

use serde::{Deserialize, Serialize};

use crate::math::RingElement;

/// Public key (a, b) with b = a·sk + p·e for uniform a and small e.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    /// Uniform element of the ciphertext ring.
    pub a: RingElement,
    /// b = a·sk + p·e.
    pub b: RingElement,
}

/// Secret key: a small-coefficient element of the ciphertext ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretKey {
    pub s: RingElement,
}

/// Output of key generation.
///
/// `pk_hat` is an independent uniform keypair the original protocol reserves
/// for extensions; nothing in this crate consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPair {
    pub pk: PublicKey,
    pub sk: SecretKey,
    pub pk_hat: PublicKey,
}

/// Ciphertext (c0, c1, c2) ∈ A_q³.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub c0: RingElement,
    pub c1: RingElement,
    pub c2: RingElement,
}

impl Ciphertext {
    /// Assemble a ciphertext from its three components.
    pub fn from_parts(c0: RingElement, c1: RingElement, c2: RingElement) -> Self {
        Self { c0, c1, c2 }
    }

    /// True for a degree-1 ciphertext (c2 = 0): fresh encryptions, sums of
    /// fresh encryptions, and reshare-refreshed ciphertexts.
    pub fn is_degree_one(&self) -> bool {
        self.c2.is_zero()
    }
}

/// The three Gaussian noise vectors (u, v, w) consumed by one encryption.
///
/// Kept as a value so the ZK prover can return it as part of the witness and
/// the verifier can re-run encryption deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoiseTriple {
    pub u: RingElement,
    pub v: RingElement,
    pub w: RingElement,
}
