//! The somewhat-homomorphic cryptosystem.
//!
//! BV-style scheme over A_q = Z_q[x]/Φ_m(x) supporting one homomorphic
//! multiplication: ciphertexts are 3-tuples whose quadratic component fills
//! in on multiplication, and the preprocessing layer reshares degree-2
//! ciphertexts back to degree 1.

pub mod enc;
pub mod types;

pub use types::{Ciphertext, KeyPair, NoiseTriple, PublicKey, SecretKey};
