//! Somewhat-homomorphic encryption engine for SPDZ-style offline
//! preprocessing.
//!
//! Four layers, bottom up:
//!
//! - [`math`]: arithmetic in the cyclotomic quotient ring Z_q[x]/Φ_m(x) for
//!   an arbitrary monic Φ_m, polynomial arithmetic over the prime field F_p,
//!   and discrete Gaussian sampling.
//! - [`slots`]: SIMD plaintext packing — Φ_m factors mod p into s irreducible
//!   polynomials, each carrying one independent message slot via the CRT.
//! - [`she`]: the BV-style cryptosystem supporting one homomorphic
//!   multiplication (ciphertexts are fixed 3-tuples over the ring).
//! - [`prep`] and [`zkpopk`]: the SPDZ offline phase — authenticated shared
//!   randomness ([v], ⟨v⟩, pairs, triples) on top of the cryptosystem, and a
//!   Fiat-Shamir zero-knowledge proof of plaintext knowledge for broadcast
//!   ciphertexts.
//!
//! Parameter sets in [`params`] are toy-sized for protocol correctness work,
//! not hardened for production security levels.

pub mod error;
pub mod math;
pub mod params;
pub mod prep;
pub mod she;
pub mod slots;
pub mod zkpopk;

pub use error::SheError;
pub use math::{CyclotomicRing, GaussianSampler, RingElement};
pub use params::SheParams;
pub use prep::{
    AngleValue, BracketValue, DistributedDecrypt, Pair, PrepSession, SimulatedDecryptor, Triple,
};
pub use she::{Ciphertext, KeyPair, NoiseTriple, PublicKey, SecretKey};
pub use slots::{SlotCodec, SlotVector};
pub use zkpopk::{PlaintextWitness, Transcript};
