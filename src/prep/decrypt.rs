//! Decryption capability used inside Reshare.
//!
//! Abstractly, no single party may ever learn the secret key: a production
//! deployment runs a distributed-decryption sub-protocol across isolated
//! party processes. This crate simulates all parties in one process, so the
//! capability is a trait with a simulation impl that holds `sk` directly —
//! selected explicitly by the session constructor, so production code cannot
//! pick up the simulation by accident.

use crate::math::CyclotomicRing;
use crate::she::{Ciphertext, SecretKey};
use crate::slots::{SlotCodec, SlotVector};

/// Decrypt a ciphertext to its slot values without any one caller owning the
/// secret key.
pub trait DistributedDecrypt {
    fn decrypt_to_slots(
        &self,
        ct: &Ciphertext,
        codec: &SlotCodec,
        ring: &CyclotomicRing,
    ) -> SlotVector;
}

/// Single-process simulation: decrypts with the shared secret key directly.
/// Test and simulation use only.
pub struct SimulatedDecryptor {
    sk: SecretKey,
}

impl SimulatedDecryptor {
    pub fn new(sk: SecretKey) -> Self {
        Self { sk }
    }
}

impl DistributedDecrypt for SimulatedDecryptor {
    fn decrypt_to_slots(
        &self,
        ct: &Ciphertext,
        codec: &SlotCodec,
        ring: &CyclotomicRing,
    ) -> SlotVector {
        ct.decrypt(&self.sk, codec, ring)
    }
}
