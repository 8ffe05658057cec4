//! Fiat-Shamir zero-knowledge proof of plaintext knowledge (ZKPoPK).
//!
//! Proves, for a batch of `sec` ciphertexts c_0..c_{sec−1} with witnesses
//! (x_k, r_k), knowledge of the witnesses without revealing them. The
//! interactive cut-and-choose proof is made non-interactive by deriving the
//! challenge bits from a hash of the commitments and the public key.
//!
//! The covering matrix M_e (shape V×sec, V = 2·sec−1) has the shifted
//! diagonal pattern M_e[i][k] = 1 iff 0 ≤ i−k < sec and e_{i−k} = 1: each
//! witness index influences a unique contiguous band of responses, which is
//! what gives the proof its 2^{-sec} soundness error against a rewinding
//! cheating prover.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::SheError;
use crate::math::{CyclotomicRing, GaussianSampler, RingElement};
use crate::she::{Ciphertext, NoiseTriple, PublicKey};
use crate::slots::{random_slots, SlotCodec};

/// Witness for one ciphertext: the encoded plaintext and the noise triple
/// consumed by its encryption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaintextWitness {
    pub x: RingElement,
    pub noise: NoiseTriple,
}

/// Non-interactive proof transcript.
///
/// `challenge` is the sec-bit Fiat-Shamir challenge (one 0/1 entry per
/// ciphertext); the covering matrix is recomputed from it on both sides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Auxiliary ciphertexts a_0..a_{V-1}.
    pub commitments: Vec<Ciphertext>,
    /// Challenge bits e_0..e_{sec-1}.
    pub challenge: Vec<u8>,
    /// Responses z_i = y_i + Σ_k M_e[i,k]·x_k.
    pub responses_z: Vec<RingElement>,
    /// Responses T_i = s_i + Σ_k M_e[i,k]·r_k.
    pub responses_t: Vec<NoiseTriple>,
}

/// Build the V×sec covering matrix from the challenge bits.
pub fn covering_matrix(e_bits: &[u8]) -> Vec<Vec<u8>> {
    let sec = e_bits.len();
    let v = 2 * sec - 1;
    let mut me = vec![vec![0u8; sec]; v];
    for (i, row) in me.iter_mut().enumerate() {
        for (k, cell) in row.iter_mut().enumerate() {
            if i >= k && i - k < sec && e_bits[i - k] == 1 {
                *cell = 1;
            }
        }
    }
    me
}

fn absorb_element(hasher: &mut Sha256, element: &RingElement) {
    for &c in element.coeffs() {
        hasher.update(c.to_le_bytes());
    }
}

fn absorb_ciphertext(hasher: &mut Sha256, ct: &Ciphertext) {
    absorb_element(hasher, &ct.c0);
    absorb_element(hasher, &ct.c1);
    absorb_element(hasher, &ct.c2);
}

/// Derive the sec challenge bits from the commitments and the public key.
///
/// The content digest is re-hashed iteratively (domain separation between
/// squeezes) and bits are harvested LSB-first from each digest byte until
/// sec bits are available.
fn challenge_bits(commitments: &[Ciphertext], pk: &PublicKey, sec: usize) -> Vec<u8> {
    let mut hasher = Sha256::new();
    for ct in commitments {
        absorb_ciphertext(&mut hasher, ct);
    }
    absorb_element(&mut hasher, &pk.a);
    absorb_element(&mut hasher, &pk.b);
    let mut digest = hasher.finalize();

    let mut bits = Vec::with_capacity(sec);
    while bits.len() < sec {
        digest = Sha256::digest(digest);
        'outer: for byte in digest.iter() {
            for b in 0..8 {
                bits.push((byte >> b) & 1);
                if bits.len() >= sec {
                    break 'outer;
                }
            }
        }
    }
    bits
}

/// Produce a proof of plaintext knowledge for `ciphertexts` (one witness
/// per ciphertext; `sec` = batch size).
pub fn prove<R: Rng>(
    pk: &PublicKey,
    ciphertexts: &[Ciphertext],
    witnesses: &[PlaintextWitness],
    codec: &SlotCodec,
    ring: &CyclotomicRing,
    sampler: &mut GaussianSampler,
    rng: &mut R,
) -> Result<Transcript, SheError> {
    let sec = ciphertexts.len();
    assert!(sec > 0, "empty ciphertext batch");
    assert_eq!(
        witnesses.len(),
        sec,
        "one witness required per ciphertext"
    );
    let v = 2 * sec - 1;

    let mut commitments = Vec::with_capacity(v);
    let mut masks = Vec::with_capacity(v);
    for _ in 0..v {
        let y = random_slots(codec.num_slots(), codec.p(), rng);
        let (a_i, y_i, s_i) = Ciphertext::encrypt_with_witness(&y, pk, codec, ring, sampler)?;
        commitments.push(a_i);
        masks.push((y_i, s_i));
    }

    let challenge = challenge_bits(&commitments, pk, sec);
    let me = covering_matrix(&challenge);

    let mut responses_z = Vec::with_capacity(v);
    let mut responses_t = Vec::with_capacity(v);
    for (i, (y_i, s_i)) in masks.into_iter().enumerate() {
        let mut z_i = y_i;
        let mut t_i = s_i;
        for (k, witness) in witnesses.iter().enumerate() {
            if me[i][k] == 1 {
                z_i = ring.add(&z_i, &witness.x);
                t_i = t_i.add(&witness.noise, ring);
            }
        }
        responses_z.push(z_i);
        responses_t.push(t_i);
    }

    Ok(Transcript {
        commitments,
        challenge,
        responses_z,
        responses_t,
    })
}

/// Verify a transcript against a batch of ciphertexts.
///
/// Returns false (never panics) on any malformed or non-verifying
/// transcript: a verifier must tolerate adversarial provers.
pub fn verify(
    pk: &PublicKey,
    ciphertexts: &[Ciphertext],
    transcript: &Transcript,
    ring: &CyclotomicRing,
    p: u64,
) -> bool {
    let sec = ciphertexts.len();
    if sec == 0 {
        return false;
    }
    let v = 2 * sec - 1;
    if transcript.commitments.len() != v
        || transcript.responses_z.len() != v
        || transcript.responses_t.len() != v
        || transcript.challenge.len() != sec
    {
        debug!("transcript shape mismatch");
        return false;
    }
    if transcript.challenge.iter().any(|&b| b > 1) {
        return false;
    }
    let n = ring.degree();
    let well_formed = transcript.commitments.iter().all(|ct| {
        ct.c0.dim() == n && ct.c1.dim() == n && ct.c2.dim() == n
    }) && transcript.responses_z.iter().all(|z| z.dim() == n)
        && transcript
            .responses_t
            .iter()
            .all(|t| t.u.dim() == n && t.v.dim() == n && t.w.dim() == n);
    if !well_formed {
        debug!("transcript carries malformed ring elements");
        return false;
    }

    // Re-derive the challenge; a mismatch means the transcript was tampered
    // with after the commitments were fixed.
    let expected = challenge_bits(&transcript.commitments, pk, sec);
    if expected != transcript.challenge {
        debug!("Fiat-Shamir challenge mismatch");
        return false;
    }

    let me = covering_matrix(&transcript.challenge);
    for i in 0..v {
        let d_i = Ciphertext::encrypt_encoded(
            &transcript.responses_z[i],
            &transcript.responses_t[i],
            pk,
            ring,
            p,
        );
        let mut rhs = transcript.commitments[i].clone();
        for (k, c_k) in ciphertexts.iter().enumerate() {
            if me[i][k] == 1 {
                rhs = rhs.add(c_k, ring);
            }
        }
        if d_i != rhs {
            debug!(row = i, "response equation mismatch");
            return false;
        }
    }
    true
}
