//! Key generation, encryption, decryption and homomorphic operations.
//!
//! Encryption of an encoded plaintext x with noise (u, v, w) ~ D_{Z^N,r}:
//!
//! ```text
//! c0 = b·v + p·w + x
//! c1 = a·v + p·u
//! c2 = 0
//! ```
//!
//! Decryption computes t = c0 − sk·c1 − sk²·c2 and decodes t; correctness
//! holds while the accumulated noise in t stays below p/2 after centering —
//! a precondition enforced by parameter generation, not checked here.

use rand::Rng;

use crate::error::SheError;
use crate::math::{CyclotomicRing, GaussianSampler, RingElement};
use crate::params::SheParams;
use crate::slots::{SlotCodec, SlotVector};

use super::types::{Ciphertext, KeyPair, NoiseTriple, PublicKey, SecretKey};

impl KeyPair {
    /// Generate a fresh keypair: uniform `a`, Gaussian `sk` and `e`,
    /// `b = a·sk + p·e`, plus the reserved uniform hat keypair.
    pub fn generate<R: Rng>(
        ring: &CyclotomicRing,
        params: &SheParams,
        sampler: &mut GaussianSampler,
        rng: &mut R,
    ) -> Self {
        let a = ring.random_uniform(rng);
        let s = sampler.sample_element(ring);
        let e = sampler.sample_element(ring);
        let b = ring.add(&ring.mul(&a, &s), &ring.scalar_mul(&e, params.p));

        let pk_hat = PublicKey {
            a: ring.random_uniform(rng),
            b: ring.random_uniform(rng),
        };

        Self {
            pk: PublicKey { a, b },
            sk: SecretKey { s },
            pk_hat,
        }
    }
}

impl NoiseTriple {
    /// Draw the three encryption noise vectors from D_{Z^N,r}.
    pub fn sample(ring: &CyclotomicRing, sampler: &mut GaussianSampler) -> Self {
        Self {
            u: sampler.sample_element(ring),
            v: sampler.sample_element(ring),
            w: sampler.sample_element(ring),
        }
    }

    /// Componentwise sum, used to aggregate witnesses in the ZK proof.
    pub fn add(&self, other: &Self, ring: &CyclotomicRing) -> Self {
        Self {
            u: ring.add(&self.u, &other.u),
            v: ring.add(&self.v, &other.v),
            w: ring.add(&self.w, &other.w),
        }
    }
}

impl Ciphertext {
    /// Encode `messages` into the plaintext slots and encrypt with fresh
    /// Gaussian noise.
    pub fn encrypt(
        messages: &[i64],
        pk: &PublicKey,
        codec: &SlotCodec,
        ring: &CyclotomicRing,
        sampler: &mut GaussianSampler,
    ) -> Result<Self, SheError> {
        let (ct, _, _) = Self::encrypt_with_witness(messages, pk, codec, ring, sampler)?;
        Ok(ct)
    }

    /// Encrypt and additionally return the encoded plaintext and the noise
    /// triple — the witness the ZK prover needs.
    pub fn encrypt_with_witness(
        messages: &[i64],
        pk: &PublicKey,
        codec: &SlotCodec,
        ring: &CyclotomicRing,
        sampler: &mut GaussianSampler,
    ) -> Result<(Self, RingElement, NoiseTriple), SheError> {
        let x = codec.encode(messages, ring)?;
        let noise = NoiseTriple::sample(ring, sampler);
        let ct = Self::encrypt_encoded(&x, &noise, pk, ring, codec.p());
        Ok((ct, x, noise))
    }

    /// Deterministic encryption of an already encoded plaintext with
    /// caller-supplied noise. No sampling happens here; the ZK verifier
    /// relies on that to re-run encryption from a transcript.
    pub fn encrypt_encoded(
        x: &RingElement,
        noise: &NoiseTriple,
        pk: &PublicKey,
        ring: &CyclotomicRing,
        p: u64,
    ) -> Self {
        let c0 = ring.add(
            &ring.add(&ring.mul(&pk.b, &noise.v), &ring.scalar_mul(&noise.w, p)),
            x,
        );
        let c1 = ring.add(&ring.mul(&pk.a, &noise.v), &ring.scalar_mul(&noise.u, p));
        Self {
            c0,
            c1,
            c2: ring.zero(),
        }
    }

    /// Decrypt: t = c0 − sk·c1 − sk²·c2, then decode the slots.
    ///
    /// With marginal parameters this silently yields wrong slot values
    /// rather than erroring (the scheme's probabilistic correctness model).
    pub fn decrypt(
        &self,
        sk: &SecretKey,
        codec: &SlotCodec,
        ring: &CyclotomicRing,
    ) -> SlotVector {
        let sk_c1 = ring.mul(&sk.s, &self.c1);
        let sk2_c2 = ring.mul(&ring.mul(&sk.s, &sk.s), &self.c2);
        let t = ring.sub(&ring.sub(&self.c0, &sk_c1), &sk2_c2);
        codec.decode(&t, ring)
    }

    /// Componentwise homomorphic sum; preserves the maximum degree of the
    /// operands.
    pub fn add(&self, other: &Self, ring: &CyclotomicRing) -> Self {
        Self {
            c0: ring.add(&self.c0, &other.c0),
            c1: ring.add(&self.c1, &other.c1),
            c2: ring.add(&self.c2, &other.c2),
        }
    }

    /// Componentwise homomorphic difference.
    pub fn sub(&self, other: &Self, ring: &CyclotomicRing) -> Self {
        Self {
            c0: ring.sub(&self.c0, &other.c0),
            c1: ring.sub(&self.c1, &other.c1),
            c2: ring.sub(&self.c2, &other.c2),
        }
    }

    /// Homomorphic product of two degree-1 ciphertexts:
    /// (c0·d0, c1·d0 + c0·d1, −c1·d1).
    ///
    /// The negated cross term must match decryption's `− sk²·c2`; both signs
    /// are pinned by the multiplicative-correctness tests. Multiplying a
    /// degree-2 ciphertext has no bounded noise analysis and is a programmer
    /// error — reshare to a fresh degree-1 ciphertext first.
    pub fn mul(&self, other: &Self, ring: &CyclotomicRing) -> Self {
        assert!(
            self.is_degree_one() && other.is_degree_one(),
            "homomorphic multiplication requires degree-1 ciphertexts; reshare first"
        );
        let c0 = ring.mul(&self.c0, &other.c0);
        let c1 = ring.add(
            &ring.mul(&self.c1, &other.c0),
            &ring.mul(&self.c0, &other.c1),
        );
        let c2 = ring.neg(&ring.mul(&self.c1, &other.c1));
        Self { c0, c1, c2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::slot_mul;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    struct Ctx {
        params: SheParams,
        ring: CyclotomicRing,
        codec: SlotCodec,
        keys: KeyPair,
        sampler: GaussianSampler,
    }

    fn setup(params: SheParams, seed: u64) -> Ctx {
        let ring = CyclotomicRing::new(params.q, &params.phi_coeffs).unwrap();
        let codec = SlotCodec::new(params.p, &params.phi_coeffs).unwrap();
        let mut sampler = GaussianSampler::with_seed(params.r, seed);
        let mut rng = ChaCha20Rng::seed_from_u64(seed.wrapping_add(1));
        let keys = KeyPair::generate(&ring, &params, &mut sampler, &mut rng);
        Ctx {
            params,
            ring,
            codec,
            keys,
            sampler,
        }
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let mut ctx = setup(SheParams::toy_m4(), 11);
        let ct = Ciphertext::encrypt(&[3, -5], &ctx.keys.pk, &ctx.codec, &ctx.ring, &mut ctx.sampler)
            .unwrap();
        assert!(ct.is_degree_one());
        assert_eq!(ct.decrypt(&ctx.keys.sk, &ctx.codec, &ctx.ring), vec![3, -5]);
    }

    #[test]
    fn test_homomorphic_addition() {
        let mut ctx = setup(SheParams::toy_m4(), 12);
        let ct1 = Ciphertext::encrypt(&[3, -5], &ctx.keys.pk, &ctx.codec, &ctx.ring, &mut ctx.sampler)
            .unwrap();
        let ct2 = Ciphertext::encrypt(&[1, 2], &ctx.keys.pk, &ctx.codec, &ctx.ring, &mut ctx.sampler)
            .unwrap();
        let sum = ct1.add(&ct2, &ctx.ring);
        assert_eq!(sum.decrypt(&ctx.keys.sk, &ctx.codec, &ctx.ring), vec![4, -3]);
    }

    #[test]
    fn test_homomorphic_multiplication() {
        let mut ctx = setup(SheParams::toy_m8(), 13);
        let v1 = vec![3, -5, 2, 1];
        let v2 = vec![2, 4, -1, 7];
        let ct1 = Ciphertext::encrypt(&v1, &ctx.keys.pk, &ctx.codec, &ctx.ring, &mut ctx.sampler)
            .unwrap();
        let ct2 = Ciphertext::encrypt(&v2, &ctx.keys.pk, &ctx.codec, &ctx.ring, &mut ctx.sampler)
            .unwrap();
        let product = ct1.mul(&ct2, &ctx.ring);
        assert!(!product.is_degree_one());
        assert_eq!(
            product.decrypt(&ctx.keys.sk, &ctx.codec, &ctx.ring),
            slot_mul(&v1, &v2, ctx.params.p)
        );
    }

    #[test]
    #[should_panic(expected = "degree-1")]
    fn test_mul_degree_two_panics() {
        let mut ctx = setup(SheParams::toy_m4(), 14);
        let ct = Ciphertext::encrypt(&[1, 1], &ctx.keys.pk, &ctx.codec, &ctx.ring, &mut ctx.sampler)
            .unwrap();
        let deg2 = ct.mul(&ct, &ctx.ring);
        let _ = deg2.mul(&ct, &ctx.ring);
    }

    #[test]
    fn test_encrypt_encoded_is_deterministic() {
        let mut ctx = setup(SheParams::toy_m4(), 15);
        let (ct, x, noise) = Ciphertext::encrypt_with_witness(
            &[6, -2],
            &ctx.keys.pk,
            &ctx.codec,
            &ctx.ring,
            &mut ctx.sampler,
        )
        .unwrap();
        let replay = Ciphertext::encrypt_encoded(&x, &noise, &ctx.keys.pk, &ctx.ring, ctx.params.p);
        assert_eq!(ct, replay);
    }

    #[test]
    fn test_sum_of_party_contributions() {
        // e_r = Σ_i e_{r_i} decrypts to Σ_i r_i, the broadcast pattern used
        // by every preprocessing phase.
        let mut ctx = setup(SheParams::toy_m8(), 16);
        let parts = [vec![1, 2, 3, 4], vec![-5, 0, 7, 1], vec![2, 2, -8, 6]];
        let mut total = vec![0i64; 4];
        let mut acc: Option<Ciphertext> = None;
        for part in &parts {
            total = crate::slots::slot_add(&total, part, ctx.params.p);
            let ct =
                Ciphertext::encrypt(part, &ctx.keys.pk, &ctx.codec, &ctx.ring, &mut ctx.sampler)
                    .unwrap();
            acc = Some(match acc {
                None => ct,
                Some(a) => a.add(&ct, &ctx.ring),
            });
        }
        let sum_ct = acc.unwrap();
        assert_eq!(sum_ct.decrypt(&ctx.keys.sk, &ctx.codec, &ctx.ring), total);
    }
}
