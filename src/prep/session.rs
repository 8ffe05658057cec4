//! Preprocessing session: Reshare, PBracket, PAngle and the Initialize /
//! Pair / Triple phases.
//!
//! One session simulates all n parties. `initialize` establishes the MAC
//! keys (the encrypted global key e_α and the per-party e_{β_i}) which the
//! session retains for its lifetime; `pair` and `triple` then mint
//! authenticated random values on demand.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::error::SheError;
use crate::math::{CyclotomicRing, GaussianSampler};
use crate::params::SheParams;
use crate::she::{Ciphertext, PublicKey};
use crate::slots::{
    random_slots, replicate, slot_neg, slot_sub, SlotCodec, SlotVector,
};

use super::decrypt::DistributedDecrypt;
use super::{AngleValue, BracketValue, Pair, Triple};

/// Session state for the offline phase, generic over the decryption
/// capability (simulation or a real threshold protocol).
pub struct PrepSession<'a, D: DistributedDecrypt> {
    params: &'a SheParams,
    ring: &'a CyclotomicRing,
    codec: &'a SlotCodec,
    pk: &'a PublicKey,
    decryptor: D,
    sampler: GaussianSampler,
    rng: ChaCha20Rng,
    /// Encryption of the global MAC key α, set by `initialize`.
    e_alpha: Option<Ciphertext>,
    /// Encryptions of the per-party MAC keys β_i, known to all parties.
    e_betas: Vec<Ciphertext>,
    /// The β_i scalars (each held by its owner in a real deployment).
    betas: Vec<i64>,
    /// The bracket representation [α] produced by `initialize`.
    alpha_bracket: Option<BracketValue>,
}

impl<'a, D: DistributedDecrypt> PrepSession<'a, D> {
    /// Create a session with entropy-seeded randomness.
    pub fn new(
        params: &'a SheParams,
        ring: &'a CyclotomicRing,
        codec: &'a SlotCodec,
        pk: &'a PublicKey,
        decryptor: D,
    ) -> Self {
        Self {
            params,
            ring,
            codec,
            pk,
            decryptor,
            sampler: GaussianSampler::new(params.r),
            rng: ChaCha20Rng::from_entropy(),
            e_alpha: None,
            e_betas: Vec::new(),
            betas: Vec::new(),
            alpha_bracket: None,
        }
    }

    /// Create a session with seeded randomness for reproducible tests.
    pub fn with_seed(
        params: &'a SheParams,
        ring: &'a CyclotomicRing,
        codec: &'a SlotCodec,
        pk: &'a PublicKey,
        decryptor: D,
        seed: u64,
    ) -> Self {
        let mut session = Self::new(params, ring, codec, pk, decryptor);
        session.sampler = GaussianSampler::with_seed(params.r, seed);
        session.rng = ChaCha20Rng::seed_from_u64(seed.wrapping_add(0x9e3779b9));
        session
    }

    /// The per-party MAC key scalars β_i.
    pub fn betas(&self) -> &[i64] {
        &self.betas
    }

    /// The bracket value [α] established by `initialize`.
    pub fn alpha_bracket(&self) -> Option<&BracketValue> {
        self.alpha_bracket.as_ref()
    }

    /// Encryption of the global MAC key, established by `initialize`.
    pub fn e_alpha(&self) -> Option<&Ciphertext> {
        self.e_alpha.as_ref()
    }

    fn encrypt_slots(&mut self, slots: &[i64]) -> Result<Ciphertext, SheError> {
        Ciphertext::encrypt(slots, self.pk, self.codec, self.ring, &mut self.sampler)
    }

    /// Convert a ciphertext into additive shares of its plaintext.
    ///
    /// Every party contributes an encrypted mask f_i; the masked sum
    /// m + Σf_i is decrypted in the clear and party 1 keeps mf − f_1 while
    /// party i keeps −f_i. With `fresh`, additionally returns
    /// Encrypt(mf) − e_f: a degree-1 re-encryption of m with bounded noise —
    /// the mechanism that turns a noisy degree-2 product back into a clean
    /// degree-1 ciphertext.
    pub fn reshare(
        &mut self,
        e_m: &Ciphertext,
        fresh: bool,
    ) -> Result<(Vec<SlotVector>, Option<Ciphertext>), SheError> {
        let n = self.params.n_parties;
        let s = self.codec.num_slots();
        let p = self.params.p;

        let mut masks: Vec<SlotVector> = Vec::with_capacity(n);
        let mut e_f: Option<Ciphertext> = None;
        for _ in 0..n {
            let f = random_slots(s, p, &mut self.rng);
            let e_fi = self.encrypt_slots(&f)?;
            masks.push(f);
            e_f = Some(match e_f {
                None => e_fi,
                Some(acc) => acc.add(&e_fi, self.ring),
            });
        }
        let e_f = e_f.expect("n_parties >= 2");

        let e_mf = e_m.add(&e_f, self.ring);
        let mf = self.decryptor.decrypt_to_slots(&e_mf, self.codec, self.ring);

        let mut shares = Vec::with_capacity(n);
        shares.push(slot_sub(&mf, &masks[0], p));
        for mask in &masks[1..] {
            shares.push(slot_neg(mask, p));
        }

        let refreshed = if fresh {
            let e_mf_fresh = self.encrypt_slots(&mf)?;
            Some(e_mf_fresh.sub(&e_f, self.ring))
        } else {
            None
        };

        Ok((shares, refreshed))
    }

    /// Bracket a shared value: for each party i, multiply e_{β_i}·e_v
    /// homomorphically and reshare the degree-2 product into the MAC shares
    /// of β_i·v.
    pub fn pbracket(
        &mut self,
        shares: Vec<SlotVector>,
        e_v: &Ciphertext,
    ) -> Result<BracketValue, SheError> {
        let e_betas = self.e_betas.clone();
        assert!(
            !e_betas.is_empty(),
            "initialize must run before pbracket"
        );
        let mut mac_shares = Vec::with_capacity(e_betas.len());
        for e_beta in &e_betas {
            let e_prod = e_beta.mul(e_v, self.ring);
            let (gamma, _) = self.reshare(&e_prod, false)?;
            mac_shares.push(gamma);
        }
        Ok(BracketValue { shares, mac_shares })
    }

    /// Angle a shared value: multiply e_v·e_α homomorphically and reshare
    /// into the shares of the global MAC α·v.
    pub fn pangle(
        &mut self,
        shares: Vec<SlotVector>,
        e_v: &Ciphertext,
    ) -> Result<AngleValue, SheError> {
        let e_alpha = self
            .e_alpha
            .clone()
            .expect("initialize must run before pangle");
        let e_prod = e_v.mul(&e_alpha, self.ring);
        let (mac_shares, _) = self.reshare(&e_prod, false)?;
        Ok(AngleValue { shares, mac_shares })
    }

    /// Initialize phase: every party samples scalar MAC keys α_i and β_i
    /// (replicated diagonally across the s slots), encrypts and broadcasts
    /// them; the session retains e_α = Σ e_{α_i}, the e_{β_i}, and computes
    /// [α] over the locally known shares of α.
    pub fn initialize(&mut self) -> Result<(), SheError> {
        let n = self.params.n_parties;
        let s = self.codec.num_slots();
        let p = self.params.p;

        let mut alpha_shares: Vec<SlotVector> = Vec::with_capacity(n);
        let mut e_alpha: Option<Ciphertext> = None;
        let mut betas = Vec::with_capacity(n);
        let mut e_betas = Vec::with_capacity(n);

        for _ in 0..n {
            let alpha_i = random_slots(1, p, &mut self.rng)[0];
            let beta_i = random_slots(1, p, &mut self.rng)[0];

            let alpha_vec = replicate(alpha_i, s);
            let e_ai = self.encrypt_slots(&alpha_vec)?;
            e_alpha = Some(match e_alpha {
                None => e_ai,
                Some(acc) => acc.add(&e_ai, self.ring),
            });
            alpha_shares.push(alpha_vec);

            let e_bi = self.encrypt_slots(&replicate(beta_i, s))?;
            betas.push(beta_i);
            e_betas.push(e_bi);
        }

        self.e_alpha = e_alpha;
        self.e_betas = e_betas;
        self.betas = betas;

        let e_alpha = self.e_alpha.clone().expect("n_parties >= 2");
        let bracket = self.pbracket(alpha_shares, &e_alpha)?;
        self.alpha_bracket = Some(bracket);

        debug!(n_parties = n, slots = s, "preprocessing session initialized");
        Ok(())
    }

    /// Pair phase: a fresh shared random value authenticated as both [r]
    /// and ⟨r⟩ on the same shares.
    pub fn pair(&mut self) -> Result<Pair, SheError> {
        let (shares, e_r) = self.sample_shared_value()?;
        let bracket = self.pbracket(shares.clone(), &e_r)?;
        let angle = self.pangle(shares, &e_r)?;
        debug!("pair generated");
        Ok(Pair { bracket, angle })
    }

    /// Triple phase: ⟨a⟩, ⟨b⟩ from fresh shared randomness; c = a·b via a
    /// homomorphic product, reshared with a fresh re-encryption so ⟨c⟩ can
    /// be authenticated at degree 1.
    pub fn triple(&mut self) -> Result<Triple, SheError> {
        let (a_shares, e_a) = self.sample_shared_value()?;
        let (b_shares, e_b) = self.sample_shared_value()?;

        let angle_a = self.pangle(a_shares, &e_a)?;
        let angle_b = self.pangle(b_shares, &e_b)?;

        let e_c = e_a.mul(&e_b, self.ring);
        let (c_shares, e_c_fresh) = self.reshare(&e_c, true)?;
        let e_c_fresh = e_c_fresh.expect("reshare with fresh=true returns a ciphertext");
        let angle_c = self.pangle(c_shares, &e_c_fresh)?;

        debug!("triple generated");
        Ok(Triple {
            a: angle_a,
            b: angle_b,
            c: angle_c,
        })
    }

    /// Every party samples and encrypts a random slot vector; returns the
    /// per-party shares and the homomorphic sum of the broadcasts.
    fn sample_shared_value(&mut self) -> Result<(Vec<SlotVector>, Ciphertext), SheError> {
        let n = self.params.n_parties;
        let s = self.codec.num_slots();
        let p = self.params.p;

        let mut shares = Vec::with_capacity(n);
        let mut e_sum: Option<Ciphertext> = None;
        for _ in 0..n {
            let r = random_slots(s, p, &mut self.rng);
            let e_r = self.encrypt_slots(&r)?;
            shares.push(r);
            e_sum = Some(match e_sum {
                None => e_r,
                Some(acc) => acc.add(&e_r, self.ring),
            });
        }
        Ok((shares, e_sum.expect("n_parties >= 2")))
    }
}
