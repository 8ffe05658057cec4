//! End-to-end exercise of the offline phase: key generation, packed
//! encryption, the preprocessing session, and proof-of-plaintext-knowledge
//! over a broadcast batch.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use spdz_she::slots::{random_slots, replicate, slot_add, slot_mul};
use spdz_she::zkpopk;
use spdz_she::{
    Ciphertext, CyclotomicRing, GaussianSampler, KeyPair, PrepSession, SheParams,
    SimulatedDecryptor, SlotCodec, SlotVector,
};

struct Ctx {
    params: SheParams,
    ring: CyclotomicRing,
    codec: SlotCodec,
    keys: KeyPair,
    sampler: GaussianSampler,
    rng: ChaCha20Rng,
}

fn setup(params: SheParams, seed: u64) -> Ctx {
    // RUST_LOG=debug surfaces the per-phase session tracing
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    let ring = CyclotomicRing::new(params.q, &params.phi_coeffs).unwrap();
    let codec = SlotCodec::new(params.p, &params.phi_coeffs).unwrap();
    let mut sampler = GaussianSampler::with_seed(params.r, seed);
    let mut rng = ChaCha20Rng::seed_from_u64(seed.wrapping_add(7));
    let keys = KeyPair::generate(&ring, &params, &mut sampler, &mut rng);
    Ctx {
        params,
        ring,
        codec,
        keys,
        sampler,
        rng,
    }
}

fn reconstruct(shares: &[SlotVector], p: u64) -> SlotVector {
    shares
        .iter()
        .skip(1)
        .fold(shares[0].clone(), |acc, s| slot_add(&acc, s, p))
}

#[test]
fn encrypt_decrypt_and_add_two_slots() {
    let mut ctx = setup(SheParams::toy_m4(), 101);
    let ct1 = Ciphertext::encrypt(&[3, -5], &ctx.keys.pk, &ctx.codec, &ctx.ring, &mut ctx.sampler)
        .unwrap();
    let ct2 = Ciphertext::encrypt(&[1, 2], &ctx.keys.pk, &ctx.codec, &ctx.ring, &mut ctx.sampler)
        .unwrap();
    assert_eq!(ct1.decrypt(&ctx.keys.sk, &ctx.codec, &ctx.ring), vec![3, -5]);
    let sum = ct1.add(&ct2, &ctx.ring);
    assert_eq!(sum.decrypt(&ctx.keys.sk, &ctx.codec, &ctx.ring), vec![4, -3]);
}

#[test]
fn full_session_pairs_and_triples() {
    let ctx = setup(SheParams::toy_m8(), 103);
    let mut session = PrepSession::with_seed(
        &ctx.params,
        &ctx.ring,
        &ctx.codec,
        &ctx.keys.pk,
        SimulatedDecryptor::new(ctx.keys.sk.clone()),
        103,
    );
    session.initialize().unwrap();
    let alpha = reconstruct(&session.alpha_bracket().unwrap().shares, ctx.params.p);

    // A batch of pairs and triples from the same session state
    for _ in 0..2 {
        let pair = session.pair().unwrap();
        let v = reconstruct(&pair.angle.shares, ctx.params.p);
        assert_eq!(reconstruct(&pair.bracket.shares, ctx.params.p), v);
        assert_eq!(
            reconstruct(&pair.angle.mac_shares, ctx.params.p),
            slot_mul(&alpha, &v, ctx.params.p)
        );
        for (i, row) in pair.bracket.mac_shares.iter().enumerate() {
            let beta_vec = replicate(session.betas()[i], ctx.codec.num_slots());
            assert_eq!(
                reconstruct(row, ctx.params.p),
                slot_mul(&beta_vec, &v, ctx.params.p)
            );
        }
    }

    for _ in 0..2 {
        let triple = session.triple().unwrap();
        let a = reconstruct(&triple.a.shares, ctx.params.p);
        let b = reconstruct(&triple.b.shares, ctx.params.p);
        let c = reconstruct(&triple.c.shares, ctx.params.p);
        assert_eq!(c, slot_mul(&a, &b, ctx.params.p));
        for (value, angle) in [(&a, &triple.a), (&b, &triple.b), (&c, &triple.c)] {
            assert_eq!(
                reconstruct(&angle.mac_shares, ctx.params.p),
                slot_mul(&alpha, value, ctx.params.p)
            );
        }
    }
}

#[test]
fn broadcast_batch_proves_and_verifies() {
    let mut ctx = setup(SheParams::toy_m8(), 107);
    let sec = ctx.params.sec;

    let mut cts = Vec::with_capacity(sec);
    let mut wits = Vec::with_capacity(sec);
    for _ in 0..sec {
        let msg = random_slots(ctx.codec.num_slots(), ctx.params.p, &mut ctx.rng);
        let (ct, x, noise) = Ciphertext::encrypt_with_witness(
            &msg,
            &ctx.keys.pk,
            &ctx.codec,
            &ctx.ring,
            &mut ctx.sampler,
        )
        .unwrap();
        cts.push(ct);
        wits.push(zkpopk::PlaintextWitness { x, noise });
    }

    let transcript = zkpopk::prove(
        &ctx.keys.pk,
        &cts,
        &wits,
        &ctx.codec,
        &ctx.ring,
        &mut ctx.sampler,
        &mut ctx.rng,
    )
    .unwrap();
    assert!(zkpopk::verify(&ctx.keys.pk, &cts, &transcript, &ctx.ring, ctx.params.p));

    // The transcript is bound to this exact batch: swapping in a different
    // honestly generated ciphertext must fail verification.
    let other = Ciphertext::encrypt(
        &random_slots(ctx.codec.num_slots(), ctx.params.p, &mut ctx.rng),
        &ctx.keys.pk,
        &ctx.codec,
        &ctx.ring,
        &mut ctx.sampler,
    )
    .unwrap();
    let mut swapped = cts.clone();
    swapped[0] = other;
    assert!(!zkpopk::verify(&ctx.keys.pk, &swapped, &transcript, &ctx.ring, ctx.params.p));
}

#[test]
fn transcript_survives_serialization() {
    let mut ctx = setup(SheParams::toy_m4(), 109);
    let sec = ctx.params.sec;

    let mut cts = Vec::with_capacity(sec);
    let mut wits = Vec::with_capacity(sec);
    for _ in 0..sec {
        let msg = random_slots(ctx.codec.num_slots(), ctx.params.p, &mut ctx.rng);
        let (ct, x, noise) = Ciphertext::encrypt_with_witness(
            &msg,
            &ctx.keys.pk,
            &ctx.codec,
            &ctx.ring,
            &mut ctx.sampler,
        )
        .unwrap();
        cts.push(ct);
        wits.push(zkpopk::PlaintextWitness { x, noise });
    }
    let transcript = zkpopk::prove(
        &ctx.keys.pk,
        &cts,
        &wits,
        &ctx.codec,
        &ctx.ring,
        &mut ctx.sampler,
        &mut ctx.rng,
    )
    .unwrap();

    let json = serde_json::to_string(&transcript).unwrap();
    let restored: zkpopk::Transcript = serde_json::from_str(&json).unwrap();
    assert!(zkpopk::verify(&ctx.keys.pk, &cts, &restored, &ctx.ring, ctx.params.p));
}
