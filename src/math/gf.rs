//! Polynomial arithmetic and factorization over the prime field F_p.
//!
//! Supports slot preparation: Φ_m mod p is factored into its irreducible
//! factors (the "moduli list") with distinct-degree factorization followed
//! by Cantor–Zassenhaus equal-degree splitting. Since gcd(m, p) = 1 the
//! input is squarefree, which the algorithms assume.
//!
//! Polynomials are coefficient vectors in ascending order with entries in
//! [0, p); the zero polynomial is the empty vector and nonzero polynomials
//! carry no leading zeros.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Degree of a normalized polynomial; the zero polynomial has degree 0 here
/// (callers branch on `is_zero` first where the distinction matters).
pub fn deg(a: &[u64]) -> usize {
    a.len().saturating_sub(1)
}

/// True for the zero polynomial.
pub fn is_zero(a: &[u64]) -> bool {
    a.is_empty()
}

/// Drop leading zero coefficients.
pub fn trim(mut a: Vec<u64>) -> Vec<u64> {
    while a.last() == Some(&0) {
        a.pop();
    }
    a
}

/// Modular inverse of a scalar via the extended Euclidean algorithm.
///
/// Panics if `a` is not invertible mod `modulus`.
pub fn mod_inverse(a: u64, modulus: u64) -> u64 {
    let mut t: i128 = 0;
    let mut new_t: i128 = 1;
    let mut r: i128 = modulus as i128;
    let mut new_r: i128 = (a % modulus) as i128;

    while new_r != 0 {
        let quotient = r / new_r;
        let tmp_t = t - quotient * new_t;
        t = new_t;
        new_t = tmp_t;

        let tmp_r = r - quotient * new_r;
        r = new_r;
        new_r = tmp_r;
    }

    if r != 1 {
        panic!("mod_inverse: value is not invertible");
    }

    if t < 0 {
        t += modulus as i128;
    }
    t as u64
}

/// Sum of two polynomials.
pub fn add(a: &[u64], b: &[u64], p: u64) -> Vec<u64> {
    let mut out = vec![0u64; a.len().max(b.len())];
    for (i, o) in out.iter_mut().enumerate() {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        *o = (x + y) % p;
    }
    trim(out)
}

/// Difference of two polynomials.
pub fn sub(a: &[u64], b: &[u64], p: u64) -> Vec<u64> {
    let mut out = vec![0u64; a.len().max(b.len())];
    for (i, o) in out.iter_mut().enumerate() {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        *o = if x >= y { x - y } else { p - y + x };
    }
    trim(out)
}

/// Product of two polynomials.
pub fn mul(a: &[u64], b: &[u64], p: u64) -> Vec<u64> {
    if is_zero(a) || is_zero(b) {
        return Vec::new();
    }
    let mut out = vec![0u64; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        if ai == 0 {
            continue;
        }
        for (j, &bj) in b.iter().enumerate() {
            let t = (ai as u128 * bj as u128) % p as u128;
            out[i + j] = ((out[i + j] as u128 + t) % p as u128) as u64;
        }
    }
    trim(out)
}

/// Multiply by a scalar.
pub fn scalar_mul(a: &[u64], s: u64, p: u64) -> Vec<u64> {
    let s = s % p;
    trim(
        a.iter()
            .map(|&c| ((c as u128 * s as u128) % p as u128) as u64)
            .collect(),
    )
}

/// Scale to leading coefficient 1.
pub fn monic(a: &[u64], p: u64) -> Vec<u64> {
    if is_zero(a) {
        return Vec::new();
    }
    let lead = *a.last().unwrap();
    if lead == 1 {
        return a.to_vec();
    }
    scalar_mul(a, mod_inverse(lead, p), p)
}

/// Quotient and remainder of polynomial division.
///
/// Panics on division by the zero polynomial (internal use only; the moduli
/// list never contains it).
pub fn divmod(a: &[u64], b: &[u64], p: u64) -> (Vec<u64>, Vec<u64>) {
    assert!(!is_zero(b), "polynomial division by zero");
    if a.len() < b.len() {
        return (Vec::new(), a.to_vec());
    }
    let lead_inv = mod_inverse(*b.last().unwrap(), p);
    let mut rem = a.to_vec();
    let mut quot = vec![0u64; a.len() - b.len() + 1];
    for i in (b.len() - 1..a.len()).rev() {
        let c = rem[i];
        if c == 0 {
            continue;
        }
        let factor = ((c as u128 * lead_inv as u128) % p as u128) as u64;
        let shift = i - (b.len() - 1);
        quot[shift] = factor;
        for (j, &bj) in b.iter().enumerate() {
            let t = ((factor as u128 * bj as u128) % p as u128) as u64;
            let idx = shift + j;
            rem[idx] = if rem[idx] >= t { rem[idx] - t } else { p - t + rem[idx] };
        }
    }
    (trim(quot), trim(rem))
}

/// Remainder of `a` mod `b`.
pub fn rem(a: &[u64], b: &[u64], p: u64) -> Vec<u64> {
    divmod(a, b, p).1
}

/// Monic greatest common divisor.
pub fn gcd(a: &[u64], b: &[u64], p: u64) -> Vec<u64> {
    let mut r0 = a.to_vec();
    let mut r1 = b.to_vec();
    while !is_zero(&r1) {
        let r2 = rem(&r0, &r1, p);
        r0 = r1;
        r1 = r2;
    }
    monic(&r0, p)
}

/// Inverse of `a` modulo `f` via the extended Euclidean algorithm.
///
/// Returns `None` when gcd(a, f) is not constant.
pub fn inv_mod(a: &[u64], f: &[u64], p: u64) -> Option<Vec<u64>> {
    let mut r0 = f.to_vec();
    let mut r1 = rem(a, f, p);
    let mut t0: Vec<u64> = Vec::new();
    let mut t1: Vec<u64> = vec![1];
    while !is_zero(&r1) {
        let (q, r2) = divmod(&r0, &r1, p);
        let t2 = sub(&t0, &mul(&q, &t1, p), p);
        r0 = r1;
        r1 = r2;
        t0 = t1;
        t1 = t2;
    }
    if deg(&r0) != 0 || is_zero(&r0) {
        return None;
    }
    // Normalize the constant gcd to 1.
    let scale = mod_inverse(r0[0], p);
    Some(rem(&scalar_mul(&t0, scale, p), f, p))
}

/// `base^exp mod f` by square-and-multiply.
pub fn powmod(base: &[u64], mut exp: u128, f: &[u64], p: u64) -> Vec<u64> {
    let mut result = vec![1u64];
    let mut acc = rem(base, f, p);
    while exp > 0 {
        if exp & 1 == 1 {
            result = rem(&mul(&result, &acc, p), f, p);
        }
        acc = rem(&mul(&acc, &acc, p), f, p);
        exp >>= 1;
    }
    result
}

/// Factor a monic squarefree polynomial over F_p into irreducibles.
///
/// Distinct-degree factorization isolates the product of all irreducible
/// factors of each degree d (as gcd(x^{p^d} − x, f)), then Cantor–Zassenhaus
/// splits it. The splitting RNG is seeded from (p, f) and the result is
/// sorted by (degree, coefficients), so the factor order is deterministic
/// for a given input.
pub fn factor_squarefree(f: &[u64], p: u64) -> Vec<Vec<u64>> {
    assert!(p >= 3 && p % 2 == 1, "factorization requires an odd prime modulus");
    let mut f = monic(f, p);
    let seed = f
        .iter()
        .fold(p, |acc, &c| acc.wrapping_mul(0x100000001b3).wrapping_add(c));
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    let x: Vec<u64> = vec![0, 1];
    let mut factors: Vec<Vec<u64>> = Vec::new();
    let mut h = rem(&x, &f, p);
    let mut d = 0usize;
    while deg(&f) >= 2 * (d + 1) {
        d += 1;
        h = powmod(&h, p as u128, &f, p);
        let g = gcd(&sub(&h, &x, p), &f, p);
        if deg(&g) > 0 {
            equal_degree_split(&g, d, p, &mut rng, &mut factors);
            f = divmod(&f, &g, p).0;
            h = rem(&h, &f, p);
        }
    }
    if deg(&f) > 0 {
        factors.push(f);
    }
    factors.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    factors
}

/// Cantor–Zassenhaus: split a product of distinct irreducibles of degree `d`
/// into the irreducibles themselves.
fn equal_degree_split(
    g: &[u64],
    d: usize,
    p: u64,
    rng: &mut ChaCha20Rng,
    out: &mut Vec<Vec<u64>>,
) {
    if deg(g) == d {
        out.push(monic(g, p));
        return;
    }
    let exp = match (p as u128).checked_pow(d as u32) {
        Some(pd) => (pd - 1) / 2,
        None => panic!("p^d overflows the splitting exponent"),
    };
    loop {
        let a: Vec<u64> = trim((0..deg(g)).map(|_| rng.gen_range(0..p)).collect());
        if is_zero(&a) {
            continue;
        }
        let mut u = gcd(&a, g, p);
        if deg(&u) == 0 {
            let b = powmod(&a, exp, g, p);
            u = gcd(&sub(&b, &[1], p), g, p);
        }
        if deg(&u) > 0 && deg(&u) < deg(g) {
            let v = divmod(g, &u, p).0;
            equal_degree_split(&u, d, p, rng, out);
            equal_degree_split(&v, d, p, rng, out);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divmod_reconstructs() {
        let p = 17;
        let a = vec![3, 1, 4, 1, 5];
        let b = vec![2, 0, 1];
        let (q, r) = divmod(&a, &b, p);
        let back = add(&mul(&q, &b, p), &r, p);
        assert_eq!(back, trim(a));
        assert!(r.len() < b.len());
    }

    #[test]
    fn test_inv_mod_linear() {
        let p = 17;
        // (x + 3)^-1 mod (x^2 + 1)
        let a = vec![3, 1];
        let f = vec![1, 0, 1];
        let inv = inv_mod(&a, &f, p).unwrap();
        assert_eq!(rem(&mul(&a, &inv, p), &f, p), vec![1]);
    }

    #[test]
    fn test_powmod_fermat() {
        let p = 17;
        let f = vec![1, 0, 1];
        // x^(p^2) ≡ x mod any irreducible quadratic... here f splits, but
        // x^(p^2) ≡ x still holds mod f since it holds mod each factor.
        let x = vec![0, 1];
        let e = (p as u128).pow(2);
        assert_eq!(powmod(&x, e, &f, p), x);
    }

    #[test]
    fn test_factor_phi4_mod_17() {
        // x^2 + 1 = (x - 4)(x + 4) mod 17 since 4^2 = -1
        let factors = factor_squarefree(&[1, 0, 1], 17);
        assert_eq!(factors, vec![vec![4, 1], vec![13, 1]]);
    }

    #[test]
    fn test_factor_phi8_mod_17() {
        let factors = factor_squarefree(&[1, 0, 0, 0, 1], 17);
        assert_eq!(factors.len(), 4);
        let mut product = vec![1];
        for f in &factors {
            assert_eq!(deg(f), 1);
            product = mul(&product, f, 17);
        }
        assert_eq!(product, vec![1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_factor_phi8_mod_5_quadratics() {
        // ord_8(5) = 2: x^4 + 1 = (x^2 + 2)(x^2 + 3) mod 5
        let factors = factor_squarefree(&[1, 0, 0, 0, 1], 5);
        assert_eq!(factors, vec![vec![2, 0, 1], vec![3, 0, 1]]);
    }

    #[test]
    fn test_factor_order_deterministic() {
        let a = factor_squarefree(&[1, 0, 0, 0, 1], 17);
        let b = factor_squarefree(&[1, 0, 0, 0, 1], 17);
        assert_eq!(a, b);
    }
}
