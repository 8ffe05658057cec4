//! Mathematical primitives for the SHE preprocessing engine.
//!
//! - **Cyclotomic ring arithmetic** over Z_n[x]/Φ_m(x) for arbitrary monic Φ_m
//! - **F_p[x] polynomial arithmetic and factorization** backing the CRT slot
//!   decomposition
//! - **Discrete Gaussian sampling** for key and noise generation
//!
//! The ciphertext ring modulus q is treated as opaque: nothing here assumes
//! it is prime, a power of two, or NTT-friendly, so multiplication is plain
//! convolution plus long division by Φ_m.

pub mod gf;
pub mod ring;
pub mod sampler;

pub use ring::{from_signed, CyclotomicRing, RingElement};
pub use sampler::GaussianSampler;
