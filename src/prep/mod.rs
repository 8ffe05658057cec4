//! SPDZ-style preprocessing: authenticated secret-shared randomness.
//!
//! All parties are simulated within one process. A value v is additively
//! shared across n parties; authentication attaches MACs in one of two
//! representations:
//!
//! - **Bracket `[v]`**: for every party i a MAC under that party's own key
//!   β_i, itself additively shared — the invariant is Σ_j γ_i^j = β_i·v for
//!   each i.
//! - **Angle `⟨v⟩`**: a single additively shared global MAC under the key α
//!   — the invariant is Σ_j γ^j = α·v.
//!
//! No MAC-check/abort step lives here; consumers verify the invariants.

pub mod decrypt;
pub mod session;

use serde::{Deserialize, Serialize};

use crate::slots::SlotVector;

pub use decrypt::{DistributedDecrypt, SimulatedDecryptor};
pub use session::PrepSession;

/// Bracket representation `[v]`: additive shares plus, for every party i,
/// the additively shared MAC β_i·v.
///
/// `mac_shares[i][j]` is party j's share of β_i·v; the orchestrator routes
/// row i to party i.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketValue {
    pub shares: Vec<SlotVector>,
    pub mac_shares: Vec<Vec<SlotVector>>,
}

/// Angle representation `⟨v⟩`: additive shares plus the additively shared
/// global MAC α·v.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AngleValue {
    pub shares: Vec<SlotVector>,
    pub mac_shares: Vec<SlotVector>,
}

/// Output of the Pair phase: one shared random value authenticated in both
/// representations, used by the online phase for input masking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pair {
    pub bracket: BracketValue,
    pub angle: AngleValue,
}

/// A multiplication triple (⟨a⟩, ⟨b⟩, ⟨c⟩) with c = a·b slotwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Triple {
    pub a: AngleValue,
    pub b: AngleValue,
    pub c: AngleValue,
}
