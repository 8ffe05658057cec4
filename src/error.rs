//! Error types for the SHE preprocessing engine.
//!
//! Only recoverable or construction-time failures are surfaced as errors.
//! Precondition violations (length mismatches, multiplying a degree-2
//! ciphertext) are programmer errors and panic via `assert!`.

use thiserror::Error;

/// Errors surfaced by ring construction, slot preparation and encoding.
#[derive(Debug, Error)]
pub enum SheError {
    /// Malformed modulus, degree or coefficient list. Fatal: raised at
    /// construction time, never during arithmetic.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// More messages than available CRT slots. Recoverable by the caller
    /// (reduce the batch).
    #[error("slot overflow: {messages} messages but only {slots} slots")]
    SlotOverflow { messages: usize, slots: usize },
}
