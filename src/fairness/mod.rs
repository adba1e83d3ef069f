//! Честность колоды: commit → shuffle → proof.
//!
//! Схема с одним дилерским seed:
//!   1. `generate_deck` – каноническая колода + nonce, публикуется commitment;
//!   2. `shuffle_deck` – Fisher–Yates от детерминированного потока из seed;
//!   3. `verify_fairness` – любой участник может переиграть shuffle по seed
//!      и сверить commitment, proof и саму последовательность.

pub mod seed;
pub mod source;
pub mod verifier;

use thiserror::Error;

pub use seed::ShuffleSeed;
pub use source::{DeckSource, SeededDeckSource};
pub use verifier::{ShuffleVerifier, ShuffledDeck, VerifiableDeck};

/// Ошибки проверки честности. Любая из них фатальна для раздачи.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FairnessError {
    #[error("Invalid deck commitment")]
    InvalidCommitment,

    #[error("Shuffle proof does not match")]
    ProofMismatch,

    #[error("Shuffled sequence is not reproducible from seed")]
    SequenceMismatch,

    #[error("Deck integrity check failed: {0}")]
    Integrity(&'static str),
}
