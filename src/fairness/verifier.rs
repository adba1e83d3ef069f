use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, error};

use crate::domain::card::Card;
use crate::domain::deck::{serialize_cards, Deck};
use crate::infra::rng::EntropySource;

use super::seed::ShuffleSeed;
use super::FairnessError;

/// Закоммиченная, ещё не перемешанная колода.
/// Инвариант: `commitment = SHA256(serialize(cards) || nonce)`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifiableDeck {
    pub cards: Vec<Card>,
    /// hex(SHA256)
    pub commitment: String,
    /// hex(32 случайных байта)
    pub nonce: String,
    pub timestamp: DateTime<Utc>,
}

/// Колода после перемешивания + доказательство конкретной перестановки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShuffledDeck {
    pub original: VerifiableDeck,
    pub shuffled_cards: Vec<Card>,
    pub seed: ShuffleSeed,
    /// hex(SHA256(serialize(original) || serialize(shuffled) || seed))
    pub shuffle_proof: String,
}

/// Commit/shuffle/verify для колоды. Чистые вычисления, без состояния.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShuffleVerifier;

impl ShuffleVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Каноническая 52-карточная колода + свежий nonce + commitment.
    pub fn generate_deck<E: EntropySource + ?Sized>(&self, entropy: &mut E) -> VerifiableDeck {
        let cards = Deck::standard_52().cards;
        let mut nonce_bytes = [0u8; 32];
        entropy.fill_bytes(&mut nonce_bytes);
        let nonce = hex::encode(nonce_bytes);
        let commitment = commitment_for(&cards, &nonce);

        VerifiableDeck {
            cards,
            commitment,
            nonce,
            timestamp: Utc::now(),
        }
    }

    /// Перемешать закоммиченную колоду по seed.
    ///
    /// Fisher–Yates: i от n-1 до 1, j равномерно из 0..=i, swap(i, j).
    pub fn shuffle_deck(
        &self,
        deck: &VerifiableDeck,
        seed: &ShuffleSeed,
    ) -> Result<ShuffledDeck, FairnessError> {
        if commitment_for(&deck.cards, &deck.nonce) != deck.commitment {
            error!(commitment = %deck.commitment, "deck commitment does not recompute");
            return Err(FairnessError::InvalidCommitment);
        }

        let shuffled_cards = fisher_yates(&deck.cards, seed);
        let shuffle_proof = proof_for(&deck.cards, &shuffled_cards, seed);

        Ok(ShuffledDeck {
            original: deck.clone(),
            shuffled_cards,
            seed: seed.clone(),
            shuffle_proof,
        })
    }

    /// Полная проверка перемешанной колоды. Любое расхождение → false.
    pub fn verify_fairness(&self, deck: &ShuffledDeck) -> bool {
        match self.check(deck) {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, "fairness verification failed");
                false
            }
        }
    }

    /// То же, что `verify_fairness`, но с причиной отказа (для логов и событий).
    pub fn check(&self, deck: &ShuffledDeck) -> Result<(), FairnessError> {
        let original = &deck.original;

        if commitment_for(&original.cards, &original.nonce) != original.commitment {
            return Err(FairnessError::InvalidCommitment);
        }

        if proof_for(&original.cards, &deck.shuffled_cards, &deck.seed) != deck.shuffle_proof {
            return Err(FairnessError::ProofMismatch);
        }

        // Состав колоды проверяется до реплея: подменённая карта при
        // пересчитанном доказательстве даёт Integrity, а не SequenceMismatch.
        check_integrity(&original.cards, &deck.shuffled_cards)?;

        let replayed = fisher_yates(&original.cards, &deck.seed);
        if replayed != deck.shuffled_cards {
            return Err(FairnessError::SequenceMismatch);
        }
        Ok(())
    }
}

/// Обе последовательности – одна и та же полная колода: 52 уникальные карты,
/// одинаковые мультимножества.
fn check_integrity(original: &[Card], shuffled: &[Card]) -> Result<(), FairnessError> {
    if original.len() != 52 || shuffled.len() != 52 {
        return Err(FairnessError::Integrity("deck must contain exactly 52 cards"));
    }

    let mut counts: HashMap<Card, i32> = HashMap::with_capacity(52);
    for card in original {
        *counts.entry(*card).or_insert(0) += 1;
    }
    if counts.len() != 52 {
        return Err(FairnessError::Integrity("original deck has duplicate cards"));
    }
    for card in shuffled {
        *counts.entry(*card).or_insert(0) -= 1;
    }
    if counts.values().any(|&c| c != 0) {
        return Err(FairnessError::Integrity("shuffled deck is not a permutation of the original"));
    }
    Ok(())
}

fn fisher_yates(cards: &[Card], seed: &ShuffleSeed) -> Vec<Card> {
    let mut out = cards.to_vec();
    let mut rng = seed.stream();
    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
    out
}

fn commitment_for(cards: &[Card], nonce: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serialize_cards(cards).as_bytes());
    hasher.update(nonce.as_bytes());
    hex::encode(hasher.finalize())
}

fn proof_for(original: &[Card], shuffled: &[Card], seed: &ShuffleSeed) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serialize_cards(original).as_bytes());
    hasher.update(serialize_cards(shuffled).as_bytes());
    hasher.update(seed.to_hex().as_bytes());
    hex::encode(hasher.finalize())
}
