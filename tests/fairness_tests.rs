//! Тесты честности колоды: commit → shuffle → verify.

use sha2::{Digest, Sha256};

use poker_table_engine::domain::card::Card;
use poker_table_engine::domain::deck::{serialize_cards, Deck};
use poker_table_engine::fairness::{
    DeckSource, FairnessError, SeededDeckSource, ShuffleSeed, ShuffleVerifier, ShuffledDeck,
};
use poker_table_engine::infra::rng::DeterministicRng;

fn shuffled(seed: u64) -> ShuffledDeck {
    let verifier = ShuffleVerifier::new();
    let mut entropy = DeterministicRng::from_seed(seed);
    let deck = verifier.generate_deck(&mut entropy);
    verifier
        .shuffle_deck(&deck, &ShuffleSeed::from_u64(seed))
        .expect("fresh deck commitment is valid")
}

#[test]
fn generated_deck_is_canonical_and_committed() {
    let verifier = ShuffleVerifier::new();
    let mut entropy = DeterministicRng::from_seed(7);
    let deck = verifier.generate_deck(&mut entropy);

    assert_eq!(deck.cards, Deck::standard_52().cards);
    assert_eq!(deck.commitment.len(), 64, "SHA-256 в hex");
    assert_eq!(deck.nonce.len(), 64);
}

#[test]
fn shuffle_round_trip_verifies() {
    let deck = shuffled(42);
    let verifier = ShuffleVerifier::new();
    assert!(verifier.verify_fairness(&deck));
    assert_eq!(verifier.check(&deck), Ok(()));
}

#[test]
fn same_seed_gives_same_order() {
    let a = shuffled(1234);
    let b = shuffled(1234);
    assert_eq!(a.shuffled_cards, b.shuffled_cards);

    let c = shuffled(1235);
    assert_ne!(a.shuffled_cards, c.shuffled_cards);
}

#[test]
fn swapped_cards_are_detected() {
    let mut deck = shuffled(99);
    deck.shuffled_cards.swap(0, 1);

    let verifier = ShuffleVerifier::new();
    assert!(!verifier.verify_fairness(&deck));
    assert_eq!(verifier.check(&deck), Err(FairnessError::ProofMismatch));
}

/// Доказательство, пересчитанное "дилером" под подменённую колоду.
fn forged_proof(original: &[Card], shuffled: &[Card], seed: &ShuffleSeed) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serialize_cards(original).as_bytes());
    hasher.update(serialize_cards(shuffled).as_bytes());
    hasher.update(seed.to_hex().as_bytes());
    hex::encode(hasher.finalize())
}

#[test]
fn single_replaced_card_is_detected() {
    let mut deck = shuffled(99);
    deck.shuffled_cards[0] = deck.shuffled_cards[1];

    let verifier = ShuffleVerifier::new();
    assert!(!verifier.verify_fairness(&deck));
    assert_eq!(verifier.check(&deck), Err(FairnessError::ProofMismatch));

    // Даже с пересчитанным доказательством колода с дублем не проходит.
    deck.shuffle_proof = forged_proof(&deck.original.cards, &deck.shuffled_cards, &deck.seed);
    assert!(!verifier.verify_fairness(&deck));
    assert!(matches!(verifier.check(&deck), Err(FairnessError::Integrity(_))));
}

#[test]
fn short_shuffled_deck_fails_integrity() {
    let mut deck = shuffled(17);
    deck.shuffled_cards.pop();
    deck.shuffle_proof = forged_proof(&deck.original.cards, &deck.shuffled_cards, &deck.seed);

    let verifier = ShuffleVerifier::new();
    assert!(matches!(verifier.check(&deck), Err(FairnessError::Integrity(_))));
}

#[test]
fn tampered_commitment_is_detected() {
    let mut deck = shuffled(5);
    deck.original.commitment = "00".repeat(32);

    let verifier = ShuffleVerifier::new();
    assert_eq!(verifier.check(&deck), Err(FairnessError::InvalidCommitment));
}

#[test]
fn shuffle_refuses_bad_commitment() {
    let verifier = ShuffleVerifier::new();
    let mut entropy = DeterministicRng::from_seed(3);
    let mut deck = verifier.generate_deck(&mut entropy);
    deck.nonce.push('0');

    let res = verifier.shuffle_deck(&deck, &ShuffleSeed::from_u64(3));
    assert_eq!(res.err(), Some(FairnessError::InvalidCommitment));
}

#[test]
fn replaced_seed_is_detected() {
    let mut deck = shuffled(11);
    deck.seed = ShuffleSeed::from_u64(12);

    let verifier = ShuffleVerifier::new();
    assert!(verifier.check(&deck).is_err());
}

/// 10 000 seed'ов: каждая перемешанная колода – перестановка 52 уникальных карт
/// и проходит полную проверку.
#[test]
fn ten_thousand_seeds_keep_integrity() {
    let verifier = ShuffleVerifier::new();
    let mut entropy = DeterministicRng::from_seed(0);
    let deck = verifier.generate_deck(&mut entropy);
    let mut sorted_reference = deck.cards.clone();
    sorted_reference.sort();

    for seed in 0..10_000u64 {
        let shuffled = verifier
            .shuffle_deck(&deck, &ShuffleSeed::from_u64(seed))
            .expect("valid commitment");
        let mut sorted = shuffled.shuffled_cards.clone();
        sorted.sort();
        assert_eq!(sorted, sorted_reference, "seed {seed}");
        assert!(verifier.verify_fairness(&shuffled), "seed {seed}");
    }
}

#[test]
fn seed_hex_round_trip() {
    let seed = ShuffleSeed::from_u64(77);
    let hex = seed.to_hex();
    assert_eq!(ShuffleSeed::from_hex(&hex), Some(seed));
    assert_eq!(ShuffleSeed::from_hex("zz"), None);
}

#[test]
fn derived_seeds_differ_per_hand() {
    let base = ShuffleSeed::from_u64(1);
    assert_ne!(base.derive(1, 1, 1), base.derive(1, 1, 2));
    assert_ne!(base.derive(1, 1, 1), base.derive(2, 1, 1));
    assert_eq!(base.derive(1, 1, 1), base.derive(1, 1, 1));
}

#[test]
fn seeded_source_produces_verifiable_decks() {
    let mut source = SeededDeckSource::new(DeterministicRng::from_seed(8));
    let verifier = ShuffleVerifier::new();
    for hand in 1..=5u64 {
        let deck = source.next_deck(1, hand, hand).expect("deck");
        assert_eq!(verifier.check(&deck), Ok(()));
    }
}
