use crate::domain::{GameId, TableId};
use crate::infra::rng::EntropySource;

use super::seed::ShuffleSeed;
use super::verifier::{ShuffleVerifier, ShuffledDeck};
use super::FairnessError;

/// Откуда машина раздачи берёт перемешанную колоду.
///
/// Боевая реализация – `SeededDeckSource`; в тестах можно подсунуть
/// заранее испорченную колоду и проверить фатальный путь.
pub trait DeckSource: Send {
    fn next_deck(
        &mut self,
        table_id: TableId,
        game_id: GameId,
        hand_number: u64,
    ) -> Result<ShuffledDeck, FairnessError>;
}

/// Колода из энтропии: свежий nonce, свежий seed (доменно расширенный
/// контекстом раздачи), shuffle.
#[derive(Clone, Debug, Default)]
pub struct SeededDeckSource<E> {
    entropy: E,
    verifier: ShuffleVerifier,
}

impl<E: EntropySource> SeededDeckSource<E> {
    pub fn new(entropy: E) -> Self {
        Self {
            entropy,
            verifier: ShuffleVerifier::new(),
        }
    }
}

impl<E: EntropySource + Send> DeckSource for SeededDeckSource<E> {
    fn next_deck(
        &mut self,
        table_id: TableId,
        game_id: GameId,
        hand_number: u64,
    ) -> Result<ShuffledDeck, FairnessError> {
        let deck = self.verifier.generate_deck(&mut self.entropy);

        let mut raw = [0u8; 32];
        self.entropy.fill_bytes(&mut raw);
        let seed = ShuffleSeed::from_bytes(raw).derive(table_id, game_id, hand_number);

        self.verifier.shuffle_deck(&deck, &seed)
    }
}
