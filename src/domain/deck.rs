use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};

/// Колода карт. В домене – просто упорядоченный список карт.
/// Перемешивание и доказательство честности делает `fairness`, НЕ здесь.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// Clubs 2..A, Diamonds 2..A, Hearts 2..A, Spades 2..A.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Каноническая сериализация последовательности карт для хэширования:
/// коды карт через запятую (`2c,3c,...,As`).
pub fn serialize_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Курсор раздачи поверх перемешанной последовательности.
/// Карты берутся сверху (с начала), сама последовательность не трогается,
/// чтобы её можно было перепроверить в любой момент раздачи.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DealCursor {
    pub position: usize,
}

impl DealCursor {
    /// Взять n карт сверху. None, если в колоде не хватает карт.
    pub fn draw_n(&mut self, cards: &[Card], n: usize) -> Option<Vec<Card>> {
        let end = self.position.checked_add(n)?;
        let taken = cards.get(self.position..end)?.to_vec();
        self.position = end;
        Some(taken)
    }

    pub fn remaining(&self, cards: &[Card]) -> usize {
        cards.len().saturating_sub(self.position)
    }
}
