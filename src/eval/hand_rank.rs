use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank};

/// Категория покерной руки по силе (от слабой к сильной).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandRanking {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl HandRanking {
    pub const ALL: [HandRanking; 10] = [
        HandRanking::HighCard,
        HandRanking::Pair,
        HandRanking::TwoPair,
        HandRanking::ThreeOfAKind,
        HandRanking::Straight,
        HandRanking::Flush,
        HandRanking::FullHouse,
        HandRanking::FourOfAKind,
        HandRanking::StraightFlush,
        HandRanking::RoyalFlush,
    ];

    /// Человеческое описание категории.
    pub fn describe(self) -> &'static str {
        match self {
            HandRanking::HighCard => "High card",
            HandRanking::Pair => "Pair",
            HandRanking::TwoPair => "Two pair",
            HandRanking::ThreeOfAKind => "Three of a kind",
            HandRanking::Straight => "Straight",
            HandRanking::Flush => "Flush",
            HandRanking::FullHouse => "Full house",
            HandRanking::FourOfAKind => "Four of a kind",
            HandRanking::StraightFlush => "Straight flush",
            HandRanking::RoyalFlush => "Royal flush",
        }
    }
}

/// Результат оценки руки.
///
/// `high_card` – главный ранг категории (ранг пары/сета/каре, верх стрита;
/// для колеса это пятёрка). `kickers` – остальные значимые ранги
/// по убыванию значимости. `best_five` – сами пять карт.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEvaluation {
    pub ranking: HandRanking,
    pub high_card: Rank,
    pub kickers: Vec<Rank>,
    pub best_five: Vec<Card>,
}

impl HandEvaluation {
    /// Сравнение по силе: категория, старшая карта, затем кикеры попарно.
    pub fn strength_cmp(&self, other: &HandEvaluation) -> Ordering {
        self.ranking
            .cmp(&other.ranking)
            .then_with(|| self.high_card.cmp(&other.high_card))
            .then_with(|| self.kickers.cmp(&other.kickers))
    }

    pub fn describe(&self) -> String {
        format!("{}, {} high", self.ranking.describe(), self.high_card)
    }
}
