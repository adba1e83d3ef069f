//! Оценка силы покерных рук (Texas Hold'em).
//!
//! Основные функции:
//!   `evaluate(cards) -> Result<HandEvaluation, EvalError>` – лучшая пятёрка из 5–7 карт;
//!   `compare_hands(a, b)` – категория, затем старшая карта, затем кикеры.

pub mod evaluator;
pub mod hand_rank;
pub mod lookup_tables;

use thiserror::Error;

pub use evaluator::{compare_hands, evaluate, evaluate_best_hand};
pub use hand_rank::{HandEvaluation, HandRanking};

/// Ошибки оценщика.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Рука должна содержать от 5 до 7 карт, получено {0}")]
    InvalidHandSize(usize),

    #[error("Карта {0} встречается в руке дважды")]
    DuplicateCard(crate::domain::Card),
}
