use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::PlayerId;

/// Фаза раздачи. Закрытый enum: каждый переход проверяется матчем.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Waiting,
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
    Finished,
}

impl Phase {
    /// Сколько общих карт должно лежать на столе в этой фазе.
    pub fn community_card_count(self) -> usize {
        match self {
            Phase::Waiting | Phase::PreFlop => 0,
            Phase::Flop => 3,
            Phase::Turn => 4,
            Phase::River | Phase::Showdown | Phase::Finished => 5,
        }
    }

    /// Следующая фаза в цикле раздачи.
    pub fn next(self) -> Phase {
        match self {
            Phase::Waiting => Phase::PreFlop,
            Phase::PreFlop => Phase::Flop,
            Phase::Flop => Phase::Turn,
            Phase::Turn => Phase::River,
            Phase::River => Phase::Showdown,
            Phase::Showdown => Phase::Finished,
            Phase::Finished => Phase::Waiting,
        }
    }

    /// Идёт ли в этой фазе торговля.
    pub fn is_betting(self) -> bool {
        matches!(self, Phase::PreFlop | Phase::Flop | Phase::Turn | Phase::River)
    }

    /// Сколько карт открывается при входе в фазу.
    pub fn cards_revealed_on_entry(self) -> usize {
        match self {
            Phase::Flop => 3,
            Phase::Turn | Phase::River => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Waiting => "WAITING",
            Phase::PreFlop => "PRE_FLOP",
            Phase::Flop => "FLOP",
            Phase::Turn => "TURN",
            Phase::River => "RIVER",
            Phase::Showdown => "SHOWDOWN",
            Phase::Finished => "FINISHED",
        };
        f.write_str(s)
    }
}

/// Выплата игроку по итогам раздачи (сумма по всем банкам).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payout {
    pub player_id: PlayerId,
    pub amount: Chips,
}

/// Возврат ставки при аннулированной раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Refund {
    pub player_id: PlayerId,
    pub amount: Chips,
}
