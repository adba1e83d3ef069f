use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::table::SeatIndex;
use crate::domain::PlayerId;

/// Статус игрока в контексте раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PlayerStatus {
    /// Игрок активен и может принимать решения.
    Active,
    /// Игрок сфолдил и больше не претендует на банк.
    Folded,
    /// Игрок в олл-ине – ставок больше не делает, но претендует на банк.
    AllIn,
    /// Игрок сидит за столом, но не участвует в раздаче.
    SittingOut,
}

/// Участник стола / текущей раздачи.
///
/// Между раздачами это просто место со стеком; в раздаче здесь же лежат
/// ставки улицы (`current_bet`), ставки всей раздачи (`total_bet`) и флаг хода.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GamePlayer {
    pub player_id: PlayerId,
    pub seat: SeatIndex,
    /// Стек за столом. Никогда не бывает отрицательным.
    pub chips: Chips,
    /// Ставка на текущей улице. Внутри улицы только растёт.
    pub current_bet: Chips,
    /// Всё, что игрок внёс в банк за раздачу.
    pub total_bet: Chips,
    pub status: PlayerStatus,
    pub has_acted: bool,
    /// Карманные карты (0 или 2 для холдема).
    pub hole_cards: Vec<Card>,
}

impl GamePlayer {
    pub fn new(player_id: PlayerId, seat: SeatIndex, chips: Chips) -> Self {
        Self {
            player_id,
            seat,
            chips,
            current_bet: Chips::ZERO,
            total_bet: Chips::ZERO,
            status: PlayerStatus::Active,
            has_acted: false,
            hole_cards: Vec::new(),
        }
    }

    /// Претендует ли игрок на банк (не сфолдил и участвует).
    pub fn is_in_hand(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }

    /// Может ли игрок ещё принимать решения в торговле.
    pub fn can_act(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Сбросить состояние раздачи (стек не трогаем).
    pub fn reset_for_hand(&mut self) {
        self.current_bet = Chips::ZERO;
        self.total_bet = Chips::ZERO;
        self.has_acted = false;
        self.hole_cards.clear();
        if self.status != PlayerStatus::SittingOut {
            self.status = PlayerStatus::Active;
        }
    }
}
