use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex};

/// Тип действия в команде PLAYER_ACTION (как его присылает клиент).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

/// Входящая команда стола. Все команды одного стола проходят через его
/// актор строго по очереди.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableCommand {
    /// Подключиться к столу (зритель; повторный вход после дисконнекта).
    JoinTable { player_id: PlayerId },

    /// Сесть на место с бай-ином.
    SitDown {
        player_id: PlayerId,
        seat: SeatIndex,
        buy_in: Chips,
    },

    /// Действие в раздаче. `amount` – итоговая ставка на улице для BET/RAISE,
    /// для остальных действий игнорируется.
    PlayerAction {
        player_id: PlayerId,
        action: ActionKind,
        amount: i64,
    },

    /// Встать из-за стола. Посреди раздачи – фолд и выход по её завершении.
    LeaveTable { player_id: PlayerId },

    /// Пропускать раздачи, оставаясь на месте. Текущую раздачу игрок доигрывает.
    SitOut { player_id: PlayerId },

    /// Вернуться в игру со следующей раздачи. Нужен ненулевой стек.
    SitIn { player_id: PlayerId },

    /// Начать новую раздачу.
    StartHand,

    /// Время на ход вышло.
    Timeout { player_id: PlayerId },

    /// Игрок потерял соединение.
    Disconnect { player_id: PlayerId },
}

impl TableCommand {
    /// Чья это команда (None для служебных).
    pub fn player_id(&self) -> Option<PlayerId> {
        match self {
            TableCommand::JoinTable { player_id }
            | TableCommand::SitDown { player_id, .. }
            | TableCommand::PlayerAction { player_id, .. }
            | TableCommand::LeaveTable { player_id }
            | TableCommand::SitOut { player_id }
            | TableCommand::SitIn { player_id }
            | TableCommand::Timeout { player_id }
            | TableCommand::Disconnect { player_id } => Some(*player_id),
            TableCommand::StartHand => None,
        }
    }
}
