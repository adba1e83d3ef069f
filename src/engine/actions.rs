use serde::{Deserialize, Serialize};

use crate::domain::Chips;

/// Решение игрока в торговле.
///
/// Суммы у `Bet`/`Raise` – итоговая ставка игрока на улице ("bet to" / "raise to"),
/// а не прирост.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    /// Bet на улице, где ещё нет ставки.
    Bet(Chips),
    /// Raise существующей ставки.
    Raise(Chips),
    /// All-in – поставить весь стек.
    AllIn,
}

/// Как движок классифицировал принятую ставку.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BetKind {
    Check,
    /// Полный call (в т.ч. олл-ин ровно на сумму call).
    Call,
    /// Олл-ин меньше суммы call.
    ShortCall,
    /// Первая ставка на улице не меньше минимальной.
    Bet,
    /// Полный рейз (прирост не меньше min_raise).
    Raise,
    /// Олл-ин с приростом меньше min_raise: торговлю не переоткрывает.
    IncompleteRaise,
}

/// Запись в логе действий раздачи и в событии PLAYER_ACTION_APPLIED.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoggedAction {
    PostSmallBlind,
    PostBigBlind,
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

impl LoggedAction {
    /// Свести классификацию ставки к действию для лога.
    pub fn from_bet(kind: BetKind, went_all_in: bool) -> Self {
        if went_all_in {
            return LoggedAction::AllIn;
        }
        match kind {
            BetKind::Check => LoggedAction::Check,
            BetKind::Call | BetKind::ShortCall => LoggedAction::Call,
            BetKind::Bet => LoggedAction::Bet,
            BetKind::Raise | BetKind::IncompleteRaise => LoggedAction::Raise,
        }
    }
}

/// Откуда пришло действие.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionSource {
    Player,
    /// Таймаут или дисконнект: check, если ставки нет, иначе fold.
    Timeout,
    /// Обязательная ставка.
    Blind,
    /// Игрок ушёл из-за стола посреди раздачи.
    LeftTable,
}
