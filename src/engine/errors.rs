use thiserror::Error;

use crate::domain::{PlayerId, SeatIndex};
use crate::fairness::FairnessError;

/// Причины отказа в ставке. Отказ атомарен: состояние не меняется,
/// игрок может повторить действие.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BettingError {
    #[error("Игрок {0} не участвует в раздаче")]
    PlayerNotFound(PlayerId),

    #[error("Игрок {0} уже сфолдил")]
    AlreadyFolded(PlayerId),

    #[error("Игрок {0} не может действовать (олл-ин или sit out)")]
    PlayerNotActive(PlayerId),

    #[error("Недопустимая сумма ставки")]
    InvalidAmount,

    #[error("Невозможно выполнить check – нужно хотя бы уравнять ставку")]
    CannotCheck,

    #[error("Невозможно выполнить call – нет ставки для уравнивания")]
    NothingToCall,

    #[error("Ставка меньше, чем нужно для call, а игрок не в олл-ине")]
    IncompleteCall,

    #[error("Размер рейза {increment} меньше минимального {min_raise}")]
    MinimumRaiseNotMet { increment: u64, min_raise: u64 },

    #[error("Недостаточно фишек для этой ставки")]
    InsufficientChips,

    #[error("Торговля не переоткрыта: после неполного олл-ина можно только call или fold")]
    RaiseNotReopened,
}

/// Класс ошибки для внешнего мира.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Отклонено синхронно, состояние не изменилось.
    Validation,
    /// Колода не прошла проверку: раздача аннулируется.
    Fairness,
    /// Нарушен денежный/карточный инвариант: стол замораживается.
    Invariant,
}

/// Ошибки движка стола.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Betting(#[from] BettingError),

    #[error("Проверка честности колоды не пройдена: {0}")]
    Fairness(#[from] FairnessError),

    #[error("Нарушен инвариант: {0}")]
    InvariantViolation(String),

    #[error("Стол заморожен до ручной сверки")]
    TableFrozen,

    #[error("Место {0} не существует за столом")]
    InvalidSeat(SeatIndex),

    #[error("Место {0} уже занято")]
    SeatTaken(SeatIndex),

    #[error("Игрок {0} уже сидит за столом")]
    PlayerAlreadySeated(PlayerId),

    #[error("Игрок {0} не сидит за столом")]
    PlayerNotSeated(PlayerId),

    #[error("У игрока {0} нет фишек, чтобы вернуться в игру")]
    NoChipsToPlay(PlayerId),

    #[error("Бай-ин {0} вне допустимого диапазона стола")]
    InvalidBuyIn(u64),

    #[error("Недостаточно активных игроков для раздачи")]
    NotEnoughPlayers,

    #[error("Раздача уже идёт")]
    HandAlreadyInProgress,

    #[error("Раздача не активна")]
    NoActiveHand,

    #[error("Сейчас не ход игрока с id={0}")]
    NotPlayersTurn(PlayerId),

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Fairness(_) => ErrorKind::Fairness,
            EngineError::InvariantViolation(_) | EngineError::Internal(_) => ErrorKind::Invariant,
            _ => ErrorKind::Validation,
        }
    }

    /// Стабильный код ошибки для события ERROR(code, message).
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Betting(b) => match b {
                BettingError::PlayerNotFound(_) => "PLAYER_NOT_FOUND",
                BettingError::AlreadyFolded(_) => "ALREADY_FOLDED",
                BettingError::PlayerNotActive(_) => "PLAYER_NOT_ACTIVE",
                BettingError::InvalidAmount => "INVALID_AMOUNT",
                BettingError::CannotCheck => "CANNOT_CHECK",
                BettingError::NothingToCall => "NOTHING_TO_CALL",
                BettingError::IncompleteCall => "INCOMPLETE_CALL",
                BettingError::MinimumRaiseNotMet { .. } => "MINIMUM_RAISE_NOT_MET",
                BettingError::InsufficientChips => "INSUFFICIENT_CHIPS",
                BettingError::RaiseNotReopened => "RAISE_NOT_REOPENED",
            },
            EngineError::Fairness(_) => "FAIRNESS_ERROR",
            EngineError::InvariantViolation(_) => "INVARIANT_VIOLATION",
            EngineError::TableFrozen => "TABLE_FROZEN",
            EngineError::InvalidSeat(_) => "INVALID_SEAT",
            EngineError::SeatTaken(_) => "SEAT_TAKEN",
            EngineError::PlayerAlreadySeated(_) => "PLAYER_ALREADY_SEATED",
            EngineError::PlayerNotSeated(_) => "PLAYER_NOT_SEATED",
            EngineError::InvalidBuyIn(_) => "INVALID_BUY_IN",
            EngineError::NoChipsToPlay(_) => "NO_CHIPS_TO_PLAY",
            EngineError::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            EngineError::HandAlreadyInProgress => "HAND_IN_PROGRESS",
            EngineError::NoActiveHand => "NO_ACTIVE_HAND",
            EngineError::NotPlayersTurn(_) => "NOT_PLAYERS_TURN",
            EngineError::Internal(_) => "INTERNAL",
        }
    }
}
