// src/time_ctrl/clock.rs
//! Таймер хода (shot clock) для игрока, чей сейчас ход.

use std::time::Duration;

use crate::domain::PlayerId;

use super::{TimeBank, TimeRules};

/// Состояние таймера текущего хода.
#[derive(Clone, Debug, Default)]
pub struct TurnClock {
    /// Чей ход сейчас отсчитывается (None, если активного хода нет).
    pub current_player: Option<PlayerId>,
    /// Сколько базового времени ещё осталось на этот ход.
    pub remaining_action: Duration,
    /// Сколько выданного из банка времени ещё осталось на этот ход.
    pub remaining_extra: Duration,
}

/// Результат "протекания" времени.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeoutState {
    /// Время ещё не вышло, игрок может думать дальше.
    Ongoing,
    /// Базовое время вышло, подключён кусок таймбанка.
    UsedExtraTime { granted: Duration },
    /// Базовое время и таймбанк исчерпаны: нужно авто-действие.
    TimedOut,
    /// Сейчас нет активного игрока, на кого вешать таймер.
    NoActivePlayer,
}

impl TurnClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Начать ход игрока согласно правилам.
    pub fn start_turn(&mut self, player_id: PlayerId, rules: &TimeRules) {
        self.current_player = Some(player_id);
        self.remaining_action = rules.base_action();
        self.remaining_extra = Duration::ZERO;
    }

    pub fn clear(&mut self) {
        self.current_player = None;
        self.remaining_action = Duration::ZERO;
        self.remaining_extra = Duration::ZERO;
    }

    /// Прошло `delta` времени для текущего игрока.
    ///
    /// Сначала тратится базовое время, затем кусками по `bank_step`
    /// подключается таймбанк. Когда и он пуст – таймаут.
    pub fn elapse(&mut self, delta: Duration, rules: &TimeRules, bank: &mut TimeBank) -> TimeoutState {
        let player_id = match self.current_player {
            Some(pid) => pid,
            None => return TimeoutState::NoActivePlayer,
        };

        if delta < self.remaining_action {
            self.remaining_action -= delta;
            return TimeoutState::Ongoing;
        }
        let mut remaining = delta - self.remaining_action;
        self.remaining_action = Duration::ZERO;

        let mut granted_total = Duration::ZERO;
        loop {
            if remaining < self.remaining_extra {
                self.remaining_extra -= remaining;
                return if granted_total.is_zero() {
                    TimeoutState::Ongoing
                } else {
                    TimeoutState::UsedExtraTime { granted: granted_total }
                };
            }
            remaining -= self.remaining_extra;
            self.remaining_extra = Duration::ZERO;

            let granted = bank.grant(player_id, rules.bank_step());
            if granted.is_zero() {
                return TimeoutState::TimedOut;
            }
            granted_total += granted;
            self.remaining_extra = granted;
        }
    }
}
