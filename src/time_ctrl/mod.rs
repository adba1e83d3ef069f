// src/time_ctrl/mod.rs
//! Контроль времени хода (shot clock + time bank).
//!
//! Здесь собираем:
//! - правила (`TimeRules`);
//! - банк времени игроков (`TimeBank`);
//! - таймер хода (`TurnClock`);
//! - фасад `TimeController`, которым пользуется актор стола.

pub mod clock;
pub mod time_bank;
pub mod time_rules;

use std::time::Duration;

pub use clock::{TimeoutState, TurnClock};
pub use time_bank::TimeBank;
pub use time_rules::TimeRules;

use crate::domain::PlayerId;

/// Какое авто-действие нужно сделать при полном истечении времени.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoActionDecision {
    /// Время не вышло – действий не требуется.
    None,
    /// Время истекло: check, если ставить нечего, иначе fold (решает машина раздачи).
    TimeoutCheckOrFold(PlayerId),
}

/// Контроллер времени одного стола.
#[derive(Clone, Debug)]
pub struct TimeController {
    pub rules: TimeRules,
    pub bank: TimeBank,
    pub clock: TurnClock,
}

impl TimeController {
    pub fn new(rules: TimeRules) -> Self {
        let bank = TimeBank::new(rules.bank_per_player());
        Self {
            rules,
            bank,
            clock: TurnClock::new(),
        }
    }

    /// Синхронизировать таймер с тем, чей сейчас ход.
    /// Если ход не сменился – таймер продолжает тикать.
    pub fn sync_turn(&mut self, active: Option<PlayerId>) {
        match active {
            Some(pid) if self.clock.current_player == Some(pid) => {}
            Some(pid) => self.clock.start_turn(pid, &self.rules),
            None => self.clock.clear(),
        }
    }

    /// Игрок сходил вовремя.
    pub fn on_manual_action(&mut self, player_id: PlayerId) {
        if self.clock.current_player == Some(player_id) {
            self.clock.clear();
        }
    }

    /// Протекание времени для текущего игрока.
    pub fn on_time_passed(&mut self, delta: Duration) -> AutoActionDecision {
        let player = self.clock.current_player;
        match (self.clock.elapse(delta, &self.rules, &mut self.bank), player) {
            (TimeoutState::TimedOut, Some(pid)) => {
                self.clock.clear();
                AutoActionDecision::TimeoutCheckOrFold(pid)
            }
            _ => AutoActionDecision::None,
        }
    }
}
