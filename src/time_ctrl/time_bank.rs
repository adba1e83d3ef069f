// src/time_ctrl/time_bank.rs
//! Таймбанк игроков: сколько дополнительного времени у кого осталось.

use std::collections::HashMap;
use std::time::Duration;

use crate::domain::PlayerId;

/// Таймбанк стола по игрокам.
///
/// Игрок, впервые попавший в банк, получает полный запас `initial`.
#[derive(Clone, Debug)]
pub struct TimeBank {
    initial: Duration,
    players: HashMap<PlayerId, Duration>,
}

impl TimeBank {
    pub fn new(initial: Duration) -> Self {
        Self {
            initial,
            players: HashMap::new(),
        }
    }

    /// Выдать до `requested` из банка игрока.
    /// Возвращает фактически выданное (может быть меньше, если банк пустеет).
    pub fn grant(&mut self, player_id: PlayerId, requested: Duration) -> Duration {
        let remaining = self.players.entry(player_id).or_insert(self.initial);
        let granted = requested.min(*remaining);
        *remaining -= granted;
        granted
    }

    /// Остаток таймбанка у игрока (для отображения клиенту).
    pub fn remaining_for(&self, player_id: PlayerId) -> Duration {
        self.players.get(&player_id).copied().unwrap_or(self.initial)
    }

    /// Игрок ушёл из-за стола – банк сгорает.
    pub fn forget(&mut self, player_id: PlayerId) {
        self.players.remove(&player_id);
    }
}
