// src/time_ctrl/time_rules.rs
//! Конфигурация тайминга (shot-clock) для стола.
//!
//! Здесь описываем только "правила", без состояния и без привязки к конкретному столу.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Правила тайминга для одного стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeRules {
    /// Сколько секунд даётся на базовое решение (каждый ход).
    pub base_action_secs: u32,
    /// Сколько секунд time bank доступно каждому игроку на сессию за столом.
    pub bank_per_player_secs: u32,
    /// Какой "кусок" банка выдаётся за раз, когда base-время кончилось.
    pub bank_step_secs: u32,
}

impl TimeRules {
    pub const fn new(base_action_secs: u32, bank_per_player_secs: u32, bank_step_secs: u32) -> Self {
        Self {
            base_action_secs,
            bank_per_player_secs,
            bank_step_secs,
        }
    }

    /// Стандартный профиль: 20 сек на ход, 60 сек банка, выдаём по 10 сек.
    pub const fn standard() -> Self {
        Self::new(20, 60, 10)
    }

    pub fn base_action(&self) -> Duration {
        Duration::from_secs(self.base_action_secs as u64)
    }

    pub fn bank_per_player(&self) -> Duration {
        Duration::from_secs(self.bank_per_player_secs as u64)
    }

    pub fn bank_step(&self) -> Duration {
        Duration::from_secs(self.bank_step_secs as u64)
    }
}

impl Default for TimeRules {
    fn default() -> Self {
        Self::standard()
    }
}
