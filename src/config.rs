//! Конфигурация движка: стол, тайминг, актор, логирование.
//!
//! Загружается из TOML; у каждого поля есть значение по умолчанию.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::table::TableConfig;
use crate::infra::logging::LoggingConfig;
use crate::time_ctrl::TimeRules;

/// Ошибки загрузки/проверки конфигурации.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Не удалось прочитать конфиг: {0}")]
    Io(#[from] std::io::Error),

    #[error("Некорректный TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Некорректное значение: {0}")]
    Invalid(String),
}

/// Настройки актора стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ActorConfig {
    /// Ёмкость почтового ящика команд.
    pub mailbox_capacity: usize,
    /// Ёмкость broadcast-канала событий.
    pub event_capacity: usize,
    /// Период тика таймера хода.
    pub tick_millis: u64,
    /// Сколько раз подряд пытаться раздать новую колоду после аннулирования.
    pub max_deal_attempts: u32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 256,
            event_capacity: 1024,
            tick_millis: 250,
            max_deal_attempts: 3,
        }
    }
}

/// Полная конфигурация.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    pub table: TableConfig,
    pub time: TimeRules,
    pub actor: ActorConfig,
    pub logging: LoggingConfig,
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.table;
        if !(2..=10).contains(&t.max_seats) {
            return Err(ConfigError::Invalid(format!("max_seats = {}, expected 2..=10", t.max_seats)));
        }
        if t.stakes.small_blind.is_zero() || t.stakes.big_blind.is_zero() {
            return Err(ConfigError::Invalid("blinds must be positive".into()));
        }
        if t.stakes.small_blind > t.stakes.big_blind {
            return Err(ConfigError::Invalid("small blind exceeds big blind".into()));
        }
        if t.min_buy_in.is_zero() || t.min_buy_in > t.max_buy_in {
            return Err(ConfigError::Invalid("min_buy_in must be in 1..=max_buy_in".into()));
        }
        if self.time.base_action_secs == 0 {
            return Err(ConfigError::Invalid("base_action_secs must be positive".into()));
        }
        let a = &self.actor;
        if a.mailbox_capacity == 0 || a.event_capacity == 0 || a.tick_millis == 0 {
            return Err(ConfigError::Invalid("actor capacities and tick must be positive".into()));
        }
        if a.max_deal_attempts == 0 {
            return Err(ConfigError::Invalid("max_deal_attempts must be positive".into()));
        }
        Ok(())
    }
}
