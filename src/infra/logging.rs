//! Инициализация логирования (tracing + tracing-subscriber).

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Настройки логирования.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Фильтр в синтаксисе `EnvFilter`; `RUST_LOG` имеет приоритет.
    pub filter: String,
    /// Писать логи в JSON (для сборщиков логов).
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,poker_table_engine=debug".to_string(),
            json: false,
        }
    }
}

/// Установить глобальный subscriber. Повторный вызов ничего не ломает:
/// если subscriber уже установлен, возвращается ошибка, которую можно игнорировать.
pub fn init_logging(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()
    }
}
