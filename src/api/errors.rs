use serde::{Deserialize, Serialize};

use crate::engine::events::TableEvent;
use crate::engine::EngineError;

/// Ошибка, как её видит клиент: стабильный код + сообщение.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Событие ERROR(code, message) для отправителя команды.
    pub fn into_event(self) -> TableEvent {
        TableEvent::Error {
            code: self.code,
            message: self.message,
        }
    }
}

impl From<&EngineError> for ApiError {
    fn from(err: &EngineError) -> Self {
        ApiError::new(err.code(), err.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::from(&err)
    }
}
