//! Актор стола: единственный писатель состояния стола.
//!
//! Команды стола приходят в почтовый ящик (mpsc) и применяются строго по
//! очереди; ответ – через oneshot, события – через broadcast. Таймер хода
//! тикает внутри того же цикла, поэтому таймаут сериализован с командами.

pub mod handle;
pub mod messages;
pub mod registry;
pub mod table_actor;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PlayerId, TableId};
use crate::engine::EngineError;
use crate::fairness::{DeckSource, SeededDeckSource};
use crate::infra::persistence::{ChipLedger, HandHistorySink, StorageError};
use crate::infra::rng::SystemRng;

pub use handle::TableHandle;
pub use messages::TableMessage;
pub use registry::TableRegistry;
pub use table_actor::TableActor;

/// Ошибки на границе актора.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActorError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Актор остановлен: почтовый ящик закрыт или ответ потерян.
    #[error("Актор стола {0} недоступен")]
    Closed(TableId),
}

impl ActorError {
    /// Стабильный код для клиента.
    pub fn code(&self) -> &'static str {
        match self {
            ActorError::Engine(e) => e.code(),
            ActorError::Storage(StorageError::InsufficientFunds { .. }) => "INSUFFICIENT_FUNDS",
            ActorError::Storage(_) => "STORAGE_UNAVAILABLE",
            ActorError::Closed(_) => "TABLE_CLOSED",
        }
    }
}

/// Событие с адресатом: None – всем подключённым к столу.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Addressed<T> {
    pub recipient: Option<PlayerId>,
    pub event: T,
}

impl<T> Addressed<T> {
    pub fn broadcast(event: T) -> Self {
        Self {
            recipient: None,
            event,
        }
    }

    pub fn to(player_id: PlayerId, event: T) -> Self {
        Self {
            recipient: Some(player_id),
            event,
        }
    }

    /// Должен ли игрок увидеть это событие.
    pub fn is_visible_to(&self, player_id: PlayerId) -> bool {
        self.recipient.map(|r| r == player_id).unwrap_or(true)
    }
}

/// Внешние зависимости стола.
pub struct TableDeps {
    pub ledger: Arc<dyn ChipLedger>,
    pub history: Arc<dyn HandHistorySink>,
    pub deck_source: Box<dyn DeckSource>,
}

impl TableDeps {
    /// Боевая колода из системной энтропии.
    pub fn new(ledger: Arc<dyn ChipLedger>, history: Arc<dyn HandHistorySink>) -> Self {
        Self {
            ledger,
            history,
            deck_source: Box::new(SeededDeckSource::new(SystemRng)),
        }
    }

    pub fn with_deck_source(mut self, deck_source: Box<dyn DeckSource>) -> Self {
        self.deck_source = deck_source;
        self
    }
}
