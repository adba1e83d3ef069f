use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::chips::Chips;
use crate::domain::{GameId, PlayerId, TableId};
use crate::engine::hand_history::HandRecord;

/// Ошибки внешних хранилищ (кошелёк, архив раздач).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Недостаточно средств у игрока {player_id}: нужно {requested}, есть {available}")]
    InsufficientFunds {
        player_id: PlayerId,
        requested: Chips,
        available: Chips,
    },

    #[error("Хранилище недоступно: {0}")]
    Unavailable(String),
}

/// Кошелёк игроков за пределами стола.
///
/// Бай-ин списывается до посадки, стек зачисляется обратно, когда игрок встаёт.
#[async_trait]
pub trait ChipLedger: Send + Sync {
    async fn debit_buy_in(&self, player_id: PlayerId, amount: Chips) -> Result<(), StorageError>;

    async fn credit_cash_out(&self, player_id: PlayerId, amount: Chips) -> Result<(), StorageError>;
}

/// Архив сыгранных раздач (аудит честности, история).
#[async_trait]
pub trait HandHistorySink: Send + Sync {
    async fn append(&self, record: HandRecord) -> Result<(), StorageError>;
}

/// Простая in-memory реализация кошелька для тестов и локального запуска.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChipLedger {
    balances: Arc<Mutex<HashMap<PlayerId, Chips>>>,
}

impl InMemoryChipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Кошелёк с заранее пополненными балансами.
    pub fn with_balances(balances: impl IntoIterator<Item = (PlayerId, Chips)>) -> Self {
        Self {
            balances: Arc::new(Mutex::new(balances.into_iter().collect())),
        }
    }

    pub async fn balance(&self, player_id: PlayerId) -> Chips {
        self.balances
            .lock()
            .await
            .get(&player_id)
            .copied()
            .unwrap_or(Chips::ZERO)
    }
}

#[async_trait]
impl ChipLedger for InMemoryChipLedger {
    async fn debit_buy_in(&self, player_id: PlayerId, amount: Chips) -> Result<(), StorageError> {
        let mut balances = self.balances.lock().await;
        let balance = balances.entry(player_id).or_insert(Chips::ZERO);
        if *balance < amount {
            return Err(StorageError::InsufficientFunds {
                player_id,
                requested: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }

    async fn credit_cash_out(&self, player_id: PlayerId, amount: Chips) -> Result<(), StorageError> {
        *self.balances.lock().await.entry(player_id).or_insert(Chips::ZERO) += amount;
        Ok(())
    }
}

/// In-memory архив раздач.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHandHistory {
    records: Arc<Mutex<Vec<HandRecord>>>,
}

impl InMemoryHandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<HandRecord> {
        self.records.lock().await.clone()
    }

    pub async fn for_table(&self, table_id: TableId) -> Vec<HandRecord> {
        self.records
            .lock()
            .await
            .iter()
            .filter(|r| r.table_id == table_id)
            .cloned()
            .collect()
    }

    pub async fn find(&self, game_id: GameId) -> Option<HandRecord> {
        self.records
            .lock()
            .await
            .iter()
            .find(|r| r.game_id == game_id)
            .cloned()
    }
}

#[async_trait]
impl HandHistorySink for InMemoryHandHistory {
    async fn append(&self, record: HandRecord) -> Result<(), StorageError> {
        self.records.lock().await.push(record);
        Ok(())
    }
}
