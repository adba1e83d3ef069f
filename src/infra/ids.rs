use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{GameId, TableId};

/// Генерация ID на основе монотонных счётчиков.
///
/// Идентификаторы раздач выдаются в пространстве стола
/// (`table_id` в старших 32 битах), поэтому каждому актору хватает своего
/// генератора и столам нечего делить между собой.
#[derive(Debug)]
pub struct IdGenerator {
    namespace: u64,
    table_counter: AtomicU64,
    game_counter: AtomicU64,
}

impl IdGenerator {
    /// Генератор без пространства имён, счётчики с 1.
    pub fn new() -> Self {
        Self::scoped(0)
    }

    /// Генератор ID раздач для конкретного стола.
    pub fn for_table(table_id: TableId) -> Self {
        Self::scoped(table_id)
    }

    fn scoped(namespace: u64) -> Self {
        Self {
            namespace: namespace << 32,
            table_counter: AtomicU64::new(1),
            game_counter: AtomicU64::new(1),
        }
    }

    #[inline]
    pub fn next_table_id(&self) -> TableId {
        self.table_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_game_id(&self) -> GameId {
        self.namespace | self.game_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
