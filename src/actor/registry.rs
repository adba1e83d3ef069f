use std::collections::HashMap;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::domain::table::{Table, TableConfig};
use crate::domain::TableId;
use crate::infra::ids::IdGenerator;

use super::handle::TableHandle;
use super::table_actor::TableActor;
use super::TableDeps;

/// Ошибки уровня реестра столов.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error("Стол {0} уже зарегистрирован")]
    DuplicateTable(TableId),
}

/// Один стол: ручка актора и его задача.
struct ManagedTable {
    handle: TableHandle,
    task: JoinHandle<()>,
}

/// Реестр столов:
/// - запускает актор на каждый стол;
/// - хранит ручки по TableId;
/// - останавливает все столы разом.
///
/// Столы работают параллельно и ничего не делят между собой.
pub struct TableRegistry {
    config: EngineConfig,
    ids: IdGenerator,
    tables: HashMap<TableId, ManagedTable>,
}

impl TableRegistry {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ids: IdGenerator::new(),
            tables: HashMap::new(),
        }
    }

    /// Создать стол с конфигом по умолчанию (или заданным) и запустить его актор.
    pub fn create_table(
        &mut self,
        name: impl Into<String>,
        table_config: Option<TableConfig>,
        deps: TableDeps,
    ) -> TableHandle {
        let mut table_id = self.ids.next_table_id();
        while self.tables.contains_key(&table_id) {
            table_id = self.ids.next_table_id();
        }
        let config = table_config.unwrap_or_else(|| self.config.table.clone());
        let table = Table::new(table_id, name, config);
        self.spawn(table, deps)
    }

    /// Зарегистрировать уже собранный стол.
    pub fn add_table(&mut self, table: Table, deps: TableDeps) -> Result<TableHandle, RegistryError> {
        if self.tables.contains_key(&table.id) {
            return Err(RegistryError::DuplicateTable(table.id));
        }
        Ok(self.spawn(table, deps))
    }

    fn spawn(&mut self, table: Table, deps: TableDeps) -> TableHandle {
        let table_id = table.id;
        let (handle, task) = TableActor::spawn(table, deps, &self.config);
        info!(table_id, "table registered");
        self.tables.insert(
            table_id,
            ManagedTable {
                handle: handle.clone(),
                task,
            },
        );
        handle
    }

    pub fn has_table(&self, table_id: TableId) -> bool {
        self.tables.contains_key(&table_id)
    }

    pub fn table(&self, table_id: TableId) -> Result<&TableHandle, RegistryError> {
        self.tables
            .get(&table_id)
            .map(|mt| &mt.handle)
            .ok_or(RegistryError::TableNotFound(table_id))
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        let mut ids: Vec<TableId> = self.tables.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Остановить стол и дождаться завершения его актора.
    pub async fn close_table(&mut self, table_id: TableId) -> Result<(), RegistryError> {
        let managed = self
            .tables
            .remove(&table_id)
            .ok_or(RegistryError::TableNotFound(table_id))?;
        managed.handle.shutdown().await;
        if let Err(err) = managed.task.await {
            warn!(table_id, %err, "table actor task failed");
        }
        Ok(())
    }

    /// Остановить все столы.
    pub async fn shutdown_all(mut self) {
        for table_id in self.table_ids() {
            let _ = self.close_table(table_id).await;
        }
    }
}
