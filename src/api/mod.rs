//! Внешний API стола.
//!
//! Здесь описываются:
//! - команды (commands.rs) – всё, что меняет состояние стола;
//! - запросы (queries.rs) – только чтение, представление стола для зрителя;
//! - DTO (dto.rs) – структуры для клиента;
//! - ошибки (errors.rs) – то, что видит клиент.
//!
//! Исходящие события (`TableEvent`) определены в engine и реэкспортируются здесь.

pub mod commands;
pub mod dto;
pub mod errors;
pub mod queries;

pub use commands::{ActionKind, TableCommand};
pub use dto::{PlayerAtTableDto, TableViewDto};
pub use errors::ApiError;
pub use queries::build_table_view;

pub use crate::engine::events::{ShowdownHand, TableEvent};
