//! Серверный движок покерного стола (Texas Hold'em).
//!
//! Слои:
//! - `domain` – карты, фишки, игроки, стол;
//! - `fairness` – коммит колоды, перемешивание по seed и его проверка;
//! - `eval` – оценка руки из 5–7 карт;
//! - `engine` – торговля, сайд-поты, машина состояний раздачи;
//! - `state` – снапшот раздачи и агрегат стола;
//! - `actor` – актор стола (единственный писатель) и реестр столов;
//! - `api`, `infra`, `time_ctrl`, `config` – окружение.

pub mod actor;
pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod fairness;
pub mod infra;
pub mod state;
pub mod time_ctrl;

pub use actor::{ActorError, Addressed, TableActor, TableDeps, TableHandle, TableRegistry};
pub use config::EngineConfig;
pub use engine::{BettingEngine, EngineError, GameStateMachine, TableEvent};
pub use state::{GameState, TableState};
