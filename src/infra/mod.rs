//! Инфраструктурный слой вокруг покерного движка:
//! - генерация ID;
//! - источники энтропии для колоды;
//! - кошелёк и архив раздач (async-порты + in-memory реализации);
//! - маппинги между API и engine;
//! - логирование.

pub mod ids;
pub mod logging;
pub mod mapping;
pub mod persistence;
pub mod rng;

pub use ids::IdGenerator;
pub use logging::{init_logging, LoggingConfig};
pub use mapping::{action_from_api, action_to_api};
pub use persistence::{ChipLedger, HandHistorySink, InMemoryChipLedger, InMemoryHandHistory, StorageError};
pub use rng::{DeterministicRng, EntropySource, SystemRng};
