//! ShuffleSeed – 32-байтовый seed, который однозначно задаёт перестановку колоды.
//!
//! Позволяет:
//!   - хранить seed и печатать его в hex для аудита;
//!   - делать детерминированное доменное расширение:
//!         new = H(domain || old || table_id || game_id || hand_number)
//!   - строить поток псевдослучайных чисел для Fisher–Yates.

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{GameId, TableId};

const DERIVE_DOMAIN: &[u8] = b"POKER_TABLE_SEED_V1";
const STREAM_DOMAIN: &[u8] = b"POKER_TABLE_SHUFFLE_V1";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ShuffleSeed {
    pub bytes: [u8; 32],
}

impl ShuffleSeed {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Seed из u64 (для тестов и реплея).
    pub fn from_u64(x: u64) -> Self {
        let mut b = [0u8; 32];
        b[..8].copy_from_slice(&x.to_le_bytes());
        Self { bytes: b }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let raw = hex::decode(s.trim()).ok()?;
        let bytes: [u8; 32] = raw.try_into().ok()?;
        Some(Self { bytes })
    }

    /// Доменное хэш-расширение с контекстом стола и раздачи.
    pub fn derive(&self, table_id: TableId, game_id: GameId, hand_number: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(DERIVE_DOMAIN);
        hasher.update(self.bytes);
        hasher.update(table_id.to_le_bytes());
        hasher.update(game_id.to_le_bytes());
        hasher.update(hand_number.to_le_bytes());
        Self {
            bytes: hasher.finalize().into(),
        }
    }

    /// Детерминированный поток для перемешивания.
    pub fn stream(&self) -> ChaCha20Rng {
        let mut hasher = Sha256::new();
        hasher.update(STREAM_DOMAIN);
        hasher.update(self.bytes);
        ChaCha20Rng::from_seed(hasher.finalize().into())
    }
}
