use rand::RngCore;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Источник случайных байт для nonce и seed колоды.
pub trait EntropySource {
    fn fill_bytes(&mut self, buf: &mut [u8]);
}

/// Системная криптостойкая энтропия (ОС).
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRng;

impl EntropySource for SystemRng {
    fn fill_bytes(&mut self, buf: &mut [u8]) {
        rand::rngs::OsRng.fill_bytes(buf);
    }
}

/// Детерминированный источник для тестов и реплея.
/// Одинаковый seed → одинаковые nonce и seed колод.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: ChaCha20Rng,
}

impl DeterministicRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl EntropySource for DeterministicRng {
    fn fill_bytes(&mut self, buf: &mut [u8]) {
        self.inner.fill_bytes(buf);
    }
}
