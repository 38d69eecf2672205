use crate::Rand;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// 可复现的随机字节源, 相同的种子和相同的请求序列总是生成相同的字节序列.
///
/// 只在构造时设置一次种子, 之后的状态单调推进.
#[derive(Clone, Debug)]
pub struct SeededRand {
    seed: u64,
    rng: ChaCha20Rng,
}

impl SeededRand {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Rand for SeededRand {
    fn rand(&mut self, random: &mut [u8]) {
        self.rng.fill_bytes(random);
    }
}
