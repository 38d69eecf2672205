use crate::Rand;
use xrand::rngs::OsRng;
use xrand::RngCore;

/// 操作系统熵源, 不可复现. 用于不需要固定夹具的密钥.
#[derive(Copy, Clone, Default)]
pub struct DefaultRand {
    rng: OsRng,
}

impl Rand for DefaultRand {
    fn rand(&mut self, random: &mut [u8]) {
        self.rng.fill_bytes(random);
    }
}
