use crate::config::FixtureConfig;
use crate::error::FixtureError;
use crate::fixture::{EncodedFixture, FixtureGenerator};
use crate::message::Message;
use cipher::rsa::PrivateKey;
use cipher::Rand;
use num_bigint::BigUint;

/// 单个密钥参数组合的失败
#[derive(Debug)]
pub struct BatchFailure {
    pub key_bits: usize,
    pub exponent: u64,
    pub error: FixtureError,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub fixtures: Vec<EncodedFixture>,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 按`key_sizes × exponents`批量生成测试数据, 位长度在外层, 指数在内层.
///
/// 所有密钥依次消耗同一个随机源, 某个组合失败时记录错误并继续下一个组合.
pub struct BatchRunner<'a> {
    cfg: &'a FixtureConfig,
    generator: FixtureGenerator,
}

impl<'a> BatchRunner<'a> {
    pub fn new(cfg: &'a FixtureConfig, generator: FixtureGenerator) -> Self {
        Self { cfg, generator }
    }

    pub fn run<R: Rand>(&self, rng: &mut R) -> BatchOutcome {
        let (msg, decoy) = (
            Message::raw(self.cfg.message.as_str()),
            Message::raw(self.cfg.decoy.as_str()),
        );

        let mut outcome = BatchOutcome::default();
        let total = self.cfg.key_sizes.len() * self.cfg.exponents.len();
        for &bits in self.cfg.key_sizes.iter() {
            for &e in self.cfg.exponents.iter() {
                log::info!(
                    "[{}/{total}] generating {bits}-bit key with e={e}",
                    outcome.fixtures.len() + outcome.failures.len() + 1
                );

                match self.generate_one(bits, e, &msg, &decoy, rng) {
                    Ok(fixture) => outcome.fixtures.push(fixture),
                    Err(error) => {
                        log::error!("{bits}-bit key with e={e} failed: {error}");
                        outcome.failures.push(BatchFailure {
                            key_bits: bits,
                            exponent: e,
                            error,
                        });
                    }
                }
            }
        }

        outcome
    }

    fn generate_one<R: Rand>(
        &self,
        bits: usize,
        e: u64,
        msg: &Message,
        decoy: &Message,
        rng: &mut R,
    ) -> Result<EncodedFixture, FixtureError> {
        let key = PrivateKey::generate_key(
            bits,
            &BigUint::from(e),
            self.cfg.prime_test_rounds,
            rng,
        )?;
        log::debug!("generated key: {}", key.public_key());

        self.generator.generate(&key, msg, decoy)
    }
}
