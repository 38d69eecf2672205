use crate::encode::OutputEncoding;
use crate::fixture::FixtureStyle;
use config::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 配置依次来自默认值, 配置文件(json/json5), 以`RSAFIX`为前缀的环境变量, 后者覆盖前者.
///
/// 环境变量前缀后接`_`, 嵌套字段以`__`分隔, 列表以`,`分隔, 如`RSAFIX_SEED=7`,
/// `RSAFIX_KEY_SIZES=1024,2048`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FixtureConfig {
    /// 确定性随机源的种子
    pub seed: u64,

    pub key_sizes: Vec<usize>,

    pub exponents: Vec<u64>,

    /// Miller-Rabin测试的轮数
    pub prime_test_rounds: usize,

    pub message: String,

    /// 与`message`摘要不同的反例消息
    pub decoy: String,

    pub encoding: OutputEncoding,

    pub style: FixtureStyle,

    pub pact_version: String,

    pub contract_path: String,

    pub gas_limit: u64,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            seed: 256,
            key_sizes: vec![1024, 2048, 3072, 4096],
            exponents: vec![5, 65537],
            prime_test_rounds: 19,
            message: "Pact can do RSA signatures too!!".to_string(),
            decoy: "This does not match with signature".to_string(),
            encoding: OutputEncoding::Hex,
            style: FixtureStyle::Test,
            pact_version: "5.0".to_string(),
            contract_path: "../contracts/rsa.pact".to_string(),
            gas_limit: 10000000000000,
        }
    }
}

impl FixtureConfig {
    pub const ENV_PREFIX: &'static str = "RSAFIX";

    pub fn load(f: Option<&Path>) -> Result<Self, ConfigError> {
        let default_config = Config::try_from(&FixtureConfig::default())?;

        let mut config = Config::builder().add_source(default_config);

        if let Some(f) = f {
            config = config.add_source(config::File::from(f).required(true));
        }

        config = config.add_source(
            config::Environment::with_prefix(Self::ENV_PREFIX)
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("key_sizes")
                .with_list_parse_key("exponents"),
        );

        let cfg: FixtureConfig = config.build()?.try_deserialize()?;
        cfg.check()?;

        log::trace!("{:?}", cfg);

        Ok(cfg)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.key_sizes.is_empty() || self.exponents.is_empty() {
            return Err(ConfigError::Message(
                "`key_sizes` and `exponents` must not be empty".to_string(),
            ));
        }

        if self.prime_test_rounds == 0 {
            return Err(ConfigError::Message(
                "`prime_test_rounds` must be positive".to_string(),
            ));
        }

        if self.message == self.decoy {
            return Err(ConfigError::Message(
                "`decoy` must differ from `message`".to_string(),
            ));
        }

        Ok(())
    }
}
