use crate::cmd::{write_to_file_or_stdout, MessageArgs, RngArgs};
use crate::config::FixtureConfig;
use crate::encode::OutputEncoding;
use crate::fixture::{EncodedFixture, FixtureGenerator};
use crate::key::read_private_key;
use crate::message::Message;
use cipher::rsa::PrivateKey;
use clap::Args;
use num_bigint::BigUint;
use std::path::PathBuf;

#[derive(Args, Clone)]
#[command(about = "sign the BLAKE2b-256 digest of the message with RSA PKCS #1 v1.5")]
pub struct SignArgs {
    #[command(flatten)]
    msg: MessageArgs,

    #[arg(short, long, help = "the private key file(PEM or JSON), a key is generated if not specified")]
    key: Option<PathBuf>,

    #[arg(long, default_value = "2048", conflicts_with = "key")]
    #[arg(help = "the bits length of the generated key")]
    bits: usize,

    #[arg(short, long, default_value = "65537", conflicts_with = "key")]
    #[arg(help = "the public exponent of the generated key")]
    exponent: u64,

    #[command(flatten)]
    rng: RngArgs,

    #[arg(long, help = "the signature encoding, default to the configured `encoding`")]
    encoding: Option<OutputEncoding>,

    #[arg(long, help = "output the whole fixture as JSON, the configured `decoy` is the negative message")]
    fixture: bool,

    #[arg(short, long, help = "file to save the output, it will output to stdout if not specified")]
    ofile: Option<PathBuf>,

    #[arg(long, help = "force write if the ofile already exists")]
    force: bool,
}

impl SignArgs {
    fn private_key(&self, cfg: &FixtureConfig) -> anyhow::Result<PrivateKey> {
        match self.key.as_ref() {
            Some(p) => Ok(read_private_key(p.as_path())?),
            None => {
                let mut rng = self.rng.rng(cfg);
                log::info!(
                    "generating {}-bit key with e={}",
                    self.bits,
                    self.exponent
                );
                Ok(PrivateKey::generate_key(
                    self.bits,
                    &BigUint::from(self.exponent),
                    cfg.prime_test_rounds,
                    &mut rng.as_mut(),
                )?)
            }
        }
    }

    /// 只输出签名, 消息按任意字节处理
    pub fn signature(&self, cfg: &FixtureConfig) -> anyhow::Result<String> {
        let key = self.private_key(cfg)?;
        let msg = self.msg.message(cfg.message.as_str())?;
        let g = FixtureGenerator::new(self.encoding.unwrap_or(cfg.encoding));

        let sig = g.sign(&key, &msg)?;
        Ok(g.encoder().encode_bytes(sig.as_slice())?)
    }

    /// 完整的测试数据, 消息和反例消息都要求是UTF-8文本
    pub fn fixture(&self, cfg: &FixtureConfig) -> anyhow::Result<EncodedFixture> {
        let key = self.private_key(cfg)?;
        let msg = self.msg.message(cfg.message.as_str())?;
        let decoy = Message::raw(cfg.decoy.as_str());
        let g = FixtureGenerator::new(self.encoding.unwrap_or(cfg.encoding));

        Ok(g.generate(&key, &msg, &decoy)?)
    }

    pub fn exe(self, cfg: &FixtureConfig) -> anyhow::Result<()> {
        let out = if self.fixture {
            serde_json::to_string_pretty(&self.fixture(cfg)?)?
        } else {
            self.signature(cfg)?
        };

        write_to_file_or_stdout(
            self.ofile.as_deref(),
            self.force,
            format!("{out}\n").as_bytes(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::cmd::{Cli, SubCmd};
    use crate::config::FixtureConfig;
    use crate::key::encode_private_key;
    use crate::key::KeyFormat;
    use crate::encode::OutputEncoding;
    use crate::error::FixtureError;
    use crate::fixture::FixtureGenerator;
    use crate::message::Message;
    use cipher::rsa::PrivateKey;
    use cipher::SeededRand;
    use clap::Parser;
    use num_bigint::BigUint;

    fn sign_args(args: &[&str]) -> super::SignArgs {
        let cli = Cli::try_parse_from(["rsafix", "sign"].iter().chain(args)).unwrap();
        match cli.cmd {
            SubCmd::Sign(a) => a,
            _ => unreachable!(),
        }
    }

    #[test]
    fn sign_with_key_file() {
        let mut rng = SeededRand::new(256);
        let key = PrivateKey::generate_key(1024, &BigUint::from(65537u32), 19, &mut rng).unwrap();
        let p = std::env::temp_dir().join(format!("rsafix-sign-{}.pem", std::process::id()));
        std::fs::write(&p, encode_private_key(&key, KeyFormat::Pem).unwrap()).unwrap();
        let path = p.to_string_lossy().to_string();

        let cfg = FixtureConfig::default();
        let args = sign_args(&["Hello world", "--key", path.as_str(), "--encoding", "base64url"]);
        let a = args.fixture(&cfg).unwrap();
        let sig = args.signature(&cfg).unwrap();
        std::fs::remove_file(&p).unwrap();

        // 与密钥文件冲突的参数
        assert!(Cli::try_parse_from([
            "rsafix",
            "sign",
            "Hello world",
            "--key",
            path.as_str(),
            "--bits",
            "1024"
        ])
        .is_err());
        assert_eq!(a.key_bits, 1024);
        assert_eq!(a.message, "Hello world");
        assert!(!a.signature.contains('='));
        assert_eq!(a.signature.len(), 171);
        assert_eq!(sig, a.signature);
    }

    #[test]
    fn sign_json_message() {
        let cfg = FixtureConfig::default();
        let a = sign_args(&[
            "--json",
            r#"{"account": "My_Account_Name", "index": {"int": 1983}}"#,
            "--bits",
            "1024",
        ])
        .fixture(&cfg)
        .unwrap();
        assert_eq!(a.message, r#"{"account":"My_Account_Name","index":{"int":1983}}"#);
        assert_eq!(a.encoding, crate::encode::OutputEncoding::Hex);
    }

    #[test]
    fn sign_binary_file() {
        let data = [0xffu8, 0xfe, 0x00, 0x80];
        let p = std::env::temp_dir().join(format!("rsafix-sign-{}.bin", std::process::id()));
        std::fs::write(&p, data).unwrap();
        let path = p.to_string_lossy().to_string();

        let cfg = FixtureConfig::default();
        let args = sign_args(&["-f", path.as_str(), "--bits", "1024"]);
        let sig = args.signature(&cfg);
        let fx = args.fixture(&cfg);
        std::fs::remove_file(&p).unwrap();

        let sig = sig.unwrap();
        assert_eq!(sig.len(), 256);

        // 签名可以用同一把密钥验证
        let mut rng = SeededRand::new(cfg.seed);
        let key = PrivateKey::generate_key(1024, &BigUint::from(65537u32), 19, &mut rng).unwrap();
        let g = FixtureGenerator::new(OutputEncoding::Hex);
        let raw = g.encoder().decode_bytes(sig.as_str()).unwrap();
        g.verify(key.public_key(), &Message::raw(data.to_vec()), &raw).unwrap();

        // 测试数据需要嵌入文本, 非UTF-8消息被拒绝
        assert!(matches!(
            fx.unwrap_err().downcast_ref::<FixtureError>(),
            Some(FixtureError::Message(_))
        ));
    }
}
