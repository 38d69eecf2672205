use crate::cmd::{write_to_file_or_stdout, RngArgs};
use crate::config::FixtureConfig;
use crate::key::{encode_private_key, encode_public_key, KeyFormat};
use cipher::rsa::PrivateKey;
use clap::{value_parser, Args};
use num_bigint::BigUint;
use std::path::PathBuf;

#[derive(Args, Clone)]
#[command(about = "RSA private key generate")]
pub struct KeyArgs {
    #[arg(value_name = "BITs", default_value = "2048")]
    #[arg(help = "the public key modulus bits length")]
    bits: usize,

    #[arg(short, long, default_value = "65537", help = "the public exponent")]
    exponent: u64,

    #[arg(short, long, value_parser = value_parser!(u32).range(1..))]
    #[arg(help = "the provable prime test rounds, default to the configured `prime_test_rounds`")]
    test: Option<u32>,

    #[command(flatten)]
    rng: RngArgs,

    #[arg(long, value_enum, default_value_t = KeyFormat::Pem)]
    format: KeyFormat,

    #[arg(long, help = "output the public key instead of the private key")]
    public: bool,

    #[arg(
        short,
        long,
        help = "file to save the key, it will output to stdout if not specified"
    )]
    ofile: Option<PathBuf>,

    #[arg(long, help = "force write if the ofile already exists")]
    force: bool,
}

impl KeyArgs {
    pub fn run(&self, cfg: &FixtureConfig) -> anyhow::Result<PrivateKey> {
        let mut rng = self.rng.rng(cfg);
        let rounds = self
            .test
            .map(|x| x as usize)
            .unwrap_or(cfg.prime_test_rounds);

        log::info!(
            "generating {}-bit key with e={}",
            self.bits,
            self.exponent
        );
        let key = PrivateKey::generate_key(
            self.bits,
            &BigUint::from(self.exponent),
            rounds,
            &mut rng.as_mut(),
        )?;

        Ok(key)
    }

    pub fn exe(self, cfg: &FixtureConfig) -> anyhow::Result<()> {
        let key = self.run(cfg)?;
        let s = if self.public {
            encode_public_key(key.public_key(), self.format)?
        } else {
            encode_private_key(&key, self.format)?
        };

        write_to_file_or_stdout(self.ofile.as_deref(), self.force, s.as_bytes())
    }
}
