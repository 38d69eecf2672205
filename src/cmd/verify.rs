use crate::cmd::MessageArgs;
use crate::config::FixtureConfig;
use crate::encode::{Encoder, OutputEncoding};
use crate::error::FixtureError;
use crate::fixture::FixtureGenerator;
use crate::key::read_public_key;
use cipher::rsa::PublicKey;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Clone)]
#[command(about = "verify the RSA PKCS #1 v1.5 signature of the BLAKE2b-256 digest")]
pub struct VerifyArgs {
    #[command(flatten)]
    msg: MessageArgs,

    #[arg(short, long, help = "the public or private key file(PEM or JSON)")]
    key: Option<PathBuf>,

    #[arg(long, conflicts_with = "key", required_unless_present = "key", allow_hyphen_values = true)]
    #[arg(help = "the encoded modulus")]
    modulus: Option<String>,

    #[arg(long = "pub-exp", conflicts_with = "key", required_unless_present = "key", allow_hyphen_values = true)]
    #[arg(help = "the encoded public exponent")]
    pub_exp: Option<String>,

    #[arg(short, long, allow_hyphen_values = true, help = "the encoded signature")]
    signature: String,

    #[arg(long, help = "the encoding of the inputs, default to the configured `encoding`")]
    encoding: Option<OutputEncoding>,
}

impl VerifyArgs {
    pub fn run(&self, cfg: &FixtureConfig) -> Result<(), FixtureError> {
        let enc = Encoder::new(self.encoding.unwrap_or(cfg.encoding));

        let key = match (&self.key, &self.modulus, &self.pub_exp) {
            (Some(p), _, _) => read_public_key(p.as_path())?,
            (None, Some(n), Some(e)) => PublicKey::new(enc.decode_uint(n)?, enc.decode_uint(e)?)?,
            _ => {
                return Err(FixtureError::KeyFormat(
                    "need the key file or the modulus and public exponent".to_string(),
                ))
            }
        };

        let (msg, sig) = (
            self.msg.message(cfg.message.as_str()).map_err(|e| FixtureError::Message(e.to_string()))?,
            enc.decode_bytes(self.signature.as_str())?,
        );

        FixtureGenerator::new(enc.encoding()).verify(&key, &msg, sig.as_slice())
    }

    pub fn exe(self, cfg: &FixtureConfig) -> anyhow::Result<()> {
        self.run(cfg)?;
        println!("Validation success.");
        Ok(())
    }
}
