//! 签名测试数据的生成
//!
//! 一组测试数据包含公钥模数, 公钥指数, 密钥位长度, 签名, 原消息和反例消息.
//! 反例消息的摘要必须与原消息不同, 用签名验证反例消息总是失败.

use crate::encode::{Encoder, OutputEncoding};
use crate::error::FixtureError;
use crate::message::Message;
use cipher::rsa::{PKCS1v15Sign, PKCS1v15Verify, PrivateKey, PublicKey};
use crypto_hash::blake::BLAKE2b256;
use serde::{Deserialize, Serialize};

mod batch;
pub use batch::{BatchFailure, BatchOutcome, BatchRunner};

mod lisp;
pub use lisp::{FixtureStyle, LispRenderer};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedFixture {
    pub modulus: String,
    pub exponent: String,
    pub key_bits: usize,
    pub signature: String,
    pub message: String,
    pub decoy: String,
    pub encoding: OutputEncoding,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FixtureGenerator {
    encoder: Encoder,
}

impl FixtureGenerator {
    pub const fn new(encoding: OutputEncoding) -> Self {
        Self {
            encoder: Encoder::new(encoding),
        }
    }

    pub const fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// BLAKE2b-256摘要的PKCS #1 v1.5签名, 长度等于模数的字节长度
    pub fn sign(&self, key: &PrivateKey, message: &Message) -> Result<Vec<u8>, FixtureError> {
        let signer = if key.primes().is_some() {
            PKCS1v15Sign::<BLAKE2b256>::new(key.clone())?
        } else {
            PKCS1v15Sign::<BLAKE2b256>::new_uncheck(key.clone())?
        };

        let mut sig = Vec::with_capacity(key.public_key().key_len());
        signer.sign_digest(message.digest()?.as_ref(), &mut sig)?;
        Ok(sig)
    }

    pub fn verify(
        &self,
        key: &PublicKey,
        message: &Message,
        signature: &[u8],
    ) -> Result<(), FixtureError> {
        let verifier = PKCS1v15Verify::<BLAKE2b256>::new(key.clone())?;
        verifier.verify_digest(message.digest()?.as_ref(), signature)?;
        Ok(())
    }

    pub fn generate(
        &self,
        key: &PrivateKey,
        message: &Message,
        decoy: &Message,
    ) -> Result<EncodedFixture, FixtureError> {
        if message.digest()? == decoy.digest()? {
            return Err(FixtureError::Message(
                "the decoy message has the same digest as the message".to_string(),
            ));
        }

        let sig = self.sign(key, message)?;

        let pk = key.public_key();
        self.verify(pk, message, sig.as_slice())?;
        if self.verify(pk, decoy, sig.as_slice()).is_ok() {
            return Err(FixtureError::Verification(
                "the signature verifies against the decoy message".to_string(),
            ));
        }

        Ok(EncodedFixture {
            modulus: self.encoder.encode_uint(pk.modulus())?,
            exponent: self.encoder.encode_uint(pk.exponent())?,
            key_bits: pk.bits(),
            signature: self.encoder.encode_bytes(sig.as_slice())?,
            message: message.to_text()?,
            decoy: decoy.to_text()?,
            encoding: self.encoder.encoding(),
        })
    }
}
