//! = RFC 8017
//!
//! == PKCS #1: RSA Cryptography Specification Version 2.2
//!
//! === RSASSA-PKCS1-v1_5
//!
//! EM = 0x00 || 0x01 || PS || 0x00 || T, PS是`k - tLen - 3`个0xff, T是DER编码的`DigestInfo`.
//! 签名是确定性的, 相同的密钥和消息总是生成相同的签名.
//!

use crate::rsa::{DigestInfo, PrivateKey, PublicKey};
use crate::{CipherError, Sign, Verify};
use crypto_hash::{Digest, HashOid};
use num_bigint::BigUint;
use std::marker::PhantomData;

pub struct PKCS1v15Verify<H> {
    key: PublicKey,
    info: DigestInfo,
    hf: PhantomData<H>,
}

pub struct PKCS1v15Sign<H> {
    key: PrivateKey,
    pkcs: PKCS1v15Verify<H>,
}

impl<H> AsRef<PKCS1v15Verify<H>> for PKCS1v15Sign<H> {
    fn as_ref(&self) -> &PKCS1v15Verify<H> {
        &self.pkcs
    }
}

impl<H> AsRef<PublicKey> for PKCS1v15Verify<H> {
    fn as_ref(&self) -> &PublicKey {
        &self.key
    }
}

impl<H> AsRef<PrivateKey> for PKCS1v15Sign<H> {
    fn as_ref(&self) -> &PrivateKey {
        &self.key
    }
}

impl<H> From<PKCS1v15Sign<H>> for PKCS1v15Verify<H> {
    fn from(value: PKCS1v15Sign<H>) -> Self {
        value.pkcs
    }
}

impl<H: Digest + HashOid> PKCS1v15Verify<H> {
    pub fn new(key: PublicKey) -> Result<Self, CipherError> {
        key.is_valid()?;
        Ok(Self {
            key,
            info: DigestInfo::of::<H>(),
            hf: PhantomData,
        })
    }

    /// 公钥modulus占用的字节数
    pub fn key_len(&self) -> usize {
        self.key.key_len()
    }

    pub fn digest_info(&self) -> &DigestInfo {
        &self.info
    }

    // EMSA-PKCS1-v1_5, em.len() = k
    fn emsa_encode(&self, digest: &[u8]) -> Result<Vec<u8>, CipherError> {
        if digest.len() != self.info.digest_len() {
            return Err(CipherError::Encoding(format!(
                "pkcs1v15: digest length `{}` not match to `{}`",
                digest.len(),
                self.info.digest_len()
            )));
        }

        let (k, t_len) = (self.key_len(), self.info.encoded_len());
        if k < t_len + 11 {
            return Err(CipherError::Encoding(format!(
                "pkcs1v15: intended encoded message length too short, the modulus needs at least {} bytes but it is {k} bytes",
                t_len + 11
            )));
        }

        let mut em = Vec::with_capacity(k);
        em.extend([0x00, 0x01]);
        em.resize(k - t_len - 1, 0xff);
        em.push(0x00);
        em.extend(self.info.encode(digest));

        Ok(em)
    }

    /// 验证对消息摘要`digest`的签名
    pub fn verify_digest(&self, digest: &[u8], signature: &[u8]) -> Result<(), CipherError> {
        let k = self.key_len();
        if signature.len() != k {
            return Err(CipherError::ValidateFailed(format!(
                "pkcs1v15: invalid signature length `{}`, expected `{k}`",
                signature.len()
            )));
        }

        let s = BigUint::from_bytes_be(signature);
        let m = self.key.rsavp(&s)?;
        let em = i2osp(&m, k)?;

        if em != self.emsa_encode(digest)? {
            return Err(CipherError::ValidateFailed(
                "pkcs1v15: invalid signature".to_string(),
            ));
        }

        Ok(())
    }
}

impl<H: Digest + HashOid> PKCS1v15Sign<H> {
    pub fn new(key: PrivateKey) -> Result<Self, CipherError> {
        let pkcs = PKCS1v15Verify::new(key.public_key().clone())?;
        key.is_valid()?;
        Ok(Self { pkcs, key })
    }

    /// 不检查key的合法性, 无需`n`的因子`p,q`
    pub fn new_uncheck(key: PrivateKey) -> Result<Self, CipherError> {
        let pkcs = PKCS1v15Verify::new(key.public_key().clone())?;
        Ok(Self { pkcs, key })
    }

    pub fn key_len(&self) -> usize {
        self.pkcs.key_len()
    }

    /// 对消息摘要`digest`签名, 签名的字节长度总是等于`k`, 高位补0
    pub fn sign_digest(&self, digest: &[u8], signature: &mut Vec<u8>) -> Result<(), CipherError> {
        let em = self.pkcs.emsa_encode(digest)?;
        let m = BigUint::from_bytes_be(em.as_slice());
        let s = self.key.rsasp(&m)?;
        signature.append(&mut i2osp(&s, self.key_len())?);
        Ok(())
    }

    pub fn verify_digest(&self, digest: &[u8], signature: &[u8]) -> Result<(), CipherError> {
        self.pkcs.verify_digest(digest, signature)
    }
}

// I2OSP: 定长大端字节串
fn i2osp(x: &BigUint, len: usize) -> Result<Vec<u8>, CipherError> {
    let bytes = x.to_bytes_be();
    if bytes.len() > len {
        return Err(CipherError::Encoding(format!(
            "i2osp: integer too large for {len} bytes"
        )));
    }

    let mut out = vec![0u8; len - bytes.len()];
    out.extend(bytes);
    Ok(out)
}

impl<H: Digest + HashOid> Verify for PKCS1v15Verify<H> {
    fn verify(&self, msg: &[u8], sign: &[u8]) -> Result<(), CipherError> {
        self.verify_digest(H::digest(msg).as_ref(), sign)
    }
}

impl<H: Digest + HashOid> Verify for PKCS1v15Sign<H> {
    fn verify(&self, msg: &[u8], sign: &[u8]) -> Result<(), CipherError> {
        self.pkcs.verify(msg, sign)
    }
}

impl<H: Digest + HashOid> Sign for PKCS1v15Sign<H> {
    fn sign(&self, msg: &[u8], sign: &mut Vec<u8>) -> Result<(), CipherError> {
        self.sign_digest(H::digest(msg).as_ref(), sign)
    }
}
