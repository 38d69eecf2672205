//! 公钥和签名的文本编码
//!
//! - hex: 小写十六进制, 无`0x`前缀;
//! - base64url: URL安全码表, 去掉末尾的`=`;
//!
//! 整数按最小的大端字节串编码(0编码为`[0x00]`), 签名按定长字节串编码, 保留前导0.

use crate::error::FixtureError;
use clap::ValueEnum;
use ::encode::base::{Base16, Base64};
use ::encode::{Decode, Encode};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    #[default]
    Hex,
    Base64url,
}

impl Display for OutputEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hex => f.write_str("hex"),
            Self::Base64url => f.write_str("base64url"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    encoding: OutputEncoding,
}

impl Encoder {
    pub const fn new(encoding: OutputEncoding) -> Self {
        Self { encoding }
    }

    pub const fn encoding(&self) -> OutputEncoding {
        self.encoding
    }

    pub fn encode_bytes(&self, data: &[u8]) -> Result<String, FixtureError> {
        let mut buf = Vec::with_capacity(data.len() << 1);
        let mut data = data;
        match self.encoding {
            OutputEncoding::Hex => {
                Base16::new().lowercase(true).encode(&mut data, &mut buf)?;
            }
            OutputEncoding::Base64url => {
                Base64::new(false)
                    .padding(false)
                    .encode(&mut data, &mut buf)?;
            }
        }

        String::from_utf8(buf).map_err(|e| FixtureError::Encoding(e.to_string()))
    }

    /// 最小的大端字节串, 0编码为单字节`00`
    pub fn encode_uint(&self, x: &BigUint) -> Result<String, FixtureError> {
        self.encode_bytes(uint_to_bytes(x).as_slice())
    }

    /// hex不区分大小写, base64url接受有无`=`填充
    pub fn decode_bytes(&self, s: &str) -> Result<Vec<u8>, FixtureError> {
        let (mut data, mut buf) = (s.trim().as_bytes(), Vec::with_capacity(s.len()));
        match self.encoding {
            OutputEncoding::Hex => {
                Base16::new().decode(&mut data, &mut buf)?;
            }
            OutputEncoding::Base64url => {
                Base64::new(false).decode(&mut data, &mut buf)?;
            }
        }
        Ok(buf)
    }

    pub fn decode_uint(&self, s: &str) -> Result<BigUint, FixtureError> {
        Ok(BigUint::from_bytes_be(self.decode_bytes(s)?.as_slice()))
    }
}

fn uint_to_bytes(x: &BigUint) -> Vec<u8> {
    let bytes = x.to_bytes_be();
    if bytes.is_empty() {
        vec![0]
    } else {
        bytes
    }
}
