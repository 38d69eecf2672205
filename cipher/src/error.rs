use std::{error::Error, fmt::Display};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CipherError {
    /// 参数组合无法满足, 如密钥位长度与公钥指数
    InvalidParameter(String),

    /// 编码后的消息超出模数长度
    Encoding(String),

    InvalidPublicKey(String),

    InvalidPrivateKey(String),

    /// 签名验证失败
    ValidateFailed(String),

    Other(String),
}

impl Display for CipherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameter(s) => write!(f, "invalid parameter: {s}"),
            Self::Encoding(s) => write!(f, "encoding error: {s}"),
            Self::InvalidPublicKey(s) => write!(f, "invalid public key: {s}"),
            Self::InvalidPrivateKey(s) => write!(f, "invalid private key: {s}"),
            Self::ValidateFailed(s) => write!(f, "validate failed: {s}"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

impl Error for CipherError {}
