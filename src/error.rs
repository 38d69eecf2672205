use cipher::CipherError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    /// 密钥位长度与公钥指数的组合无法满足
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// 填充后的`DigestInfo`超出模数长度
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// PEM/JSON密钥无法解析
    #[error("Invalid key format: {0}")]
    KeyFormat(String),

    #[error("Verification failed: {0}")]
    Verification(String),

    #[error("Invalid message: {0}")]
    Message(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<CipherError> for FixtureError {
    fn from(value: CipherError) -> Self {
        match value {
            CipherError::InvalidParameter(s) => Self::InvalidParameter(s),
            CipherError::Encoding(s) => Self::Encoding(s),
            CipherError::InvalidPublicKey(s) | CipherError::InvalidPrivateKey(s) => {
                Self::KeyFormat(s)
            }
            CipherError::ValidateFailed(s) => Self::Verification(s),
            CipherError::Other(s) => Self::InvalidParameter(s),
        }
    }
}

impl From<::encode::EncodeError> for FixtureError {
    fn from(value: ::encode::EncodeError) -> Self {
        match value {
            ::encode::EncodeError::IoErr(e) => Self::Io(e),
            e => Self::Encoding(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for FixtureError {
    fn from(value: serde_json::Error) -> Self {
        Self::Message(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::FixtureError;
    use cipher::CipherError;

    #[test]
    fn cipher_error_kind() {
        let cases = [
            (CipherError::InvalidParameter("a".to_string()), "InvalidParameter"),
            (CipherError::Encoding("b".to_string()), "Encoding"),
            (CipherError::InvalidPrivateKey("c".to_string()), "KeyFormat"),
            (CipherError::ValidateFailed("d".to_string()), "Verification"),
        ];

        for (e, kind) in cases {
            let e = FixtureError::from(e);
            assert!(format!("{e:?}").starts_with(kind), "{e:?} is not {kind}");
        }
    }
}
