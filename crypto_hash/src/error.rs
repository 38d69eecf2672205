use std::{error::Error, fmt::Display};

#[derive(Clone, Debug)]
pub enum HashError {
    /// 不合法的摘要字节长度
    InvalidDigestLen { max: usize, real: usize },
}

impl Display for HashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashError::InvalidDigestLen { max, real } => f.write_fmt(format_args!(
                "digest byte length `{real}` must to satisfy the `0 < s <= {max}`"
            )),
        }
    }
}

impl Error for HashError {}
