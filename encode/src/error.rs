use std::fmt::{Display, Formatter};
use std::io::Error;

#[derive(Debug)]
pub enum EncodeError {
    IoErr(Error),
    /// 不在码表中的字符
    InvalidBaseCodeInDec(char),
    /// 输入长度无法解码为完整的字节
    InvalidLenInDec(usize),
    /// `=`出现在非末尾位置或者数量不对
    InvalidPaddingInDec(usize),
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::IoErr(io) => write!(f, "{}", io),
            EncodeError::InvalidLenInDec(len) => {
                write!(f, "Invalid data length `{}` in the decode", len)
            }
            EncodeError::InvalidBaseCodeInDec(code) => write!(
                f,
                "Invalid base encode character `{}({:#x})`",
                code, *code as u64
            ),
            EncodeError::InvalidPaddingInDec(cnt) => {
                write!(f, "Invalid padding `{}` characters in the decode", cnt)
            }
        }
    }
}

impl std::error::Error for EncodeError {}

impl From<Error> for EncodeError {
    fn from(value: Error) -> Self {
        Self::IoErr(value)
    }
}
