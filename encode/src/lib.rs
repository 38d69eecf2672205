//! 流式的文本编解码, 从`Read`读入, 向`Write`写出.

use std::io::{Read, Write};

pub trait Encode {
    /// 返回读和写字节数
    fn encode<R: Read, W: Write>(
        &mut self,
        in_data: &mut R,
        out_data: &mut W,
    ) -> Result<(usize, usize), EncodeError>;
}

pub trait Decode {
    /// 返回读和写字节数
    fn decode<R: Read, W: Write>(
        &mut self,
        in_data: &mut R,
        out_data: &mut W,
    ) -> Result<(usize, usize), EncodeError>;
}

pub mod base;
mod error;
pub use error::EncodeError;
