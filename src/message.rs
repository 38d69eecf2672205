//! 待签名消息的规范化字节序列
//!
//! 字符串消息直接使用UTF-8字节; 结构化消息序列化为紧凑的JSON: 分隔符为`,`和`:`, 无多余空白,
//! 对象的键保持插入顺序(不排序), 非ASCII字符转义为小写的`\uXXXX`(U+FFFF以上使用代理对).

use crate::error::FixtureError;
use crypto_hash::blake::BLAKE2b256;
use crypto_hash::{Digest, Output};
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::Value;
use std::fmt::{Display, Formatter as FmtFormatter};
use std::io::{self, Write};

#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Raw(Vec<u8>),
    Json(Value),
}

impl Message {
    pub fn raw<T: Into<Vec<u8>>>(msg: T) -> Self {
        Self::Raw(msg.into())
    }

    /// 解析JSON文本, 对象的键按出现的顺序保留
    pub fn from_json_str(s: &str) -> Result<Self, FixtureError> {
        Ok(Self::Json(serde_json::from_str(s)?))
    }

    /// 规范化的字节序列
    pub fn to_bytes(&self) -> Result<Vec<u8>, FixtureError> {
        match self {
            Self::Raw(b) => Ok(b.clone()),
            Self::Json(v) => to_canonical_json(v),
        }
    }

    /// 32字节的BLAKE2b摘要
    pub fn digest(&self) -> Result<Output<BLAKE2b256>, FixtureError> {
        Ok(BLAKE2b256::digest(self.to_bytes()?.as_slice()))
    }

    /// 用于嵌入测试脚本的文本形式
    pub fn to_text(&self) -> Result<String, FixtureError> {
        String::from_utf8(self.to_bytes()?)
            .map_err(|e| FixtureError::Message(format!("message is not valid UTF-8: {e}")))
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> std::fmt::Result {
        match self.to_bytes() {
            Ok(b) => f.write_str(String::from_utf8_lossy(b.as_slice()).as_ref()),
            Err(_) => f.write_str("<invalid message>"),
        }
    }
}

/// 紧凑且只包含ASCII字符的JSON
pub fn to_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, FixtureError> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut buf, AsciiFormatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            // 可打印ASCII字符原样输出, 0x7f及以上转义
            if c < '\u{7f}' {
                continue;
            }

            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for u in c.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", u)?;
            }
            start = i + c.len_utf8();
        }

        writer.write_all(&fragment.as_bytes()[start..])
    }

    // 整数按原文输出, 不受64位范围限制; 小数统一按f64输出
    fn write_number_str<W>(&mut self, writer: &mut W, value: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let digits = value.strip_prefix('-').unwrap_or(value);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return writer.write_all(value.as_bytes());
        }

        let v = value.parse::<f64>().map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("invalid number `{value}`: {e}"))
        })?;
        self.write_f64(writer, v)
    }
}
