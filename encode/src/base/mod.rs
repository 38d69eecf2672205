//! 二进制数据的文本编码
//!
//! - base16: 十六进制, 可选大小写;
//! - base64: 标准或URL安全码表, 可选是否填充`=`;
//!

mod base16;
pub use base16::Base16;

mod base64;
pub use base64::Base64;
