//! # BLAKE哈希函数
//!
//! ## BLAKE2b哈希函数
//!
//! - 参考资料:
//!   - [BLAKE2](https://www.blake2.net/)
//!   - [BLAKE2: simpler, smaller, fast as MD5](https://www.blake2.net/blake2.pdf)
//!   - [RFC7693: The BLAKE2 Cryptographic Hash and Message Authentication Code](https://www.rfc-editor.org/rfc/pdfrfc/rfc7693.txt.pdf)
//! - blake2b适用于64-bit平台, 摘要长度`1..=64`字节可配置. 摘要长度写入参数块参与初始化,
//!   所以BLAKE2b-256不是BLAKE2b-512的截断.
//!

/// BLAKE2b参数块(顺序模式, 无密钥)
pub struct Blake2bPara {
    block: [u8; 64],
}

impl Blake2bPara {
    pub const fn new() -> Self {
        Self { block: [0u8; 64] }.fanout(1).depth(1)
    }

    pub const fn digest_len(mut self, len: u8) -> Self {
        self.block[0] = len;
        self
    }

    /// 0: unlimited, 1: sequential mode
    pub const fn fanout(mut self, fanout: u8) -> Self {
        self.block[2] = fanout;
        self
    }

    /// 255: unlimited, 1: sequential mode
    pub const fn depth(mut self, depth: u8) -> Self {
        self.block[3] = depth;
        self
    }

    pub fn to_block(&self) -> [u64; 8] {
        let mut block = [0u64; 8];
        self.block
            .chunks_exact(8)
            .zip(block.iter_mut())
            .for_each(|(a, b)| {
                let mut word = [0u8; 8];
                word.copy_from_slice(a);
                *b = u64::from_le_bytes(word);
            });
        block
    }
}

impl Default for Blake2bPara {
    fn default() -> Self {
        Self::new()
    }
}

mod blake2b;
pub use blake2b::{BLAKE2b, BLAKE2b256};
