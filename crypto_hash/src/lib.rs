use std::io::Write;

mod output;
pub use output::Output;

mod error;
pub use error::HashError;

pub mod blake;

/// 固定摘要长度的哈希算法.
///
/// 一次性计算用`Digest::digest(msg)`; 流式计算先通过`Write`写入数据, 再调用`finalize`.
pub trait Digest: Write {
    /// 摘要位长度
    const DIGEST_BITS: usize;

    fn digest(msg: &[u8]) -> Output<Self>;

    /// 多次调用返回相同的摘要, 之后再写入数据则从初始状态开始
    fn finalize(&mut self) -> Output<Self>;

    /// 重置哈希算法到初始化状态
    fn reset(&mut self);
}

/// 哈希算法的ASN.1对象标识符, 用于PKCS #1 v1.5签名中的`DigestInfo`
pub trait HashOid {
    /// OID的各个弧, 如`[1, 3, 6, 1, ...]`
    const OID: &'static [u64];
}
