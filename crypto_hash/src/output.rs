use crate::Digest;
use std::{
    fmt::{Display, LowerHex},
    marker::PhantomData,
};

/// 消息摘要, 大端序字节串. 长度由生成它的哈希算法保证等于`Output::<T>::bytes()`.
#[derive(Clone, Debug)]
pub struct Output<T: ?Sized> {
    data: Vec<u8>,
    digest: PhantomData<T>,
}

impl<T: ?Sized> Output<T> {
    pub(crate) const fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data,
            digest: PhantomData,
        }
    }

    /// 字节长度
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.data.len()
    }
}

impl<T: Digest> Output<T> {
    /// 字节长度
    pub const fn bytes() -> usize {
        (T::DIGEST_BITS + 7) >> 3
    }
}

impl<T: ?Sized> AsRef<[u8]> for Output<T> {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl<T: ?Sized> From<Output<T>> for Vec<u8> {
    fn from(value: Output<T>) -> Self {
        value.data
    }
}

// PhantomData<T>不要求T: PartialEq, 手动实现
impl<T: ?Sized> PartialEq for Output<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: ?Sized> Eq for Output<T> {}

impl<T: ?Sized> PartialEq<Vec<u8>> for Output<T> {
    fn eq(&self, other: &Vec<u8>) -> bool {
        &self.data == other
    }
}

impl<T: ?Sized> LowerHex for Output<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }

        self.data.iter().try_for_each(|x| write!(f, "{:02x}", x))
    }
}

impl<T: ?Sized> Display for Output<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:x}", self)
    }
}
