/// 随机字节源. 每次调用都会推进内部状态, 不会回退.
pub trait Rand {
    fn rand(&mut self, random: &mut [u8]);

    /// 生成`len`字节的随机数
    fn bytes(&mut self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        self.rand(buf.as_mut_slice());
        buf
    }
}

impl<R: Rand + ?Sized> Rand for &mut R {
    fn rand(&mut self, random: &mut [u8]) {
        (**self).rand(random)
    }
}

mod default_rand;
pub use default_rand::DefaultRand;

mod seeded_rand;
pub use seeded_rand::SeededRand;
