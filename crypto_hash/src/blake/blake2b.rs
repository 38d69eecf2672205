use crate::blake::Blake2bPara;
use crate::{Digest, HashError, HashOid, Output};
use std::io::Write;

/// 摘要长度可配置的BLAKE2b
#[derive(Clone, Debug)]
pub struct BLAKE2b {
    buf: Vec<u8>,
    h: [u64; 8],
    h_0: [u64; 8],
    digest_len: u8,
    // 已经处理的字节数
    data_len: u128,
    is_finalize: bool,
}

impl BLAKE2b {
    const ROUND: usize = 12;
    const BLOCK_BYTES: usize = 128;
    const MAX_DIGEST_BYTES: u8 = 64;

    const IV: [u64; 8] = [
        0x6a09e667f3bcc908,
        0xbb67ae8584caa73b,
        0x3c6ef372fe94f82b,
        0xa54ff53a5f1d36f1,
        0x510e527fade682d1,
        0x9b05688c2b3e6c1f,
        0x1f83d9abfb41bd6b,
        0x5be0cd19137e2179,
    ];

    const SIGMA: [[usize; 16]; 10] = [
        [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
        [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
        [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
        [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
        [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
        [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
        [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
        [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
        [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
        [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
    ];

    /// `digest_len`: 摘要字节长度, `0 < digest_len <= 64`
    pub fn new(digest_len: u8) -> Result<Self, HashError> {
        if digest_len == 0 || digest_len > Self::MAX_DIGEST_BYTES {
            return Err(HashError::InvalidDigestLen {
                max: Self::MAX_DIGEST_BYTES as usize,
                real: digest_len as usize,
            });
        }

        // h0 = IV ^ P
        let mut h = Blake2bPara::new().digest_len(digest_len).to_block();
        h.iter_mut().zip(Self::IV).for_each(|(a, b)| *a ^= b);

        Ok(Self {
            buf: Vec::with_capacity(Self::BLOCK_BYTES),
            h,
            h_0: h,
            digest_len,
            data_len: 0,
            is_finalize: false,
        })
    }

    pub fn digest_len(&self) -> usize {
        self.digest_len as usize
    }

    #[allow(clippy::too_many_arguments)]
    fn mix_g(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
        v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
        v[d] = (v[d] ^ v[a]).rotate_right(32);
        v[c] = v[c].wrapping_add(v[d]);
        v[b] = (v[b] ^ v[c]).rotate_right(24);
        v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
        v[d] = (v[d] ^ v[a]).rotate_right(16);
        v[c] = v[c].wrapping_add(v[d]);
        v[b] = (v[b] ^ v[c]).rotate_right(63);
    }

    // block.len() == BLOCK_BYTES, t是包括该块在内的已处理字节数
    fn compress(h: &mut [u64; 8], block: &[u8], t: u128, is_last: bool) {
        let mut m = [0u64; 16];
        block.chunks_exact(8).zip(m.iter_mut()).for_each(|(a, b)| {
            let mut word = [0u8; 8];
            word.copy_from_slice(a);
            *b = u64::from_le_bytes(word);
        });

        let mut v = [0u64; 16];
        v[..8].copy_from_slice(h);
        v[8..].copy_from_slice(&Self::IV);
        v[12] ^= t as u64;
        v[13] ^= (t >> 64) as u64;
        if is_last {
            v[14] = !v[14];
        }

        for i in 0..Self::ROUND {
            let s = &Self::SIGMA[i % 10];
            Self::mix_g(&mut v, 0, 4, 8, 12, m[s[0]], m[s[1]]);
            Self::mix_g(&mut v, 1, 5, 9, 13, m[s[2]], m[s[3]]);
            Self::mix_g(&mut v, 2, 6, 10, 14, m[s[4]], m[s[5]]);
            Self::mix_g(&mut v, 3, 7, 11, 15, m[s[6]], m[s[7]]);
            Self::mix_g(&mut v, 0, 5, 10, 15, m[s[8]], m[s[9]]);
            Self::mix_g(&mut v, 1, 6, 11, 12, m[s[10]], m[s[11]]);
            Self::mix_g(&mut v, 2, 7, 8, 13, m[s[12]], m[s[13]]);
            Self::mix_g(&mut v, 3, 4, 9, 14, m[s[14]], m[s[15]]);
        }

        for i in 0..8 {
            h[i] ^= v[i] ^ v[i + 8];
        }
    }

    /// 生成消息摘要, 在`reset`或再次写入数据之前重复调用得到相同的结果
    pub fn finalize(&mut self) -> Vec<u8> {
        if !self.is_finalize {
            // 最后一块即使为空也需要以结束标志压缩
            self.data_len += self.buf.len() as u128;
            self.buf.resize(Self::BLOCK_BYTES, 0);
            Self::compress(&mut self.h, self.buf.as_slice(), self.data_len, true);
            self.is_finalize = true;
        }

        self.h
            .iter()
            .flat_map(|x| x.to_le_bytes())
            .take(self.digest_len())
            .collect()
    }

    pub fn reset(&mut self) {
        self.buf.clear();
        self.h = self.h_0;
        self.data_len = 0;
        self.is_finalize = false;
    }
}

impl Write for BLAKE2b {
    fn write(&mut self, mut data: &[u8]) -> std::io::Result<usize> {
        if self.is_finalize {
            self.reset();
        }

        let len = data.len();
        while !data.is_empty() {
            // 缓存满且还有后续数据时才压缩, 保证最后一块留到finalize时处理
            if self.buf.len() == Self::BLOCK_BYTES {
                self.data_len += Self::BLOCK_BYTES as u128;
                Self::compress(&mut self.h, self.buf.as_slice(), self.data_len, false);
                self.buf.clear();
            }

            let l = (Self::BLOCK_BYTES - self.buf.len()).min(data.len());
            self.buf.extend_from_slice(&data[..l]);
            data = &data[l..];
        }

        Ok(len)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// 32字节摘要的BLAKE2b
#[derive(Clone, Debug)]
pub struct BLAKE2b256 {
    inner: BLAKE2b,
}

impl BLAKE2b256 {
    pub fn new() -> Self {
        Self {
            inner: BLAKE2b {
                buf: Vec::with_capacity(BLAKE2b::BLOCK_BYTES),
                h: Self::H_0,
                h_0: Self::H_0,
                digest_len: (Self::DIGEST_BITS >> 3) as u8,
                data_len: 0,
                is_finalize: false,
            },
        }
    }

    const H_0: [u64; 8] = {
        let mut h = BLAKE2b::IV;
        // 0x0101 << 16 | digest_len
        h[0] ^= 0x01010000 ^ ((Self::DIGEST_BITS >> 3) as u64);
        h
    };
}

impl Default for BLAKE2b256 {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for BLAKE2b256 {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl Digest for BLAKE2b256 {
    const DIGEST_BITS: usize = 256;

    fn digest(msg: &[u8]) -> Output<Self> {
        let mut b = Self::new();
        b.inner.write_all(msg).unwrap_or_default();
        b.finalize()
    }

    fn finalize(&mut self) -> Output<Self> {
        Output::from_vec(self.inner.finalize())
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}

impl HashOid for BLAKE2b256 {
    // blake2b: 1.3.6.1.4.1.1722.12.2.1, 最后一个弧为摘要字节长度
    const OID: &'static [u64] = &[1, 3, 6, 1, 4, 1, 1722, 12, 2, 1, 32];
}
