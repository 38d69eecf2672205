use crate::{Decode, Encode, EncodeError};
use std::io::{Read, Write};

/// RFC 4648 Base64, 标准码表或URL安全码表.
///
/// 解码时接受有填充和无填充两种输入.
#[derive(Clone)]
pub struct Base64 {
    table: &'static [u8; 64],
    is_pad: bool,
}

impl Base64 {
    const BASE64_STD: [u8; 64] = *b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    const BASE64_URL: [u8; 64] = *b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    /// `is_std`使用标准码表, 还是URL版本码表
    pub fn new(is_std: bool) -> Self {
        let table = if is_std {
            &Self::BASE64_STD
        } else {
            &Self::BASE64_URL
        };

        Self {
            table,
            is_pad: true,
        }
    }

    /// 编码时是否在末尾填充`=`
    pub fn padding(mut self, is_pad: bool) -> Self {
        self.is_pad = is_pad;
        self
    }

    fn code_to_idx(&self, code: u8) -> Result<u8, EncodeError> {
        self.table
            .iter()
            .position(|&x| x == code)
            .map(|x| x as u8)
            .ok_or(EncodeError::InvalidBaseCodeInDec(char::from(code)))
    }

    fn quantum(&self, d: [u8; 3]) -> [u8; 4] {
        [
            self.table[(d[0] >> 2) as usize],
            self.table[(((d[0] & 0x3) << 4) | (d[1] >> 4)) as usize],
            self.table[(((d[1] & 0xf) << 2) | (d[2] >> 6)) as usize],
            self.table[(d[2] & 0x3f) as usize],
        ]
    }

    fn unquantum(c: [u8; 4]) -> [u8; 3] {
        [
            (c[0] << 2) | (c[1] >> 4),
            (c[1] << 4) | (c[2] >> 2),
            (c[2] << 6) | c[3],
        ]
    }
}

impl Encode for Base64 {
    fn encode<R: Read, W: Write>(
        &mut self,
        in_data: &mut R,
        out_data: &mut W,
    ) -> Result<(usize, usize), EncodeError> {
        let (mut buf, mut olen) = (Vec::with_capacity(1024), 0);
        let ilen = in_data.read_to_end(&mut buf)?;

        let mut itr = buf.chunks_exact(3);
        for d in &mut itr {
            out_data.write_all(&self.quantum([d[0], d[1], d[2]]))?;
            olen += 4;
        }

        let rem = itr.remainder();
        if !rem.is_empty() {
            let mut d = [0u8; 3];
            d[..rem.len()].copy_from_slice(rem);
            let mut x = self.quantum(d);

            // 剩1字节输出2个字符, 剩2字节输出3个字符
            let keep = rem.len() + 1;
            if self.is_pad {
                x[keep..].fill(b'=');
                out_data.write_all(&x)?;
                olen += 4;
            } else {
                out_data.write_all(&x[..keep])?;
                olen += keep;
            }
        }

        Ok((ilen, olen))
    }
}

impl Decode for Base64 {
    fn decode<R: Read, W: Write>(
        &mut self,
        in_data: &mut R,
        out_data: &mut W,
    ) -> Result<(usize, usize), EncodeError> {
        let (mut buf, mut olen) = (Vec::with_capacity(1024), 0);
        let ilen = in_data.read_to_end(&mut buf)?;

        if buf.is_empty() {
            return Ok((0, 0));
        }

        // 无填充的输入补齐`=`后按标准形式解码
        match buf.len() % 4 {
            0 => {}
            1 => return Err(EncodeError::InvalidLenInDec(buf.len())),
            r => buf.resize(buf.len() + 4 - r, b'='),
        }

        let (body, last) = buf.split_at(buf.len() - 4);
        for d in body.chunks_exact(4) {
            let mut c = [0u8; 4];
            for (a, &b) in c.iter_mut().zip(d) {
                *a = self.code_to_idx(b)?;
            }
            out_data.write_all(&Self::unquantum(c))?;
            olen += 3;
        }

        let pad = last.iter().rev().take_while(|&&x| x == b'=').count();
        if pad > 2 {
            return Err(EncodeError::InvalidPaddingInDec(pad));
        }

        let mut c = [0u8; 4];
        for (a, &b) in c.iter_mut().zip(&last[..(4 - pad)]) {
            *a = self.code_to_idx(b)?;
        }
        let n = 3 - pad;
        out_data.write_all(&Self::unquantum(c)[..n])?;
        olen += n;

        Ok((ilen, olen))
    }
}
