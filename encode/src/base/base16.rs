use crate::{Decode, Encode, EncodeError};
use std::io::{Read, Write};

#[derive(Clone)]
pub struct Base16 {
    buf: Vec<u8>,
    table: &'static [u8; 16],
}

impl Base16 {
    pub fn new() -> Self {
        Self::with_capacity(128)
    }

    /// 指定读缓存大小, 最小128字节
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: vec![0; cap.max(128)],
            table: &Self::BASE16_STD,
        }
    }

    /// 编码输出使用小写字母, 解码不区分大小写
    pub fn lowercase(mut self, is_lower: bool) -> Self {
        self.table = if is_lower {
            &Self::BASE16_LOWER
        } else {
            &Self::BASE16_STD
        };
        self
    }
}

impl Default for Base16 {
    fn default() -> Self {
        Self::new()
    }
}

impl Base16 {
    const BASE16_STD: [u8; 16] = *b"0123456789ABCDEF";
    const BASE16_LOWER: [u8; 16] = *b"0123456789abcdef";

    fn nibble(code: u8) -> Result<u8, EncodeError> {
        match code {
            b'0'..=b'9' => Ok(code - b'0'),
            b'a'..=b'f' => Ok(10 + code - b'a'),
            b'A'..=b'F' => Ok(10 + code - b'A'),
            _ => Err(EncodeError::InvalidBaseCodeInDec(char::from(code))),
        }
    }
}

impl Encode for Base16 {
    fn encode<R: Read, W: Write>(
        &mut self,
        in_data: &mut R,
        out_data: &mut W,
    ) -> Result<(usize, usize), EncodeError> {
        let mut ilen = 0;

        loop {
            let l = in_data.read(self.buf.as_mut_slice())?;

            if l == 0 {
                break;
            }

            for &d in self.buf.iter().take(l) {
                let o = [
                    self.table[(d >> 4) as usize],
                    self.table[(d & 0xf) as usize],
                ];
                out_data.write_all(&o)?;
            }

            ilen += l;
        }

        out_data.flush()?;
        Ok((ilen, ilen << 1))
    }
}

impl Decode for Base16 {
    fn decode<R: Read, W: Write>(
        &mut self,
        in_data: &mut R,
        out_data: &mut W,
    ) -> Result<(usize, usize), EncodeError> {
        let (mut ilen, mut hi) = (0, 0u8);

        loop {
            let l = in_data.read(self.buf.as_mut_slice())?;

            if l == 0 {
                break;
            }

            for &d in self.buf.iter().take(l) {
                let x = Self::nibble(d)?;
                if ilen & 1 == 1 {
                    out_data.write_all(&[(hi << 4) | x])?;
                } else {
                    hi = x;
                }

                ilen += 1;
            }
        }

        if ilen & 1 != 0 {
            Err(EncodeError::InvalidLenInDec(ilen))
        } else {
            out_data.flush()?;
            Ok((ilen, ilen >> 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Base16;
    use crate::{Decode, Encode};

    const CASES: [([u8; 4], [u8; 8]); 3] = [
        ([0x9a, 0x3f, 0x46, 0x77], *b"9A3F4677"),
        ([0x33, 0x8f, 0xd0, 0x54], *b"338FD054"),
        ([0x4d, 0x43, 0x09, 0xda], *b"4D4309DA"),
    ];

    #[test]
    fn base16_encode() {
        let mut base16 = Base16::new();
        let mut buf = vec![];
        for (idx, (case, tgt)) in CASES.iter().enumerate() {
            buf.clear();
            let enc = base16.encode(&mut case.as_slice(), &mut buf).unwrap();
            assert_eq!(enc.0 << 1, enc.1, "case {idx} failed");
            assert_eq!(buf, tgt, "case {idx} failed");
        }
    }

    #[test]
    fn base16_lowercase() {
        let mut base16 = Base16::new().lowercase(true);
        let mut buf = vec![];
        base16.encode(&mut [0x00u8, 0xff].as_slice(), &mut buf).unwrap();
        assert_eq!(buf, b"00ff");

        buf.clear();
        base16.encode(&mut [0x9au8, 0x3f, 0x46, 0x77].as_slice(), &mut buf).unwrap();
        assert_eq!(buf, b"9a3f4677");

        buf.clear();
        base16.decode(&mut b"9a3F4677".as_slice(), &mut buf).unwrap();
        assert_eq!(buf, [0x9au8, 0x3f, 0x46, 0x77]);
    }

    #[test]
    fn base16_invalid() {
        let mut base16 = Base16::new();
        let mut buf = vec![];
        assert!(base16.decode(&mut b"abc".as_slice(), &mut buf).is_err());
        assert!(base16.decode(&mut b"zz".as_slice(), &mut buf).is_err());
    }

    #[test]
    fn base16_decode() {
        let mut base16 = Base16::new();
        let mut buf = vec![];
        for (idx, (tgt, case)) in CASES.iter().enumerate() {
            buf.clear();
            let enc = base16.decode(&mut case.as_slice(), &mut buf).unwrap();
            assert_eq!(enc.0, enc.1 << 1, "case {idx} failed");
            assert_eq!(buf, tgt, "case {idx} failed");
        }
    }
}
