//! ASN.1 DER编码的`DigestInfo`, RFC 8017 9.2节
//!
//! ```txt
//! DigestInfo ::= SEQUENCE {
//!     digestAlgorithm AlgorithmIdentifier,
//!     digest OCTET STRING
//! }
//! ```
//!
//! 摘要长度固定时, 除摘要外的字节都是常量, 这里预先编码为前缀.

use crypto_hash::{Digest, HashOid, Output};

const TAG_SEQUENCE: u8 = 0x30;
const TAG_OID: u8 = 0x06;
const TAG_NULL: u8 = 0x05;
const TAG_OCTET_STRING: u8 = 0x04;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigestInfo {
    prefix: Vec<u8>,
    digest_len: usize,
}

impl DigestInfo {
    /// 哈希算法`H`对应的`DigestInfo`, 算法参数为NULL
    pub fn of<H: Digest + HashOid>() -> Self {
        Self::new(H::OID, Output::<H>::bytes())
    }

    /// `oid`至少包含两个弧
    pub fn new(oid: &[u64], digest_len: usize) -> Self {
        let mut oid_der = vec![TAG_OID];
        push_len(&mut oid_der, 0);
        match oid {
            [a0, a1, arcs @ ..] => {
                push_arc(&mut oid_der, a0 * 40 + a1);
                arcs.iter().for_each(|&a| push_arc(&mut oid_der, a));
            }
            [a0] => push_arc(&mut oid_der, a0 * 40),
            [] => {}
        }
        oid_der[1] = (oid_der.len() - 2) as u8;

        let mut alg_id = oid_der;
        alg_id.extend([TAG_NULL, 0x00]);

        let mut body = vec![TAG_SEQUENCE];
        push_len(&mut body, alg_id.len());
        body.extend(alg_id);
        body.push(TAG_OCTET_STRING);
        push_len(&mut body, digest_len);

        let mut prefix = vec![TAG_SEQUENCE];
        push_len(&mut prefix, body.len() + digest_len);
        prefix.extend(body);

        Self { prefix, digest_len }
    }

    /// 摘要之前的固定字节
    pub fn prefix(&self) -> &[u8] {
        self.prefix.as_slice()
    }

    pub fn digest_len(&self) -> usize {
        self.digest_len
    }

    /// tLen
    pub fn encoded_len(&self) -> usize {
        self.prefix.len() + self.digest_len
    }

    /// T = prefix || digest
    pub fn encode(&self, digest: &[u8]) -> Vec<u8> {
        let mut t = Vec::with_capacity(self.prefix.len() + digest.len());
        t.extend_from_slice(self.prefix());
        t.extend_from_slice(digest);
        t
    }
}

// base-128, 除最后一个字节外最高位置1
fn push_arc(buf: &mut Vec<u8>, mut arc: u64) {
    let mut tmp = vec![(arc & 0x7f) as u8];
    arc >>= 7;
    while arc > 0 {
        tmp.push(((arc & 0x7f) as u8) | 0x80);
        arc >>= 7;
    }
    buf.extend(tmp.into_iter().rev());
}

// 短格式或长格式长度
fn push_len(buf: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        buf.push(len as u8);
    } else {
        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|&&x| x == 0).count();
        buf.push(0x80 | (bytes.len() - skip) as u8);
        buf.extend_from_slice(&bytes[skip..]);
    }
}
