//! RSA
//!
//! - 随机选择两个质数$p$和$q$($p\neq q$), 则模数$n=p*q$. 模数的字节长度$k$满足: $2^{((k-1)*8}\le n \lt 2^{k*8}$;
//! - 公钥指数$e$与$p-1$及$q-1$都互质;
//! - 私钥指数$d$满足: $d*e \equiv 1 \mod \lambda(n)$, 其中$\lambda(n)=lcm(p-1,q-1)$是Carmichael函数;
//!
//! 签名: $s = m^d \mod n$;
//!
//! 验证: $m = s^e \mod n$;
//!
//! 签名方案只实现PKCS #1 v1.5 (RFC 8017 8.2), 消息摘要的算法标识由`DigestInfo`给出.
//!

mod key;
pub use key::{PrivateKey, PublicKey};

mod digest_info;
pub use digest_info::DigestInfo;

mod pkcs1v15;
pub use pkcs1v15::{PKCS1v15Sign, PKCS1v15Verify};
