//! 参考RFC 8017 3.1, 3.2节, 只支持两个素因子的密钥
use crate::{CipherError, Rand};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{Euclid, One};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use utils::BigUintExt;

#[derive(Clone, Debug, PartialOrd, PartialEq, Ord, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    // n = p * q
    n: BigUint,
    // public exponent, gcd(e, lambda(n)) = 1
    e: BigUint,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    pk: PublicKey,
    // d * e = 1 % lambda(n)
    d: BigUint,
    factor: Option<PrimeFactor>,
}

// n = p * q
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct PrimeFactor {
    p: BigUint,
    q: BigUint,
    // 预计算值, 加速私钥的计算
    pre: PrecomputedValues,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct PrecomputedValues {
    // $e \cdot d_p \equiv 1 \mod (p-1)$
    // d % (p - 1)
    d_p: BigUint,
    // $e \cdot d_q \equiv 1 \mod (q-1)$
    // d % (q - 1)
    d_q: BigUint,
    // $q \cdot q_inv \equiv 1 \mod p$
    // q^{-1} % p
    q_inv: BigUint,
}

impl PublicKey {
    /// n: RSA modulus
    /// e: public key exponent
    pub fn new(n: BigUint, e: BigUint) -> Result<Self, CipherError> {
        let key = Self::new_uncheck(n, e);
        key.is_valid()?;
        Ok(key)
    }

    /// note: not to check the `n` and `exp` are right RSA parameters
    pub fn new_uncheck(n: BigUint, exp: BigUint) -> Self {
        Self { e: exp, n }
    }

    /// n
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// e
    pub fn exponent(&self) -> &BigUint {
        &self.e
    }

    /// 模数的位长度
    pub fn bits(&self) -> usize {
        self.n.bits() as usize
    }

    /// 模数的字节长度k
    pub fn key_len(&self) -> usize {
        (self.bits() + 7) >> 3
    }

    /// RSAVP1: $s^e \mod n, s \lt n$
    pub fn rsavp(&self, s: &BigUint) -> Result<BigUint, CipherError> {
        if s < &self.n {
            Ok(s.modpow(&self.e, &self.n))
        } else {
            Err(CipherError::ValidateFailed(
                "rsavp: signature representative out of range".to_string(),
            ))
        }
    }

    pub fn is_valid(&self) -> Result<(), CipherError> {
        if self.n.is_even() || self.n.bits() < 2 {
            Err(CipherError::InvalidPublicKey(format!(
                "rsa: modulus {:#x} must be an odd number greater than 1",
                self.n
            )))
        } else if self.e < BigUint::from(3u8) || self.e.is_even() {
            Err(CipherError::InvalidPublicKey(format!(
                "rsa: public exponent {:#x} must be an odd number at least 3",
                self.e
            )))
        } else if self.e >= self.n {
            Err(CipherError::InvalidPublicKey(format!(
                "rsa: public exponent {:#x} is too large",
                self.e
            )))
        } else {
            Ok(())
        }
    }
}

impl PrivateKey {
    /// `generate_key`默认最多尝试通过素性测试的候选素数的个数
    pub const MAX_PRIME_CANDIDATES: usize = 256;

    /// 不带素因子的私钥, 私钥运算直接使用`d`
    pub fn new_uncheck(modulus: BigUint, public_exp: BigUint, private_exp: BigUint) -> Self {
        Self {
            pk: PublicKey::new_uncheck(modulus, public_exp),
            d: private_exp,
            factor: None,
        }
    }

    /// 由`e, d, p, q`构造私钥, `n = p * q`, 并检查各分量是否一致
    pub fn from_components(
        e: BigUint,
        d: BigUint,
        p: BigUint,
        q: BigUint,
    ) -> Result<Self, CipherError> {
        let one = BigUint::one();
        if p <= one || q <= one {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: invalid prime value".to_string(),
            ));
        }

        let n = &p * &q;
        let pre = PrecomputedValues::new(&p, &q, &d)?;
        let key = Self {
            pk: PublicKey::new_uncheck(n, e),
            d,
            factor: Some(PrimeFactor { p, q, pre }),
        };

        key.is_valid()?;
        Ok(key)
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.pk
    }

    /// d
    pub fn exponent(&self) -> &BigUint {
        &self.d
    }

    /// `(p, q)`
    pub fn primes(&self) -> Option<(&BigUint, &BigUint)> {
        self.factor.as_ref().map(|f| (&f.p, &f.q))
    }

    /// RSASP1: RSA signature primitive
    pub fn rsasp(&self, m: &BigUint) -> Result<BigUint, CipherError> {
        if m < &self.pk.n {
            Ok(self.rsasp_uncheck(m))
        } else {
            Err(CipherError::Encoding(format!(
                "rsasp: message representative {:#x} out of range",
                m
            )))
        }
    }

    // m1 = c^{dp} % p, m2 = c^{dq} % q
    // h = (m1 - m2) * qinv % p
    // s = m2 + q * h
    fn rsasp_uncheck(&self, m: &BigUint) -> BigUint {
        match self.factor.as_ref() {
            Some(factor) => {
                let (m1, m2) = (
                    BigInt::from(m.modpow(&factor.pre.d_p, &factor.p)),
                    m.modpow(&factor.pre.d_q, &factor.q),
                );
                let mut h = m1 - BigInt::from(m2.clone());
                h *= BigInt::from(factor.pre.q_inv.clone());
                let h = h
                    .rem_euclid(&BigInt::from(factor.p.clone()))
                    .magnitude()
                    .clone();
                m2 + &factor.q * h
            }
            None => m.modpow(&self.d, &self.pk.n),
        }
    }

    pub fn is_valid(&self) -> Result<(), CipherError> {
        self.pk.is_valid()?;

        let factor = self
            .factor
            .as_ref()
            .ok_or(CipherError::Other("rsa: factor doesn't exist".to_string()))?;

        if &factor.p * &factor.q != self.pk.n {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: invalid modulus".to_string(),
            ));
        }

        // d*e
        let de = &self.d * &self.pk.e;
        for prime in [&factor.p, &factor.q] {
            let pm1 = prime - 1u8;
            if !(&de % pm1).is_one() {
                return Err(CipherError::InvalidPrivateKey(
                    "rsa: invalid exponent".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// 生成位长度为`bits_len`, 公钥指数为`e`的密钥.
    ///
    /// - `bits_len`是不小于256的偶数, `e`是不小于3的奇数, 且`e`的位长度小于`bits_len / 2`;
    /// - 两个素数都是`bits_len / 2`位且最高两位为1, 所以`n`恰好是`bits_len`位;
    /// - 只接受满足$gcd(p-1, e) = 1$的素数, 于是$e$模$\lambda(n)$可逆;
    /// - $d = e^{-1} \mod \lambda(n)$, 且要求$d \gt 2^{bits\_len/2}$;
    ///
    /// `prime_test_rounds`(n) means the number of test rounds, for any odd number that great than 2 and positive integer n, the probability of error
    /// in MillerRabinPrimeTest is at most $2^{-n}$.
    ///
    /// 所有随机数都取自`rd`, 相同状态的`rd`生成相同的密钥.
    pub fn generate_key<R: Rand>(
        bits_len: usize,
        e: &BigUint,
        prime_test_rounds: usize,
        rd: &mut R,
    ) -> Result<PrivateKey, CipherError> {
        Self::generate_key_with_budget(bits_len, e, prime_test_rounds, Self::MAX_PRIME_CANDIDATES, rd)
    }

    /// 同`generate_key`, 最多使用`max_candidates`个候选素数, 用完则返回`InvalidParameter`.
    pub fn generate_key_with_budget<R: Rand>(
        bits_len: usize,
        e: &BigUint,
        prime_test_rounds: usize,
        max_candidates: usize,
        rd: &mut R,
    ) -> Result<PrivateKey, CipherError> {
        if bits_len < 256 || bits_len & 1 != 0 {
            return Err(CipherError::InvalidParameter(format!(
                "rsa: key size `{bits_len}` must be an even number at least 256"
            )));
        }

        if e < &BigUint::from(3u8) || e.is_even() {
            return Err(CipherError::InvalidParameter(format!(
                "rsa: public exponent `{e}` must be an odd number at least 3"
            )));
        }

        let half = bits_len >> 1;
        if e.bits() as usize >= half {
            return Err(CipherError::InvalidParameter(format!(
                "rsa: public exponent `{e}` is too large for {bits_len}-bit key"
            )));
        }

        let (mut budget, lower) = (max_candidates, BigUint::one() << half);
        let (p, q, d) = 'next_set_of_primes: loop {
            let p = Self::next_prime(half, e, prime_test_rounds, rd, &mut budget)?;
            let q = loop {
                let q = Self::next_prime(half, e, prime_test_rounds, rd, &mut budget)?;
                if q != p {
                    break q;
                }
            };

            let n = &p * &q;
            if n.bits() as usize != bits_len {
                continue 'next_set_of_primes;
            }

            let lambda = (&p - 1u8).lcm(&(&q - 1u8));
            match BigUintExt(e).modinv(&lambda) {
                Some(d) if d > lower => break (p, q, d),
                _ => continue 'next_set_of_primes,
            }
        };

        // p > q 与常见的密钥格式保持一致
        let (p, q) = if p > q { (p, q) } else { (q, p) };
        Self::from_components(e.clone(), d, p, q)
    }

    // 下一个满足gcd(p-1, e) = 1的素数, 消耗候选预算
    fn next_prime<R: Rand>(
        bits_len: usize,
        e: &BigUint,
        prime_test_rounds: usize,
        rd: &mut R,
        budget: &mut usize,
    ) -> Result<BigUint, CipherError> {
        loop {
            if *budget == 0 {
                return Err(CipherError::InvalidParameter(format!(
                    "rsa: no valid {}-bit key for public exponent `{e}`, prime candidates exhausted",
                    bits_len << 1
                )));
            }
            *budget -= 1;

            let prime = BigUintExt::<BigUint>::generate_prime(bits_len, prime_test_rounds, rd)
                .map_err(CipherError::Other)?;
            if (&prime - 1u8).gcd(e).is_one() {
                return Ok(prime);
            }
        }
    }
}

impl PrecomputedValues {
    fn new(p: &BigUint, q: &BigUint, d: &BigUint) -> Result<Self, CipherError> {
        let one = BigUint::one();
        let q_inv = BigUintExt(q).modinv(p).ok_or(CipherError::InvalidPrivateKey(
            "rsa: p and q are not coprime".to_string(),
        ))?;

        Ok(Self {
            d_p: d % (p - &one),
            d_q: d % (q - &one),
            q_inv,
        })
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{n={:#x}, e={:#x}}}", self.n, self.e)
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.factor.as_ref() {
            Some(factor) => {
                write!(
                    f,
                    "{{pk: {}, d: {:#x}, factor: {{p: {:#x}, q: {:#x}}}}}",
                    self.pk, self.d, factor.p, factor.q
                )
            }
            None => {
                write!(f, "{{pk: {}, d: {:#x}, factor: []}}", self.pk, self.d)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::rsa::key::PrivateKey;
    use crate::{CipherError, SeededRand};
    use num_bigint::BigUint;
    use num_integer::Integer;
    use num_traits::{Num, One};

    fn keygen(bits_len: usize, e: u32, seed: u64) -> PrivateKey {
        let mut rng = SeededRand::new(seed);
        let e = BigUint::from(e);
        let key = PrivateKey::generate_key(bits_len, &e, 19, &mut rng).unwrap();
        key_basics(&key);

        assert_eq!(key.public_key().bits(), bits_len, "the modulus bits len is wrong");
        assert_eq!(key.public_key().exponent(), &e);

        let (p, q) = key.primes().unwrap();
        let lambda = (p - 1u8).lcm(&(q - 1u8));
        assert!(lambda.gcd(&e).is_one(), "e is not invertible modulo lambda(n)");
        assert!((key.exponent() * &e % &lambda).is_one());
        assert!(key.exponent() > &(BigUint::one() << (bits_len / 2)));
        key
    }

    fn key_basics(key: &PrivateKey) {
        key.is_valid().unwrap();
        let m = BigUint::from(42u32);
        let s = key.rsasp(&m).unwrap();
        let m2 = key.public_key().rsavp(&s).unwrap();
        assert_eq!(m, m2, "signature representative not recovered");

        let plain = PrivateKey::new_uncheck(
            key.public_key().modulus().clone(),
            key.public_key().exponent().clone(),
            key.exponent().clone(),
        );
        assert_eq!(plain.rsasp(&m).unwrap(), s, "crt result != d result");
    }

    #[test]
    fn rsa_keygen_1024() {
        keygen(1024, 65537, 256);
        keygen(1024, 5, 256);
    }

    #[test]
    fn rsa_keygen_2048() {
        keygen(2048, 65537, 256);
        keygen(2048, 5, 256);
    }

    #[test]
    #[ignore = "slow"]
    fn rsa_keygen_large() {
        for bits in [3072, 4096] {
            for e in [5, 65537] {
                keygen(bits, e, 256);
            }
        }
    }

    #[test]
    fn keygen_is_deterministic() {
        let (a, b) = (keygen(1024, 65537, 256), keygen(1024, 65537, 256));
        assert_eq!(a, b);

        let c = keygen(1024, 65537, 257);
        assert_ne!(a.public_key(), c.public_key());
    }

    #[test]
    fn keygen_invalid_parameter() {
        let mut rng = SeededRand::new(256);
        let cases = [(1024usize, 4u32), (1024, 1), (1023, 65537), (128, 3)];
        for (bits, e) in cases {
            let res = PrivateKey::generate_key(bits, &BigUint::from(e), 19, &mut rng);
            assert!(
                matches!(res, Err(CipherError::InvalidParameter(_))),
                "bits: {bits}, e: {e}"
            );
        }

        // e占用的位数不小于素数的位数
        let e = (BigUint::one() << 200u32) + 1u8;
        assert!(matches!(
            PrivateKey::generate_key(256, &e, 19, &mut rng),
            Err(CipherError::InvalidParameter(_))
        ));
    }

    #[test]
    fn keygen_budget_exhausted() {
        let e = BigUint::from(65537u32);
        // p和q至少需要两个候选素数
        for budget in [0usize, 1] {
            let mut rng = SeededRand::new(256);
            assert!(
                matches!(
                    PrivateKey::generate_key_with_budget(512, &e, 19, budget, &mut rng),
                    Err(CipherError::InvalidParameter(_))
                ),
                "budget: {budget}"
            );
        }

        let mut rng = SeededRand::new(256);
        let key = PrivateKey::generate_key_with_budget(512, &e, 19, 64, &mut rng).unwrap();
        assert_eq!(key.public_key().bits(), 512);
        key.is_valid().unwrap();
    }

    #[test]
    fn gnu_tls_key() {
        let n = BigUint::from_str_radix("290684273230919398108010081414538931343", 10).unwrap();
        let e = BigUint::from(65537u32);
        let d = BigUint::from_str_radix("31877380284581499213530787347443987241", 10).unwrap();
        let (p, q) = (
            BigUint::from_str_radix("16775196964030542637", 10).unwrap(),
            BigUint::from_str_radix("17328218193455850539", 10).unwrap(),
        );

        let key = PrivateKey::from_components(e.clone(), d, p, q).unwrap();
        assert_eq!(&e, key.public_key().exponent());
        assert_eq!(&n, key.public_key().modulus());

        key_basics(&key);
    }

    #[test]
    fn inconsistent_components() {
        let e = BigUint::from(65537u32);
        let d = BigUint::from_str_radix("31877380284581499213530787347443987243", 10).unwrap();
        let (p, q) = (
            BigUint::from_str_radix("16775196964030542637", 10).unwrap(),
            BigUint::from_str_radix("17328218193455850539", 10).unwrap(),
        );
        assert!(PrivateKey::from_components(e, d, p, q).is_err());
    }

    #[test]
    fn key_serde() {
        let key = keygen(512, 65537, 7);
        let s = serde_json::to_string(&key).unwrap();
        let key2: PrivateKey = serde_json::from_str(&s).unwrap();
        assert_eq!(key, key2);
    }
}
