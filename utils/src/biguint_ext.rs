use crate::BigIntExt;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive, Zero};
use rand::Rand;
use std::borrow::Borrow;
use std::ops::Deref;

pub struct BigUintExt<T: Borrow<BigUint>>(pub T);

impl<T: Borrow<BigUint>> Deref for BigUintExt<T> {
    type Target = BigUint;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

const SMALL_PRIMES: [u32; 16] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

// 3 * 5 * ... * 53
const SMALL_PRIMES_PRODUCT: u64 = 16294579238595022365;

impl<T: Borrow<BigUint>> BigUintExt<T> {
    /// self * inv = 1 mod modulus
    pub fn modinv(&self, modulus: &BigUint) -> Option<BigUint> {
        BigIntExt(BigInt::from(self.deref().clone()))
            .modinv(&BigInt::from(modulus.clone()))
            .and_then(|x| x.to_biguint())
    }

    /// 生成[0, self)之间的均匀随机数, self为0时返回0
    pub fn gen_random<R: Rand>(&self, rng: &mut R) -> BigUint {
        if self.is_zero() {
            return BigUint::zero();
        }

        let bits = self.bits();
        let mut buf = vec![0u8; ((bits + 7) >> 3) as usize];
        loop {
            rng.rand(buf.as_mut_slice());
            if bits & 7 != 0 {
                if let Some(x) = buf.last_mut() {
                    *x &= (1u8 << (bits & 7)) - 1;
                }
            }

            let r = BigUint::from_bytes_le(buf.as_slice());
            if &r < self.deref() {
                return r;
            }
        }
    }

    /// Baillie-PSW概率素性测试: 小素数试除, `test_rounds + 1`轮随机基的Miller-Rabin测试, 以及Lucas测试.
    ///
    /// 对于任意大于2的奇合数, 单轮Miller-Rabin测试出错的概率至多为$\frac{1}{4}$.
    pub fn probably_prime_test<R: Rand>(&self, test_rounds: usize, rng: &mut R) -> bool {
        let n = self.deref();
        if n < &BigUint::from(2u8) {
            return false;
        }

        for &p in SMALL_PRIMES.iter() {
            if n == &BigUint::from(p) {
                return true;
            }

            if (n % p).is_zero() {
                return false;
            }
        }

        self.miller_rabin(test_rounds + 1, rng) && self.lucas()
    }

    // self是大于53的奇数
    fn miller_rabin<R: Rand>(&self, rounds: usize, rng: &mut R) -> bool {
        let n = self.deref();
        let n_m1 = n - 1u32;
        let s = n_m1.trailing_zeros().unwrap_or(0);
        let r = &n_m1 >> s;
        let n_m3 = BigUintExt(n - 3u32);

        'witness: for _ in 0..rounds {
            // a in [2, n-2]
            let a = n_m3.gen_random(rng) + 2u32;
            let mut y = a.modpow(&r, n);
            if y.is_one() || y == n_m1 {
                continue;
            }

            for _ in 1..s {
                y = &y * &y % n;
                if y == n_m1 {
                    continue 'witness;
                } else if y.is_one() {
                    return false;
                }
            }

            return false;
        }

        true
    }

    /// "almost extra strong" Lucas概率素性测试, 使用Baillie-OEIS的参数选择方法(method C):
    /// 从$P=3$开始递增, 直到$Jacobi(P^2-4, n) = -1$, 此时$Q=1$.
    ///
    /// 参考: Baillie and Wagstaff, "Lucas Pseudoprimes"; Grantham, "Frobenius Pseudoprimes";
    /// OEIS A217719.
    ///
    /// note: self是大于53的奇数
    fn lucas(&self) -> bool {
        let n = self.deref();
        let n_int = BigInt::from(n.clone());

        let mut p = 3u32;
        loop {
            if p > 10000 {
                return false;
            }

            match BigIntExt(BigInt::from(p * p - 4)).jacobi(&n_int) {
                Some(-1) => break,
                // p^2-4 = (p-2)(p+2)与n有公因子, 且只可能是p+2
                Some(0) => return n == &BigUint::from(p + 2),
                None => return false,
                _ => {}
            }

            // 平方数永远找不到Jacobi为-1的D
            if p == 40 && &n.sqrt().pow(2u32) == n {
                return false;
            }

            p += 1;
        }

        // n + 1 = 2^r * s
        let mut s = n + 1u32;
        let r = s.trailing_zeros().unwrap_or(0);
        s >>= r;

        // V(0) = 2, V(1) = P
        // V(2k) = V(k)^2 - 2
        // V(2k+1) = V(k)V(k+1) - P
        let (pb, nm2) = (BigUint::from(p), n - 2u32);
        let (mut vk, mut vk1) = (BigUint::from(2u32), pb.clone());
        for i in (0..s.bits()).rev() {
            let t = (&vk * &vk1 + n - &pb) % n;
            if s.bit(i) {
                vk = t;
                vk1 = (&vk1 * &vk1 + &nm2) % n;
            } else {
                vk1 = t;
                vk = (&vk * &vk + &nm2) % n;
            }
        }

        // V(s) = ±2 且 U(s) = 0, 其中 U(s) = 0 等价于 P*V(s) = 2*V(s+1) mod n
        if vk == BigUint::from(2u32) || vk == nm2 {
            let (lhs, rhs) = (&vk * &pb % n, (&vk1 << 1u32) % n);
            if lhs == rhs {
                return true;
            }
        }

        // V(2^t * s) = 0, 0 <= t < r-1
        for _ in 0..r.saturating_sub(1) {
            if vk.is_zero() {
                return true;
            } else if vk == BigUint::from(2u32) {
                return false;
            }
            vk = (&vk * &vk + &nm2) % n;
        }

        false
    }

    /// 生成位长度为`bits_len`的素数, 其最高两位总是1, 所以两个这样的素数的乘积的位长度恰好是`2 * bits_len`.
    ///
    /// `test_rounds`: Miller-Rabin测试的轮数.
    pub fn generate_prime<R: Rand>(
        bits_len: usize,
        test_rounds: usize,
        rng: &mut R,
    ) -> Result<BigUint, String> {
        if bits_len < 2 {
            return Err("prime size must at least 2-bits".to_string());
        }

        let (bits, mask) = (
            bits_len as u64,
            (BigUint::one() << bits_len) - 1u32,
        );

        loop {
            let mut n = BigUint::from_bytes_le(rng.bytes((bits_len + 7) >> 3).as_slice()) & &mask;
            n.set_bit(bits - 1, true);
            n.set_bit(bits - 2, true);
            n.set_bit(0, true);

            // 跳过能被小素数整除的候选值, 加上的偏移不会影响之后的素性测试
            let base = (&n % SMALL_PRIMES_PRODUCT).to_u64().unwrap_or_default();
            let delta = (0u64..(1 << 20)).step_by(2).find(|delta| {
                let m = base + delta;
                SMALL_PRIMES
                    .iter()
                    .skip(1)
                    .all(|&p| m % p as u64 != 0 || (bits_len <= 6 && m == p as u64))
            });

            if let Some(delta) = delta {
                n += delta;
            }

            if n.bits() == bits && BigUintExt(&n).probably_prime_test(test_rounds, rng) {
                return Ok(n);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::BigUintExt;
    use num_bigint::BigUint;
    use num_traits::Num;
    use rand::{DefaultRand, SeededRand};

    #[test]
    fn gen_small_prime() {
        let mut rng = DefaultRand::default();
        for bits_len in 2..10 {
            let p = BigUintExt::<BigUint>::generate_prime(bits_len, 19, &mut rng).unwrap();
            assert_eq!(p.bits() as usize, bits_len);
            assert!(BigUintExt(p).probably_prime_test(31, &mut rng));
        }
    }

    #[test]
    fn gen_prime_is_reproducible() {
        let (mut a, mut b) = (SeededRand::new(256), SeededRand::new(256));
        let p = BigUintExt::<BigUint>::generate_prime(256, 19, &mut a).unwrap();
        let q = BigUintExt::<BigUint>::generate_prime(256, 19, &mut b).unwrap();
        assert_eq!(p, q);
        assert_eq!(p.bits(), 256);
        assert!(p.bit(254), "second highest bit not set");
    }

    #[test]
    fn random_below_bound() {
        let (mut rng, bound) = (SeededRand::new(7), BigUint::from(1000u32));
        for _ in 0..200 {
            assert!(BigUintExt(&bound).gen_random(&mut rng) < bound);
        }
    }

    #[test]
    fn mod_inv() {
        let (a, m) = (BigUint::from(65537u32), BigUint::from(3120u32 * 7));
        let inv = BigUintExt(&a).modinv(&m).unwrap();
        assert_eq!((a * inv) % m, BigUint::from(1u8));
        assert!(BigUintExt(BigUint::from(5u8)).modinv(&BigUint::from(20u8)).is_none());
    }

    #[test]
    fn composite_validate() {
        let cases = [
            "0",
            "1",
            "21284175091214687912771199898307297748211672914763848041968395774954376176754",
            "6084766654921918907427900243509372380954290099172559290432744450051395395951",
            "84594350493221918389213352992032324280367711247940675652888030554255915464401",
            "82793403787388584738507275144194252681",
            // strong pseudoprime to prime bases 2 through 29
            "1195068768795265792518361315725116351898245581",
            // extra strong Lucas pseudoprimes, https://oeis.org/A217719
            "989",
            "3239",
            "5777",
            "10877",
            "27971",
            "29681",
            "30739",
            "31631",
            "39059",
            "72389",
            "73919",
            "75077",
            "100127",
            "113573",
            "125249",
            "137549",
            "137801",
            "153931",
            "155819",
            "161027",
            "162133",
            "189419",
            "218321",
            "231703",
            "249331",
            "370229",
            "429479",
            "430127",
            "459191",
            "473891",
            "480689",
            "600059",
            "621781",
            "632249",
            "635627",
            "3673744903",
            "3281593591",
            "2385076987",
            "2738053141",
            "2009621503",
            "1502682721",
            "255866131",
            "117987841",
            "587861",
            "6368689",
            "8725753",
            "80579735209",
            "105919633",
        ];

        let mut rng = SeededRand::new(1);
        for s in cases {
            let composite = BigUint::from_str_radix(s, 10).unwrap();
            assert!(
                !BigUintExt(composite).probably_prime_test(10, &mut rng),
                "composite `{s}` test failed"
            );
        }
    }

    #[test]
    fn prime_validate() {
        let cases = [
            "2",
            "3",
            "5",
            "7",
            "11",
            "59",
            "13756265695458089029",
            "13496181268022124907",
            "10953742525620032441",
            "17908251027575790097",
            "18699199384836356663",
            "98920366548084643601728869055592650835572950932266967461790948584315647051443",
            "94560208308847015747498523884063394671606671904944666360068158221458669711639",
            // Curve25519: 2^255-19
            "57896044618658097711785492504343953926634992332820282019728792003956564819949",
            // E-521: 2^521-1
            "6864797660130609714981900799081393217269435300143305409394463459185543183397656052122559640661454554977296311391480858037121987999716643812574028291115057151",
        ];

        let mut rng = SeededRand::new(2);
        for s in cases {
            let prime = BigUint::from_str_radix(s, 10).unwrap();
            assert!(
                BigUintExt(prime).probably_prime_test(10, &mut rng),
                "prime `{s}` test failed"
            );
        }
    }
}
