use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Euclid, One, Signed, Zero};
use std::borrow::Borrow;
use std::ops::Deref;

pub struct BigIntExt<T: Borrow<BigInt>>(pub T);

impl<T: Borrow<BigInt>> Deref for BigIntExt<T> {
    type Target = BigInt;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

// 最低64位
fn low_u64(x: &BigInt) -> u64 {
    x.iter_u64_digits().next().unwrap_or(0)
}

impl<T: Borrow<BigInt>> BigIntExt<T> {
    /// 扩展欧几里得算法: 若`gcd(self, modulus) = 1`, 则`self * inv = 1 mod |modulus|`
    pub fn modinv(&self, modulus: &BigInt) -> Option<BigInt> {
        let n = modulus.abs();
        if n.is_zero() {
            return None;
        }

        let g = self.rem_euclid(&n).extended_gcd(&n);
        g.gcd.is_one().then(|| g.x.rem_euclid(&n))
    }

    /// Jacobi符号$(\frac{self}{n})$, `n`需要是正奇数, 否则返回None
    pub fn jacobi(&self, n: &BigInt) -> Option<i8> {
        if !n.is_positive() || n.is_even() {
            return None;
        }

        let (mut a, mut n) = (self.rem_euclid(n), n.clone());
        let mut j = 1i8;

        while !a.is_zero() {
            let s = a.trailing_zeros().unwrap_or(0);
            a >>= s;

            // (2/n) = -1 当且仅当 n = 3,5 mod 8
            let n8 = low_u64(&n) & 7;
            if s & 1 == 1 && (n8 == 3 || n8 == 5) {
                j = -j;
            }

            // 二次互反律
            if low_u64(&a) & 3 == 3 && n8 & 3 == 3 {
                j = -j;
            }

            std::mem::swap(&mut a, &mut n);
            a = a.rem_euclid(&n);
        }

        Some(if n.is_one() { j } else { 0 })
    }
}
