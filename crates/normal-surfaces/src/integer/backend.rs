//! Arithmetic surface shared by the native and exact LP backends.

use std::fmt;

use num_integer::Integer;

use super::ExactInteger;

/// Integer type usable inside an `LpData` tableau.
///
/// Native implementations assume the caller has already bounded every
/// intermediate value; debug builds still trap on overflow.
pub trait LpInteger: Clone + fmt::Debug + fmt::Display + PartialEq + Ord + Send + Sync + 'static {
    /// Short backend name for traces.
    const NAME: &'static str;

    fn from_i64(v: i64) -> Self;

    fn zero() -> Self {
        Self::from_i64(0)
    }

    fn one() -> Self {
        Self::from_i64(1)
    }

    fn is_zero(&self) -> bool;
    /// -1, 0 or 1.
    fn sign(&self) -> i32;
    fn negate(&mut self);
    fn plus(&self, rhs: &Self) -> Self;
    fn minus(&self, rhs: &Self) -> Self;
    fn times(&self, rhs: &Self) -> Self;

    fn times_i64(&self, rhs: i64) -> Self {
        self.times(&Self::from_i64(rhs))
    }

    fn div_exact(&self, rhs: &Self) -> Self;
    /// Non-negative gcd.
    fn gcd_with(&self, rhs: &Self) -> Self;
    fn to_exact(&self) -> ExactInteger;
}

macro_rules! native_backend {
    ($t:ty, $name:expr) => {
        impl LpInteger for $t {
            const NAME: &'static str = $name;

            #[inline]
            fn from_i64(v: i64) -> Self {
                v as $t
            }
            #[inline]
            fn is_zero(&self) -> bool {
                *self == 0
            }
            #[inline]
            fn sign(&self) -> i32 {
                (*self).signum() as i32
            }
            #[inline]
            fn negate(&mut self) {
                *self = -*self;
            }
            #[inline]
            fn plus(&self, rhs: &Self) -> Self {
                *self + *rhs
            }
            #[inline]
            fn minus(&self, rhs: &Self) -> Self {
                *self - *rhs
            }
            #[inline]
            fn times(&self, rhs: &Self) -> Self {
                *self * *rhs
            }
            #[inline]
            fn times_i64(&self, rhs: i64) -> Self {
                *self * (rhs as $t)
            }
            #[inline]
            fn div_exact(&self, rhs: &Self) -> Self {
                debug_assert_eq!(*self % *rhs, 0);
                *self / *rhs
            }
            #[inline]
            fn gcd_with(&self, rhs: &Self) -> Self {
                Integer::gcd(self, rhs)
            }
            fn to_exact(&self) -> ExactInteger {
                ExactInteger::from(*self)
            }
        }
    };
}
native_backend!(i64, "i64");
native_backend!(i128, "i128");

impl LpInteger for ExactInteger {
    const NAME: &'static str = "exact";

    fn from_i64(v: i64) -> Self {
        ExactInteger::from(v)
    }
    fn is_zero(&self) -> bool {
        ExactInteger::is_zero(self)
    }
    fn sign(&self) -> i32 {
        self.signum()
    }
    fn negate(&mut self) {
        ExactInteger::negate(self)
    }
    fn plus(&self, rhs: &Self) -> Self {
        self + rhs
    }
    fn minus(&self, rhs: &Self) -> Self {
        self - rhs
    }
    fn times(&self, rhs: &Self) -> Self {
        self * rhs
    }
    fn div_exact(&self, rhs: &Self) -> Self {
        ExactInteger::div_exact(self, rhs)
    }
    fn gcd_with(&self, rhs: &Self) -> Self {
        self.gcd(rhs)
    }
    fn to_exact(&self) -> ExactInteger {
        self.clone()
    }
}
