//! Arbitrary-precision integer with an `i64` fast path.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Rem, Sub, SubAssign};
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive};

/// An integer of unbounded magnitude.
///
/// Small values are stored inline; anything outside the `i64` range is held
/// as a `BigInt`. The large form never holds a value that would fit in an
/// `i64`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExactInteger(Repr);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Repr {
    Small(i64),
    Large(BigInt),
}

/// Malformed textual integer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid integer literal {text:?} (base {base})")]
pub struct ParseIntegerError {
    text: String,
    base: u32,
}

impl ExactInteger {
    pub const ZERO: Self = Self(Repr::Small(0));
    pub const ONE: Self = Self(Repr::Small(1));

    fn from_big(value: BigInt) -> Self {
        match value.to_i64() {
            Some(v) => Self(Repr::Small(v)),
            None => Self(Repr::Large(value)),
        }
    }

    fn big(&self) -> Cow<'_, BigInt> {
        match &self.0 {
            Repr::Small(v) => Cow::Owned(BigInt::from(*v)),
            Repr::Large(b) => Cow::Borrowed(b),
        }
    }

    /// True while the value is held in native form.
    pub fn is_native(&self) -> bool {
        matches!(self.0, Repr::Small(_))
    }

    pub fn to_bigint(&self) -> BigInt {
        self.big().into_owned()
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self.0 {
            Repr::Small(v) => Some(v),
            Repr::Large(_) => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.0, Repr::Small(0))
    }

    /// -1, 0 or 1.
    pub fn signum(&self) -> i32 {
        match &self.0 {
            Repr::Small(v) => v.signum() as i32,
            Repr::Large(b) => {
                if b.is_negative() {
                    -1
                } else {
                    1
                }
            }
        }
    }

    pub fn is_negative(&self) -> bool {
        self.signum() < 0
    }

    pub fn abs(&self) -> Self {
        match &self.0 {
            Repr::Small(v) => match v.checked_abs() {
                Some(a) => Self(Repr::Small(a)),
                None => Self::from_big(BigInt::from(*v).abs()),
            },
            Repr::Large(b) => Self(Repr::Large(b.abs())),
        }
    }

    pub fn negate(&mut self) {
        *self = -&*self;
    }

    /// Division that is known to leave no remainder.
    pub fn div_exact(&self, rhs: &Self) -> Self {
        debug_assert!((self % rhs).is_zero(), "{self} is not divisible by {rhs}");
        self / rhs
    }

    /// Non-negative greatest common divisor; `gcd(0, 0) = 0`.
    pub fn gcd(&self, other: &Self) -> Self {
        match (&self.0, &other.0) {
            (Repr::Small(x), Repr::Small(y)) => {
                let g = x.unsigned_abs().gcd(&y.unsigned_abs());
                match i64::try_from(g) {
                    Ok(v) => Self(Repr::Small(v)),
                    Err(_) => Self::from_big(BigInt::from(g)),
                }
            }
            _ => Self::from_big(self.big().gcd(&*other.big())),
        }
    }

    /// Non-negative least common multiple; zero if either side is zero.
    pub fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::ZERO;
        }
        let g = self.gcd(other);
        (&self.div_exact(&g) * other).abs()
    }

    /// Parses an optionally signed literal.
    ///
    /// `radix` may be 2..=36, or 0 to detect the base from a `0x`, `0b`,
    /// `0o` or leading `0` prefix (decimal otherwise).
    pub fn from_str_radix(text: &str, radix: u32) -> Result<Self, ParseIntegerError> {
        let err = || ParseIntegerError {
            text: text.to_string(),
            base: radix,
        };
        let trimmed = text.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (radix, digits) = if radix == 0 {
            detect_radix(body)
        } else {
            (radix, body)
        };
        if !(2..=36).contains(&radix)
            || digits.is_empty()
            || !digits.chars().all(|c| c.is_digit(radix))
        {
            return Err(err());
        }
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), radix).ok_or_else(err)?;
        Ok(Self::from_big(if negative { -magnitude } else { magnitude }))
    }

    /// Lower-case digits in the given base (2..=36).
    pub fn to_string_radix(&self, radix: u32) -> String {
        assert!((2..=36).contains(&radix), "unsupported radix {radix}");
        self.big().to_str_radix(radix)
    }

    /// Nearest `f64`, plus whether the value was within the finite range.
    pub fn to_f64(&self) -> (f64, bool) {
        match &self.0 {
            Repr::Small(v) => (*v as f64, true),
            Repr::Large(b) => match b.to_f64() {
                Some(f) if f.is_finite() => (f, true),
                _ if b.is_negative() => (f64::NEG_INFINITY, false),
                _ => (f64::INFINITY, false),
            },
        }
    }
}

fn detect_radix(body: &str) -> (u32, &str) {
    let lower = body.get(..2).map(str::to_ascii_lowercase);
    match lower.as_deref() {
        Some("0x") => (16, &body[2..]),
        Some("0b") => (2, &body[2..]),
        Some("0o") => (8, &body[2..]),
        _ if body.len() > 1 && body.starts_with('0') => (8, &body[1..]),
        _ => (10, body),
    }
}

impl Default for ExactInteger {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FromStr for ExactInteger {
    type Err = ParseIntegerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_radix(s, 10)
    }
}

impl fmt::Display for ExactInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Small(v) => fmt::Display::fmt(v, f),
            Repr::Large(b) => fmt::Display::fmt(b, f),
        }
    }
}

macro_rules! from_native {
    ($($t:ty),*) => {$(
        impl From<$t> for ExactInteger {
            fn from(v: $t) -> Self {
                match i64::try_from(v) {
                    Ok(small) => Self(Repr::Small(small)),
                    Err(_) => Self::from_big(BigInt::from(v)),
                }
            }
        }
    )*};
}
from_native!(i8, i16, i32, i64, i128, u8, u16, u32, u64, usize);

impl From<BigInt> for ExactInteger {
    fn from(v: BigInt) -> Self {
        Self::from_big(v)
    }
}

impl Ord for ExactInteger {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (Repr::Small(x), Repr::Small(y)) => x.cmp(y),
            _ => (*self.big()).cmp(&*other.big()),
        }
    }
}

impl PartialOrd for ExactInteger {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<i64> for ExactInteger {
    fn eq(&self, other: &i64) -> bool {
        matches!(self.0, Repr::Small(v) if v == *other)
    }
}

impl PartialOrd<i64> for ExactInteger {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        Some(match &self.0 {
            Repr::Small(v) => v.cmp(other),
            Repr::Large(b) if b.is_negative() => Ordering::Less,
            Repr::Large(_) => Ordering::Greater,
        })
    }
}

fn add(a: &ExactInteger, b: &ExactInteger) -> ExactInteger {
    if let (Repr::Small(x), Repr::Small(y)) = (&a.0, &b.0) {
        if let Some(v) = x.checked_add(*y) {
            return ExactInteger(Repr::Small(v));
        }
    }
    ExactInteger::from_big(&*a.big() + &*b.big())
}

fn sub(a: &ExactInteger, b: &ExactInteger) -> ExactInteger {
    if let (Repr::Small(x), Repr::Small(y)) = (&a.0, &b.0) {
        if let Some(v) = x.checked_sub(*y) {
            return ExactInteger(Repr::Small(v));
        }
    }
    ExactInteger::from_big(&*a.big() - &*b.big())
}

fn mul(a: &ExactInteger, b: &ExactInteger) -> ExactInteger {
    if let (Repr::Small(x), Repr::Small(y)) = (&a.0, &b.0) {
        if let Some(v) = x.checked_mul(*y) {
            return ExactInteger(Repr::Small(v));
        }
    }
    ExactInteger::from_big(&*a.big() * &*b.big())
}

fn div(a: &ExactInteger, b: &ExactInteger) -> ExactInteger {
    assert!(!b.is_zero(), "attempt to divide {a} by zero");
    if let (Repr::Small(x), Repr::Small(y)) = (&a.0, &b.0) {
        if let Some(v) = x.checked_div(*y) {
            return ExactInteger(Repr::Small(v));
        }
    }
    ExactInteger::from_big(&*a.big() / &*b.big())
}

fn rem(a: &ExactInteger, b: &ExactInteger) -> ExactInteger {
    assert!(!b.is_zero(), "attempt to take {a} modulo zero");
    if let (Repr::Small(x), Repr::Small(y)) = (&a.0, &b.0) {
        // i64::MIN % -1 overflows but is mathematically zero.
        return ExactInteger(Repr::Small(x.checked_rem(*y).unwrap_or(0)));
    }
    ExactInteger::from_big(&*a.big() % &*b.big())
}

macro_rules! binop {
    ($imp:ident, $method:ident, $core:ident) => {
        impl<'a, 'b> $imp<&'b ExactInteger> for &'a ExactInteger {
            type Output = ExactInteger;
            fn $method(self, rhs: &'b ExactInteger) -> ExactInteger {
                $core(self, rhs)
            }
        }
        impl $imp<ExactInteger> for ExactInteger {
            type Output = ExactInteger;
            fn $method(self, rhs: ExactInteger) -> ExactInteger {
                $core(&self, &rhs)
            }
        }
        impl<'b> $imp<&'b ExactInteger> for ExactInteger {
            type Output = ExactInteger;
            fn $method(self, rhs: &'b ExactInteger) -> ExactInteger {
                $core(&self, rhs)
            }
        }
        impl<'a> $imp<ExactInteger> for &'a ExactInteger {
            type Output = ExactInteger;
            fn $method(self, rhs: ExactInteger) -> ExactInteger {
                $core(self, &rhs)
            }
        }
        impl $imp<i64> for ExactInteger {
            type Output = ExactInteger;
            fn $method(self, rhs: i64) -> ExactInteger {
                $core(&self, &ExactInteger::from(rhs))
            }
        }
    };
}
binop!(Add, add, add);
binop!(Sub, sub, sub);
binop!(Mul, mul, mul);
binop!(Div, div, div);
binop!(Rem, rem, rem);

macro_rules! assignop {
    ($imp:ident, $method:ident, $core:ident) => {
        impl<'b> $imp<&'b ExactInteger> for ExactInteger {
            fn $method(&mut self, rhs: &'b ExactInteger) {
                *self = $core(self, rhs);
            }
        }
        impl $imp<ExactInteger> for ExactInteger {
            fn $method(&mut self, rhs: ExactInteger) {
                *self = $core(self, &rhs);
            }
        }
    };
}
assignop!(AddAssign, add_assign, add);
assignop!(SubAssign, sub_assign, sub);
assignop!(MulAssign, mul_assign, mul);

impl Neg for &ExactInteger {
    type Output = ExactInteger;
    fn neg(self) -> ExactInteger {
        match &self.0 {
            Repr::Small(v) => match v.checked_neg() {
                Some(n) => ExactInteger(Repr::Small(n)),
                None => ExactInteger::from_big(-BigInt::from(*v)),
            },
            Repr::Large(b) => ExactInteger::from_big(-b),
        }
    }
}

impl Neg for ExactInteger {
    type Output = ExactInteger;
    fn neg(self) -> ExactInteger {
        -&self
    }
}

impl<'a> Sum<&'a ExactInteger> for ExactInteger {
    fn sum<It: Iterator<Item = &'a ExactInteger>>(iter: It) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl Sum for ExactInteger {
    fn sum<It: Iterator<Item = ExactInteger>>(iter: It) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}
