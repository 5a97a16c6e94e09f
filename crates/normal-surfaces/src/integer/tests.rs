use super::*;
use proptest::prelude::*;

fn big(s: &str) -> ExactInteger {
    s.parse().unwrap()
}

#[test]
fn promotes_on_overflow_and_demotes_back() {
    let max = ExactInteger::from(i64::MAX);
    let over = &max + &ExactInteger::ONE;
    assert!(!over.is_native());
    assert_eq!(over.to_string(), "9223372036854775808");
    let back = &over - &ExactInteger::ONE;
    assert!(back.is_native());
    assert_eq!(back, max);

    let min = ExactInteger::from(i64::MIN);
    assert_eq!(min.abs().to_string(), "9223372036854775808");
    assert_eq!((-&min).to_string(), "9223372036854775808");
    assert_eq!(&min / &ExactInteger::from(-1), big("9223372036854775808"));
    assert_eq!(&min % &ExactInteger::from(-1), ExactInteger::ZERO);
}

#[test]
fn division_truncates_toward_zero() {
    let a = ExactInteger::from(-7);
    let b = ExactInteger::from(2);
    assert_eq!(&a / &b, -3i64);
    assert_eq!(&a % &b, -1i64);
    let huge = big("-100000000000000000000000000001");
    assert_eq!(&huge / &ExactInteger::from(10), big("-10000000000000000000000000000"));
    assert_eq!(&huge % &ExactInteger::from(10), -1i64);
}

#[test]
#[should_panic]
fn division_by_zero_panics() {
    let _ = ExactInteger::ONE / ExactInteger::ZERO;
}

#[test]
fn gcd_and_lcm_are_non_negative() {
    let a = ExactInteger::from(-12);
    let b = ExactInteger::from(18);
    assert_eq!(a.gcd(&b), 6i64);
    assert_eq!(a.lcm(&b), 36i64);
    assert_eq!(ExactInteger::ZERO.gcd(&ExactInteger::ZERO), 0i64);
    assert_eq!(ExactInteger::ZERO.lcm(&b), 0i64);
    let g = ExactInteger::from(i64::MIN).gcd(&ExactInteger::ZERO);
    assert_eq!(g.to_string(), "9223372036854775808");
}

#[test]
fn parses_with_explicit_and_detected_bases() {
    assert_eq!(ExactInteger::from_str_radix("ff", 16).unwrap(), 255i64);
    assert_eq!(ExactInteger::from_str_radix("-0x1F", 0).unwrap(), -31i64);
    assert_eq!(ExactInteger::from_str_radix("0b101", 0).unwrap(), 5i64);
    assert_eq!(ExactInteger::from_str_radix("017", 0).unwrap(), 15i64);
    assert_eq!(ExactInteger::from_str_radix("0", 0).unwrap(), 0i64);
    assert_eq!(ExactInteger::from_str_radix("+42", 10).unwrap(), 42i64);
    assert!(ExactInteger::from_str_radix("12a", 10).is_err());
    assert!(ExactInteger::from_str_radix("", 10).is_err());
    assert!(ExactInteger::from_str_radix("-", 0).is_err());
    assert!(ExactInteger::from_str_radix("10", 37).is_err());
}

#[test]
fn renders_in_other_bases_and_as_float() {
    let v = big("340282366920938463463374607431768211456");
    assert_eq!(v.to_string_radix(16), "100000000000000000000000000000000");
    assert_eq!(ExactInteger::from(-10).to_string_radix(2), "-1010");
    let (f, in_range) = v.to_f64();
    assert!(in_range);
    assert!((f - 3.402823669209385e38).abs() < 1e24);
    let (g, in_range) = (&v * &v * &v * &v * &v * &v * &v * &v * &v).to_f64();
    assert!(!in_range);
    assert!(g.is_infinite());
}

#[test]
fn ordering_mixes_native_and_large_values() {
    let large = big("100000000000000000000");
    let neg_large = -&large;
    let small = ExactInteger::from(5);
    assert!(neg_large < small && small < large);
    assert!(large > 0i64 && neg_large < 0i64);
    assert_eq!(large.signum(), 1);
    assert_eq!(neg_large.signum(), -1);
}

#[test]
fn native_backends_agree_with_exact() {
    fn combo<I: LpInteger>(a: i64, b: i64) -> ExactInteger {
        let x = I::from_i64(a);
        let y = I::from_i64(b);
        let mut z = x.times(&y).minus(&x).plus(&y);
        z.negate();
        z.gcd_with(&I::from_i64(6)).to_exact()
    }
    for (a, b) in [(3, 4), (-7, 11), (0, 5), (12, -18)] {
        let e = combo::<ExactInteger>(a, b);
        assert_eq!(combo::<i64>(a, b), e);
        assert_eq!(combo::<i128>(a, b), e);
    }
}

proptest! {
    #[test]
    fn add_sub_mul_div_round_trip(a in any::<i64>(), b in any::<i64>()) {
        let x = ExactInteger::from(a);
        let y = ExactInteger::from(b);
        prop_assert_eq!(&(&x + &y) - &y, x.clone());
        if b != 0 {
            prop_assert_eq!((&x * &y).div_exact(&y), x.clone());
        }
        let expected = i128::from(a) * i128::from(b);
        prop_assert_eq!(&x * &y, ExactInteger::from(expected));
    }

    #[test]
    fn gcd_divides_both(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        let x = ExactInteger::from(a);
        let y = ExactInteger::from(b);
        let g = x.gcd(&y);
        prop_assume!(!g.is_zero());
        prop_assert!((&x % &g).is_zero());
        prop_assert!((&y % &g).is_zero());
    }

    #[test]
    fn decimal_text_round_trips(digits in "-?[1-9][0-9]{0,40}") {
        let v: ExactInteger = digits.parse().unwrap();
        prop_assert_eq!(v.to_string(), digits);
    }
}
