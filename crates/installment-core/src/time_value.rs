use rust_decimal::Decimal;

use crate::types::Money;

/// Compute (1 + r)^n by square-and-multiply with checked arithmetic.
///
/// Avoids `powd` drift and stays logarithmic in `n`, so absurd tenures
/// neither spin nor panic. Returns `None` when the factor overflows.
pub fn compound(rate: Decimal, n: u32) -> Option<Decimal> {
    let mut base = Decimal::ONE.checked_add(rate)?;
    let mut result = Decimal::ONE;
    let mut exp = n;

    while exp > 0 {
        if exp & 1 == 1 {
            result = result.checked_mul(base)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = base.checked_mul(base)?;
        }
    }

    Some(result)
}

/// Present value of an annuity of 1 per period: (1 - (1 + r)^-n) / r.
///
/// A zero rate gives `n`. `None` when the compounding factor overflows.
pub fn annuity_factor(rate: Decimal, nper: u32) -> Option<Decimal> {
    if nper == 0 {
        return Some(Decimal::ZERO);
    }
    if rate.is_zero() {
        return Some(Decimal::from(nper));
    }

    let factor = compound(rate, nper)?;
    let discount = Decimal::ONE.checked_div(factor)?;
    (Decimal::ONE - discount).checked_div(rate)
}

/// Level periodic payment that fully amortizes `principal` over `nper`
/// periods at periodic rate `rate`.
///
/// Total over its domain: zero periods give a zero payment, a rate lost to
/// precision gives the straight-line payment, and when the compounding
/// factor overflows the payment takes its limit `principal * r`.
pub fn level_payment(principal: Money, rate: Decimal, nper: u32) -> Money {
    if nper == 0 || principal.is_zero() {
        return Decimal::ZERO;
    }
    if rate.is_zero() {
        return principal / Decimal::from(nper);
    }

    match annuity_factor(rate, nper) {
        // (1 + r)^n rounded to 1: the rate is below precision, so straight line
        Some(af) if af.is_zero() => principal / Decimal::from(nper),
        Some(af) => principal
            .checked_div(af)
            .unwrap_or_else(|| interest_only(principal, rate)),
        // (1 + r)^n overflowed, the payment converges to interest only
        None => interest_only(principal, rate),
    }
}

fn interest_only(principal: Money, rate: Decimal) -> Money {
    principal.checked_mul(rate).unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compound_matches_repeated_multiplication() {
        let mut expected = Decimal::ONE;
        for _ in 0..13 {
            expected *= dec!(1.01);
        }
        let result = compound(dec!(0.01), 13).unwrap();
        assert!((result - expected).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_compound_zero_periods() {
        assert_eq!(compound(dec!(0.05), 0), Some(Decimal::ONE));
    }

    #[test]
    fn test_compound_overflow_is_none() {
        assert_eq!(compound(dec!(1), u32::MAX), None);
    }

    #[test]
    fn test_level_payment_standard_loan() {
        // 80,000 at 1% per month over 12 months ≈ 7,107.90
        let pmt = level_payment(dec!(80000), dec!(0.01), 12);
        assert!((pmt - dec!(7107.903)).abs() < dec!(0.001), "got {pmt}");
    }

    #[test]
    fn test_level_payment_zero_rate_is_straight_line() {
        assert_eq!(level_payment(dec!(1200), Decimal::ZERO, 12), dec!(100));
    }

    #[test]
    fn test_level_payment_zero_periods() {
        assert_eq!(level_payment(dec!(1200), dec!(0.01), 0), Decimal::ZERO);
    }

    #[test]
    fn test_level_payment_overflow_tends_to_interest_only() {
        let pmt = level_payment(dec!(1000), dec!(1), u32::MAX);
        assert_eq!(pmt, dec!(1000));
    }

    #[test]
    fn test_level_payment_smallest_rate_is_straight_line() {
        let pmt = level_payment(dec!(1200), dec!(0.0000000000000000000000000001), 12);
        assert!((pmt - dec!(100)).abs() < dec!(0.0001), "got {pmt}");
    }

    #[test]
    fn test_level_payment_tiny_rate_long_tenure_not_interest_only() {
        // Interest only would be ~0; the payment must stay near 1,000,000 / 360
        let pmt = level_payment(dec!(1000000), dec!(0.0000000000000000000001), 360);
        assert!((pmt - dec!(2777.7778)).abs() < dec!(0.001), "got {pmt}");
    }

    #[test]
    fn test_annuity_factor_zero_rate() {
        assert_eq!(annuity_factor(Decimal::ZERO, 24), Some(dec!(24)));
    }
}
