//! Amortizing mortgage balance model

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::money::round2;

/// Remaining principal and nominal annual rate of an amortizing loan.
///
/// The balance is never clamped: amortizing past zero drives it negative,
/// and the post-payoff trajectory is emitted as-is even though it has no
/// physical meaning. Cloning produces an independent "faux" schedule for
/// what-if comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct Mortgage {
    amount: Decimal,
    rate: Decimal,
}

impl Mortgage {
    /// Create a mortgage with an initial principal and a nominal annual
    /// interest rate expressed as a fraction (0.03 = 3%).
    pub fn new(amount: Decimal, rate: Decimal) -> Self {
        Self { amount, rate }
    }

    /// Remaining principal.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Reduce the balance by `amount`. No bound check.
    pub fn amortize(&mut self, amount: Decimal) {
        self.amount -= amount;
    }

    /// Interest for one month at the current balance, rounded to the cent.
    pub fn monthly_interest(&self) -> Decimal {
        round2(self.amount * self.rate / dec!(12))
    }

    /// Monthly interest net of the 30% interest tax deduction.
    ///
    /// Approximation: the yearly interest is taken as a snapshot of the
    /// current balance times the rate, scaled by 0.7 and divided by 12. The
    /// true deduction depends on the calendar-year aggregate interest, not
    /// twelve times a snapshot.
    pub fn monthly_interest_after_tax_deduction(&self) -> Decimal {
        let yearly_after_deduction = self.amount * self.rate * dec!(0.7);
        round2(yearly_after_deduction / dec!(12))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_interest_rounds_to_cent() {
        let m = Mortgage::new(dec!(3000000), dec!(0.03));
        assert_eq!(m.monthly_interest(), dec!(7500.00));

        let m = Mortgage::new(dec!(1000001), dec!(0.03));
        // 1000001 * 0.03 / 12 = 2500.0025 -> half away from zero
        assert_eq!(m.monthly_interest(), dec!(2500.00));
        let m = Mortgage::new(dec!(1000003), dec!(0.03));
        // 2500.0075 -> 2500.01
        assert_eq!(m.monthly_interest(), dec!(2500.01));
    }

    #[test]
    fn test_interest_after_tax_deduction() {
        let m = Mortgage::new(dec!(3000000), dec!(0.03));
        // 3,000,000 * 0.03 * 0.7 / 12 = 5250
        assert_eq!(m.monthly_interest_after_tax_deduction(), dec!(5250.00));
    }

    #[test]
    fn test_amortize_may_cross_zero() {
        let mut m = Mortgage::new(dec!(100), dec!(0.03));
        m.amortize(dec!(150));
        assert_eq!(m.amount(), dec!(-50));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut real = Mortgage::new(dec!(1000), dec!(0.03));
        let faux = real.clone();
        real.amortize(dec!(500));
        assert_eq!(real.amount(), dec!(500));
        assert_eq!(faux.amount(), dec!(1000));
    }
}
