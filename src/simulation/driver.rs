//! Simulation driver coupling the mortgage schedules to a fund account
//!
//! Two run algorithms share structure. `run_amortization` produces the
//! straight-amortization baseline. `run_fund` keeps the actual mortgage
//! un-amortized and diverts the would-be repayment capacity into a
//! [`FundAccount`]: each month it computes the cash difference between the
//! faux (hypothetical) schedule and the actual one, moves that cash into
//! the account, sells just enough whole shares (rounded up) to cover a
//! scheduled tax the cash cannot, invests the remainder in whole shares
//! (rounded down), and advances the account one month, which triggers the
//! wrapper's tax-scheduling hook.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::account::{AccountKind, FundAccount};
use crate::dates::{first_of_next_month, years_after, ymd};
use crate::error::SimResult;
use crate::market::{PriceSeries, RateSeries};
use crate::money::{round2, shares_for_amount, ShareRounding};
use crate::mortgage::Mortgage;
use crate::simulation::rows::{AmortizationResult, AmortizationRow, FundResult, FundRow};

/// Day of month the monthly cash movement is aligned to.
const PAYDAY: u32 = 25;

/// Parameters of one simulation run, immutable once supplied.
#[derive(Debug, Clone)]
pub struct RunParameters {
    /// Loan principal.
    pub loan: Decimal,
    /// Nominal annual interest rate as a fraction (0.03 = 3%).
    pub annual_rate: Decimal,
    /// First simulated month.
    pub start_date: NaiveDate,
    /// Horizon in years.
    pub years: u32,
    /// Monthly amortization; defaults to principal / years / 12.
    pub amortization: Option<Decimal>,
}

impl RunParameters {
    /// Monthly amortization amount, quantized to cents.
    pub fn monthly_amortization(&self) -> Decimal {
        let amount = self
            .amortization
            .unwrap_or_else(|| self.loan / Decimal::from(self.years) / dec!(12));
        round2(amount)
    }

    fn end_date(&self) -> NaiveDate {
        years_after(self.start_date, self.years)
    }
}

/// Advances a mortgage and a fund account together, one calendar month at
/// a time. Price and rate series are injected, shared and read-only.
pub struct SimulationDriver {
    prices: Arc<PriceSeries>,
    rates: Arc<RateSeries>,
    params: RunParameters,
}

impl SimulationDriver {
    pub fn new(prices: Arc<PriceSeries>, rates: Arc<RateSeries>, params: RunParameters) -> Self {
        Self {
            prices,
            rates,
            params,
        }
    }

    pub fn params(&self) -> &RunParameters {
        &self.params
    }

    /// Straight amortization: pay interest and amortize every month.
    pub fn run_amortization(&self) -> AmortizationResult {
        let amortization = self.params.monthly_amortization();
        let mut mortgage = Mortgage::new(self.params.loan, self.params.annual_rate);
        let end = self.params.end_date();

        let mut date = ymd(
            self.params.start_date.year(),
            self.params.start_date.month(),
            PAYDAY,
        );
        let mut total_interest_paid = Decimal::ZERO;
        let mut total_amortized = Decimal::ZERO;
        let mut rows = Vec::new();

        while date < end {
            let interest = mortgage.monthly_interest();
            let interest_after_deduction = mortgage.monthly_interest_after_tax_deduction();
            mortgage.amortize(amortization);

            total_interest_paid += interest;
            total_amortized += amortization;
            let total_paid = total_interest_paid + total_amortized;
            rows.push(AmortizationRow {
                date,
                interest,
                interest_after_deduction,
                remaining_debt: mortgage.amount(),
                total_interest_paid,
                total_amortized,
                total_paid,
                capital_minus_total_paid: -mortgage.amount() - total_paid,
            });

            let next = first_of_next_month(date);
            date = ymd(next.year(), next.month(), PAYDAY);
        }

        info!(
            "amortization run complete: {} months, {} interest paid",
            rows.len(),
            total_interest_paid
        );
        AmortizationResult { rows }
    }

    /// Fund strategy under the given tax wrapper. The actual mortgage is
    /// never amortized; the faux schedule determines the monthly deposit.
    pub fn run_fund(&self, kind: AccountKind) -> SimResult<FundResult> {
        let amortization = self.params.monthly_amortization();
        let actual = Mortgage::new(self.params.loan, self.params.annual_rate);
        let mut faux = actual.clone();
        let mut account = FundAccount::open(
            kind,
            self.params.start_date,
            self.prices.clone(),
            self.rates.clone(),
        );
        let end = self.params.end_date();

        let mut total_interest_paid = Decimal::ZERO;
        let mut rows = Vec::new();

        while account.current_date() < end {
            account.move_forward_to_day(PAYDAY)?;
            let date = account.current_date();
            let price = account.current_share_price()?;
            let shares_before = account.shares() as i64;

            // Cash difference between continuing the traditional schedule
            // and the actual one. A negative difference is an explicit
            // withdrawal, funded by selling shares if cash is short.
            let cash_flow = Self::monthly_cash_flow(&faux, &actual, amortization);
            if cash_flow >= Decimal::ZERO {
                account.deposit(cash_flow)?;
            } else {
                let needed = -cash_flow;
                if needed > account.depot_value() {
                    let shortfall = needed - account.depot_value();
                    let count = shares_for_amount(shortfall, price, ShareRounding::Ceiling)?
                        .min(account.shares());
                    account.sell_shares(count)?;
                }
                account.withdraw(needed)?;
            }

            // Sell just enough whole shares to cover the scheduled tax.
            let due = account.due_tax_deduction();
            if due > account.depot_value() {
                let shortfall = due - account.depot_value();
                let count = shares_for_amount(shortfall, price, ShareRounding::Ceiling)?
                    .min(account.shares());
                account.sell_shares(count)?;
            }

            // Keep a cash buffer when the deposits expected before the next
            // January reset will not cover the predicted tax bill.
            let mut reserved = due;
            let upcoming = account.upcoming_tax_estimate()?;
            if Self::deposits_until_january(&faux, &actual, amortization, date) < upcoming {
                reserved = reserved.max(upcoming);
            }

            // Invest whatever is not reserved, rounding the count down.
            let investable = account.depot_value() - reserved;
            if investable > Decimal::ZERO {
                let count = shares_for_amount(investable, price, ShareRounding::Floor)?;
                account.buy_shares(count)?;
            }

            total_interest_paid += actual.monthly_interest_after_tax_deduction();
            let market_value = account.current_value()?;
            let liquidation_value = round2(market_value - account.current_profit()? * dec!(0.3));
            rows.push(FundRow {
                date,
                share_price: price,
                cash_flow,
                shares_traded: account.shares() as i64 - shares_before,
                shares_held: account.shares(),
                cash: account.depot_value(),
                market_value,
                due_tax: account.due_tax_deduction(),
                total_tax_paid: account.total_tax_paid(),
                total_interest_paid,
                total_deposited: account.total_deposited(),
                total_outlay: total_interest_paid + account.total_deposited(),
                liquidation_value,
            });

            faux.amortize(amortization);
            account.next_month()?;
        }

        info!(
            "fund run complete: {} months, {} deposited, {} tax paid",
            rows.len(),
            account.total_deposited(),
            account.total_tax_paid()
        );
        Ok(FundResult { rows })
    }

    /// Hypothetical monthly deposit: what the faux schedule pays this month
    /// beyond the actual schedule's after-deduction interest.
    fn monthly_cash_flow(faux: &Mortgage, actual: &Mortgage, amortization: Decimal) -> Decimal {
        faux.monthly_interest_after_tax_deduction() + amortization
            - actual.monthly_interest_after_tax_deduction()
    }

    /// Sum of the deposits the remaining months of this calendar year will
    /// produce, simulated on a clone of the faux schedule.
    fn deposits_until_january(
        faux: &Mortgage,
        actual: &Mortgage,
        amortization: Decimal,
        date: NaiveDate,
    ) -> Decimal {
        let mut probe = faux.clone();
        let mut total = Decimal::ZERO;
        let mut month = date.month();
        loop {
            probe.amortize(amortization);
            month = month % 12 + 1;
            if month == 1 {
                break;
            }
            total += Self::monthly_cash_flow(&probe, actual, amortization);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::ymd;
    use crate::error::SimError;

    fn driver(
        prices: Vec<(NaiveDate, Decimal)>,
        rates: Vec<(NaiveDate, Decimal)>,
        params: RunParameters,
    ) -> SimulationDriver {
        SimulationDriver::new(
            Arc::new(PriceSeries::new(prices)),
            Arc::new(RateSeries::new(rates)),
            params,
        )
    }

    fn flat_rates() -> Vec<(NaiveDate, Decimal)> {
        vec![
            (ymd(2018, 11, 30), dec!(0.01)),
            (ymd(2019, 11, 30), dec!(0.01)),
            (ymd(2020, 11, 30), dec!(0.01)),
        ]
    }

    #[test]
    fn test_amortization_schedule_totals() {
        let d = driver(
            vec![],
            vec![],
            RunParameters {
                loan: dec!(1200000),
                annual_rate: dec!(0.03),
                start_date: ymd(1990, 3, 1),
                years: 2,
                amortization: None,
            },
        );
        let result = d.run_amortization();
        assert_eq!(result.rows.len(), 24);

        let first = &result.rows[0];
        assert_eq!(first.date, ymd(1990, 3, 25));
        assert_eq!(first.interest, dec!(3000.00));
        assert_eq!(first.remaining_debt, dec!(1150000.00));

        let summary = result.summary();
        assert_eq!(summary.total_amortized, dec!(1200000.00));
        assert_eq!(summary.total_interest_paid, dec!(37500.00));
        assert_eq!(summary.total_paid, dec!(1237500.00));
        assert_eq!(summary.final_debt, dec!(0.00));
    }

    #[test]
    fn test_fund_run_invests_monthly_deposits() {
        let d = driver(
            vec![(ymd(2020, 1, 1), dec!(100))],
            vec![],
            RunParameters {
                loan: dec!(120000),
                annual_rate: dec!(0.03),
                start_date: ymd(2020, 1, 1),
                years: 1,
                amortization: None,
            },
        );
        let result = d.run_fund(AccountKind::Basic).unwrap();
        assert_eq!(result.rows.len(), 12);

        // First month: faux and actual schedules are identical, so the
        // deposit is exactly the amortization amount, fully invested.
        let first = &result.rows[0];
        assert_eq!(first.date, ymd(2020, 1, 25));
        assert_eq!(first.cash_flow, dec!(10000.00));
        assert_eq!(first.shares_traded, 100);
        assert_eq!(first.cash, dec!(0));

        // Deposits only ever grow, and no tax drag exists on Basic.
        for pair in result.rows.windows(2) {
            assert!(pair[1].total_deposited >= pair[0].total_deposited);
        }
        assert_eq!(result.summary().total_tax_paid, dec!(0));
    }

    #[test]
    fn test_fund_run_insurance_settles_quarterly_tax() {
        let d = driver(
            vec![(ymd(2019, 1, 1), dec!(100))],
            flat_rates(),
            RunParameters {
                loan: dec!(120000),
                annual_rate: dec!(0.03),
                start_date: ymd(2020, 1, 1),
                years: 1,
                amortization: None,
            },
        );
        let result = d.run_fund(AccountKind::Insurance).unwrap();
        assert_eq!(result.rows.len(), 12);

        let summary = result.summary();
        assert!(summary.total_tax_paid > dec!(0));
        // The liquidation value discounts 30% of the unrealized profit;
        // with a flat price there is no profit beyond rounding.
        let last = result.rows.last().unwrap();
        assert_eq!(last.liquidation_value, last.market_value);
    }

    #[test]
    fn test_fund_run_keeps_cash_buffer_for_december_tax() {
        // In December no deposits remain before the January reset, so the
        // predicted tax must be held back from investment.
        let d = driver(
            vec![(ymd(2019, 1, 1), dec!(100))],
            flat_rates(),
            RunParameters {
                loan: dec!(120000),
                annual_rate: dec!(0.03),
                start_date: ymd(2020, 1, 1),
                years: 1,
                amortization: None,
            },
        );
        let result = d.run_fund(AccountKind::Insurance).unwrap();
        let december = result.rows.last().unwrap();
        assert_eq!(december.date, ymd(2020, 12, 25));
        assert!(december.cash > dec!(0));
    }

    #[test]
    fn test_fund_run_reports_rate_exhaustion() {
        let d = driver(
            vec![(ymd(2019, 1, 1), dec!(100))],
            vec![(ymd(2018, 11, 30), dec!(0.01))],
            RunParameters {
                loan: dec!(120000),
                annual_rate: dec!(0.03),
                start_date: ymd(2020, 1, 1),
                years: 2,
                amortization: None,
            },
        );
        assert!(matches!(
            d.run_fund(AccountKind::Insurance),
            Err(SimError::RateSeriesExhausted { .. })
        ));
    }

    #[test]
    fn test_explicit_amortization_is_quantized() {
        let params = RunParameters {
            loan: dec!(100),
            annual_rate: dec!(0.03),
            start_date: ymd(2020, 1, 1),
            years: 1,
            amortization: Some(dec!(8.333333)),
        };
        assert_eq!(params.monthly_amortization(), dec!(8.33));
    }
}
