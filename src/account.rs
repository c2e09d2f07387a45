//! Fund account with whole-share lot accounting and tax-wrapper state
//!
//! A [`FundAccount`] holds uninvested cash and whole shares of a single
//! fund. Its calendar cursor advances one month at a time; entering a month
//! first settles the tax deduction scheduled previously, then lets the tax
//! wrapper predict and schedule the next one. The three wrappers differ
//! only in that scheduling step:
//!
//! - [`AccountKind::Basic`]: no tax drag, nothing scheduled.
//! - [`AccountKind::Direct`]: annual wealth-based tax, predicted each
//!   January for the following January.
//! - [`AccountKind::Insurance`]: quarterly yield tax on a standardized
//!   base, deducted in January, April, July and October.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::dates::{days_in_month, first_of_next_month, ymd};
use crate::error::{SimError, SimResult};
use crate::market::{PriceSeries, RateSeries};
use crate::money::round2;

/// Tax wrapper selection for a new account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    /// Plain account with no tax drag (baseline).
    Basic,
    /// Direct fund ownership with an annual wealth-based tax.
    Direct,
    /// Insurance-wrapped account with a quarterly yield tax.
    Insurance,
}

/// Wrapper-specific tax state.
#[derive(Debug, Clone)]
enum TaxWrapper {
    Basic,
    Direct {
        /// Deduction predicted last January, scheduled next January.
        pending_tax_next_year: Decimal,
    },
    Insurance {
        /// Market value captured on entering January of the current year.
        amount_at_year_start: Decimal,
        /// Deposits made in January through June of the current year.
        year_deposit_first_half: Decimal,
        /// Deposits made in July through December of the current year.
        year_deposit_second_half: Decimal,
        /// Quarterly deductions already scheduled for the taxation year.
        tax_deducted_so_far: Decimal,
    },
}

/// Cumulative-due fraction of the predicted yearly tax, keyed by the
/// deduction month. January settles the previous taxation year in full.
fn quarter_fraction(month: u32) -> Option<Decimal> {
    match month {
        1 => Some(dec!(1)),
        4 => Some(dec!(0.25)),
        7 => Some(dec!(0.5)),
        10 => Some(dec!(0.75)),
        _ => None,
    }
}

/// Cash plus whole-share positions under one tax wrapper.
#[derive(Debug, Clone)]
pub struct FundAccount {
    wrapper: TaxWrapper,
    current_date: NaiveDate,
    depot_value: Decimal,
    shares: u64,
    due_tax_deduction: Decimal,
    purchase_value: Decimal,
    realized_profits: Decimal,
    total_deposited: Decimal,
    total_tax_paid: Decimal,
    prices: Arc<PriceSeries>,
    rates: Arc<RateSeries>,
}

impl FundAccount {
    /// Open an empty account at `opening_date`.
    pub fn open(
        kind: AccountKind,
        opening_date: NaiveDate,
        prices: Arc<PriceSeries>,
        rates: Arc<RateSeries>,
    ) -> Self {
        let wrapper = match kind {
            AccountKind::Basic => TaxWrapper::Basic,
            AccountKind::Direct => TaxWrapper::Direct {
                pending_tax_next_year: Decimal::ZERO,
            },
            AccountKind::Insurance => TaxWrapper::Insurance {
                amount_at_year_start: Decimal::ZERO,
                year_deposit_first_half: Decimal::ZERO,
                year_deposit_second_half: Decimal::ZERO,
                tax_deducted_so_far: Decimal::ZERO,
            },
        };
        Self {
            wrapper,
            current_date: opening_date,
            depot_value: Decimal::ZERO,
            shares: 0,
            due_tax_deduction: Decimal::ZERO,
            purchase_value: Decimal::ZERO,
            realized_profits: Decimal::ZERO,
            total_deposited: Decimal::ZERO,
            total_tax_paid: Decimal::ZERO,
            prices,
            rates,
        }
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    /// Uninvested cash held in the account.
    pub fn depot_value(&self) -> Decimal {
        self.depot_value
    }

    /// Whole shares held.
    pub fn shares(&self) -> u64 {
        self.shares
    }

    /// Tax amount scheduled to be withdrawn at the next month entry.
    pub fn due_tax_deduction(&self) -> Decimal {
        self.due_tax_deduction
    }

    /// Cost basis of the shares currently held.
    pub fn purchase_value(&self) -> Decimal {
        self.purchase_value
    }

    /// Cumulative (sale proceeds - cost basis) over all sales to date.
    pub fn realized_profits(&self) -> Decimal {
        self.realized_profits
    }

    /// Cumulative cash ever deposited. Non-decreasing.
    pub fn total_deposited(&self) -> Decimal {
        self.total_deposited
    }

    /// Cumulative tax settled against the account.
    pub fn total_tax_paid(&self) -> Decimal {
        self.total_tax_paid
    }

    /// Share price in force on the account's current date.
    pub fn current_share_price(&self) -> SimResult<Decimal> {
        self.prices.lookup(self.current_date)
    }

    /// Market value of the held shares, rounded to the cent.
    pub fn current_value(&self) -> SimResult<Decimal> {
        Ok(round2(Decimal::from(self.shares) * self.current_share_price()?))
    }

    /// Unrealized plus realized gain.
    pub fn current_profit(&self) -> SimResult<Decimal> {
        Ok(self.current_value()? - self.purchase_value + self.realized_profits)
    }

    /// Add cash to the account. For the Insurance wrapper the deposit is
    /// also tallied into the half-year bucket feeding the yield-tax base.
    pub fn deposit(&mut self, amount: Decimal) -> SimResult<()> {
        if amount < Decimal::ZERO {
            return Err(SimError::NegativeCashAmount {
                operation: "deposit",
                amount,
            });
        }
        self.depot_value += amount;
        self.total_deposited += amount;
        let first_half = self.current_date.month() < 7;
        if let TaxWrapper::Insurance {
            year_deposit_first_half,
            year_deposit_second_half,
            ..
        } = &mut self.wrapper
        {
            if first_half {
                *year_deposit_first_half += amount;
            } else {
                *year_deposit_second_half += amount;
            }
        }
        Ok(())
    }

    /// Take cash out of the account. Does not touch `total_deposited`.
    pub fn withdraw(&mut self, amount: Decimal) -> SimResult<()> {
        if amount < Decimal::ZERO {
            return Err(SimError::NegativeCashAmount {
                operation: "withdraw",
                amount,
            });
        }
        if amount > self.depot_value {
            return Err(SimError::WithdrawalExceedsCash {
                requested: amount,
                available: self.depot_value,
            });
        }
        self.depot_value -= amount;
        Ok(())
    }

    /// Buy `count` whole shares at the current price. The exact, unrounded
    /// cost moves from cash into the cost basis.
    pub fn buy_shares(&mut self, count: u64) -> SimResult<()> {
        if count == 0 {
            return Ok(());
        }
        let cost = self.current_share_price()? * Decimal::from(count);
        if cost > self.depot_value {
            return Err(SimError::InsufficientCash {
                count,
                cost,
                available: self.depot_value,
            });
        }
        self.shares += count;
        self.depot_value -= cost;
        self.purchase_value += cost;
        Ok(())
    }

    /// Sell `count` whole shares at the current price. Proceeds are rounded
    /// to the cent; the cost basis is reduced by a proportional slice.
    pub fn sell_shares(&mut self, count: u64) -> SimResult<()> {
        if count == 0 {
            return Ok(());
        }
        if count > self.shares {
            return Err(SimError::InsufficientShares {
                requested: count,
                held: self.shares,
            });
        }
        let sell_amount = round2(self.current_share_price()? * Decimal::from(count));
        let partial_basis = self.purchase_value / Decimal::from(self.shares) * Decimal::from(count);
        self.realized_profits += round2(sell_amount - partial_basis);
        self.shares -= count;
        self.purchase_value -= partial_basis;
        self.depot_value += sell_amount;
        Ok(())
    }

    /// Advance the calendar cursor to `day` of the current month, rolling
    /// into following months (and running their month-entry hooks) when the
    /// current day already lies past `day` or the month is too short. Lets
    /// callers align on a fixed payday regardless of month lengths. Calling
    /// twice with the same `day` is a no-op the second time.
    pub fn move_forward_to_day(&mut self, day: u32) -> SimResult<()> {
        debug_assert!((1..=31).contains(&day));
        if self.current_date.day() > day {
            self.next_month()?;
        }
        while days_in_month(self.current_date) < day {
            self.next_month()?;
        }
        self.current_date = ymd(self.current_date.year(), self.current_date.month(), day);
        Ok(())
    }

    /// Roll to the first day of the following month and run the
    /// month-entry hook for it.
    pub fn next_month(&mut self) -> SimResult<()> {
        self.current_date = first_of_next_month(self.current_date);
        self.on_enter_month()
    }

    /// Wrapper-specific estimate of the tax still coming due before the
    /// next yearly reset. The driver uses it to keep a cash buffer instead
    /// of fully investing when a known tax bill is approaching.
    pub fn upcoming_tax_estimate(&self) -> SimResult<Decimal> {
        match &self.wrapper {
            TaxWrapper::Basic => Ok(Decimal::ZERO),
            TaxWrapper::Direct {
                pending_tax_next_year,
            } => Ok(*pending_tax_next_year),
            TaxWrapper::Insurance {
                amount_at_year_start,
                year_deposit_first_half,
                year_deposit_second_half,
                tax_deducted_so_far,
            } => {
                let slr_factor = self.slr_factor(self.current_date.year())?;
                let base = *amount_at_year_start
                    + *year_deposit_first_half
                    + *year_deposit_second_half * dec!(0.5);
                let predicted = round2(base * slr_factor * dec!(0.3));
                Ok((predicted - *tax_deducted_so_far).max(Decimal::ZERO))
            }
        }
    }

    /// Yield-tax rate factor for a taxation year: the SLR in force on
    /// November 30 of the preceding year plus one percentage point,
    /// floored at 1.25%.
    fn slr_factor(&self, taxation_year: i32) -> SimResult<Decimal> {
        let slr = self
            .rates
            .rate_effective_on(ymd(taxation_year - 1, 11, 30))?;
        Ok((slr + dec!(0.01)).max(dec!(0.0125)))
    }

    /// Month-entry hook: settle the previously scheduled deduction, then
    /// let the wrapper schedule the next one.
    fn on_enter_month(&mut self) -> SimResult<()> {
        let date = self.current_date;
        let month = date.month();

        // Market value before settlement. The January snapshot and the
        // Direct wrapper's prediction both read it; settlement itself only
        // moves cash, so the value is the same afterwards.
        let january_value = if month == 1 {
            self.current_value()?
        } else {
            Decimal::ZERO
        };

        // Settle what was scheduled at the previous scheduling month.
        if self.due_tax_deduction < Decimal::ZERO {
            return Err(SimError::NegativeTaxDeduction {
                amount: self.due_tax_deduction,
                date,
            });
        }
        if self.due_tax_deduction > self.depot_value {
            return Err(SimError::TaxSettlementShortfall {
                due: self.due_tax_deduction,
                available: self.depot_value,
                date,
            });
        }
        self.depot_value -= self.due_tax_deduction;
        self.total_tax_paid += self.due_tax_deduction;
        self.due_tax_deduction = Decimal::ZERO;

        // Schedule the next deduction.
        match &mut self.wrapper {
            TaxWrapper::Basic => {}
            TaxWrapper::Direct {
                pending_tax_next_year,
            } => {
                if month == 1 {
                    self.due_tax_deduction = *pending_tax_next_year;
                    *pending_tax_next_year = round2(january_value * dec!(0.004) * dec!(0.3));
                    debug!(
                        "{}: direct tax due {}, predicted for next year {}",
                        date, self.due_tax_deduction, pending_tax_next_year
                    );
                }
            }
            TaxWrapper::Insurance {
                amount_at_year_start,
                year_deposit_first_half,
                year_deposit_second_half,
                tax_deducted_so_far,
            } => {
                if let Some(fraction) = quarter_fraction(month) {
                    // January taxes the year just ended, using the snapshot
                    // and deposit buckets accumulated over that year.
                    let taxation_year = if month == 1 {
                        date.year() - 1
                    } else {
                        date.year()
                    };
                    let slr = self
                        .rates
                        .rate_effective_on(ymd(taxation_year - 1, 11, 30))?;
                    let slr_factor = (slr + dec!(0.01)).max(dec!(0.0125));
                    let base = *amount_at_year_start
                        + *year_deposit_first_half
                        + *year_deposit_second_half * dec!(0.5);
                    let predicted = round2(base * slr_factor * dec!(0.3));
                    let total_due_now = round2(predicted * fraction);
                    let delta = total_due_now - *tax_deducted_so_far;
                    if delta < Decimal::ZERO {
                        return Err(SimError::NegativeTaxDeduction {
                            amount: delta,
                            date,
                        });
                    }
                    *tax_deducted_so_far += delta;
                    self.due_tax_deduction = delta;
                    debug!(
                        "{}: yield tax base {}, factor {}, due {}",
                        date, base, slr_factor, delta
                    );
                }
                if month == 1 {
                    *year_deposit_first_half = Decimal::ZERO;
                    *year_deposit_second_half = Decimal::ZERO;
                    *tax_deducted_so_far = Decimal::ZERO;
                    *amount_at_year_start = january_value;
                }
            }
        }

        Ok(())
    }
}
