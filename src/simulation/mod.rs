//! Month-by-month simulation of the two repayment strategies

pub mod driver;
pub mod rows;

pub use driver::{RunParameters, SimulationDriver};
pub use rows::{
    write_report, AmortizationResult, AmortizationRow, AmortizationSummary, FundResult, FundRow,
    FundSummary,
};
