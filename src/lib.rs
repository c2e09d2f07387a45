//! Mortgage Simulator - compares long-horizon repayment strategies
//!
//! This library provides:
//! - An amortizing mortgage balance model with a tax-deduction approximation
//! - A fund account with whole-share lot accounting under three tax
//!   wrappers (basic, direct ownership, insurance-wrapped)
//! - Historical share-price and government-rate series with loaders
//! - A month-by-month simulation driver coupling a hypothetical mortgage
//!   schedule to the actual one and emitting CSV-ready report rows

pub mod account;
mod dates;
pub mod error;
pub mod market;
pub mod money;
pub mod mortgage;
pub mod simulation;

// Re-export commonly used types
pub use account::{AccountKind, FundAccount};
pub use error::{SimError, SimResult};
pub use market::{PriceSeries, RateSeries};
pub use mortgage::Mortgage;
pub use simulation::{RunParameters, SimulationDriver};
