//! Historical market data: share prices and the government reference rate

mod prices;
mod rates;
pub mod loader;

pub use prices::PriceSeries;
pub use rates::RateSeries;
