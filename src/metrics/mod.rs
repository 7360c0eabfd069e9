pub mod summary;
pub mod timeseries;

pub use summary::PerformanceSummary;
pub use timeseries::{annualized_volatility, drawdown_series, max_drawdown, TRADING_DAYS_PER_YEAR};
