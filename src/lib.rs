//a Rust-based vectorized strategy backtesting and risk management engine

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod risk;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        RsiParams, RunConfiguration, SmaParams, StrategyParams, StrategyType,
    };
    pub use crate::data::{load_csv, Frame};
    pub use crate::engine::{run_sweep, BacktestConfig, BacktestEngine, SweepOutcome};
    pub use crate::error::{BacktestError, ComputationError, InputError, StrategyError};
    pub use crate::metrics::{PerformanceSummary, TRADING_DAYS_PER_YEAR};
    pub use crate::risk::{capital_allocator, position_sizing};
    pub use crate::strategy::{
        rsi_reversion::RsiReversionStrategy, sma_crossover::SmaCrossoverStrategy, BuyAndHold,
        Strategy,
    };
}
