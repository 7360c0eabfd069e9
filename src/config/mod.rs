pub mod backtest_config;

pub use backtest_config::{RsiParams, RunConfiguration, SmaParams, StrategyParams, StrategyType};
