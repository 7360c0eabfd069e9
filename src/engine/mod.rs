pub mod backtest;
pub mod sweep;

pub use backtest::{BacktestConfig, BacktestEngine};
pub use sweep::{run_sweep, SweepOutcome};
