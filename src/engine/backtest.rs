use crate::data::ops::{compound, pct_change, shift};
use crate::data::Frame;
use crate::error::{BacktestError, InputError, StrategyError};
use crate::metrics::PerformanceSummary;
use crate::strategy::Strategy;
use tracing::{error, warn};

//configuration for a single simulation run
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    //proportional cost rates applied on position changes
    pub commission: f64,
    pub slippage: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 100_000.0,
            commission: 0.0,
            slippage: 0.0,
        }
    }
}

impl BacktestConfig {
    //capital must be positive, cost rates within [0, 1)
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(InputError::ParameterOutOfRange {
                name: "initial_capital",
                value: self.initial_capital,
            });
        }
        for (name, value) in [("commission", self.commission), ("slippage", self.slippage)] {
            if !(0.0..1.0).contains(&value) {
                return Err(InputError::ParameterOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

//simulates one strategy over a price table
//holds its own working copy of the inputs; results stay empty until a successful run
pub struct BacktestEngine {
    data: Frame,
    strategy: Box<dyn Strategy>,
    config: BacktestConfig,
    results: Option<Frame>,
}

impl BacktestEngine {
    //validates the configuration and the close column up front
    pub fn new(
        data: Frame,
        strategy: Box<dyn Strategy>,
        config: BacktestConfig,
    ) -> Result<Self, BacktestError> {
        config.validate()?;

        let closes = data.require_column("close")?;
        for (row, &value) in closes.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(InputError::InvalidClose { row, value }.into());
            }
        }

        Ok(BacktestEngine {
            data,
            strategy,
            config,
            results: None,
        })
    }

    //runs the simulation: signal, lagged position, cost-adjusted return, compounded equity
    //recomputes from the original inputs on every call
    pub fn run(&mut self) -> Result<&Frame, BacktestError> {
        self.results = None;

        let table = match self.simulate() {
            Ok(table) => table,
            Err(e) => {
                error!(strategy = self.strategy.name(), error = %e, "backtest run failed");
                return Err(e);
            }
        };

        Ok(self.results.insert(table))
    }

    fn simulate(&self) -> Result<Frame, BacktestError> {
        let n = self.data.len();
        let signal = self.strategy.signal(&self.data)?;

        if signal.len() != n {
            return Err(StrategyError::Misaligned {
                expected: n,
                actual: signal.len(),
            }
            .into());
        }
        if let Some(row) = signal.iter().position(|v| !v.is_finite()) {
            return Err(StrategyError::NonFinite(row).into());
        }

        let closes = self.data.require_column("close")?;

        //lag the signal one bar so no position sees its own bar
        let position = shift(&signal, 0.0);
        let returns = pct_change(closes);

        //a cost is charged on every position change, including the entry from flat
        let cost_rate = self.config.commission + self.config.slippage;
        let previous_position = shift(&position, 0.0);
        let strategy_returns: Vec<f64> = position
            .iter()
            .zip(&returns)
            .zip(&previous_position)
            .map(|((&pos, &ret), &prev)| pos * ret - (pos - prev).abs() * cost_rate)
            .collect();

        let equity_curve = compound(&strategy_returns, self.config.initial_capital);

        let mut table = self.data.clone();
        table.insert_column("signal", signal)?;
        table.insert_column("position", position)?;
        table.insert_column("returns", returns)?;
        table.insert_column("strategy_returns", strategy_returns)?;
        table.insert_column("equity_curve", equity_curve)?;
        Ok(table)
    }

    //reduces the stored run to summary statistics
    pub fn summary(&self) -> Result<PerformanceSummary, BacktestError> {
        let Some(results) = &self.results else {
            warn!("no results to summarize; run the backtest first");
            return Err(BacktestError::NotRun);
        };

        let equity = results.require_column("equity_curve")?;
        let strategy_returns = results.require_column("strategy_returns")?;
        Ok(PerformanceSummary::from_run(
            equity,
            strategy_returns,
            self.config.initial_capital,
        ))
    }

    //the augmented table of the last successful run
    pub fn results(&self) -> Option<&Frame> {
        self.results.as_ref()
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::BuyAndHold;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn close_frame(closes: Vec<f64>) -> Frame {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let index = (0..closes.len())
            .map(|i| start + Duration::days(i as i64))
            .collect();
        Frame::with_close(index, closes).unwrap()
    }

    fn config(capital: f64, commission: f64, slippage: f64) -> BacktestConfig {
        BacktestConfig {
            initial_capital: capital,
            commission,
            slippage,
        }
    }

    #[test]
    fn buy_and_hold_scenario_matches_hand_computation() {
        let frame = close_frame(vec![100.0, 101.0, 99.0, 102.0]);
        let mut engine =
            BacktestEngine::new(frame, Box::new(BuyAndHold), config(100_000.0, 0.0, 0.0))
                .unwrap();

        let table = engine.run().unwrap();

        assert_eq!(table.column("position").unwrap(), &[0.0, 1.0, 1.0, 1.0]);

        let returns = table.column("returns").unwrap();
        assert_eq!(returns[0], 0.0);
        assert_relative_eq!(returns[1], 0.01, epsilon = 1e-9);
        assert_relative_eq!(returns[2], -0.019802, epsilon = 1e-6);
        assert_relative_eq!(returns[3], 0.030303, epsilon = 1e-6);

        //with zero costs the strategy return equals position times return
        assert_eq!(table.column("strategy_returns").unwrap(), returns);

        let equity = table.column("equity_curve").unwrap();
        assert_relative_eq!(equity[0], 100_000.0, epsilon = 1e-6);
        assert_relative_eq!(equity[1], 101_000.0, epsilon = 1e-6);
        assert_relative_eq!(equity[2], 99_000.0, epsilon = 1e-2);
        assert_relative_eq!(equity[3], 102_000.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_signal_keeps_equity_at_initial_capital() {
        let frame = close_frame(vec![100.0, 105.0, 95.0, 110.0, 90.0]);
        let flat = |data: &Frame| -> Result<Vec<f64>, StrategyError> { Ok(vec![0.0; data.len()]) };
        let mut engine =
            BacktestEngine::new(frame, Box::new(flat), config(100_000.0, 0.001, 0.001)).unwrap();

        let table = engine.run().unwrap();
        for &equity in table.column("equity_curve").unwrap() {
            assert_relative_eq!(equity, 100_000.0);
        }
    }

    #[test]
    fn position_is_the_lagged_signal() {
        let frame = close_frame(vec![100.0, 101.0, 102.0, 103.0]);
        let staircase =
            |_: &Frame| -> Result<Vec<f64>, StrategyError> { Ok(vec![0.5, -1.0, 1.0, 0.0]) };
        let mut engine =
            BacktestEngine::new(frame, Box::new(staircase), config(100_000.0, 0.0, 0.0)).unwrap();

        let table = engine.run().unwrap();
        assert_eq!(table.column("position").unwrap(), &[0.0, 0.5, -1.0, 1.0]);
    }

    #[test]
    fn costs_are_charged_on_every_position_change() {
        let frame = close_frame(vec![100.0, 101.0, 102.0]);
        let mut engine =
            BacktestEngine::new(frame, Box::new(BuyAndHold), config(100_000.0, 0.001, 0.0005))
                .unwrap();

        let table = engine.run().unwrap();
        let strategy_returns = table.column("strategy_returns").unwrap();

        //first bar: no position, no trade, no cost
        assert_eq!(strategy_returns[0], 0.0);
        //second bar: entry from flat pays the full cost rate
        assert_relative_eq!(strategy_returns[1], 0.01 - 0.0015, epsilon = 1e-12);
        //third bar: position unchanged, no cost
        assert_relative_eq!(
            strategy_returns[2],
            102.0 / 101.0 - 1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn run_is_idempotent() {
        let frame = close_frame(vec![100.0, 101.0, 99.0, 102.0]);
        let mut engine =
            BacktestEngine::new(frame, Box::new(BuyAndHold), config(100_000.0, 0.001, 0.0))
                .unwrap();

        let first: Vec<f64> = engine.run().unwrap().column("equity_curve").unwrap().to_vec();
        let second: Vec<f64> = engine.run().unwrap().column("equity_curve").unwrap().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn misaligned_signal_is_a_strategy_error() {
        let frame = close_frame(vec![100.0, 101.0, 99.0]);
        let short = |_: &Frame| -> Result<Vec<f64>, StrategyError> { Ok(vec![1.0, 1.0]) };
        let mut engine =
            BacktestEngine::new(frame, Box::new(short), config(100_000.0, 0.0, 0.0)).unwrap();

        let err = engine.run().unwrap_err();
        assert!(matches!(
            err,
            BacktestError::Strategy(StrategyError::Misaligned {
                expected: 3,
                actual: 2
            })
        ));
        assert!(engine.results().is_none());
    }

    #[test]
    fn non_finite_signal_is_a_strategy_error() {
        let frame = close_frame(vec![100.0, 101.0]);
        let nan = |_: &Frame| -> Result<Vec<f64>, StrategyError> { Ok(vec![1.0, f64::NAN]) };
        let mut engine =
            BacktestEngine::new(frame, Box::new(nan), config(100_000.0, 0.0, 0.0)).unwrap();

        let err = engine.run().unwrap_err();
        assert!(matches!(
            err,
            BacktestError::Strategy(StrategyError::NonFinite(1))
        ));
    }

    #[test]
    fn failing_strategy_leaves_the_engine_without_results() {
        let frame = close_frame(vec![100.0, 101.0]);
        let failing = |_: &Frame| -> Result<Vec<f64>, StrategyError> {
            Err(StrategyError::Failed {
                name: "broken".to_string(),
                reason: "no data feed".to_string(),
            })
        };
        let mut engine =
            BacktestEngine::new(frame, Box::new(failing), config(100_000.0, 0.0, 0.0)).unwrap();

        assert!(engine.run().is_err());
        assert!(engine.results().is_none());
        assert!(matches!(engine.summary(), Err(BacktestError::NotRun)));
    }

    #[test]
    fn summary_before_run_is_a_state_error() {
        let frame = close_frame(vec![100.0, 101.0]);
        let engine =
            BacktestEngine::new(frame, Box::new(BuyAndHold), config(100_000.0, 0.0, 0.0)).unwrap();
        assert!(matches!(engine.summary(), Err(BacktestError::NotRun)));
    }

    #[test]
    fn summary_reports_nan_sharpe_for_a_flat_run() {
        let frame = close_frame(vec![100.0, 105.0, 95.0]);
        let flat = |data: &Frame| -> Result<Vec<f64>, StrategyError> { Ok(vec![0.0; data.len()]) };
        let mut engine =
            BacktestEngine::new(frame, Box::new(flat), config(100_000.0, 0.0, 0.0)).unwrap();

        engine.run().unwrap();
        let summary = engine.summary().unwrap();
        assert_eq!(summary.total_return, 0.0);
        assert!(summary.sharpe_ratio.is_nan());
        assert_eq!(summary.max_drawdown, 0.0);
    }

    #[test]
    fn rejects_out_of_range_cost_rates() {
        let frame = close_frame(vec![100.0, 101.0]);
        let err = BacktestEngine::new(frame, Box::new(BuyAndHold), config(100_000.0, 1.5, 0.0))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            BacktestError::Input(InputError::ParameterOutOfRange {
                name: "commission",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_positive_capital() {
        let frame = close_frame(vec![100.0, 101.0]);
        let err = BacktestEngine::new(frame, Box::new(BuyAndHold), config(0.0, 0.0, 0.0))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            BacktestError::Input(InputError::ParameterOutOfRange {
                name: "initial_capital",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_positive_close_prices() {
        let frame = close_frame(vec![100.0, 101.0]);
        let mut bad = frame.clone();
        bad.insert_column("close", vec![100.0, -1.0]).unwrap();
        let err = BacktestEngine::new(bad, Box::new(BuyAndHold), config(100_000.0, 0.0, 0.0))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            BacktestError::Input(InputError::InvalidClose { row: 1, .. })
        ));
    }

    #[test]
    fn rejects_a_table_without_a_close_column() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let frame = Frame::new(vec![start, start + Duration::days(1)]).unwrap();
        let err = BacktestEngine::new(frame, Box::new(BuyAndHold), BacktestConfig::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            BacktestError::Input(InputError::MissingColumn(_))
        ));
    }
}
