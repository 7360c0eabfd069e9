use crate::engine::BacktestConfig;
use crate::strategy::{
    rsi_reversion::RsiReversionStrategy, sma_crossover::SmaCrossoverStrategy, BuyAndHold, Strategy,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

//strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyType {
    BuyAndHold,
    SmaCrossover,
    RsiReversion,
}

impl StrategyType {
    //parse strategy type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hold" | "buy_and_hold" => Some(StrategyType::BuyAndHold),
            "sma" | "sma_crossover" => Some(StrategyType::SmaCrossover),
            "rsi" | "rsi_reversion" => Some(StrategyType::RsiReversion),
            _ => None,
        }
    }
}

//sma crossover strategy parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmaParams {
    pub fast_window: usize,
    pub slow_window: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        SmaParams {
            fast_window: 20,
            slow_window: 50,
        }
    }
}

//rsi reversion strategy parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsiParams {
    pub lookback: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        RsiParams {
            lookback: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

//strategy-specific parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StrategyParams {
    Hold,
    Sma(SmaParams),
    Rsi(RsiParams),
}

impl StrategyParams {
    //the strategy type these parameters belong to
    pub fn strategy_type(&self) -> StrategyType {
        match self {
            StrategyParams::Hold => StrategyType::BuyAndHold,
            StrategyParams::Sma(_) => StrategyType::SmaCrossover,
            StrategyParams::Rsi(_) => StrategyType::RsiReversion,
        }
    }
}

//complete run configuration for the cli
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfiguration {
    //data
    pub data_path: PathBuf,

    //engine settings
    pub initial_capital: f64,
    pub commission: f64,
    pub slippage: f64,

    //strategy
    pub strategy_type: StrategyType,
    pub strategy_params: StrategyParams,

    //optional output path for the augmented table
    pub output_csv: Option<PathBuf>,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        RunConfiguration {
            data_path: PathBuf::from("data.csv"),
            initial_capital: 100_000.0,
            commission: 0.0,
            slippage: 0.0,
            strategy_type: StrategyType::BuyAndHold,
            strategy_params: StrategyParams::Hold,
            output_csv: None,
        }
    }
}

impl RunConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: RunConfiguration = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    //the declared strategy type must agree with the params variant
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.strategy_type != self.strategy_params.strategy_type() {
            anyhow::bail!(
                "strategy_type {:?} does not match strategy_params {:?}",
                self.strategy_type,
                self.strategy_params
            );
        }
        Ok(())
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn to_backtest_config(&self) -> BacktestConfig {
        BacktestConfig {
            initial_capital: self.initial_capital,
            commission: self.commission,
            slippage: self.slippage,
        }
    }

    pub fn build_strategy(&self) -> Box<dyn Strategy> {
        match &self.strategy_params {
            StrategyParams::Hold => Box::new(BuyAndHold),
            StrategyParams::Sma(params) => Box::new(SmaCrossoverStrategy::new(
                params.fast_window,
                params.slow_window,
            )),
            StrategyParams::Rsi(params) => Box::new(RsiReversionStrategy::new(
                params.lookback,
                params.oversold,
                params.overbought,
            )),
        }
    }
}
