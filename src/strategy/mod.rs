pub mod rsi_reversion;
pub mod sma_crossover;

use crate::data::Frame;
use crate::error::StrategyError;

//strategy interface: a pure mapping from the price table to a signal series
//the engine lags the signal one bar before it becomes a position
pub trait Strategy: Send + Sync {
    //returns the strategy name
    fn name(&self) -> &str {
        "custom"
    }

    //maps the price table to one signal value per row
    fn signal(&self, data: &Frame) -> Result<Vec<f64>, StrategyError>;
}

//plain functions and closures are strategies too
impl<F> Strategy for F
where
    F: Fn(&Frame) -> Result<Vec<f64>, StrategyError> + Send + Sync,
{
    fn signal(&self, data: &Frame) -> Result<Vec<f64>, StrategyError> {
        self(data)
    }
}

//always fully invested
#[derive(Debug, Clone, Copy, Default)]
pub struct BuyAndHold;

impl Strategy for BuyAndHold {
    fn name(&self) -> &str {
        "Buy and Hold"
    }

    fn signal(&self, data: &Frame) -> Result<Vec<f64>, StrategyError> {
        Ok(vec![1.0; data.len()])
    }
}
