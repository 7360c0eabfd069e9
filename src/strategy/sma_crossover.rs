use crate::data::ops::rolling_mean;
use crate::data::Frame;
use crate::error::StrategyError;
use crate::strategy::Strategy;

//long while the fast sma is above the slow sma, flat otherwise
//flat during the warmup window where either average is undefined
#[derive(Debug, Clone)]
pub struct SmaCrossoverStrategy {
    fast_window: usize,
    slow_window: usize,
    name: String,
}

impl SmaCrossoverStrategy {
    pub fn new(fast_window: usize, slow_window: usize) -> Self {
        SmaCrossoverStrategy {
            fast_window,
            slow_window,
            name: format!("SMA Crossover {}/{}", fast_window, slow_window),
        }
    }
}

impl Strategy for SmaCrossoverStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn signal(&self, data: &Frame) -> Result<Vec<f64>, StrategyError> {
        let closes = data.column("close").ok_or_else(|| StrategyError::Failed {
            name: self.name.clone(),
            reason: "missing close column".to_string(),
        })?;

        let fast = rolling_mean(closes, self.fast_window);
        let slow = rolling_mean(closes, self.slow_window);

        Ok(fast
            .iter()
            .zip(&slow)
            .map(|(&f, &s)| {
                if f.is_nan() || s.is_nan() {
                    0.0
                } else if f > s {
                    1.0
                } else {
                    0.0
                }
            })
            .collect())
    }
}
