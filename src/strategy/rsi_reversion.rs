use crate::data::Frame;
use crate::error::StrategyError;
use crate::strategy::Strategy;

//mean-reversion entry below the oversold level, exit above the overbought level
//holds the last state in between, flat during warmup
#[derive(Debug, Clone)]
pub struct RsiReversionStrategy {
    lookback: usize,
    oversold: f64,
    overbought: f64,
}

impl RsiReversionStrategy {
    pub fn new(lookback: usize, oversold: f64, overbought: f64) -> Self {
        RsiReversionStrategy {
            lookback,
            oversold,
            overbought,
        }
    }
}

//relative strength index over a trailing window, nan during warmup
pub fn rsi_series(closes: &[f64], lookback: usize) -> Vec<f64> {
    let n = closes.len();
    let mut out = vec![f64::NAN; n];
    if lookback == 0 || n < lookback + 1 {
        return out;
    }

    for t in lookback..n {
        let mut gains = 0.0;
        let mut losses = 0.0;
        for i in (t - lookback + 1)..=t {
            let change = closes[i] - closes[i - 1];
            if change > 0.0 {
                gains += change;
            } else {
                losses -= change;
            }
        }

        let avg_gain = gains / lookback as f64;
        let avg_loss = losses / lookback as f64;

        out[t] = if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };
    }

    out
}

impl Strategy for RsiReversionStrategy {
    fn name(&self) -> &str {
        "RSI Reversion"
    }

    fn signal(&self, data: &Frame) -> Result<Vec<f64>, StrategyError> {
        let closes = data.column("close").ok_or_else(|| StrategyError::Failed {
            name: self.name().to_string(),
            reason: "missing close column".to_string(),
        })?;

        let rsi = rsi_series(closes, self.lookback);

        let mut held = 0.0;
        let signal = rsi
            .iter()
            .map(|&value| {
                if value.is_nan() {
                    held = 0.0;
                } else if value < self.oversold {
                    held = 1.0;
                } else if value > self.overbought {
                    held = 0.0;
                }
                held
            })
            .collect();

        Ok(signal)
    }
}
