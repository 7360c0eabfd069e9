use crate::data::Frame;
use crate::engine::backtest::{BacktestConfig, BacktestEngine};
use crate::error::BacktestError;
use crate::metrics::PerformanceSummary;
use crate::strategy::Strategy;
use rayon::prelude::*;

//outcome of one strategy in a batch sweep
//failures travel as values so the rest of the batch keeps running
#[derive(Debug)]
pub struct SweepOutcome {
    pub name: String,
    pub summary: Result<PerformanceSummary, BacktestError>,
}

//runs one backtest per strategy in parallel over the same price table
pub fn run_sweep(
    data: &Frame,
    strategies: Vec<Box<dyn Strategy>>,
    config: &BacktestConfig,
) -> Vec<SweepOutcome> {
    strategies
        .into_par_iter()
        .map(|strategy| {
            let name = strategy.name().to_string();
            let summary = BacktestEngine::new(data.clone(), strategy, config.clone())
                .and_then(|mut engine| {
                    engine.run()?;
                    engine.summary()
                });
            SweepOutcome { name, summary }
        })
        .collect()
}
