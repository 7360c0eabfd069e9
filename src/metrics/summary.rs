use crate::metrics::timeseries::{annualized_volatility, max_drawdown, TRADING_DAYS_PER_YEAR};
use indexmap::IndexMap;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};

//summary statistics of one completed backtest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    //nan when annualized volatility is zero, never a fault
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
}

impl PerformanceSummary {
    //reduces a completed run to scalar metrics
    pub fn from_run(equity: &[f64], strategy_returns: &[f64], initial_capital: f64) -> Self {
        let n = equity.len() as f64;
        let final_equity = equity.last().copied().unwrap_or(initial_capital);

        let total_return = final_equity / initial_capital - 1.0;
        let annualized_return = (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / n) - 1.0;
        let annualized_volatility = annualized_volatility(strategy_returns);

        let sharpe_ratio = if annualized_volatility == 0.0 {
            f64::NAN
        } else {
            annualized_return / annualized_volatility
        };

        PerformanceSummary {
            total_return,
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            max_drawdown: max_drawdown(equity),
        }
    }

    //metric mapping keyed by the reporting names
    pub fn as_map(&self) -> IndexMap<&'static str, f64> {
        IndexMap::from([
            ("Total Return", self.total_return),
            ("Annualized Return", self.annualized_return),
            ("Annualized Volatility", self.annualized_volatility),
            ("Sharpe Ratio", self.sharpe_ratio),
            ("Max Drawdown", self.max_drawdown),
        ])
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        table.add_row(Row::new(vec![
            Cell::new("Total Return"),
            Cell::new(&format!("{:.2}%", self.total_return * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Annualized Return"),
            Cell::new(&format!("{:.2}%", self.annualized_return * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Annualized Volatility"),
            Cell::new(&format!("{:.2}%", self.annualized_volatility * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Sharpe Ratio"),
            Cell::new(&if self.sharpe_ratio.is_nan() {
                "undefined".to_string()
            } else {
                format!("{:.3}", self.sharpe_ratio)
            }),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Max Drawdown"),
            Cell::new(&format!("{:.2}%", self.max_drawdown * 100.0)),
        ]));

        table.printstd();
    }
}
