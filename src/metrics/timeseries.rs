use crate::data::ops::running_max;
use statrs::statistics::Statistics;

//assumed trading periods per year, fixed convention
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

//fractional decline from the running peak, elementwise, always <= 0
pub fn drawdown_series(equity: &[f64]) -> Vec<f64> {
    let peaks = running_max(equity);
    equity
        .iter()
        .zip(&peaks)
        .map(|(&e, &peak)| if peak != 0.0 { (e - peak) / peak } else { 0.0 })
        .collect()
}

//most negative drawdown, in [-1, 0] for any positive equity curve
pub fn max_drawdown(equity: &[f64]) -> f64 {
    drawdown_series(equity).iter().copied().fold(0.0, f64::min)
}

//sample standard deviation of per-period returns scaled to an annual horizon
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    returns.std_dev() * TRADING_DAYS_PER_YEAR.sqrt()
}
