use crate::error::ComputationError;
use crate::metrics::timeseries::max_drawdown;
use statrs::statistics::Statistics;

//stateless cross-asset allocation formulas

//splits capital equally among all assets
pub fn equal_weight_allocation(
    n_assets: usize,
    total_capital: f64,
) -> Result<Vec<f64>, ComputationError> {
    if n_assets == 0 {
        return Err(ComputationError::NoAssets);
    }
    Ok(vec![total_capital / n_assets as f64; n_assets])
}

//weights each asset by the inverse of its return volatility
pub fn volatility_weighted_allocation(
    returns_per_asset: &[Vec<f64>],
    total_capital: f64,
) -> Result<Vec<f64>, ComputationError> {
    if returns_per_asset.is_empty() {
        return Err(ComputationError::NoAssets);
    }

    let mut inverse_vols = Vec::with_capacity(returns_per_asset.len());
    for (index, returns) in returns_per_asset.iter().enumerate() {
        if returns.len() < 2 {
            return Err(ComputationError::InsufficientReturns { index });
        }
        let vol = returns.as_slice().std_dev();
        if vol == 0.0 || !vol.is_finite() {
            return Err(ComputationError::DegenerateVolatility { index });
        }
        inverse_vols.push(1.0 / vol);
    }

    let total: f64 = inverse_vols.iter().sum();
    Ok(inverse_vols
        .into_iter()
        .map(|inv| inv / total * total_capital)
        .collect())
}

//inverse-volatility proxy, not true marginal-risk parity
pub fn risk_parity_allocation(
    returns_per_asset: &[Vec<f64>],
    total_capital: f64,
) -> Result<Vec<f64>, ComputationError> {
    volatility_weighted_allocation(returns_per_asset, total_capital)
}

//checks portfolio drawdown against a threshold
//returns (breached, worst drawdown), where the worst drawdown is <= 0
pub fn max_drawdown_control(portfolio_values: &[f64], max_allowed: f64) -> (bool, f64) {
    let worst = max_drawdown(portfolio_values);
    (worst < -max_allowed, worst)
}

//scales leverage to hit a volatility target, clamped to [0, max_leverage]
pub fn dynamic_leverage(
    target_vol: f64,
    realized_vol: f64,
    base_leverage: f64,
    max_leverage: f64,
) -> Result<f64, ComputationError> {
    if realized_vol <= 0.0 || !realized_vol.is_finite() {
        return Err(ComputationError::NonPositiveRealizedVol(realized_vol));
    }
    Ok((base_leverage * target_vol / realized_vol).clamp(0.0, max_leverage))
}

//caps each allocation at the per-asset maximum
pub fn capital_allocation_limit(allocation: &[f64], max_per_asset: f64) -> Vec<f64> {
    allocation.iter().map(|a| a.min(max_per_asset)).collect()
}
