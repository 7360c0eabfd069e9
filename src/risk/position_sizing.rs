use crate::error::ComputationError;
use tracing::warn;

//stateless per-trade sizing formulas
//invalid numeric inputs yield a degenerate size of 0 rather than halting a batch

fn inputs_valid(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite() && *v >= 0.0)
}

//position size as a fixed fraction of total capital
pub fn fixed_fractional(capital: f64, risk_per_trade: f64) -> f64 {
    if !inputs_valid(&[capital, risk_per_trade]) {
        warn!(capital, risk_per_trade, "invalid fixed fractional inputs");
        return 0.0;
    }
    capital * risk_per_trade
}

//sizes a position from the stop distance
//a zero stop distance means no valid stop, so no position
pub fn volatility_position_size(
    capital: f64,
    entry_price: f64,
    stop_price: f64,
    volatility: f64,
    risk_per_trade: f64,
) -> f64 {
    if !inputs_valid(&[capital, entry_price, stop_price, volatility, risk_per_trade]) {
        warn!(capital, entry_price, stop_price, "invalid volatility sizing inputs");
        return 0.0;
    }
    let dollar_risk = (entry_price - stop_price).abs();
    if dollar_risk == 0.0 {
        return 0.0;
    }
    capital * risk_per_trade / dollar_risk
}

//sizes a position using the average true range as the risk distance
pub fn atr_position_size(
    capital: f64,
    entry_price: f64,
    atr: f64,
    risk_per_trade: f64,
    atr_multiplier: f64,
) -> f64 {
    if !inputs_valid(&[capital, entry_price, atr, risk_per_trade, atr_multiplier]) {
        warn!(capital, entry_price, atr, "invalid atr sizing inputs");
        return 0.0;
    }
    let dollar_risk = atr * atr_multiplier;
    if dollar_risk == 0.0 {
        return 0.0;
    }
    capital * risk_per_trade / dollar_risk
}

//clamps a size to the maximum allowed position
//an unusable limit leaves the size unchanged
pub fn max_position_limit(size: f64, max_position: f64) -> f64 {
    if !max_position.is_finite() || max_position < 0.0 {
        warn!(max_position, "invalid max position limit");
        return size;
    }
    size.min(max_position)
}

//optimal bet fraction given win rate and win/loss payoff ratio, floored at 0
pub fn kelly_criterion(win_rate: f64, win_loss_ratio: f64) -> Result<f64, ComputationError> {
    if !win_rate.is_finite() {
        return Err(ComputationError::NonFiniteWinRate(win_rate));
    }
    if win_loss_ratio == 0.0 || !win_loss_ratio.is_finite() {
        return Err(ComputationError::ZeroWinLossRatio(win_loss_ratio));
    }
    let kelly = win_rate - (1.0 - win_rate) / win_loss_ratio;
    Ok(kelly.max(0.0))
}

//fixed dollar amount per trade, capped by available capital
pub fn dollar_position_size(capital: f64, dollar_per_trade: f64) -> f64 {
    if !inputs_valid(&[capital, dollar_per_trade]) {
        warn!(capital, dollar_per_trade, "invalid dollar sizing inputs");
        return 0.0;
    }
    capital.min(dollar_per_trade)
}
