use statrs::statistics::Statistics;

//single-pass vector transforms over numeric columns
//these are the only table operations the simulation requires

//lags a series by one step, filling the first slot
pub fn shift(values: &[f64], fill: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(values.len());
    out.push(fill);
    out.extend_from_slice(&values[..values.len() - 1]);
    out
}

//fractional change between consecutive values, first element 0
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(values.len());
    out.push(0.0);
    for i in 1..values.len() {
        out.push(values[i] / values[i - 1] - 1.0);
    }
    out
}

//compounds a return series into an equity curve starting from initial
//not clamped at zero: a leveraged loss can push equity negative
pub fn compound(returns: &[f64], initial: f64) -> Vec<f64> {
    let mut equity = Vec::with_capacity(returns.len());
    let mut acc = initial;
    for r in returns {
        acc *= 1.0 + r;
        equity.push(acc);
    }
    equity
}

//running maximum of a series
pub fn running_max(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut peak = f64::NEG_INFINITY;
    for &v in values {
        if v > peak {
            peak = v;
        }
        out.push(peak);
    }
    out
}

//rolling mean over a trailing window, nan during warmup
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |slice| slice.mean())
}

//rolling sample standard deviation over a trailing window, nan during warmup
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |slice| slice.std_dev())
}

fn rolling<F>(values: &[f64], window: usize, agg: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 {
        return out;
    }
    for t in (window - 1)..values.len() {
        out[t] = agg(&values[t + 1 - window..=t]);
    }
    out
}
