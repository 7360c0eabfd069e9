use thiserror::Error;

//malformed price table or engine parameters
#[derive(Error, Debug)]
pub enum InputError {
    #[error("price table is empty")]
    Empty,
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("timestamps must be strictly increasing and unique (violation at row {0})")]
    NonMonotonicIndex(usize),
    #[error("column '{name}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("close price must be positive and finite, got {value} at row {row}")]
    InvalidClose { row: usize, value: f64 },
    #[error("parameter {name} out of range: {value}")]
    ParameterOutOfRange { name: &'static str, value: f64 },
}

//strategy raised or produced an unusable signal series
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("strategy '{name}' failed: {reason}")]
    Failed { name: String, reason: String },
    #[error("signal length {actual} does not match price rows {expected}")]
    Misaligned { expected: usize, actual: usize },
    #[error("non-finite signal value at row {0}")]
    NonFinite(usize),
}

//undefined arithmetic in a sizing or allocation formula
#[derive(Error, Debug)]
pub enum ComputationError {
    #[error("win/loss ratio must be finite and non-zero, got {0}")]
    ZeroWinLossRatio(f64),
    #[error("win rate must be finite, got {0}")]
    NonFiniteWinRate(f64),
    #[error("asset count must be non-zero")]
    NoAssets,
    #[error("volatility of asset {index} is zero or non-finite")]
    DegenerateVolatility { index: usize },
    #[error("return series for asset {index} is too short")]
    InsufficientReturns { index: usize },
    #[error("realized volatility must be positive and finite, got {0}")]
    NonPositiveRealizedVol(f64),
}

//engine-level failure surfaced at the run()/summary() boundary
#[derive(Error, Debug)]
pub enum BacktestError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Strategy(#[from] StrategyError),
    //summary requested before a successful run
    #[error("no results to summarize; run the backtest first")]
    NotRun,
}
