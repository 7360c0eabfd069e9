use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pozole::prelude::*;
use prettytable::{Cell, Row, Table};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pozole")]
#[command(about = "A Rust-based vectorized strategy backtesting engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a single backtest
    Run {
        //path to a json run configuration (replaces the flags below)
        #[arg(long)]
        config: Option<PathBuf>,

        //path to csv price data
        #[arg(long)]
        data: Option<PathBuf>,

        //strategy type (hold, sma, rsi)
        #[arg(long, default_value = "hold")]
        strategy: String,

        //starting capital
        #[arg(long, default_value = "100000")]
        initial_capital: f64,

        //proportional commission rate per position change
        #[arg(long, default_value = "0.0")]
        commission: f64,

        //proportional slippage rate per position change
        #[arg(long, default_value = "0.0")]
        slippage: f64,

        //fast sma window (for sma strategy)
        #[arg(long)]
        fast: Option<usize>,

        //slow sma window (for sma strategy)
        #[arg(long)]
        slow: Option<usize>,

        //rsi lookback period (for rsi strategy)
        #[arg(long)]
        rsi_lookback: Option<usize>,

        //rsi oversold threshold (for rsi strategy)
        #[arg(long)]
        rsi_lower: Option<f64>,

        //rsi overbought threshold (for rsi strategy)
        #[arg(long)]
        rsi_upper: Option<f64>,

        //output path for the augmented table csv
        #[arg(long)]
        output_csv: Option<PathBuf>,
    },
    //run an sma parameter grid in parallel
    Sweep {
        //path to csv price data
        #[arg(long)]
        data: PathBuf,

        //starting capital
        #[arg(long, default_value = "100000")]
        initial_capital: f64,

        //proportional commission rate per position change
        #[arg(long, default_value = "0.0")]
        commission: f64,

        //proportional slippage rate per position change
        #[arg(long, default_value = "0.0")]
        slippage: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            strategy,
            initial_capital,
            commission,
            slippage,
            fast,
            slow,
            rsi_lookback,
            rsi_lower,
            rsi_upper,
            output_csv,
        } => {
            let configuration = match config {
                Some(path) => RunConfiguration::from_json_file(&path)
                    .context(format!("Failed to load configuration from {:?}", path))?,
                None => build_configuration(
                    data,
                    strategy,
                    initial_capital,
                    commission,
                    slippage,
                    fast,
                    slow,
                    rsi_lookback,
                    rsi_lower,
                    rsi_upper,
                    output_csv,
                )?,
            };
            run_backtest(configuration)?;
        }
        Commands::Sweep {
            data,
            initial_capital,
            commission,
            slippage,
        } => {
            run_parameter_sweep(data, initial_capital, commission, slippage)?;
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn build_configuration(
    data: Option<PathBuf>,
    strategy: String,
    initial_capital: f64,
    commission: f64,
    slippage: f64,
    fast: Option<usize>,
    slow: Option<usize>,
    rsi_lookback: Option<usize>,
    rsi_lower: Option<f64>,
    rsi_upper: Option<f64>,
    output_csv: Option<PathBuf>,
) -> Result<RunConfiguration> {
    let data_path = data.ok_or_else(|| anyhow::anyhow!("--data is required without --config"))?;

    let strategy_type = StrategyType::parse(&strategy)
        .ok_or_else(|| anyhow::anyhow!("Unknown strategy: {}", strategy))?;

    let strategy_params = match strategy_type {
        StrategyType::BuyAndHold => StrategyParams::Hold,
        StrategyType::SmaCrossover => {
            let defaults = SmaParams::default();
            StrategyParams::Sma(SmaParams {
                fast_window: fast.unwrap_or(defaults.fast_window),
                slow_window: slow.unwrap_or(defaults.slow_window),
            })
        }
        StrategyType::RsiReversion => {
            let defaults = RsiParams::default();
            StrategyParams::Rsi(RsiParams {
                lookback: rsi_lookback.unwrap_or(defaults.lookback),
                oversold: rsi_lower.unwrap_or(defaults.oversold),
                overbought: rsi_upper.unwrap_or(defaults.overbought),
            })
        }
    };

    Ok(RunConfiguration {
        data_path,
        initial_capital,
        commission,
        slippage,
        strategy_type,
        strategy_params,
        output_csv,
    })
}

fn run_backtest(configuration: RunConfiguration) -> Result<()> {
    println!("Pozole Backtesting Engine");
    println!("=========================\n");

    println!("Loading data from {:?}...", configuration.data_path);
    let frame = load_csv(&configuration.data_path).context(format!(
        "Failed to load data from {:?}",
        configuration.data_path
    ))?;

    println!("Loaded {} bars", frame.len());
    println!(
        "Date range: {} to {}\n",
        frame.index().first().map(|t| t.to_rfc3339()).unwrap_or_default(),
        frame.index().last().map(|t| t.to_rfc3339()).unwrap_or_default()
    );

    let strategy = configuration.build_strategy();
    println!("Strategy: {}", strategy.name());
    println!("Initial capital: ${:.2}", configuration.initial_capital);
    println!("Commission rate: {:.4}", configuration.commission);
    println!("Slippage rate: {:.4}\n", configuration.slippage);

    let mut engine =
        BacktestEngine::new(frame, strategy, configuration.to_backtest_config())?;

    println!("Running backtest...\n");
    engine.run()?;
    let summary = engine.summary()?;

    println!("Backtest Results");
    println!("================\n");
    summary.pretty_print_table();

    if let Some(path) = &configuration.output_csv {
        if let Some(results) = engine.results() {
            save_table_csv(results, path)?;
            println!("\nAugmented table saved to {:?}", path);
        }
    }

    Ok(())
}

fn run_parameter_sweep(
    data: PathBuf,
    initial_capital: f64,
    commission: f64,
    slippage: f64,
) -> Result<()> {
    println!("Pozole Parameter Sweep");
    println!("======================\n");

    let frame = load_csv(&data).context(format!("Failed to load data from {:?}", data))?;
    println!("Loaded {} bars\n", frame.len());

    let config = BacktestConfig {
        initial_capital,
        commission,
        slippage,
    };

    let mut strategies: Vec<Box<dyn Strategy>> = vec![Box::new(BuyAndHold)];
    for fast in [5, 10, 20] {
        for slow in [50, 100, 200] {
            strategies.push(Box::new(SmaCrossoverStrategy::new(fast, slow)));
        }
    }

    let outcomes = run_sweep(&frame, strategies, &config);

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Strategy"),
        Cell::new("Total Return"),
        Cell::new("Sharpe"),
        Cell::new("Max Drawdown"),
    ]));

    for outcome in &outcomes {
        match &outcome.summary {
            Ok(summary) => {
                table.add_row(Row::new(vec![
                    Cell::new(&outcome.name),
                    Cell::new(&format!("{:.2}%", summary.total_return * 100.0)),
                    Cell::new(&if summary.sharpe_ratio.is_nan() {
                        "undefined".to_string()
                    } else {
                        format!("{:.3}", summary.sharpe_ratio)
                    }),
                    Cell::new(&format!("{:.2}%", summary.max_drawdown * 100.0)),
                ]));
            }
            Err(e) => {
                table.add_row(Row::new(vec![
                    Cell::new(&outcome.name),
                    Cell::new(&format!("failed: {}", e)),
                    Cell::new("-"),
                    Cell::new("-"),
                ]));
            }
        }
    }

    table.printstd();
    Ok(())
}

fn save_table_csv(frame: &Frame, path: &PathBuf) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::File::create(path)?;

    let names: Vec<&str> = frame.column_names().collect();
    writeln!(file, "timestamp,{}", names.join(","))?;

    for (row, timestamp) in frame.index().iter().enumerate() {
        let values: Vec<String> = names
            .iter()
            .map(|name| {
                frame
                    .column(name)
                    .map(|col| col[row].to_string())
                    .unwrap_or_default()
            })
            .collect();
        writeln!(file, "{},{}", timestamp.to_rfc3339(), values.join(","))?;
    }

    Ok(())
}
