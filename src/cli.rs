use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::error::{AppError, Result};
use crate::indicators::ExtremeKind;
use crate::models::{CrossoverMode, MoverDirection, RsiMode, Universe};
use crate::screens;
use crate::screens::five_year::FiveYearConfig;
use crate::screens::gap::GapConfig;
use crate::screens::macd::MacdConfig;
use crate::screens::movers::MoversConfig;
use crate::screens::returns::ReturnsConfig;
use crate::screens::rsi::RsiConfig;
use crate::utils;

#[derive(Parser)]
#[command(name = "niftyscreener")]
#[command(about = "Menu-driven stock screener", long_about = None)]
pub struct Cli {
    /// Ticker manifest CSV (needs a Symbol column)
    #[arg(short, long)]
    pub list: Option<PathBuf>,

    /// Chart output root
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run one screen directly; without a subcommand the interactive
    /// menu starts
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Strong 5-year return combined with a weak 1-year return
    FiveYear {
        /// Minimum 5-year return %
        #[arg(long)]
        min_5y: f64,
        /// Maximum 1-year return % (historically applied as a lower bound)
        #[arg(long)]
        max_1y: f64,
    },
    /// Top daily gainers or losers with intraday charts
    Movers {
        /// How many tickers to keep
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// gainers or losers
        #[arg(long, default_value = "gainers")]
        direction: String,
    },
    /// Weekly percentage-change heatmap across the universe
    Heatmap,
    /// Stocks at their 52-week high
    High52,
    /// Stocks at their 52-week low
    Low52,
    /// RSI oversold/overbought screen
    Rsi {
        /// low (RSI < 30) or high (RSI > 70)
        #[arg(long)]
        mode: String,
    },
    /// Opening gap screen
    Gap {
        /// up or down
        #[arg(long)]
        mode: String,
        /// Gap threshold in percent
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// MACD signal-line crossover screen
    Macd {
        /// bullish or bearish
        #[arg(long)]
        mode: String,
    },
    /// Return over the trailing N years, charted for every ticker
    Returns {
        #[arg(long)]
        years: u32,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let list = cli.list.unwrap_or_else(utils::get_ticker_list_file);
    let output_root = cli.output.unwrap_or_else(utils::get_output_dir);

    let universe = Universe::from_file(&list)?;
    println!("📋 Loaded {} tickers from {}", universe.len(), list.display());

    match cli.command {
        None => commands::menu::run(&universe, &output_root),
        Some(Commands::FiveYear { min_5y, max_1y }) => screens::five_year::run(
            &universe,
            &output_root,
            FiveYearConfig {
                min_5y_return: min_5y,
                max_1y_return: max_1y,
            },
        ),
        Some(Commands::Movers { count, direction }) => {
            let direction = MoverDirection::from_str(&direction).map_err(AppError::InvalidInput)?;
            screens::movers::run(&universe, &output_root, MoversConfig { count, direction })
        }
        Some(Commands::Heatmap) => screens::heatmap::run(&universe, &output_root),
        Some(Commands::High52) => screens::week52::run(&universe, &output_root, ExtremeKind::Max),
        Some(Commands::Low52) => screens::week52::run(&universe, &output_root, ExtremeKind::Min),
        Some(Commands::Rsi { mode }) => {
            let mode = RsiMode::from_str(&mode).map_err(AppError::InvalidInput)?;
            screens::rsi::run(&universe, &output_root, RsiConfig { mode })
        }
        Some(Commands::Gap { mode, threshold }) => {
            let mode = crate::models::GapMode::from_str(&mode).map_err(AppError::InvalidInput)?;
            screens::gap::run(&universe, &output_root, GapConfig::new(mode, threshold))
        }
        Some(Commands::Macd { mode }) => {
            let mode = CrossoverMode::from_str(&mode).map_err(AppError::InvalidInput)?;
            screens::macd::run(&universe, &output_root, MacdConfig { mode })
        }
        Some(Commands::Returns { years }) => {
            screens::returns::run(&universe, &output_root, ReturnsConfig { years })
        }
    }
}
