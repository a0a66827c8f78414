//! Interactive numbered menu. Every screen reports its own failures;
//! the loop always regains control until the user exits.

use std::io::{self, Write};
use std::path::Path;

use crate::error::{AppError, Result};
use crate::indicators::ExtremeKind;
use crate::models::{CrossoverMode, GapMode, MoverDirection, RsiMode, Universe};
use crate::screens;
use crate::screens::five_year::FiveYearConfig;
use crate::screens::gap::GapConfig;
use crate::screens::macd::MacdConfig;
use crate::screens::movers::MoversConfig;
use crate::screens::returns::ReturnsConfig;
use crate::screens::rsi::RsiConfig;

pub fn run(universe: &Universe, output_root: &Path) -> Result<()> {
    loop {
        show_menu();
        let choice = prompt("Enter your choice (1-10): ")?;

        match choice.as_str() {
            "1" => five_year_entry(universe, output_root),
            "2" => movers_entry(universe, output_root),
            "3" => report(screens::heatmap::run(universe, output_root)),
            "4" => report(screens::week52::run(universe, output_root, ExtremeKind::Max)),
            "5" => report(screens::week52::run(universe, output_root, ExtremeKind::Min)),
            "6" => rsi_entry(universe, output_root),
            "7" => gap_entry(universe, output_root),
            "8" => macd_entry(universe, output_root),
            "9" => returns_entry(universe, output_root),
            "10" => {
                println!("👋 Goodbye!");
                return Ok(());
            }
            _ => println!("❌ Invalid choice, please try again."),
        }
    }
}

fn show_menu() {
    println!("\n📊 STOCK SCREENER MENU 📊");
    println!("1. Strong 5Y Return + Weak 1Y (Drawdown) Filter");
    println!("2. Top Daily Gainers/Losers");
    println!("3. Weekly Heatmap");
    println!("4. 52 Week High");
    println!("5. 52 Week Low");
    println!("6. RSI Screen (Low/High)");
    println!("7. Gap Up/Down Screen");
    println!("8. MACD Crossover Screen");
    println!("9. Return Over N Years");
    println!("10. Exit");
}

fn five_year_entry(universe: &Universe, output_root: &Path) {
    let min_5y_return = match prompt_f64("Enter minimum 5-Year return % (e.g., 50): ") {
        Ok(value) => value,
        Err(_) => {
            println!("❌ Invalid input.");
            return;
        }
    };
    let max_1y_return =
        match prompt_f64("Enter maximum 1-Year return % (e.g., -5 for negative return): ") {
            Ok(value) => value,
            Err(_) => {
                println!("❌ Invalid input.");
                return;
            }
        };
    report(screens::five_year::run(
        universe,
        output_root,
        FiveYearConfig {
            min_5y_return,
            max_1y_return,
        },
    ));
}

fn movers_entry(universe: &Universe, output_root: &Path) {
    let count = match prompt_usize("Enter number of top stocks to show (e.g., 10): ") {
        Ok(count) if count > 0 => count,
        _ => {
            println!("❌ Invalid input.");
            return;
        }
    };
    let direction = match prompt("Enter 1 for Top Gainers or 2 for Top Losers: ").as_deref() {
        Ok("1") => MoverDirection::Gainers,
        Ok("2") => MoverDirection::Losers,
        _ => {
            println!("❌ Invalid input.");
            return;
        }
    };
    report(screens::movers::run(
        universe,
        output_root,
        MoversConfig { count, direction },
    ));
}

fn rsi_entry(universe: &Universe, output_root: &Path) {
    let raw = match prompt("Enter mode ('low' for RSI<30 or 'high' for RSI>70): ") {
        Ok(raw) => raw,
        Err(_) => {
            println!("❌ Invalid input.");
            return;
        }
    };
    match RsiMode::from_str(&raw) {
        Ok(mode) => report(screens::rsi::run(universe, output_root, RsiConfig { mode })),
        Err(e) => println!("❌ {}", e),
    }
}

fn gap_entry(universe: &Universe, output_root: &Path) {
    println!("\n📈 Gap Screener:");
    println!("1. Gap Up");
    println!("2. Gap Down");
    let mode = match prompt("Enter 1 for Gap Up or 2 for Gap Down: ").as_deref() {
        Ok("1") => GapMode::Up,
        Ok("2") => GapMode::Down,
        _ => {
            println!("❌ Invalid choice for gap mode.");
            return;
        }
    };
    let threshold = match prompt_f64("Enter gap threshold percentage (default 2): ") {
        Ok(threshold) => Some(threshold),
        Err(_) => {
            println!("❌ Invalid threshold. Using default 2%.");
            None
        }
    };
    report(screens::gap::run(
        universe,
        output_root,
        GapConfig::new(mode, threshold),
    ));
}

fn macd_entry(universe: &Universe, output_root: &Path) {
    println!("\n📉 MACD Crossover Screener:");
    println!("1. Bullish Crossover");
    println!("2. Bearish Crossover");
    let mode = match prompt("Enter 1 for Bullish or 2 for Bearish: ").as_deref() {
        Ok("1") => CrossoverMode::Bullish,
        Ok("2") => CrossoverMode::Bearish,
        _ => {
            println!("❌ Invalid input. Please enter 1 or 2.");
            return;
        }
    };
    report(screens::macd::run(universe, output_root, MacdConfig { mode }));
}

fn returns_entry(universe: &Universe, output_root: &Path) {
    match prompt_u32("Enter number of years (e.g., 3 for 3-year return): ") {
        Ok(years) if years > 0 => report(screens::returns::run(
            universe,
            output_root,
            ReturnsConfig { years },
        )),
        _ => println!("❌ Enter a valid number of years (>0)."),
    }
}

fn report(result: Result<()>) {
    if let Err(e) = result {
        eprintln!("❌ Screen failed: {}", e);
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    let bytes = io::stdin().read_line(&mut line)?;
    if bytes == 0 {
        return Err(AppError::Io("stdin closed".to_string()));
    }
    Ok(line.trim().to_string())
}

fn prompt_f64(message: &str) -> Result<f64> {
    let raw = prompt(message)?;
    raw.parse()
        .map_err(|_| AppError::InvalidInput(format!("'{}' is not a number", raw)))
}

fn prompt_usize(message: &str) -> Result<usize> {
    let raw = prompt(message)?;
    raw.parse()
        .map_err(|_| AppError::InvalidInput(format!("'{}' is not a whole number", raw)))
}

fn prompt_u32(message: &str) -> Result<u32> {
    let raw = prompt(message)?;
    raw.parse()
        .map_err(|_| AppError::InvalidInput(format!("'{}' is not a whole number", raw)))
}
