//! Per-screen mode enums.
//!
//! Each screen run is parameterized by an immutable config the caller
//! (menu or CLI subcommand) validates up front; the enums here carry the
//! direction/mode part of those configs.

use crate::constants::{screen_dir, RSI_OVERBOUGHT, RSI_OVERSOLD};
use std::fmt;

/// RSI screen mode: oversold (`rsi < 30`) or overbought (`rsi > 70`).
/// The two are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiMode {
    Low,
    High,
}

impl RsiMode {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "low" | "oversold" => Ok(RsiMode::Low),
            "high" | "overbought" => Ok(RsiMode::High),
            _ => Err(format!(
                "Invalid RSI mode: '{}'. Valid values: low, high",
                s
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RsiMode::Low => "low",
            RsiMode::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RsiMode::Low => "Oversold",
            RsiMode::High => "Overbought",
        }
    }

    pub fn chart_dir(&self) -> &'static str {
        match self {
            RsiMode::Low => screen_dir::RSI_LOW,
            RsiMode::High => screen_dir::RSI_HIGH,
        }
    }

    /// Threshold test for a defined RSI value
    pub fn passes(&self, rsi: f64) -> bool {
        match self {
            RsiMode::Low => rsi < RSI_OVERSOLD,
            RsiMode::High => rsi > RSI_OVERBOUGHT,
        }
    }
}

impl fmt::Display for RsiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gap screen mode: gap up (`gap > threshold`) or gap down
/// (`gap < -threshold`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapMode {
    Up,
    Down,
}

impl GapMode {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "up" | "gap_up" => Ok(GapMode::Up),
            "down" | "gap_down" => Ok(GapMode::Down),
            _ => Err(format!("Invalid gap mode: '{}'. Valid values: up, down", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GapMode::Up => "up",
            GapMode::Down => "down",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GapMode::Up => "Gap Up",
            GapMode::Down => "Gap Down",
        }
    }

    pub fn chart_dir(&self) -> &'static str {
        match self {
            GapMode::Up => screen_dir::GAP_UP,
            GapMode::Down => screen_dir::GAP_DOWN,
        }
    }

    pub fn passes(&self, gap: f64, threshold: f64) -> bool {
        match self {
            GapMode::Up => gap > threshold,
            GapMode::Down => gap < -threshold,
        }
    }
}

impl fmt::Display for GapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// MACD crossover direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossoverMode {
    Bullish,
    Bearish,
}

impl CrossoverMode {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "bullish" => Ok(CrossoverMode::Bullish),
            "bearish" => Ok(CrossoverMode::Bearish),
            _ => Err(format!(
                "Invalid crossover mode: '{}'. Valid values: bullish, bearish",
                s
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CrossoverMode::Bullish => "bullish",
            CrossoverMode::Bearish => "bearish",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CrossoverMode::Bullish => "Bullish",
            CrossoverMode::Bearish => "Bearish",
        }
    }

    pub fn chart_dir(&self) -> &'static str {
        match self {
            CrossoverMode::Bullish => screen_dir::MACD_BULLISH,
            CrossoverMode::Bearish => screen_dir::MACD_BEARISH,
        }
    }
}

impl fmt::Display for CrossoverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort direction for the top-movers screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoverDirection {
    Gainers,
    Losers,
}

impl MoverDirection {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "gainers" | "up" => Ok(MoverDirection::Gainers),
            "losers" | "down" => Ok(MoverDirection::Losers),
            _ => Err(format!(
                "Invalid direction: '{}'. Valid values: gainers, losers",
                s
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoverDirection::Gainers => "gainers",
            MoverDirection::Losers => "losers",
        }
    }
}

impl fmt::Display for MoverDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
