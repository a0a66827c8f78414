use chrono::NaiveDate;
use std::fmt;

/// Bar interval requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    /// Daily candles
    Daily,
    /// 5-minute candles (intraday mover charts)
    Minute5,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Minute5 => "5m",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named lookback window understood by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    OneYear,
    FiveYears,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::OneYear => "1y",
            Period::FiveYears => "5y",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Requested window: either a named trailing period or an explicit
/// date span (the N-year return screen computes its own span)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRange {
    Period(Period),
    Span { start: NaiveDate, end: NaiveDate },
}

/// Everything a screen tells the provider about one download
#[derive(Debug, Clone, Copy)]
pub struct FetchSpec {
    pub range: FetchRange,
    pub interval: Interval,
    /// Fold splits/dividends into close (and scale open/high/low to match)
    pub adjusted: bool,
}

impl FetchSpec {
    /// Daily bars over a named trailing period
    pub fn daily(period: Period, adjusted: bool) -> Self {
        Self {
            range: FetchRange::Period(period),
            interval: Interval::Daily,
            adjusted,
        }
    }

    /// 5-minute bars over the current session
    pub fn intraday() -> Self {
        Self {
            range: FetchRange::Period(Period::OneDay),
            interval: Interval::Minute5,
            adjusted: false,
        }
    }

    /// Daily bars between two dates
    pub fn span(start: NaiveDate, end: NaiveDate, adjusted: bool) -> Self {
        Self {
            range: FetchRange::Span { start, end },
            interval: Interval::Daily,
            adjusted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_strings() {
        assert_eq!(Interval::Daily.as_str(), "1d");
        assert_eq!(Interval::Minute5.as_str(), "5m");
    }

    #[test]
    fn test_period_strings() {
        assert_eq!(Period::FiveDays.as_str(), "5d");
        assert_eq!(Period::ThreeMonths.as_str(), "3mo");
        assert_eq!(Period::FiveYears.as_str(), "5y");
    }

    #[test]
    fn test_fetch_spec_builders() {
        let spec = FetchSpec::daily(Period::OneYear, true);
        assert_eq!(spec.range, FetchRange::Period(Period::OneYear));
        assert_eq!(spec.interval, Interval::Daily);
        assert!(spec.adjusted);

        let spec = FetchSpec::intraday();
        assert_eq!(spec.interval, Interval::Minute5);
        assert!(!spec.adjusted);
    }
}
