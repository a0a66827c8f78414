use std::time::{Duration as StdDuration, SystemTime};

use chrono::{DateTime, Utc};
use isahc::{config::Configurable, prelude::*, HttpClient, Request};
use serde_json::Value;
use tokio::sync::Mutex as TokioMutex;
use tokio::time::sleep;

use crate::error::{AppError, Result};
use crate::models::{FetchRange, FetchSpec, Ohlcv, PriceSeries};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Market-data client for the Yahoo Finance chart API.
///
/// One instance is created per screen run and queried strictly
/// sequentially; requests are rate limited with a sliding one-minute
/// window and retried a bounded number of times. A hung request is cut
/// off by the client timeout so a single ticker cannot stall the pass.
pub struct YahooClient {
    client: HttpClient,
    base_url: String,
    rate_limit_per_minute: u32,
    request_timestamps: TokioMutex<Vec<SystemTime>>,
    user_agents: Vec<String>,
    random_agent: bool,
}

impl YahooClient {
    pub fn new(random_agent: bool, rate_limit_per_minute: u32) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let user_agents = vec![
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0".to_string(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.3 Safari/605.1.15".to_string(),
        ];

        Ok(Self {
            client,
            base_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            rate_limit_per_minute,
            request_timestamps: TokioMutex::new(Vec::new()),
            user_agents,
            random_agent,
        })
    }

    fn get_user_agent(&self) -> String {
        if self.random_agent {
            use rand::seq::SliceRandom;
            self.user_agents
                .choose(&mut rand::thread_rng())
                .unwrap_or(&self.user_agents[0])
                .clone()
        } else {
            self.user_agents[0].clone()
        }
    }

    /// Sliding-window rate limiting: at most `rate_limit_per_minute`
    /// requests in any 60-second window.
    async fn enforce_rate_limit(&self) {
        let current_time = SystemTime::now();
        let mut timestamps = self.request_timestamps.lock().await;

        timestamps.retain(|&timestamp| {
            current_time
                .duration_since(timestamp)
                .unwrap_or(StdDuration::from_secs(0))
                < StdDuration::from_secs(60)
        });

        if timestamps.len() >= self.rate_limit_per_minute as usize {
            if let Some(&oldest_request) = timestamps.first() {
                let wait_time = StdDuration::from_secs(60)
                    - current_time
                        .duration_since(oldest_request)
                        .unwrap_or(StdDuration::from_secs(0));
                if !wait_time.is_zero() {
                    // Drop the lock before sleeping
                    drop(timestamps);
                    sleep(wait_time + StdDuration::from_millis(100)).await;
                    let mut timestamps = self.request_timestamps.lock().await;
                    timestamps.push(current_time);
                    return;
                }
            }
        }

        timestamps.push(current_time);
    }

    fn build_url(&self, symbol: &str, spec: &FetchSpec) -> String {
        // Some NSE symbols carry an ampersand (M&M.NS)
        let encoded = symbol.replace('&', "%26");
        let mut url = format!(
            "{}/{}?interval={}&includeAdjustedClose=true",
            self.base_url,
            encoded,
            spec.interval.as_str()
        );
        match spec.range {
            FetchRange::Period(period) => {
                url.push_str(&format!("&range={}", period.as_str()));
            }
            FetchRange::Span { start, end } => {
                let period1 = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
                let period2 = end.and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp();
                url.push_str(&format!("&period1={}&period2={}", period1, period2));
            }
        }
        url
    }

    async fn make_request(&self, url: &str) -> Result<Value> {
        let mut last_error = AppError::Network("no request attempted".to_string());

        for attempt in 0..MAX_RETRIES {
            self.enforce_rate_limit().await;

            let user_agent = self.get_user_agent();
            let request = Request::get(url)
                .header("User-Agent", &user_agent)
                .header("Accept", "application/json")
                .body(())
                .map_err(|e| AppError::Network(format!("Request build error: {}", e)))?;

            match self.client.send_async(request).await {
                Ok(mut resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let text = resp
                            .text()
                            .await
                            .map_err(|e| AppError::Network(format!("Response body error: {}", e)))?;
                        return serde_json::from_str::<Value>(&text)
                            .map_err(|e| AppError::Parse(format!("JSON parse error: {}", e)));
                    } else if status.as_u16() == 429 || status.is_server_error() {
                        last_error = AppError::Network(format!(
                            "HTTP {} ({})",
                            status.as_u16(),
                            status.canonical_reason().unwrap_or("Unknown")
                        ));
                        tracing::warn!(
                            "Retryable HTTP {} on attempt {}/{}",
                            status.as_u16(),
                            attempt + 1,
                            MAX_RETRIES
                        );
                    } else {
                        // Client errors are request problems, not worth retrying
                        return Err(AppError::Network(format!(
                            "HTTP {} ({})",
                            status.as_u16(),
                            status.canonical_reason().unwrap_or("Unknown")
                        )));
                    }
                }
                Err(e) => {
                    last_error = AppError::Network(e.to_string());
                    tracing::warn!("Network error on attempt {}/{}: {}", attempt + 1, MAX_RETRIES, e);
                }
            }

            sleep(StdDuration::from_millis(500 * (attempt as u64 + 1))).await;
        }

        Err(last_error)
    }

    /// Download one OHLCV series. Missing bars (nulls for non-trading
    /// sessions) are dropped rather than zero-filled; an empty payload is
    /// a `NoData` error the pipeline logs and skips.
    pub async fn get_history(&self, symbol: &str, spec: &FetchSpec) -> Result<PriceSeries> {
        let url = self.build_url(symbol, spec);
        tracing::debug!(
            "GET_HISTORY: symbol={}, interval={}, range={:?}, adjusted={}",
            symbol,
            spec.interval,
            spec.range,
            spec.adjusted
        );

        let payload = self.make_request(&url).await?;
        parse_chart_response(symbol, spec, &payload)
    }
}

/// Decode the chart-API JSON into a validated series.
///
/// Split out of the client so response handling is testable without a
/// network round trip.
fn parse_chart_response(symbol: &str, spec: &FetchSpec, payload: &Value) -> Result<PriceSeries> {
    let chart = &payload["chart"];
    if !chart["error"].is_null() {
        let description = chart["error"]["description"]
            .as_str()
            .unwrap_or("provider returned an error");
        return Err(AppError::NoData(format!("{}: {}", symbol, description)));
    }

    let result = chart["result"]
        .get(0)
        .ok_or_else(|| AppError::NoData(symbol.to_string()))?;

    let timestamps = result["timestamp"]
        .as_array()
        .ok_or_else(|| AppError::NoData(symbol.to_string()))?;

    let quote = &result["indicators"]["quote"][0];
    let opens = quote["open"]
        .as_array()
        .ok_or_else(|| AppError::Parse(format!("{}: missing open column", symbol)))?;
    let highs = quote["high"]
        .as_array()
        .ok_or_else(|| AppError::Parse(format!("{}: missing high column", symbol)))?;
    let lows = quote["low"]
        .as_array()
        .ok_or_else(|| AppError::Parse(format!("{}: missing low column", symbol)))?;
    let closes = quote["close"]
        .as_array()
        .ok_or_else(|| AppError::Parse(format!("{}: missing close column", symbol)))?;
    let volumes = quote["volume"]
        .as_array()
        .ok_or_else(|| AppError::Parse(format!("{}: missing volume column", symbol)))?;

    let length = timestamps.len();
    if [opens.len(), highs.len(), lows.len(), closes.len(), volumes.len()]
        .iter()
        .any(|&len| len != length)
    {
        return Err(AppError::Parse(format!(
            "{}: inconsistent column lengths",
            symbol
        )));
    }

    let adjcloses = result["indicators"]["adjclose"][0]["adjclose"].as_array();
    if spec.adjusted && adjcloses.is_none() {
        tracing::debug!("{}: no adjclose column, falling back to raw close", symbol);
    }

    let mut bars = Vec::with_capacity(length);
    for i in 0..length {
        let timestamp = match timestamps[i].as_i64() {
            Some(ts) => ts,
            None => continue,
        };
        let time = DateTime::<Utc>::from_timestamp(timestamp, 0).ok_or_else(|| {
            AppError::Parse(format!("{}: bad timestamp {} at index {}", symbol, timestamp, i))
        })?;

        // Null bars are non-trading sessions; leave the gap
        let (open, high, low, close) = match (
            opens[i].as_f64(),
            highs[i].as_f64(),
            lows[i].as_f64(),
            closes[i].as_f64(),
        ) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => continue,
        };
        let volume = volumes[i].as_u64().unwrap_or(0);

        let (open, high, low, close) = if spec.adjusted {
            match adjcloses.and_then(|a| a.get(i)).and_then(|v| v.as_f64()) {
                Some(adj) if close != 0.0 => {
                    let factor = adj / close;
                    (open * factor, high * factor, low * factor, adj)
                }
                _ => (open, high, low, close),
            }
        } else {
            (open, high, low, close)
        };

        bars.push(Ohlcv::new(time, open, high, low, close, volume));
    }

    if bars.is_empty() {
        return Err(AppError::NoData(symbol.to_string()));
    }

    bars.sort_by_key(|b| b.time);
    bars.dedup_by_key(|b| b.time);

    PriceSeries::new(symbol, bars)
}
