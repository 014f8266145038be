//! Price rows supplied by data sources.

use super::ticker::Ticker;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One closing price for one ticker on one trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub ticker: Ticker,
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceRow {
    pub fn new(ticker: impl Into<Ticker>, date: NaiveDate, close: f64) -> Self {
        PriceRow {
            ticker: ticker.into(),
            date,
            close,
        }
    }
}

/// One benchmark observation. `close` is `None` where the source has no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRow {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

impl BenchmarkRow {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        BenchmarkRow {
            date,
            close: Some(close),
        }
    }

    pub fn missing(date: NaiveDate) -> Self {
        BenchmarkRow { date, close: None }
    }
}
