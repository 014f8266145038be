#![allow(dead_code)]

use basketrack::domain::basket::{Basket, PortfolioConfig};
use basketrack::domain::error::BasketrackError;
use basketrack::domain::price::{BenchmarkRow, PriceRow};
use basketrack::domain::ticker::Ticker;
use basketrack::ports::data_port::{BenchmarkPort, DataPort};
use chrono::NaiveDate;
use std::cell::RefCell;

pub struct MockDataPort {
    pub rows: Vec<PriceRow>,
    pub error: Option<String>,
    pub requests: RefCell<Vec<(Vec<Ticker>, NaiveDate, NaiveDate)>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            error: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_closes(mut self, ticker: &str, start: NaiveDate, closes: &[f64]) -> Self {
        self.rows.extend(closes_from(ticker, start, closes));
        self
    }

    pub fn with_row(mut self, ticker: &str, date: NaiveDate, close: f64) -> Self {
        self.rows.push(PriceRow::new(ticker, date, close));
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        tickers: &[Ticker],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceRow>, BasketrackError> {
        self.requests
            .borrow_mut()
            .push((tickers.to_vec(), start_date, end_date));
        if let Some(reason) = &self.error {
            return Err(BasketrackError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .rows
            .iter()
            .filter(|r| tickers.contains(&r.ticker))
            .filter(|r| r.date >= start_date && r.date <= end_date)
            .cloned()
            .collect())
    }
}

pub struct MockBenchmarkPort {
    pub rows: Vec<BenchmarkRow>,
}

impl MockBenchmarkPort {
    pub fn new(start: NaiveDate, closes: &[f64]) -> Self {
        let rows = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| BenchmarkRow::new(start + chrono::Duration::days(i as i64), c))
            .collect();
        Self { rows }
    }
}

impl BenchmarkPort for MockBenchmarkPort {
    fn fetch_benchmark(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<BenchmarkRow>, BasketrackError> {
        Ok(self
            .rows
            .iter()
            .filter(|r| r.date >= start_date && r.date <= end_date)
            .cloned()
            .collect())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One row per consecutive calendar day starting at `start`.
pub fn closes_from(ticker: &str, start: NaiveDate, closes: &[f64]) -> Vec<PriceRow> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceRow::new(ticker, start + chrono::Duration::days(i as i64), c))
        .collect()
}

pub fn basket(tickers: &[&str], start: NaiveDate) -> Basket {
    Basket::new(tickers.iter().copied(), start)
}

/// Two single-ticker baskets: A from Jan 1, B from Jan 3, ending Jan 4 2020.
pub fn two_basket_config() -> PortfolioConfig {
    PortfolioConfig::new(
        vec![
            basket(&["A"], date(2020, 1, 1)),
            basket(&["B"], date(2020, 1, 3)),
        ],
        date(2020, 1, 4),
    )
}

pub fn two_basket_rows() -> Vec<PriceRow> {
    let mut rows = closes_from("A", date(2020, 1, 1), &[100.0, 110.0]);
    rows.extend(closes_from("B", date(2020, 1, 3), &[50.0, 55.0]));
    rows
}
