//! Price and benchmark data access port traits.

use crate::domain::error::BasketrackError;
use crate::domain::price::{BenchmarkRow, PriceRow};
use crate::domain::ticker::Ticker;
use chrono::NaiveDate;

pub trait DataPort {
    /// Closing prices for `tickers` within the inclusive date range.
    fn fetch_prices(
        &self,
        tickers: &[Ticker],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceRow>, BasketrackError>;
}

pub trait BenchmarkPort {
    /// Benchmark closes within the inclusive date range, ascending by date.
    fn fetch_benchmark(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<BenchmarkRow>, BasketrackError>;
}
