//! CSV file data adapters.
//!
//! Prices come from one long-format file (`ticker,date,close`), the benchmark
//! from a `date,close` file where `close` may be blank on non-trading days.

use crate::domain::error::BasketrackError;
use crate::domain::price::{BenchmarkRow, PriceRow};
use crate::domain::ticker::Ticker;
use crate::ports::data_port::{BenchmarkPort, DataPort};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub struct CsvPriceAdapter {
    path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl DataPort for CsvPriceAdapter {
    fn fetch_prices(
        &self,
        tickers: &[Ticker],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceRow>, BasketrackError> {
        let wanted: HashSet<&Ticker> = tickers.iter().collect();
        let mut rows = Vec::new();

        for record in read_records::<PriceRow>(&self.path)? {
            if record.date < start_date || record.date > end_date {
                continue;
            }
            if !wanted.contains(&record.ticker) {
                continue;
            }
            if !record.close.is_finite() || record.close < 0.0 {
                return Err(BasketrackError::Data {
                    reason: format!(
                        "invalid close {} for {} on {}",
                        record.close, record.ticker, record.date
                    ),
                });
            }
            rows.push(record);
        }

        rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.ticker.cmp(&b.ticker)));
        tracing::debug!(
            path = %self.path.display(),
            rows = rows.len(),
            tickers = tickers.len(),
            "loaded price rows"
        );
        Ok(rows)
    }
}

pub struct CsvBenchmarkAdapter {
    path: PathBuf,
}

impl CsvBenchmarkAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl BenchmarkPort for CsvBenchmarkAdapter {
    fn fetch_benchmark(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<BenchmarkRow>, BasketrackError> {
        let mut rows: Vec<BenchmarkRow> = read_records::<BenchmarkRow>(&self.path)?
            .into_iter()
            .filter(|r| r.date >= start_date && r.date <= end_date)
            .collect();
        rows.sort_by_key(|r| r.date);
        fill_gaps(&mut rows);
        rows.retain(|r| r.close.is_some());
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "loaded benchmark rows");
        Ok(rows)
    }
}

fn read_records<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, BasketrackError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| BasketrackError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

    rdr.deserialize()
        .map(|result| {
            result.map_err(|e| BasketrackError::Data {
                reason: format!("{}: {}", path.display(), e),
            })
        })
        .collect()
}

/// Forward-fills missing closes, then back-fills any leading gap.
fn fill_gaps(rows: &mut [BenchmarkRow]) {
    let mut last = None;
    for row in rows.iter_mut() {
        match row.close {
            Some(c) if c.is_finite() => last = Some(c),
            _ => row.close = last,
        }
    }

    let mut next = None;
    for row in rows.iter_mut().rev() {
        match row.close {
            Some(c) => next = Some(c),
            None => row.close = next,
        }
    }
}
