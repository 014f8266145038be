//! CSV export of portfolio and benchmark value series.

use crate::domain::benchmark::BenchmarkPoint;
use crate::domain::error::BasketrackError;
use crate::domain::rollover::ValuePoint;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// One output line; the two series are outer-joined on date.
#[derive(Debug, Default, Serialize, PartialEq)]
struct SeriesRecord {
    date: Option<NaiveDate>,
    portfolio_value: Option<f64>,
    basket_index: Option<usize>,
    benchmark_value: Option<f64>,
}

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    fn join(portfolio: &[ValuePoint], benchmark: &[BenchmarkPoint]) -> Vec<SeriesRecord> {
        let mut by_date: BTreeMap<NaiveDate, SeriesRecord> = BTreeMap::new();
        for p in portfolio {
            let rec = by_date.entry(p.date).or_default();
            rec.portfolio_value = Some(p.value);
            rec.basket_index = Some(p.basket_index);
        }
        for b in benchmark {
            by_date.entry(b.date).or_default().benchmark_value = Some(b.value);
        }
        by_date
            .into_iter()
            .map(|(date, rec)| SeriesRecord {
                date: Some(date),
                ..rec
            })
            .collect()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        portfolio: &[ValuePoint],
        benchmark: &[BenchmarkPoint],
        output_path: &Path,
    ) -> Result<(), BasketrackError> {
        let mut wtr = csv::Writer::from_path(output_path)?;
        for record in Self::join(portfolio, benchmark) {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
