//! Benchmark rebasing to a base of 100 over the portfolio's date range.

use super::price::BenchmarkRow;
use chrono::NaiveDate;
use std::collections::BTreeMap;

const BENCHMARK_BASE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Why a benchmark run produced no points.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum BenchmarkGap {
    #[error("no benchmark data in date range")]
    NoRowsInRange,
    #[error("no valid benchmark closes in date range")]
    NoValidCloses,
    #[error("initial benchmark close is zero")]
    ZeroInitialClose,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRun {
    pub points: Vec<BenchmarkPoint>,
    pub gap: Option<BenchmarkGap>,
}

impl BenchmarkRun {
    fn gap(gap: BenchmarkGap) -> Self {
        tracing::warn!(%gap, "benchmark skipped");
        BenchmarkRun {
            points: Vec::new(),
            gap: Some(gap),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn final_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }
}

/// Rebases `rows` to 100 on the earliest valid close in `[start, end]`.
///
/// Rows may arrive in any order; the output is in ascending date order and a
/// later row for the same date replaces an earlier one. An empty range, a
/// range with no defined closes, or a zero first close yields an empty run
/// with the reason in [`BenchmarkRun::gap`].
pub fn compute_benchmark_returns(
    rows: &[BenchmarkRow],
    start: NaiveDate,
    end: NaiveDate,
) -> BenchmarkRun {
    let in_range: Vec<&BenchmarkRow> = rows
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .collect();
    if in_range.is_empty() {
        return BenchmarkRun::gap(BenchmarkGap::NoRowsInRange);
    }

    let closes: BTreeMap<NaiveDate, f64> = in_range
        .iter()
        .filter_map(|r| r.close.filter(|c| c.is_finite()).map(|c| (r.date, c)))
        .collect();
    let Some((_, &initial)) = closes.first_key_value() else {
        return BenchmarkRun::gap(BenchmarkGap::NoValidCloses);
    };
    if initial == 0.0 {
        return BenchmarkRun::gap(BenchmarkGap::ZeroInitialClose);
    }

    let points: Vec<BenchmarkPoint> = closes
        .iter()
        .map(|(&date, &close)| BenchmarkPoint {
            date,
            value: close / initial * BENCHMARK_BASE,
        })
        .collect();

    tracing::info!(
        days = points.len(),
        initial,
        last = closes.values().next_back().copied().unwrap_or(initial),
        "benchmark rebased"
    );

    BenchmarkRun { points, gap: None }
}
