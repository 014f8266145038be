//! Performance and risk statistics over a value series rebased to 100.
//!
//! All figures except the Sharpe ratio are percentages. Degenerate inputs
//! (too few returns, zero dispersion, non-positive holding period) fall back
//! to 0 rather than producing NaN or infinity.

use super::benchmark::BenchmarkPoint;
use super::rollover::ValuePoint;
use chrono::NaiveDate;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const DAYS_PER_YEAR: f64 = 365.25;
const SERIES_BASE: f64 = 100.0;

/// Dispersion at or below this is treated as zero for the Sharpe guard.
const MIN_STDDEV: f64 = 1e-12;

/// Calendar span a portfolio is held for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HoldingPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        HoldingPeriod { start, end }
    }

    pub fn days_held(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn years(&self) -> f64 {
        self.days_held() as f64 / DAYS_PER_YEAR
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub volatility: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub win_rate: f64,
}

impl Metrics {
    /// Computes statistics for `values`, which must be on a 100 base.
    /// An empty series yields all zeros.
    pub fn compute(values: &[f64], period: &HoldingPeriod) -> Self {
        let final_value = values.last().copied().unwrap_or(SERIES_BASE);
        let total_return = (final_value - SERIES_BASE) / SERIES_BASE * 100.0;

        let days_held = period.days_held();
        let annualized_return = if days_held > 0 {
            ((final_value / SERIES_BASE).powf(DAYS_PER_YEAR / days_held as f64) - 1.0) * 100.0
        } else {
            0.0
        };

        let returns = daily_returns(values);
        let (mean, stddev) = mean_and_sample_stddev(&returns);

        let volatility = stddev * TRADING_DAYS_PER_YEAR.sqrt() * 100.0;

        // Zero risk-free rate.
        let sharpe_ratio = if stddev > MIN_STDDEV {
            mean / stddev * TRADING_DAYS_PER_YEAR.sqrt()
        } else {
            0.0
        };

        let win_rate = if returns.is_empty() {
            0.0
        } else {
            let wins = returns.iter().filter(|&&r| r > 0.0).count();
            wins as f64 / returns.len() as f64 * 100.0
        };

        Metrics {
            total_return,
            annualized_return: if annualized_return.is_finite() {
                annualized_return
            } else {
                0.0
            },
            volatility,
            max_drawdown: compute_drawdown(values) * 100.0,
            sharpe_ratio,
            win_rate,
        }
    }
}

/// Portfolio statistics alongside the benchmark's, when one is available.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsReport {
    pub period: HoldingPeriod,
    pub portfolio: Metrics,
    pub benchmark: Option<Metrics>,
    /// Portfolio total return minus benchmark total return, in points.
    pub outperformance: Option<f64>,
}

pub fn compute_metrics(
    portfolio: &[ValuePoint],
    period: HoldingPeriod,
    benchmark: Option<&[BenchmarkPoint]>,
) -> MetricsReport {
    let values: Vec<f64> = portfolio.iter().map(|p| p.value).collect();
    let portfolio = Metrics::compute(&values, &period);

    let benchmark = benchmark.filter(|b| !b.is_empty()).map(|b| {
        let values: Vec<f64> = b.iter().map(|p| p.value).collect();
        Metrics::compute(&values, &period)
    });
    let outperformance = benchmark
        .as_ref()
        .map(|b| portfolio.total_return - b.total_return);

    MetricsReport {
        period,
        portfolio,
        benchmark,
        outperformance,
    }
}

/// Day-over-day simple returns. A step from a non-positive value has no
/// defined return and is left out.
fn daily_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// Mean and Bessel-corrected standard deviation; stddev is 0 below two samples.
fn mean_and_sample_stddev(returns: &[f64]) -> (f64, f64) {
    if returns.is_empty() {
        return (0.0, 0.0);
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    if returns.len() < 2 {
        return (mean, 0.0);
    }
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance.sqrt())
}

/// Deepest decline from a running peak, as a non-positive fraction.
fn compute_drawdown(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &value in values {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            let dd = (value - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
