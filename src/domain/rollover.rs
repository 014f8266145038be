//! Basket rollover: chains per-basket performance into one value series.
//!
//! Baskets are normalized independently (in parallel), then folded in order.
//! The fold carries a single accumulator: the portfolio value at the end of
//! the previous basket, which becomes the scaling base for the next one.

use super::basket::{resolve_windows, PortfolioConfig};
use super::config_validation::validate_portfolio_config;
use super::error::BasketrackError;
use super::normalize::{performance_multiples, MultiplePoint};
use super::price::PriceRow;
use chrono::NaiveDate;
use rayon::prelude::*;

/// Portfolio value at the first emitted date.
pub const INITIAL_VALUE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub value: f64,
    pub basket_index: usize,
}

/// Normalizer output for one basket, tagged with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct BasketSeries {
    pub index: usize,
    pub multiples: Vec<MultiplePoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoTickers,
    NoData,
}

/// A basket that contributed nothing; the portfolio is flat across its window.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedBasket {
    pub index: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasketSummary {
    pub index: usize,
    pub tickers: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub return_pct: f64,
    pub end_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioRun {
    pub points: Vec<ValuePoint>,
    pub skipped: Vec<SkippedBasket>,
    pub summaries: Vec<BasketSummary>,
}

impl PortfolioRun {
    pub fn final_value(&self) -> f64 {
        self.points.last().map(|p| p.value).unwrap_or(INITIAL_VALUE)
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

struct Rollover {
    base: f64,
    points: Vec<ValuePoint>,
}

impl Rollover {
    fn start() -> Self {
        Rollover {
            base: INITIAL_VALUE,
            points: Vec::new(),
        }
    }

    fn roll(self, basket: &BasketSeries) -> Self {
        if basket.multiples.is_empty() {
            return self;
        }
        let Rollover { base, mut points } = self;
        points.extend(basket.multiples.iter().map(|m| ValuePoint {
            date: m.date,
            value: m.multiple * base,
            basket_index: basket.index,
        }));
        let base = points.last().map(|p| p.value).unwrap_or(base);
        Rollover { base, points }
    }
}

/// Folds basket series, in the given order, into one value series starting
/// from [`INITIAL_VALUE`]. Empty baskets are skipped and leave the base
/// unchanged; if every basket is empty the result is empty.
pub fn chain(baskets: &[BasketSeries]) -> Vec<ValuePoint> {
    baskets.iter().fold(Rollover::start(), Rollover::roll).points
}

/// Computes the rolled-over portfolio value series for `config` from raw
/// closing prices.
///
/// Baskets with no usable rows are reported in [`PortfolioRun::skipped`].
/// Fails when the configuration is malformed or no basket has data at all.
pub fn compute_portfolio_returns(
    rows: &[PriceRow],
    config: &PortfolioConfig,
) -> Result<PortfolioRun, BasketrackError> {
    validate_portfolio_config(config)?;

    let windows = resolve_windows(config);
    let series: Vec<BasketSeries> = windows
        .par_iter()
        .map(|window| BasketSeries {
            index: window.index,
            multiples: performance_multiples(rows, window),
        })
        .collect();

    let skipped: Vec<SkippedBasket> = windows
        .iter()
        .zip(&series)
        .filter(|(_, s)| s.multiples.is_empty())
        .map(|(window, _)| {
            let reason = if window.basket.tickers.is_empty() {
                SkipReason::NoTickers
            } else {
                SkipReason::NoData
            };
            tracing::warn!(
                basket = window.index + 1,
                start = %window.start,
                end = %window.end,
                ?reason,
                "no price data for basket, holding value flat"
            );
            SkippedBasket {
                index: window.index,
                start: window.start,
                end: window.end,
                reason,
            }
        })
        .collect();

    let points = chain(&series);
    if points.is_empty() {
        return Err(BasketrackError::NoUsableData {
            baskets: config.baskets.len(),
        });
    }

    let summaries = summarize(config, &series, &points);
    for s in &summaries {
        tracing::info!(
            basket = s.index + 1,
            from = %s.first_date,
            to = %s.last_date,
            tickers = s.tickers,
            return_pct = s.return_pct,
            "basket chained"
        );
    }

    Ok(PortfolioRun {
        points,
        skipped,
        summaries,
    })
}

fn summarize(
    config: &PortfolioConfig,
    series: &[BasketSeries],
    points: &[ValuePoint],
) -> Vec<BasketSummary> {
    series
        .iter()
        .filter_map(|s| {
            let first = s.multiples.first()?;
            let last = s.multiples.last()?;
            let end_value = points
                .iter()
                .rev()
                .find(|p| p.basket_index == s.index)
                .map(|p| p.value)?;
            Some(BasketSummary {
                index: s.index,
                tickers: config.baskets[s.index].ticker_set().len(),
                first_date: first.date,
                last_date: last.date,
                return_pct: (last.multiple - 1.0) * 100.0,
                end_value,
            })
        })
        .collect()
}
