//! Baskets, portfolio configuration and basket date windows.

use super::metrics::HoldingPeriod;
use super::ticker::Ticker;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// A set of tickers held from `start_date` until the next basket starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Basket {
    pub tickers: Vec<Ticker>,
    pub start_date: NaiveDate,
}

impl Basket {
    pub fn new<T: Into<Ticker>>(tickers: impl IntoIterator<Item = T>, start_date: NaiveDate) -> Self {
        Basket {
            tickers: tickers.into_iter().map(Into::into).collect(),
            start_date,
        }
    }

    /// Distinct tickers; duplicates in `tickers` collapse here.
    pub fn ticker_set(&self) -> BTreeSet<&Ticker> {
        self.tickers.iter().collect()
    }

    pub fn contains(&self, ticker: &Ticker) -> bool {
        self.tickers.iter().any(|t| t == ticker)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioConfig {
    pub baskets: Vec<Basket>,
    pub end_date: NaiveDate,
}

impl PortfolioConfig {
    pub fn new(baskets: Vec<Basket>, end_date: NaiveDate) -> Self {
        PortfolioConfig { baskets, end_date }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.baskets.first().map(|b| b.start_date)
    }

    pub fn holding_period(&self) -> Option<HoldingPeriod> {
        self.start_date()
            .map(|start| HoldingPeriod::new(start, self.end_date))
    }

    /// Union of all basket tickers, sorted.
    pub fn all_tickers(&self) -> Vec<Ticker> {
        let set: BTreeSet<&Ticker> = self.baskets.iter().flat_map(|b| b.tickers.iter()).collect();
        set.into_iter().cloned().collect()
    }
}

/// Date range a basket is live for.
///
/// Every window but the last is half-open `[start, end)`; the last one is
/// closed `[start, end]` on the portfolio end date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasketWindow<'a> {
    pub index: usize,
    pub basket: &'a Basket,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub end_inclusive: bool,
}

impl BasketWindow<'_> {
    pub fn contains(&self, date: NaiveDate) -> bool {
        if date < self.start {
            return false;
        }
        if self.end_inclusive {
            date <= self.end
        } else {
            date < self.end
        }
    }
}

/// Derives each basket's window from the next basket's start date, closing
/// the final window with `config.end_date`.
///
/// No ordering checks happen here; an inverted window simply matches no rows.
pub fn resolve_windows(config: &PortfolioConfig) -> Vec<BasketWindow<'_>> {
    config
        .baskets
        .iter()
        .enumerate()
        .map(|(i, basket)| {
            let (end, end_inclusive) = match config.baskets.get(i + 1) {
                Some(next) => (next.start_date, false),
                None => (config.end_date, true),
            };
            BasketWindow {
                index: i,
                basket,
                start: basket.start_date,
                end,
                end_inclusive,
            }
        })
        .collect()
}
