//! Equal-weighted basket performance within one basket window.
//!
//! Each ticker is rebased to 1.0 on the first date the window has data, and
//! the basket multiple for a date is the plain mean of the rebased prices of
//! the tickers quoted that day.

use super::basket::BasketWindow;
use super::price::PriceRow;
use super::ticker::Ticker;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Basket performance relative to the first date of its window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplePoint {
    pub date: NaiveDate,
    pub multiple: f64,
}

/// Computes the equal-weighted performance multiple series for one window.
///
/// Returns an empty series when no row matches the window's tickers and dates.
/// A ticker without a usable price on the first date is left out of every
/// date's average; a date where no ticker has a value is dropped.
pub fn performance_multiples(rows: &[PriceRow], window: &BasketWindow<'_>) -> Vec<MultiplePoint> {
    let table = pivot(rows, window);

    let Some((_, first_prices)) = table.first_key_value() else {
        return Vec::new();
    };

    let references: BTreeMap<&Ticker, f64> = first_prices
        .iter()
        .filter(|(_, close)| **close > 0.0)
        .map(|(ticker, close)| (*ticker, *close))
        .collect();

    table
        .iter()
        .filter_map(|(date, prices)| {
            let normalized: Vec<f64> = prices
                .iter()
                .filter_map(|(ticker, close)| references.get(ticker).map(|r| close / r))
                .collect();
            if normalized.is_empty() {
                return None;
            }
            let multiple = normalized.iter().sum::<f64>() / normalized.len() as f64;
            Some(MultiplePoint {
                date: *date,
                multiple,
            })
        })
        .collect()
}

/// Date-indexed table with one entry per quoted ticker. Later duplicates of a
/// (ticker, date) pair replace earlier ones.
fn pivot<'r>(
    rows: &'r [PriceRow],
    window: &BasketWindow<'_>,
) -> BTreeMap<NaiveDate, BTreeMap<&'r Ticker, f64>> {
    let mut table: BTreeMap<NaiveDate, BTreeMap<&Ticker, f64>> = BTreeMap::new();
    for row in rows {
        if !window.contains(row.date) || !window.basket.contains(&row.ticker) {
            continue;
        }
        if !row.close.is_finite() {
            continue;
        }
        table.entry(row.date).or_default().insert(&row.ticker, row.close);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::basket::{resolve_windows, Basket, PortfolioConfig};
    use approx::assert_relative_eq;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, day).unwrap()
    }

    fn row(ticker: &str, day: u32, close: f64) -> PriceRow {
        PriceRow::new(ticker, d(day), close)
    }

    fn single_basket(tickers: &[&str], end_day: u32) -> PortfolioConfig {
        PortfolioConfig::new(vec![Basket::new(tickers.iter().copied(), d(1))], d(end_day))
    }

    #[test]
    fn single_ticker_rebases_to_one() {
        let config = single_basket(&["AAA"], 3);
        let window = resolve_windows(&config)[0];
        let rows = vec![row("AAA", 1, 100.0), row("AAA", 2, 110.0), row("AAA", 3, 99.0)];

        let series = performance_multiples(&rows, &window);

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].multiple, 1.0);
        assert_relative_eq!(series[1].multiple, 1.1, epsilon = 1e-12);
        assert_relative_eq!(series[2].multiple, 0.99, epsilon = 1e-12);
    }

    #[test]
    fn equal_weights_across_tickers() {
        let config = single_basket(&["AAA", "BBB"], 2);
        let window = resolve_windows(&config)[0];
        let rows = vec![
            row("AAA", 1, 100.0),
            row("BBB", 1, 20.0),
            row("AAA", 2, 120.0),
            row("BBB", 2, 18.0),
        ];

        let series = performance_multiples(&rows, &window);

        // (1.2 + 0.9) / 2
        assert_relative_eq!(series[1].multiple, 1.05, epsilon = 1e-12);
    }

    #[test]
    fn missing_ticker_on_a_date_is_excluded_not_zero() {
        let config = single_basket(&["AAA", "BBB"], 3);
        let window = resolve_windows(&config)[0];
        let rows = vec![
            row("AAA", 1, 100.0),
            row("BBB", 1, 50.0),
            row("AAA", 2, 110.0),
            row("AAA", 3, 120.0),
            row("BBB", 3, 60.0),
        ];

        let series = performance_multiples(&rows, &window);

        assert_relative_eq!(series[1].multiple, 1.1, epsilon = 1e-12);
        assert_relative_eq!(series[2].multiple, 1.2, epsilon = 1e-12);
    }

    #[test]
    fn ticker_without_first_date_price_never_contributes() {
        let config = single_basket(&["AAA", "LATE"], 3);
        let window = resolve_windows(&config)[0];
        let rows = vec![
            row("AAA", 1, 100.0),
            row("LATE", 2, 10.0),
            row("AAA", 2, 105.0),
            row("LATE", 3, 30.0),
            row("AAA", 3, 110.0),
        ];

        let series = performance_multiples(&rows, &window);

        assert_eq!(series.len(), 3);
        assert_relative_eq!(series[1].multiple, 1.05, epsilon = 1e-12);
        assert_relative_eq!(series[2].multiple, 1.1, epsilon = 1e-12);
    }

    #[test]
    fn date_with_only_unreferenced_tickers_is_dropped() {
        let config = single_basket(&["AAA", "LATE"], 3);
        let window = resolve_windows(&config)[0];
        let rows = vec![
            row("AAA", 1, 100.0),
            row("LATE", 2, 10.0),
            row("AAA", 3, 110.0),
        ];

        let series = performance_multiples(&rows, &window);

        let dates: Vec<NaiveDate> = series.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(1), d(3)]);
    }

    #[test]
    fn rows_outside_window_or_basket_are_ignored() {
        let config = PortfolioConfig::new(
            vec![
                Basket::new(["AAA"], d(2)),
                Basket::new(["BBB"], d(4)),
            ],
            d(5),
        );
        let window = resolve_windows(&config)[0];
        let rows = vec![
            row("AAA", 1, 1.0),
            row("AAA", 2, 100.0),
            row("OTHER", 2, 5.0),
            row("AAA", 3, 102.0),
            row("AAA", 4, 500.0),
        ];

        let series = performance_multiples(&rows, &window);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, d(2));
        assert_relative_eq!(series[1].multiple, 1.02, epsilon = 1e-12);
    }

    #[test]
    fn first_available_date_is_reference_not_basket_start() {
        let config = single_basket(&["AAA"], 10);
        let window = resolve_windows(&config)[0];
        let rows = vec![row("AAA", 6, 40.0), row("AAA", 7, 44.0)];

        let series = performance_multiples(&rows, &window);

        assert_eq!(series[0].date, d(6));
        assert_eq!(series[0].multiple, 1.0);
        assert_relative_eq!(series[1].multiple, 1.1, epsilon = 1e-12);
    }

    #[test]
    fn no_matching_rows_yields_empty_series() {
        let config = single_basket(&["AAA"], 3);
        let window = resolve_windows(&config)[0];
        let rows = vec![row("ZZZ", 1, 10.0)];

        assert!(performance_multiples(&rows, &window).is_empty());
    }

    #[test]
    fn zero_reference_price_is_treated_as_undefined() {
        let config = single_basket(&["AAA", "ZERO"], 2);
        let window = resolve_windows(&config)[0];
        let rows = vec![
            row("AAA", 1, 10.0),
            row("ZERO", 1, 0.0),
            row("AAA", 2, 11.0),
            row("ZERO", 2, 5.0),
        ];

        let series = performance_multiples(&rows, &window);

        assert_relative_eq!(series[1].multiple, 1.1, epsilon = 1e-12);
    }

    #[test]
    fn duplicate_tickers_in_basket_count_once() {
        let config = single_basket(&["AAA", "aaa", "BBB"], 2);
        let window = resolve_windows(&config)[0];
        let rows = vec![
            row("AAA", 1, 10.0),
            row("BBB", 1, 10.0),
            row("AAA", 2, 20.0),
            row("BBB", 2, 10.0),
        ];

        let series = performance_multiples(&rows, &window);

        assert_relative_eq!(series[1].multiple, 1.5, epsilon = 1e-12);
    }
}
