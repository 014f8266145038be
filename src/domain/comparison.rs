//! Side-by-side comparison of several portfolio configurations.
//!
//! Each portfolio goes through the same engine independently; this module
//! only works out the shared date range and orders the results.

use super::basket::PortfolioConfig;
use super::metrics::{HoldingPeriod, Metrics};

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    pub name: String,
    pub baskets: usize,
    pub period: HoldingPeriod,
    pub metrics: Metrics,
    /// Benchmark total return over `period`, when a benchmark was supplied.
    pub benchmark_return: Option<f64>,
    pub outperformance: Option<f64>,
}

/// Earliest start to latest end across `configs`, used to fetch one shared
/// benchmark. `None` if no config has a basket.
pub fn overall_period(configs: &[PortfolioConfig]) -> Option<HoldingPeriod> {
    let start = configs.iter().filter_map(|c| c.start_date()).min()?;
    let end = configs
        .iter()
        .filter(|c| !c.baskets.is_empty())
        .map(|c| c.end_date)
        .max()?;
    Some(HoldingPeriod::new(start, end))
}

/// Orders summaries by total return, best first.
pub fn rank_by_total_return(mut summaries: Vec<PortfolioSummary>) -> Vec<PortfolioSummary> {
    summaries.sort_by(|a, b| b.metrics.total_return.total_cmp(&a.metrics.total_return));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::basket::Basket;
    use chrono::NaiveDate;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, m, day).unwrap()
    }

    fn summary(name: &str, total_return: f64) -> PortfolioSummary {
        PortfolioSummary {
            name: name.to_string(),
            baskets: 1,
            period: HoldingPeriod::new(d(1, 1), d(6, 1)),
            metrics: Metrics {
                total_return,
                annualized_return: 0.0,
                volatility: 0.0,
                max_drawdown: 0.0,
                sharpe_ratio: 0.0,
                win_rate: 0.0,
            },
            benchmark_return: None,
            outperformance: None,
        }
    }

    #[test]
    fn overall_period_spans_all_configs() {
        let configs = vec![
            PortfolioConfig::new(vec![Basket::new(["A"], d(3, 1))], d(9, 1)),
            PortfolioConfig::new(vec![Basket::new(["B"], d(1, 15))], d(6, 30)),
        ];
        let period = overall_period(&configs).unwrap();
        assert_eq!(period.start, d(1, 15));
        assert_eq!(period.end, d(9, 1));
    }

    #[test]
    fn overall_period_ignores_configs_without_baskets() {
        let configs = vec![
            PortfolioConfig::new(vec![], d(12, 31)),
            PortfolioConfig::new(vec![Basket::new(["B"], d(2, 1))], d(3, 1)),
        ];
        let period = overall_period(&configs).unwrap();
        assert_eq!(period.end, d(3, 1));
        assert_eq!(overall_period(&[]), None);
    }

    #[test]
    fn ranking_is_descending_by_total_return() {
        let ranked = rank_by_total_return(vec![
            summary("Low", -5.0),
            summary("High", 20.0),
            summary("Mid", 3.0),
        ]);
        let names: Vec<&str> = ranked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
    }
}
