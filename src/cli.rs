//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvBenchmarkAdapter, CsvPriceAdapter};
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::basket::{resolve_windows, Basket, PortfolioConfig};
use crate::domain::benchmark::{compute_benchmark_returns, BenchmarkRun};
use crate::domain::comparison::{overall_period, rank_by_total_return, PortfolioSummary};
use crate::domain::config_validation::validate_portfolio_config;
use crate::domain::error::BasketrackError;
use crate::domain::metrics::{compute_metrics, HoldingPeriod, MetricsReport};
use crate::domain::price::{BenchmarkRow, PriceRow};
use crate::domain::rollover::{compute_portfolio_returns, PortfolioRun, SkipReason, INITIAL_VALUE};
use crate::domain::ticker::parse_tickers;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{BenchmarkPort, DataPort};
use crate::ports::report_port::ReportPort;

const PORTFOLIO_SECTION: &str = "portfolio";
const BASKET_SECTION_PREFIX: &str = "basket.";

#[derive(Parser, Debug)]
#[command(name = "basketrack", about = "Basket-rollover portfolio tracker")]
pub struct Cli {
    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute a portfolio's value series and metrics
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Long-format price file: ticker,date,close
        #[arg(short, long)]
        prices: PathBuf,
        /// Benchmark file: date,close
        #[arg(short, long)]
        benchmark: Option<PathBuf>,
        /// Write the joined value series to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare two or more portfolio configurations
    Compare {
        #[arg(short, long)]
        prices: PathBuf,
        #[arg(short, long)]
        benchmark: Option<PathBuf>,
        #[arg(required = true, num_args = 2..)]
        configs: Vec<PathBuf>,
    },
    /// Validate a portfolio configuration and show its basket windows
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Run {
            config,
            prices,
            benchmark,
            output,
        } => run_portfolio(&config, &prices, benchmark.as_deref(), output.as_deref()),
        Command::Compare {
            prices,
            benchmark,
            configs,
        } => run_compare(&configs, &prices, benchmark.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, BasketrackError> {
    tracing::info!(path = %path.display(), "loading portfolio config");
    FileConfigAdapter::from_file(path)
}

/// Builds a [`PortfolioConfig`] from `[portfolio]` and `[basket.N]` sections.
/// Baskets are ordered by `N`.
pub fn build_portfolio_config(config: &dyn ConfigPort) -> Result<PortfolioConfig, BasketrackError> {
    let end_date = required_date(config, PORTFOLIO_SECTION, "end_date")?;

    let mut sections: Vec<(u32, String)> = Vec::new();
    for section in config.sections() {
        let Some(suffix) = section.strip_prefix(BASKET_SECTION_PREFIX) else {
            continue;
        };
        let index: u32 = suffix.trim().parse().map_err(|_| BasketrackError::ConfigInvalid {
            section: section.clone(),
            key: "section".into(),
            reason: "basket section must be named basket.<number>".into(),
        })?;
        sections.push((index, section));
    }
    sections.sort_by_key(|(index, _)| *index);

    let mut baskets = Vec::with_capacity(sections.len());
    for (_, section) in &sections {
        let tickers = config
            .get_string(section, "tickers")
            .ok_or_else(|| BasketrackError::ConfigMissing {
                section: section.clone(),
                key: "tickers".into(),
            })?;
        let start_date = required_date(config, section, "start_date")?;
        baskets.push(Basket::new(parse_tickers(&tickers), start_date));
    }

    Ok(PortfolioConfig::new(baskets, end_date))
}

/// Display name from `[portfolio] name`, falling back to the file stem.
pub fn portfolio_name(config: &dyn ConfigPort, path: &Path) -> String {
    if let Some(name) = config.get_string(PORTFOLIO_SECTION, "name") {
        return name;
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "portfolio".to_string());
    stem.split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn required_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<NaiveDate, BasketrackError> {
    let value = config
        .get_string(section, key)
        .ok_or_else(|| BasketrackError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| BasketrackError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: "invalid date format (expected YYYY-MM-DD)".into(),
    })
}

/// Everything one portfolio run produces.
#[derive(Debug)]
pub struct PortfolioOutcome {
    pub run: PortfolioRun,
    pub benchmark: Option<BenchmarkRun>,
    pub report: MetricsReport,
}

/// Fetches data through the ports and runs the engine for one portfolio.
pub fn run_pipeline(
    data_port: &dyn DataPort,
    benchmark_port: Option<&dyn BenchmarkPort>,
    portfolio: &PortfolioConfig,
) -> Result<PortfolioOutcome, BasketrackError> {
    // compute_portfolio_returns checks again; this one stops a bad config
    // before any data is fetched.
    validate_portfolio_config(portfolio)?;
    let period = holding_period(portfolio)?;

    let tickers = portfolio.all_tickers();
    tracing::info!(
        tickers = tickers.len(),
        start = %period.start,
        end = %period.end,
        "fetching prices"
    );
    let rows = data_port.fetch_prices(&tickers, period.start, period.end)?;
    let run = compute_portfolio_returns(&rows, portfolio)?;

    let benchmark = match benchmark_port {
        Some(port) => {
            let rows = port.fetch_benchmark(period.start, period.end)?;
            Some(compute_benchmark_returns(&rows, period.start, period.end))
        }
        None => None,
    };

    let report = compute_metrics(
        &run.points,
        period,
        benchmark.as_ref().map(|b| b.points.as_slice()),
    );

    Ok(PortfolioOutcome {
        run,
        benchmark,
        report,
    })
}

fn holding_period(portfolio: &PortfolioConfig) -> Result<HoldingPeriod, BasketrackError> {
    portfolio
        .holding_period()
        .ok_or_else(|| BasketrackError::InvalidPortfolio {
            reason: "at least one basket is required".into(),
        })
}

fn run_portfolio(
    config_path: &Path,
    prices_path: &Path,
    benchmark_path: Option<&Path>,
    output_path: Option<&Path>,
) -> Result<(), BasketrackError> {
    let adapter = load_config(config_path)?;
    let portfolio = build_portfolio_config(&adapter)?;
    tracing::info!(
        source = adapter.source(),
        baskets = portfolio.baskets.len(),
        "portfolio configured"
    );

    let data_port = CsvPriceAdapter::new(prices_path.to_path_buf());
    let benchmark_port = benchmark_path.map(|p| CsvBenchmarkAdapter::new(p.to_path_buf()));

    let outcome = run_pipeline(
        &data_port,
        benchmark_port.as_ref().map(|p| p as &dyn BenchmarkPort),
        &portfolio,
    )?;

    print!("{}", format_summary(&outcome));

    if let Some(path) = output_path {
        let benchmark = outcome
            .benchmark
            .as_ref()
            .map(|b| b.points.as_slice())
            .unwrap_or_default();
        CsvReportAdapter.write(&outcome.run.points, benchmark, path)?;
        tracing::info!(path = %path.display(), "series written");
    }

    Ok(())
}

/// Console summary of one portfolio run.
pub fn format_summary(outcome: &PortfolioOutcome) -> String {
    let report = &outcome.report;
    let m = &report.portfolio;
    let mut out = String::new();

    let _ = writeln!(out, "=== Portfolio Summary ===");
    let _ = writeln!(
        out,
        "Period:            {} to {} ({} days, {:.2} years)",
        report.period.start,
        report.period.end,
        report.period.days_held(),
        report.period.years()
    );
    let _ = writeln!(out, "Initial Value:     {:.2}", INITIAL_VALUE);
    let _ = writeln!(out, "Final Value:       {:.2}", outcome.run.final_value());
    let _ = writeln!(out, "Total Return:      {:.2}%", m.total_return);
    let _ = writeln!(out, "Annualized Return: {:.2}%", m.annualized_return);
    let _ = writeln!(out, "Volatility:        {:.2}%", m.volatility);
    let _ = writeln!(out, "Max Drawdown:      {:.2}%", m.max_drawdown);
    let _ = writeln!(out, "Sharpe Ratio:      {:.2}", m.sharpe_ratio);
    let _ = writeln!(out, "Win Rate:          {:.1}%", m.win_rate);

    if let (Some(b), Some(outperformance)) = (&report.benchmark, report.outperformance) {
        let _ = writeln!(out, "Benchmark Return:  {:.2}%", b.total_return);
        let _ = writeln!(out, "Outperformance:    {:.2}%", outperformance);
    } else if let Some(gap) = outcome.benchmark.as_ref().and_then(|b| b.gap) {
        let _ = writeln!(out, "Benchmark:         unavailable ({gap})");
    }

    let _ = writeln!(out, "\n=== Baskets ===");
    for s in &outcome.run.summaries {
        let sign = if s.return_pct >= 0.0 { "+" } else { "" };
        let _ = writeln!(
            out,
            "  {}: {} to {}, {} tickers, {}{:.2}%",
            s.index + 1,
            s.first_date,
            s.last_date,
            s.tickers,
            sign,
            s.return_pct
        );
    }
    for s in &outcome.run.skipped {
        let reason = match s.reason {
            SkipReason::NoTickers => "no tickers",
            SkipReason::NoData => "no price data",
        };
        let _ = writeln!(out, "  {}: skipped ({reason})", s.index + 1);
    }

    out
}

fn run_compare(
    config_paths: &[PathBuf],
    prices_path: &Path,
    benchmark_path: Option<&Path>,
) -> Result<(), BasketrackError> {
    let mut named = Vec::with_capacity(config_paths.len());
    for path in config_paths {
        let adapter = load_config(path)?;
        let portfolio = build_portfolio_config(&adapter)?;
        // Reject every bad file before the shared fetch.
        validate_portfolio_config(&portfolio)?;
        named.push((portfolio_name(&adapter, path), portfolio));
    }

    let configs: Vec<PortfolioConfig> = named.iter().map(|(_, c)| c.clone()).collect();
    let span = overall_period(&configs).ok_or_else(|| BasketrackError::InvalidPortfolio {
        reason: "no portfolio has a basket".into(),
    })?;

    let mut tickers: Vec<_> = configs.iter().flat_map(|c| c.all_tickers()).collect();
    tickers.sort();
    tickers.dedup();
    tracing::info!(
        portfolios = named.len(),
        tickers = tickers.len(),
        start = %span.start,
        end = %span.end,
        "fetching shared data"
    );

    let rows = CsvPriceAdapter::new(prices_path.to_path_buf()).fetch_prices(
        &tickers,
        span.start,
        span.end,
    )?;
    let benchmark = match benchmark_path {
        Some(p) => Some(
            CsvBenchmarkAdapter::new(p.to_path_buf()).fetch_benchmark(span.start, span.end)?,
        ),
        None => None,
    };

    let summaries = compare_portfolios(&named, &rows, benchmark.as_deref())?;
    print!("{}", format_comparison(&summaries));
    Ok(())
}

/// Runs each named portfolio against the shared rows and ranks the results.
/// The benchmark is rebased over each portfolio's own holding period.
/// Portfolios with no usable data are logged and left out.
pub fn compare_portfolios(
    named: &[(String, PortfolioConfig)],
    rows: &[PriceRow],
    benchmark: Option<&[BenchmarkRow]>,
) -> Result<Vec<PortfolioSummary>, BasketrackError> {
    let mut summaries = Vec::with_capacity(named.len());
    for (name, portfolio) in named {
        let period = holding_period(portfolio)?;
        let run = match compute_portfolio_returns(rows, portfolio) {
            Ok(run) => run,
            Err(BasketrackError::NoUsableData { .. }) => {
                tracing::warn!(portfolio = %name, "no usable price data, excluded from comparison");
                continue;
            }
            Err(e) => return Err(e),
        };
        let rebased = benchmark.map(|b| compute_benchmark_returns(b, period.start, period.end));
        let report = compute_metrics(
            &run.points,
            period,
            rebased.as_ref().map(|b| b.points.as_slice()),
        );
        tracing::info!(portfolio = %name, total_return = report.portfolio.total_return, "portfolio computed");
        summaries.push(PortfolioSummary {
            name: name.clone(),
            baskets: portfolio.baskets.len(),
            period,
            benchmark_return: report.benchmark.as_ref().map(|b| b.total_return),
            outperformance: report.outperformance,
            metrics: report.portfolio,
        });
    }
    Ok(rank_by_total_return(summaries))
}

pub fn format_comparison(summaries: &[PortfolioSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Comparison Summary ===");
    for (rank, s) in summaries.iter().enumerate() {
        let m = &s.metrics;
        let _ = writeln!(out, "{}. {} ({} baskets, {} to {})", rank + 1, s.name, s.baskets, s.period.start, s.period.end);
        let _ = writeln!(out, "   Total Return: {:.2}%", m.total_return);
        let _ = writeln!(out, "   Sharpe Ratio: {:.2}", m.sharpe_ratio);
        let _ = writeln!(out, "   Max Drawdown: {:.2}%", m.max_drawdown);
        let _ = writeln!(out, "   Volatility:   {:.2}%", m.volatility);
        let _ = writeln!(out, "   Win Rate:     {:.1}%", m.win_rate);
        if let (Some(benchmark_return), Some(outperformance)) = (s.benchmark_return, s.outperformance) {
            let _ = writeln!(out, "   Benchmark:    {:.2}%", benchmark_return);
            let _ = writeln!(out, "   Outperformance: {:.2}%", outperformance);
        }
    }
    out
}

fn run_validate(config_path: &Path) -> Result<(), BasketrackError> {
    let adapter = load_config(config_path)?;
    let portfolio = build_portfolio_config(&adapter)?;
    validate_portfolio_config(&portfolio)?;

    println!("Portfolio: {}", portfolio_name(&adapter, config_path));
    for window in resolve_windows(&portfolio) {
        let close = if window.end_inclusive { ']' } else { ')' };
        let tickers: Vec<&str> = window.basket.tickers.iter().map(|t| t.as_str()).collect();
        println!(
            "  basket {}: [{}, {}{}  {}",
            window.index + 1,
            window.start,
            window.end,
            close,
            tickers.join(", ")
        );
    }
    println!("Configuration is valid.");
    Ok(())
}
