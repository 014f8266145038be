//! Portfolio configuration validation.
//!
//! Rejects basket lists whose windows would be unordered or overlapping
//! before any returns are computed.

use crate::domain::basket::PortfolioConfig;
use crate::domain::error::BasketrackError;

pub fn validate_portfolio_config(config: &PortfolioConfig) -> Result<(), BasketrackError> {
    validate_has_baskets(config)?;
    validate_start_dates_ascending(config)?;
    validate_end_date(config)?;
    Ok(())
}

fn validate_has_baskets(config: &PortfolioConfig) -> Result<(), BasketrackError> {
    if config.baskets.is_empty() {
        return Err(BasketrackError::InvalidPortfolio {
            reason: "at least one basket is required".to_string(),
        });
    }
    Ok(())
}

fn validate_start_dates_ascending(config: &PortfolioConfig) -> Result<(), BasketrackError> {
    for (i, pair) in config.baskets.windows(2).enumerate() {
        if pair[1].start_date <= pair[0].start_date {
            return Err(BasketrackError::InvalidPortfolio {
                reason: format!(
                    "basket {} starts {} which is not after basket {} start {}",
                    i + 2,
                    pair[1].start_date,
                    i + 1,
                    pair[0].start_date
                ),
            });
        }
    }
    Ok(())
}

fn validate_end_date(config: &PortfolioConfig) -> Result<(), BasketrackError> {
    if let Some(last) = config.baskets.last() {
        if config.end_date < last.start_date {
            return Err(BasketrackError::InvalidPortfolio {
                reason: format!(
                    "end_date {} is before the last basket start {}",
                    config.end_date, last.start_date
                ),
            });
        }
    }
    Ok(())
}
