//! Ticker symbol, normalized to uppercase on construction.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn new(symbol: &str) -> Self {
        Ticker(symbol.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Ticker {
    fn from(symbol: String) -> Self {
        Ticker::new(&symbol)
    }
}

impl From<&str> for Ticker {
    fn from(symbol: &str) -> Self {
        Ticker::new(symbol)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Splits a comma-separated ticker list, dropping empty tokens.
pub fn parse_tickers(input: &str) -> Vec<Ticker> {
    input
        .split(',')
        .map(Ticker::new)
        .filter(|t| !t.is_empty())
        .collect()
}
