//! Domain error types.

/// Top-level error type for basketrack.
///
/// Partial data gaps are not errors; they travel alongside results as
/// [`crate::domain::rollover::SkippedBasket`] and
/// [`crate::domain::benchmark::BenchmarkGap`].
#[derive(Debug, thiserror::Error)]
pub enum BasketrackError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid portfolio: {reason}")]
    InvalidPortfolio { reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no usable price data in any of {baskets} basket(s)")]
    NoUsableData { baskets: usize },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BasketrackError> for std::process::ExitCode {
    fn from(err: &BasketrackError) -> Self {
        let code: u8 = match err {
            BasketrackError::Io(_) => 1,
            BasketrackError::ConfigParse { .. }
            | BasketrackError::ConfigMissing { .. }
            | BasketrackError::ConfigInvalid { .. } => 2,
            BasketrackError::InvalidPortfolio { .. } => 3,
            BasketrackError::Data { .. } | BasketrackError::Csv(_) => 4,
            BasketrackError::NoUsableData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
