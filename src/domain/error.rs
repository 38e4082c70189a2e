//! Error types shared by the adapters and the CLI.
//!
//! Domain functions in [`crate::domain::dsl`] and [`crate::domain::analysis`]
//! are total and never return these; only loading config or backtest data can fail.

/// Top-level error type for sigmatrader.
#[derive(Debug, thiserror::Error)]
pub enum SigmaError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to read {path}: {reason}")]
    DataRead { path: String, reason: String },

    #[error("malformed data in {path}: {reason}")]
    DataFormat { path: String, reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SigmaError> for std::process::ExitCode {
    fn from(err: &SigmaError) -> Self {
        let code: u8 = match err {
            SigmaError::Io(_) | SigmaError::Csv(_) | SigmaError::Json(_) => 1,
            SigmaError::ConfigParse { .. } | SigmaError::ConfigInvalid { .. } => 2,
            SigmaError::DataRead { .. } | SigmaError::DataFormat { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}
