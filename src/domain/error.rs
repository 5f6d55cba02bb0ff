//! Domain error types.

/// Failure to turn a cell's text into a scaled decimal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("empty numeric value")]
    Empty,

    #[error("not a decimal number: {text:?}")]
    Malformed { text: String },

    #[error("decimal value out of range: {text:?}")]
    OutOfRange { text: String },
}

/// Top-level error type for indexetl.
#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

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

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("spreadsheet error in {path}: {reason}")]
    Spreadsheet { path: String, reason: String },

    #[error("report error for {path}: {reason}")]
    Report { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&EtlError> for std::process::ExitCode {
    fn from(err: &EtlError) -> Self {
        let code: u8 = match err {
            EtlError::Io(_) => 1,
            EtlError::ConfigParse { .. }
            | EtlError::ConfigMissing { .. }
            | EtlError::ConfigInvalid { .. } => 2,
            EtlError::Database { .. } | EtlError::DatabaseQuery { .. } => 3,
            EtlError::Spreadsheet { .. } | EtlError::Conversion(_) => 4,
            EtlError::Report { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
