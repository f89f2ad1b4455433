use thiserror::Error;

/// Process-level error for RustCare binaries
#[derive(Error, Debug)]
pub enum RustCareError {
    /// Network communication errors
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server runtime errors
    #[error("Server error: {0}")]
    ServerError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RustCareError {
    /// Stable error category for structured logs
    pub fn category(&self) -> &'static str {
        match self {
            RustCareError::NetworkError(_) => "network",
            RustCareError::ServerError(_) => "server",
            RustCareError::ConfigError(_) => "config",
            RustCareError::InternalError(_) => "internal",
            RustCareError::Other(_) => "other",
        }
    }

    /// Log the error with its category and return it, for use in `map_err` chains
    pub fn logged(self, context: &str) -> Self {
        tracing::error!(
            context = context,
            category = self.category(),
            error = %self,
            "RustCare error occurred"
        );
        self
    }
}

/// Result type alias for RustCare operations
pub type Result<T> = std::result::Result<T, RustCareError>;
