// Custom error types for better error handling
#[derive(Debug)]
pub enum AppError {
    ConfigError(String),
    /// Transport failure, non-success status, or an unparseable body from the
    /// upstream API. Collapsed into the not-found outcome at the primary
    /// lookup and into empty results at the secondary lookups.
    UpstreamError(String),
    /// The upstream responded, but an expected field was absent or a resource
    /// reference did not have the expected shape. Never swallowed.
    MalformedData(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            AppError::MalformedData(msg) => write!(f, "Malformed upstream data: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::UpstreamError(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}
