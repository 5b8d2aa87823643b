/// Caller-side misconfiguration of the pipeline. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unsupported currency code '{0}'")]
    UnsupportedCurrency(String),
    #[error("invalid filter field `{field}`: {reason}")]
    InvalidFilter { field: &'static str, reason: String },
}
