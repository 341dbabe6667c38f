//! Shared error type across pingmeter crates.

use thiserror::Error;

/// How an error should be treated by the component that hit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Detected while wiring the process; the affected component must not start.
    Startup,
    /// Blips a single data point; log and carry on.
    Transient,
}

impl ErrorClass {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorClass::Startup => "STARTUP",
            ErrorClass::Transient => "TRANSIENT",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Unified error type used by core and service.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metric already registered: {0}")]
    AlreadyRegistered(String),
    #[error("invalid metric name: {0:?}")]
    InvalidName(String),
    #[error("invalid label name {label:?} on metric {metric}")]
    InvalidLabel { metric: String, label: String },
    #[error("invalid buckets for {metric}: {reason}")]
    InvalidBuckets { metric: String, reason: String },
    #[error("config: {0}")]
    Config(String),
    #[error("bind {addr} failed: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("internal: {0}")]
    Internal(String),
}

impl MetricsError {
    /// Classify the error for propagation decisions.
    pub fn class(&self) -> ErrorClass {
        match self {
            MetricsError::AlreadyRegistered(_)
            | MetricsError::InvalidName(_)
            | MetricsError::InvalidLabel { .. }
            | MetricsError::InvalidBuckets { .. }
            | MetricsError::Config(_)
            | MetricsError::Bind { .. } => ErrorClass::Startup,
            MetricsError::Internal(_) => ErrorClass::Transient,
        }
    }
}
