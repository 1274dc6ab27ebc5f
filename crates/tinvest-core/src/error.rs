use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Validation and contract errors exposed by `tinvest-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker must start with an ASCII letter: '{ch}'")]
    TickerInvalidStart { ch: char },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("instrument identifier cannot be empty")]
    EmptyFigi,
    #[error("instrument identifier must be 1-12 ASCII alphanumerics: '{value}'")]
    InvalidFigi { value: String },

    #[error(
        "invalid candle interval '{value}', expected one of \
         1min, 2min, 3min, 5min, 10min, 15min, 30min, hour, day, week, month"
    )]
    InvalidInterval { value: String },

    #[error("timestamp must be RFC3339 with an offset: '{value}'")]
    InvalidTimestamp { value: String },

    #[error("currency must be a 3-letter ISO code: '{value}'")]
    InvalidCurrency { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be greater than zero")]
    NonPositiveValue { field: &'static str },

    #[error("order lots must be greater than zero")]
    InvalidLots,
    #[error("order id cannot be empty")]
    EmptyOrderId,
    #[error("time range start {from} must not be after end {to}")]
    InvalidTimeRange { from: String, to: String },

    #[error("dual listing base and alternate must differ: '{figi}'")]
    SelfReferentialListing { figi: String },
    #[error("identifier '{figi}' appears in more than one dual listing")]
    DuplicateListing { figi: String },

    #[error("operation '{id}' is missing required field '{field}'")]
    MissingField { id: String, field: &'static str },
    #[error("operation '{id}' has an unparseable timestamp '{value}'")]
    MalformedTimestamp { id: String, value: String },
    #[error("operation '{id}' has an invalid instrument identifier '{value}'")]
    MalformedFigi { id: String, value: String },
}

impl ValidationError {
    /// True for errors raised while reading upstream records rather than caller input.
    pub const fn is_malformed_record(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::MalformedTimestamp { .. }
                | Self::MalformedFigi { .. }
        )
    }
}

/// Errors raised while assembling a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable '{name}' is required")]
    MissingVar { name: &'static str },

    #[error("environment variable '{name}' has an invalid value '{value}'")]
    InvalidVar { name: &'static str, value: String },

    #[error("failed to read dual listing table '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dual listing table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Client-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    InvalidRequest,
    Transport,
    Upstream,
    Decode,
    Malformed,
    NotFound,
}

/// Structured error returned by every [`BrokerClient`](crate::BrokerClient) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    retryable: bool,
}

impl ApiError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn transport(message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            message: message.into(),
            retryable,
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Upstream,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Malformed,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::NotFound,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ApiErrorKind::InvalidRequest => "api.invalid_request",
            ApiErrorKind::Transport => "api.transport",
            ApiErrorKind::Upstream => "api.upstream",
            ApiErrorKind::Decode => "api.decode",
            ApiErrorKind::Malformed => "api.malformed",
            ApiErrorKind::NotFound => "api.not_found",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ApiError {}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        if error.is_malformed_record() {
            Self::malformed(error.to_string())
        } else {
            Self::invalid_request(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::decode(format!("failed to decode upstream payload: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_errors_map_to_malformed() {
        let error = ApiError::from(ValidationError::MissingField {
            id: String::from("op-1"),
            field: "figi",
        });
        assert_eq!(error.kind(), ApiErrorKind::Malformed);
        assert!(error.message().contains("op-1"));
    }

    #[test]
    fn caller_errors_map_to_invalid_request() {
        let error = ApiError::from(ValidationError::InvalidLots);
        assert_eq!(error.kind(), ApiErrorKind::InvalidRequest);
        assert_eq!(error.code(), "api.invalid_request");
    }
}
