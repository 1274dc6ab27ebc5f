use thiserror::Error;
use tinvest_core::{ApiError, ApiErrorKind, ConfigError, ValidationError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 2,
            Self::Api(error) => match error.kind() {
                ApiErrorKind::InvalidRequest => 2,
                ApiErrorKind::NotFound => 3,
                ApiErrorKind::Upstream => 5,
                ApiErrorKind::Transport => 6,
                ApiErrorKind::Decode | ApiErrorKind::Malformed => 7,
            },
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_distinct_exit_codes() {
        assert_eq!(CliError::from(ApiError::not_found("x")).exit_code(), 3);
        assert_eq!(CliError::from(ApiError::upstream("x")).exit_code(), 5);
        assert_eq!(CliError::from(ApiError::transport("x", true)).exit_code(), 6);
        assert_eq!(CliError::from(ApiError::malformed("x")).exit_code(), 7);
    }

    #[test]
    fn caller_mistakes_exit_with_usage_code() {
        assert_eq!(CliError::from(ValidationError::InvalidLots).exit_code(), 2);
        assert_eq!(
            CliError::from(ConfigError::MissingVar {
                name: "TINVEST_TOKEN"
            })
            .exit_code(),
            2
        );
    }
}
