use pricechart_core::{GatewayErrorKind, PipelineError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] pricechart_core::ValidationError),

    #[error(transparent)]
    Range(#[from] pricechart_core::RangeError),

    #[error(transparent)]
    Gateway(#[from] pricechart_core::GatewayError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<PipelineError> for CliError {
    fn from(value: PipelineError) -> Self {
        match value {
            PipelineError::Validation(error) => Self::Validation(error),
            PipelineError::Range(error) => Self::Range(error),
            PipelineError::Gateway(error) => Self::Gateway(error),
        }
    }
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Range(_) => 2,
            Self::Gateway(error) if error.kind() == GatewayErrorKind::Unauthenticated => 3,
            Self::Gateway(_) => 4,
            Self::Serialization(_) => 5,
            Self::Io(_) => 10,
        }
    }
}
