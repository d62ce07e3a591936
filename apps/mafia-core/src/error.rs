use thiserror::Error;

use crate::errors::{DomainError, ErrorCode};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Domain(err) => err.code(),
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }
}
