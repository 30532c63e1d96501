//! B2C provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum B2cError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cloud error: {0}")]
    CloudError(#[from] userflow_cloud::CloudError),
}

pub type Result<T> = std::result::Result<T, B2cError>;
