//! Resource lifecycle error types

use thiserror::Error;

/// Errors raised while driving a resource through its lifecycle
#[derive(Error, Debug)]
pub enum CloudError {
    /// Configuration rejected before any network call
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// Attempt to change a write-once attribute
    #[error("Cannot update immutable field {0}")]
    ImmutableField(String),

    /// The remote API reported that the entity does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The call succeeded but the payload violates the API contract
    #[error("Bad API response: {0}")]
    BadResponse(String),

    /// Any other failure reported by the remote API
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport failure before a status code was received
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("State file error: {0}")]
    StateError(String),

    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    /// Error annotated with the operation that produced it
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<CloudError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// HTTP status reported by the remote API, looking through context wrappers
    pub fn status(&self) -> Option<u16> {
        match self {
            CloudError::Api { status, .. } => Some(*status),
            CloudError::NotFound(_) => Some(404),
            CloudError::Context { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Whether the remote API reported the entity as absent
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Wrap the error with a description of what was being attempted
    pub fn context(self, context: impl Into<String>) -> Self {
        CloudError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
