//! Error types for the MonarQ adapter.

use pileface_hal::HalError;
use thiserror::Error;

/// Result type for MonarQ operations.
pub type MonarqResult<T> = Result<T, MonarqError>;

/// Errors that can occur when interacting with the Calcul Québec API.
#[derive(Debug, Error)]
pub enum MonarqError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The service rejected the credentials.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// A credential was empty.
    #[error("Missing MonarQ credential: {0}")]
    MissingCredential(&'static str),

    /// No project with the configured name.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// No machine with the configured name.
    #[error("Machine not found: {0}")]
    MachineNotFound(String),

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Job execution failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// The response parsed but does not carry what we need.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// API error response.
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
}

impl From<MonarqError> for HalError {
    fn from(e: MonarqError) -> Self {
        match e {
            MonarqError::Http(err) => HalError::Network(err),
            MonarqError::Json(err) => HalError::Serialization(err),
            MonarqError::AuthFailed(msg) => HalError::AuthenticationFailed(msg),
            MonarqError::MissingCredential(name) => {
                HalError::AuthenticationFailed(format!("missing {name}"))
            }
            MonarqError::ProjectNotFound(name) => {
                HalError::SubmissionFailed(format!("project not found: {name}"))
            }
            MonarqError::MachineNotFound(name) => {
                HalError::BackendUnavailable(format!("machine not found: {name}"))
            }
            MonarqError::JobNotFound(id) => HalError::JobNotFound(id),
            MonarqError::JobFailed(msg) => HalError::JobFailed(msg),
            MonarqError::MalformedResponse(msg) => HalError::MalformedResult(msg),
            e @ MonarqError::ApiError { .. } => HalError::Backend(e.to_string()),
        }
    }
}
