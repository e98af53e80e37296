use serde::Serialize;
use thiserror::Error;

/// A validation failure attached to one form control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Client-level error type.
/// Validation variants are shown inline; everything else is logged and
/// surfaced as a generic failure through [`PortalError::user_message`].
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("File rejected: {0}")]
    FileRejected(String),

    #[error("Search filters are not initialized yet")]
    FiltersNotInitialized,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PortalError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PortalError::Validation(_) | PortalError::FileRejected(_)
        )
    }

    /// Message suitable for display next to the failed action.
    /// Transport and storage details are logged, never shown.
    pub fn user_message(&self) -> String {
        match self {
            PortalError::Validation(errors) => summarize(errors),
            PortalError::FileRejected(msg) => msg.clone(),
            PortalError::FiltersNotInitialized => "Loading search filters...".to_string(),
            PortalError::Http(e) => {
                tracing::error!("HTTP error: {e}");
                "Could not reach the server. Please try again.".to_string()
            }
            PortalError::Api { status, message } => {
                tracing::error!("API error (status {status}): {message}");
                "Something went wrong. Please try again.".to_string()
            }
            PortalError::Json(e) => {
                tracing::error!("JSON error: {e}");
                "Something went wrong. Please try again.".to_string()
            }
            PortalError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                "Upload failed. Please try again.".to_string()
            }
            PortalError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
