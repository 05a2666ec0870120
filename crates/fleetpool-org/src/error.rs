//! Organizations API error types
//!
//! Error definitions with transient/permanent classification for retry logic.

use thiserror::Error;

/// Error that can occur when talking to the provider's Organizations API.
#[derive(Debug, Error)]
pub enum OrgApiError {
    // Connection errors (usually transient)
    /// Failed to reach the Organizations endpoint.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request was throttled by the provider.
    #[error("request throttled: {message}")]
    Throttled { message: String },

    /// The Organizations service is temporarily unavailable.
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String },

    // API errors (permanent)
    /// The API call was rejected or failed at the provider.
    #[error("api call failed: {message}")]
    ApiFailure {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Caller lacks permission for the operation.
    #[error("access denied for {operation}")]
    AccessDenied { operation: String },

    /// No parent record exists for a node that was expected to have one.
    #[error("no parent found for node {node}")]
    ParentNotFound { node: String },

    /// More than one parent record for a node. A well-formed organization
    /// tree never produces this; it indicates corrupted provider data.
    #[error("{count} parents found for node {node}, expected at most 1")]
    MultipleParents { node: String, count: usize },
}

impl OrgApiError {
    /// Check if this error is transient and the operation should be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OrgApiError::ConnectionFailed { .. }
                | OrgApiError::Throttled { .. }
                | OrgApiError::ServiceUnavailable { .. }
        )
    }

    /// Check if this error is permanent and retry won't help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            OrgApiError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            OrgApiError::Throttled { .. } => "THROTTLED",
            OrgApiError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            OrgApiError::ApiFailure { .. } => "API_FAILURE",
            OrgApiError::AccessDenied { .. } => "ACCESS_DENIED",
            OrgApiError::ParentNotFound { .. } => "PARENT_NOT_FOUND",
            OrgApiError::MultipleParents { .. } => "MULTIPLE_PARENTS",
        }
    }

    // Convenience constructors

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        OrgApiError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        OrgApiError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a generic API failure.
    pub fn api_failure(message: impl Into<String>) -> Self {
        OrgApiError::ApiFailure {
            message: message.into(),
            source: None,
        }
    }

    /// Create a generic API failure with source.
    pub fn api_failure_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        OrgApiError::ApiFailure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a parent-not-found error.
    pub fn parent_not_found(node: impl Into<String>) -> Self {
        OrgApiError::ParentNotFound { node: node.into() }
    }

    /// Create a multiple-parents data fault.
    pub fn multiple_parents(node: impl Into<String>, count: usize) -> Self {
        OrgApiError::MultipleParents {
            node: node.into(),
            count,
        }
    }
}

/// Result type for Organizations API operations.
pub type OrgResult<T> = Result<T, OrgApiError>;
