use thiserror::Error;

/// Fallback message when the server gives no usable error string.
pub const DEFAULT_PERSIST_ERROR: &str = "Failed to save changes. Please try again.";

/// Everything a screen operation can fail with. None of these are fatal;
/// the table stays interactive after any of them.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required scope identifier was absent from the session. Raised
    /// before any network call is issued.
    #[error("no {what} selected")]
    ScopeMissing { what: &'static str },

    /// Client-side validation rejected the value. Raised before any
    /// network call is issued.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Non-success envelope, transport error, or timeout. Timeouts are
    /// the same retryable failure as a server error and trigger the same
    /// revert path.
    #[error("{message}")]
    Network { message: String },

    /// 401 or an envelope flag marking the session invalid server-side.
    /// Not locally recoverable: the session store must be wiped.
    #[error("your session has expired, please sign in again")]
    SessionInvalidated,
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network {
            message: message.into(),
        }
    }
}

/// Client-side validation outcomes for adds and edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Every identity field whose value collides with an existing row,
    /// listed together rather than first-conflict-only.
    #[error("duplicate value for {}", .0.join(", "))]
    DuplicateFields(Vec<String>),

    #[error("{field}: {reason}")]
    Format { field: String, reason: String },

    #[error("{field} is required")]
    Required { field: String },
}
