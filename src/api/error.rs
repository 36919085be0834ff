use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed data: {0}")]
    Deserialization(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Authentication rejected: {0}")]
    Authentication(String),

    #[error("Upstream service error: {0}")]
    Service(String),

    #[error("Not logged in - call login() first")]
    NotAuthenticated,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body so error messages stay readable
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... ({} bytes total)", &body[..end], body.len())
    }

    /// Map a non-success status to the error taxonomy.
    ///
    /// The upstream signals a rejected session with client-error statuses, so
    /// every 4xx maps to `Authentication`; 5xx and anything else unexpected
    /// map to `Service`.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        if status.is_client_error() {
            ApiError::Authentication(format!("{}: {}", status, truncated))
        } else if status.is_server_error() {
            ApiError::Service(format!("{}: {}", status, truncated))
        } else {
            ApiError::Service(format!("unexpected status {}: {}", status, truncated))
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Deserialization(err.to_string())
    }
}
