//! Flight repository error types.

/// Errors that can occur when reading flights from the repository.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check FLIGHT_SOURCE_API_KEY")]
    Unauthorized,

    /// Repository returned an error status
    #[error("repository error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the flight list
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Failed to read a local flight file
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// Client could not be configured
    #[error("repository not configured: {0}")]
    NotConfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RepositoryError::Api {
            status: 503,
            message: "maintenance".into(),
        };
        assert_eq!(err.to_string(), "repository error 503: maintenance");

        let err = RepositoryError::Io {
            path: "flights.json".into(),
            message: "not found".into(),
        };
        assert_eq!(err.to_string(), "failed to read flights.json: not found");
    }
}
