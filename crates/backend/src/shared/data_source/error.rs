use thiserror::Error;

/// Failures at the remote data-source boundary
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The API answered but reported `success: false`
    #[error("API error: {0}")]
    Api(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Fetch task failed: {0}")]
    Join(String),
}

impl FetchError {
    /// Transport failures, 429 and 5xx are worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::Http { status, .. } => *status == 429 || *status >= 500,
            FetchError::Api(_) | FetchError::Decode(_) | FetchError::Join(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(FetchError::Network("reset".into()).is_retryable());
        assert!(FetchError::Http { status: 503, body: String::new() }.is_retryable());
        assert!(!FetchError::Http { status: 404, body: String::new() }.is_retryable());
        assert!(!FetchError::Api("bad range".into()).is_retryable());
    }
}
