//! Error types for Volley
//!
//! Centralized error handling using thiserror. Request failures are never
//! errors here: they are recorded as outcomes. These variants cover setup
//! problems only.

use thiserror::Error;

/// All error types that can occur while setting up a dispatch
#[derive(Debug, Error)]
pub enum VolleyError {
    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Dispatcher options are inconsistent
    #[error("Invalid dispatcher options: {0}")]
    InvalidOptions(String),
}

/// Result type alias for Volley operations
pub type Result<T> = std::result::Result<T, VolleyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_options_error() {
        let err = VolleyError::InvalidOptions("max_in_flight must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid dispatcher options: max_in_flight must be at least 1"
        );
    }

    #[tokio::test]
    async fn test_reqwest_error_conversion() {
        let reqwest_err = reqwest::Client::new().post("not a url").send().await.unwrap_err();
        let err: VolleyError = reqwest_err.into();
        assert!(matches!(err, VolleyError::HttpClient(_)));
        assert!(err.to_string().starts_with("HTTP client error:"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<usize> {
            Ok(100)
        }

        fn returns_err() -> Result<usize> {
            Err(VolleyError::InvalidOptions("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
