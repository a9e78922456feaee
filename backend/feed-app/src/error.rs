/// Error types for the feed client
///
/// Component-level failures (a rejected post, a failed feed load) are not
/// errors here: they are rendered in place. These are the failures that stop
/// the application from starting or rendering at all.
use rpc_client::RpcError;
use thiserror::Error;

/// Result type for feed-app operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote procedure call failed
    #[error("Remote call failed: {0}")]
    Rpc(#[from] RpcError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Config("FEED_API_URL must be set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: FEED_API_URL must be set"
        );
    }

    #[test]
    fn test_rpc_error_conversion() {
        let err: AppError = RpcError::Timeout("30s".to_string()).into();
        assert!(matches!(err, AppError::Rpc(RpcError::Timeout(_))));
    }
}
