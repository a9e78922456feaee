//! Error types for query cache operations

use thiserror::Error;

/// Query cache errors
#[derive(Error, Debug)]
pub enum QueryCacheError {
    /// Query key could not be parsed
    #[error("Invalid query key: {0}")]
    InvalidKey(String),

    /// Subscriber fell behind and missed events
    #[error("Subscriber lagged behind by {0} events")]
    Lagged(u64),

    /// Cache was dropped, no more events will arrive
    #[error("Event channel closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryCacheError::InvalidKey("posts.".to_string());
        assert_eq!(err.to_string(), "Invalid query key: posts.");

        let err = QueryCacheError::Lagged(3);
        assert_eq!(err.to_string(), "Subscriber lagged behind by 3 events");
    }
}
