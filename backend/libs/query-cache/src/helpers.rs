//! Helper functions for query key management

use crate::{QueryCacheError, QueryKey, Result};

/// Build query key from router and procedure names
///
/// # Example
///
/// ```
/// use query_cache::build_query_key;
///
/// let key = build_query_key("posts", "getAll");
/// assert_eq!(key.to_string(), "posts.getAll");
/// ```
pub fn build_query_key(router: &str, procedure: &str) -> QueryKey {
    QueryKey::new(format!("{}.{}", router, procedure))
}

/// Parse query key of the form `<router>.<procedure>[:<input>]`
///
/// # Example
///
/// ```
/// use query_cache::parse_query_key;
///
/// let key = parse_query_key("posts.byId:{\"id\":\"1\"}").unwrap();
/// assert_eq!(key.path(), "posts.byId");
/// assert_eq!(key.input(), Some("{\"id\":\"1\"}"));
/// ```
pub fn parse_query_key(raw: &str) -> Result<QueryKey> {
    let (path, input) = match raw.split_once(':') {
        Some((path, input)) => (path, Some(input)),
        None => (raw, None),
    };

    if !validate_path(path) {
        return Err(QueryCacheError::InvalidKey(format!(
            "{}. Expected format: <router>.<procedure>[:<input>]",
            raw
        )));
    }

    let key = QueryKey::new(path);
    Ok(match input {
        Some(input) => key.with_input(input),
        None => key,
    })
}

/// Validate query key path format
///
/// # Example
///
/// ```
/// use query_cache::helpers::validate_path;
///
/// assert!(validate_path("posts.getAll"));
/// assert!(!validate_path("posts"));
/// assert!(!validate_path("posts."));
/// assert!(!validate_path(".getAll"));
/// ```
pub fn validate_path(path: &str) -> bool {
    match path.split_once('.') {
        Some((router, procedure)) => !router.is_empty() && !procedure.is_empty(),
        None => false,
    }
}

/// Check whether a key matches an invalidation pattern
///
/// `*` matches everything, a trailing `*` is a prefix match, anything else
/// matches the key path exactly (for every input).
pub fn matches_pattern(key: &QueryKey, pattern: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    match pattern.strip_suffix('*') {
        Some(prefix) => key.path().starts_with(prefix),
        None => key.path() == pattern,
    }
}
