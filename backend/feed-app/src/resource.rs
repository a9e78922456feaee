//! State of an asynchronous resource
//!
//! One tagged union instead of `is_loading` / `data` / `error` flags, so a
//! view can never see "finished loading but no data and no error".

use query_cache::QuerySnapshot;

/// Message shown when a query finished without usable data
pub const MISSING_DATA: &str = "query resolved without data";

#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    Pending,
    Failed(String),
    Ready(T),
}

impl<T> Resource<T> {
    /// Build from loading flag and optional data
    ///
    /// Data wins over the loading flag: a background refetch keeps showing
    /// what is already there.
    pub fn from_flags(is_loading: bool, data: Option<T>) -> Self {
        match data {
            Some(value) => Resource::Ready(value),
            None if is_loading => Resource::Pending,
            None => Resource::Failed(MISSING_DATA.to_string()),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Resource::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Resource::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> Resource<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Resource::Pending => Resource::Pending,
            Resource::Failed(reason) => Resource::Failed(reason),
            Resource::Ready(value) => Resource::Ready(f(value)),
        }
    }
}

impl<T> From<QuerySnapshot<T>> for Resource<T> {
    /// A key that was never fetched counts as pending: the view that reads it
    /// is about to issue the query.
    fn from(snapshot: QuerySnapshot<T>) -> Self {
        match (snapshot.data, snapshot.error) {
            (Some(value), _) => Resource::Ready(value),
            (None, Some(error)) if !snapshot.is_fetching => Resource::Failed(error),
            (None, _) => Resource::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(
        data: Option<Vec<u32>>,
        is_fetching: bool,
        error: Option<&str>,
    ) -> QuerySnapshot<Vec<u32>> {
        QuerySnapshot {
            data,
            is_fetching,
            is_stale: false,
            error: error.map(str::to_string),
            updated_at: None,
        }
    }

    #[test]
    fn test_from_flags() {
        assert_eq!(Resource::<Vec<u32>>::from_flags(true, None), Resource::Pending);
        assert_eq!(
            Resource::<Vec<u32>>::from_flags(false, None),
            Resource::Failed(MISSING_DATA.to_string())
        );
        assert_eq!(
            Resource::<Vec<u32>>::from_flags(false, Some(vec![])),
            Resource::Ready(vec![])
        );
        assert_eq!(Resource::from_flags(true, Some(vec![1])), Resource::Ready(vec![1]));
    }

    #[test]
    fn test_from_snapshot() {
        assert_eq!(Resource::from(QuerySnapshot::<Vec<u32>>::idle()), Resource::Pending);
        assert_eq!(Resource::from(snapshot(None, true, None)), Resource::Pending);
        assert_eq!(
            Resource::from(snapshot(None, false, Some("HTTP 502"))),
            Resource::Failed("HTTP 502".to_string())
        );
        // Retrying after a failure shows the loader again
        assert_eq!(Resource::from(snapshot(None, true, Some("HTTP 502"))), Resource::Pending);
        // Cached data survives a failed refetch
        assert_eq!(
            Resource::from(snapshot(Some(vec![3]), false, Some("HTTP 502"))),
            Resource::Ready(vec![3])
        );
    }

    #[test]
    fn test_map_and_accessors() {
        let ready = Resource::Ready(vec![1, 2]).map(|v| v.len());
        assert_eq!(ready.ready(), Some(&2));
        assert!(Resource::<u32>::Pending.is_pending());
        assert!(Resource::<u32>::Failed("x".into()).ready().is_none());
    }
}
