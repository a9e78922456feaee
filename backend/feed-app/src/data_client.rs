//! Remote data client
//!
//! Binds the posts procedures to the query cache. Components share one
//! [`DataClient`]; reads go through the cache, writes go straight to the
//! backend and invalidate what they affect.

use std::sync::Arc;

use query_cache::{
    build_query_key, CacheOptions, QueryCache, QueryKey, QuerySnapshot, QueryStats, Subscription,
};
use rpc_client::RpcError;
use tracing::{debug, info, warn};

use crate::api::PostsApi;
use crate::models::{CreatePostInput, Post, PostWithAuthor};
use crate::resource::Resource;

pub type FeedCache = QueryCache<Vec<PostWithAuthor>, RpcError>;

/// Key of the `posts.getAll` query
pub fn all_posts_key() -> QueryKey {
    build_query_key("posts", "getAll")
}

#[derive(Clone)]
pub struct DataClient {
    api: Arc<dyn PostsApi>,
    cache: FeedCache,
}

impl DataClient {
    pub fn new(api: Arc<dyn PostsApi>, options: CacheOptions) -> Self {
        Self {
            api,
            cache: QueryCache::new(options),
        }
    }

    /// Read the feed through the cache
    pub async fn get_all_posts(&self) -> Result<Vec<PostWithAuthor>, RpcError> {
        let api = Arc::clone(&self.api);
        self.cache
            .query(&all_posts_key(), move || async move { api.get_all().await })
            .await
    }

    /// Start loading the feed without waiting for it
    ///
    /// Failures land in the cache entry and show up in the next render.
    pub fn prefetch_all_posts(&self) {
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(e) = client.get_all_posts().await {
                debug!(error = %e, "Feed prefetch failed");
            }
        });
    }

    pub fn all_posts_snapshot(&self) -> QuerySnapshot<Vec<PostWithAuthor>> {
        self.cache.snapshot(&all_posts_key())
    }

    /// Feed state as seen by views
    pub fn all_posts_state(&self) -> Resource<Vec<PostWithAuthor>> {
        Resource::from(self.all_posts_snapshot())
    }

    /// Create a post
    ///
    /// Never touches the cache; callers invalidate once they know the
    /// mutation succeeded.
    pub async fn create_post(&self, input: &CreatePostInput) -> Result<Option<Post>, RpcError> {
        match self.api.create(input).await {
            Ok(post) => {
                info!(post_id = ?post.as_ref().map(|p| p.id.as_str()), "Post created");
                Ok(post)
            }
            Err(e) => {
                warn!(error = %e, status = e.status_code(), "Post creation failed");
                Err(e)
            }
        }
    }

    /// Mark the feed stale and tell subscribers
    pub fn invalidate_all_posts(&self) -> bool {
        self.cache.invalidate(&all_posts_key())
    }

    pub fn subscribe(&self) -> Subscription {
        self.cache.subscribe()
    }

    pub fn stats(&self) -> QueryStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &FeedCache {
        &self.cache
    }
}
