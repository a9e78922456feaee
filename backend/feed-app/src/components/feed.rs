//! Feed renderer
//!
//! Rendering is a pure function of the feed query state. Keeping that state
//! current is the job of the refresh task: it listens for invalidations of
//! `posts.getAll` and refetches.

use chrono::{DateTime, Utc};
use query_cache::{CacheEventKind, QueryCacheError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::components::loading::loading_page;
use crate::components::post_view::post_view;
use crate::data_client::{all_posts_key, DataClient};
use crate::models::PostWithAuthor;
use crate::resource::Resource;
use crate::view::{Element, Node};

pub const FEED_ERROR_MESSAGE: &str = "Something went wrong";

/// Render feed state
pub fn render_feed(state: &Resource<Vec<PostWithAuthor>>, now: DateTime<Utc>) -> Node {
    match state {
        Resource::Pending => loading_page(),
        Resource::Failed(_) => Element::new("div").text(FEED_ERROR_MESSAGE).into(),
        Resource::Ready(posts) => Element::new("div")
            .class("flex flex-col")
            .children(posts.iter().map(|item| post_view(item, now)))
            .into(),
    }
}

#[derive(Clone)]
pub struct FeedRenderer {
    client: DataClient,
}

impl FeedRenderer {
    pub fn new(client: DataClient) -> Self {
        Self { client }
    }

    /// Issue the feed query
    pub fn mount(&self) {
        self.client.prefetch_all_posts();
    }

    /// Wait for the feed query and return the resulting state
    pub async fn load(&self) -> Resource<Vec<PostWithAuthor>> {
        if let Err(e) = self.client.get_all_posts().await {
            debug!(error = %e, "Feed load failed");
        }
        self.state()
    }

    pub fn state(&self) -> Resource<Vec<PostWithAuthor>> {
        self.client.all_posts_state()
    }

    pub fn render(&self, now: DateTime<Utc>) -> Node {
        render_feed(&self.state(), now)
    }

    /// Refetch the feed whenever it is invalidated
    ///
    /// The subscription is taken before returning, so invalidations that
    /// happen right after this call are not missed. The task holds a client
    /// clone and runs until the returned handle is aborted.
    pub fn spawn_refresh(&self) -> JoinHandle<()> {
        let client = self.client.clone();
        let mut events = client.subscribe();
        let key = all_posts_key();

        tokio::spawn(async move {
            loop {
                let refetch = match events.recv().await {
                    Ok(event) => event.key == key && event.kind == CacheEventKind::Invalidated,
                    // Missed events may include an invalidation
                    Err(QueryCacheError::Lagged(_)) => true,
                    Err(_) => break,
                };

                if !refetch {
                    continue;
                }

                info!(key = %key, "Feed invalidated, refetching");
                if let Err(e) = client.get_all_posts().await {
                    warn!(error = %e, "Feed refetch failed");
                }
            }
            debug!("Feed refresh task stopped");
        })
    }
}
