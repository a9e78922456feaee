//! Home page flow tests
//!
//! Drives the page against an in-memory posts backend whose calls can be held
//! open, so in-flight states are observable.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use feed_app::api::PostsApi;
use feed_app::components::composer::{GENERIC_POST_ERROR, PLACEHOLDER, SUBMIT_KEY};
use feed_app::components::feed::FEED_ERROR_MESSAGE;
use feed_app::components::{HomePage, SubmitOutcome};
use feed_app::config::AppConfig;
use feed_app::models::{Author, CreatePostInput, Post, PostWithAuthor};
use feed_app::{DataClient, Identity, IdentityProvider, Resource, Toaster};
use parking_lot::Mutex;
use query_cache::CacheOptions;
use rpc_client::{RpcError, ValidationErrors};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Default)]
struct FakePostsApi {
    posts: Mutex<Vec<PostWithAuthor>>,
    get_all_calls: AtomicUsize,
    created: Mutex<Vec<String>>,
    create_error: Mutex<Option<RpcError>>,
    get_all_error: Mutex<Option<RpcError>>,
    get_all_gate: Option<Arc<Notify>>,
    create_gate: Option<Arc<Notify>>,
}

impl FakePostsApi {
    fn with_posts(posts: Vec<PostWithAuthor>) -> Self {
        Self {
            posts: Mutex::new(posts),
            ..Default::default()
        }
    }

    fn get_all_calls(&self) -> usize {
        self.get_all_calls.load(Ordering::SeqCst)
    }

    fn created(&self) -> Vec<String> {
        self.created.lock().clone()
    }
}

#[async_trait]
impl PostsApi for FakePostsApi {
    async fn get_all(&self) -> Result<Vec<PostWithAuthor>, RpcError> {
        self.get_all_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.get_all_gate {
            gate.notified().await;
        }
        if let Some(err) = self.get_all_error.lock().clone() {
            return Err(err);
        }
        Ok(self.posts.lock().clone())
    }

    async fn create(&self, input: &CreatePostInput) -> Result<Option<Post>, RpcError> {
        self.created.lock().push(input.content.clone());
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }
        if let Some(err) = self.create_error.lock().clone() {
            return Err(err);
        }

        let id = format!("p{}", self.posts.lock().len() + 1);
        let created = item(&id, &input.content);
        // Newest first, like the backend
        self.posts.lock().insert(0, created.clone());
        Ok(Some(created.post))
    }
}

fn item(id: &str, content: &str) -> PostWithAuthor {
    PostWithAuthor {
        post: Post {
            id: id.to_string(),
            content: content.to_string(),
            created_at: Utc::now() - ChronoDuration::minutes(5),
            author_id: "user_1".to_string(),
        },
        author: Author {
            id: "user_1".to_string(),
            username: "theo".to_string(),
            profile_picture: "https://img.example/theo.png".to_string(),
        },
    }
}

fn theo() -> Identity {
    Identity {
        id: "user_1".to_string(),
        username: "theo".to_string(),
        profile_image_url: "https://img.example/theo.png".to_string(),
        session_token: Some("sess_1".to_string()),
    }
}

struct Harness {
    api: Arc<FakePostsApi>,
    provider: IdentityProvider,
    client: DataClient,
    toaster: Toaster,
    page: HomePage,
}

fn harness(api: FakePostsApi) -> Harness {
    let api = Arc::new(api);
    let client = DataClient::new(
        api.clone(),
        CacheOptions {
            stale_time: Duration::from_secs(30),
            event_capacity: 16,
        },
    );
    let provider = IdentityProvider::new();
    let toaster = Toaster::default();
    let app = AppConfig {
        env: "test".to_string(),
        title: "Twitter T3 Clone".to_string(),
        description: "A clone of Twitter with the T3 Stack".to_string(),
    };
    let page = HomePage::new(
        app,
        "/sign-in",
        provider.handle(),
        client.clone(),
        toaster.clone(),
    );

    Harness {
        api,
        provider,
        client,
        toaster,
        page,
    }
}

/// Poll until `check` holds or the deadline passes
async fn eventually(mut check: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !check() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn test_post_flow_creates_once_and_refreshes_feed() {
    let gate = Arc::new(Notify::new());
    let h = harness(FakePostsApi {
        create_gate: Some(gate.clone()),
        ..FakePostsApi::with_posts(vec![item("p1", "first")])
    });
    let refresh = h.page.mount();
    h.provider.sign_in(theo());

    let feed = h.page.feed().load().await;
    assert_eq!(feed.ready().map(Vec::len), Some(1));

    let composer = h.page.composer().clone();
    composer.set_input("hello world");

    let submit = {
        let composer = composer.clone();
        tokio::spawn(async move { composer.handle_key(SUBMIT_KEY).await })
    };
    eventually(|| composer.is_posting()).await;

    // In flight: input disabled, no submit control, spinner shown
    let node = composer.render();
    assert!(node.find_all("input")[0].has_attr("disabled"));
    assert!(node.find_all("button").is_empty());
    assert_eq!(node.find_all("svg").len(), 1);

    // A second activation and further typing do nothing
    assert_eq!(composer.handle_key(SUBMIT_KEY).await, SubmitOutcome::Ignored);
    assert!(!composer.set_input("changed"));

    gate.notify_one();
    assert_eq!(submit.await.unwrap(), SubmitOutcome::Posted);

    assert_eq!(h.api.created(), vec!["hello world".to_string()]);
    assert_eq!(composer.draft(), "");
    assert_eq!(h.client.stats().invalidations, 1);

    // Refresh task refetches after the invalidation
    eventually(|| h.page.feed().state().ready().map(Vec::len) == Some(2)).await;
    assert_eq!(h.api.get_all_calls(), 2);

    let ids: Vec<String> = h
        .page
        .feed()
        .state()
        .ready()
        .map(|posts| posts.iter().map(|p| p.post.id.clone()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec!["p2".to_string(), "p1".to_string()]);

    drop(refresh);
}

#[tokio::test]
async fn test_validation_failure_toasts_field_message_and_keeps_draft() {
    let h = harness(FakePostsApi::default());
    *h.api.create_error.lock() = Some(RpcError::validation(
        "posts.create",
        ValidationErrors::new().with_field_error("content", "too long"),
    ));
    h.provider.sign_in(theo());

    let composer = h.page.composer();
    composer.set_input("way too long");
    assert_eq!(
        composer.submit().await,
        SubmitOutcome::Failed("too long".to_string())
    );

    assert_eq!(composer.draft(), "way too long");
    let toasts = h.toaster.active(Utc::now());
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "too long");
    assert_eq!(h.client.stats().invalidations, 0);
}

#[tokio::test]
async fn test_unclassified_failure_uses_generic_message() {
    let h = harness(FakePostsApi::default());
    *h.api.create_error.lock() = Some(RpcError::Procedure {
        path: "posts.create".to_string(),
        code: "TOO_MANY_REQUESTS".to_string(),
        http_status: 429,
        message: "slow down".to_string(),
        validation: None,
    });
    h.provider.sign_in(theo());

    let composer = h.page.composer();
    composer.set_input("hi");
    composer.submit().await;

    assert_eq!(composer.draft(), "hi");
    assert_eq!(h.toaster.latest_message().as_deref(), Some(GENERIC_POST_ERROR));
}

#[tokio::test]
async fn test_feed_states_follow_query() {
    let gate = Arc::new(Notify::new());
    let h = harness(FakePostsApi {
        get_all_gate: Some(gate.clone()),
        ..FakePostsApi::with_posts(vec![item("p1", "first"), item("p2", "second")])
    });
    let refresh = h.page.mount();

    // Identity unresolved: nothing but the placeholder
    eventually(|| h.api.get_all_calls() == 1).await;
    assert_eq!(h.page.render(Utc::now()).render_html(), "<div></div>");

    // Still loading: full-page loader
    h.provider.sign_out();
    assert_eq!(h.page.feed().state(), Resource::Pending);
    let node = h.page.render(Utc::now());
    assert!(node.find_by_attr("data-testid", "loading-page").is_some());

    gate.notify_one();
    eventually(|| h.page.feed().state().ready().is_some()).await;

    let node = h.page.render(Utc::now());
    let ids: Vec<_> = node
        .find_all("div")
        .into_iter()
        .filter_map(|d| d.get_attr("data-post-id"))
        .collect();
    assert_eq!(ids, vec!["p1", "p2"]);
    assert!(node.text_content().contains("5 minutes ago"));

    drop(refresh);
}

#[tokio::test]
async fn test_failed_feed_renders_error_block() {
    let h = harness(FakePostsApi::default());
    *h.api.get_all_error.lock() = Some(RpcError::Transport("HTTP 502: Bad Gateway".to_string()));

    h.provider.sign_out();

    let state = h.page.feed().load().await;
    assert!(matches!(state, Resource::Failed(_)));
    assert!(h
        .page
        .render(Utc::now())
        .text_content()
        .contains(FEED_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_empty_feed_renders_no_posts() {
    let h = harness(FakePostsApi::default());
    h.provider.sign_out();

    let state = h.page.feed().load().await;
    assert_eq!(state, Resource::Ready(vec![]));

    let node = h.page.render(Utc::now());
    assert!(node.find_by_attr("data-testid", "loading-page").is_none());
    assert!(!node.text_content().contains(FEED_ERROR_MESSAGE));
    assert!(node.find_all("img").is_empty());
}

#[tokio::test]
async fn test_composer_depends_only_on_identity() {
    let gate = Arc::new(Notify::new());
    let h = harness(FakePostsApi {
        get_all_gate: Some(gate.clone()),
        ..Default::default()
    });
    let refresh = h.page.mount();

    // Identity loading, feed loading
    assert!(h.page.composer().render().is_empty());

    h.provider.sign_out();
    assert!(h.page.composer().render().is_empty());
    assert!(h.page.render(Utc::now()).find_by_attr("href", "/sign-in").is_some());

    // Signed in while the feed is still loading
    h.provider.sign_in(theo());
    let node = h.page.composer().render();
    assert_eq!(node.find_all("input")[0].get_attr("placeholder"), Some(PLACEHOLDER));

    gate.notify_one();
    eventually(|| h.page.feed().state().ready().is_some()).await;
    assert_eq!(h.page.composer().render().find_all("input").len(), 1);

    drop(refresh);
}
