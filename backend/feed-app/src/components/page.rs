//! Home page
//!
//! Nothing but a placeholder until identity has loaded. After that the top
//! section is a sign-in link or the composer, and the feed is rendered below
//! it either way.

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::components::composer::PostComposer;
use crate::components::feed::FeedRenderer;
use crate::components::layout::page_layout;
use crate::config::AppConfig;
use crate::data_client::DataClient;
use crate::identity::{IdentityHandle, IdentityState};
use crate::toast::{ToastKind, Toaster};
use crate::view::{Element, Node};

pub const FAVICON_HREF: &str = "/favicon.ico";

#[derive(Clone)]
pub struct HomePage {
    app: AppConfig,
    sign_in_url: String,
    identity: IdentityHandle,
    toaster: Toaster,
    composer: PostComposer,
    feed: FeedRenderer,
}

impl HomePage {
    pub fn new(
        app: AppConfig,
        sign_in_url: impl Into<String>,
        identity: IdentityHandle,
        client: DataClient,
        toaster: Toaster,
    ) -> Self {
        Self {
            composer: PostComposer::new(identity.clone(), client.clone(), toaster.clone()),
            feed: FeedRenderer::new(client),
            app,
            sign_in_url: sign_in_url.into(),
            identity,
            toaster,
        }
    }

    /// Start the feed query and its refresh task
    ///
    /// Does not wait for identity: the feed loads while the session is still
    /// being resolved. The returned guard stops the refresh task when dropped.
    pub fn mount(&self) -> RefreshGuard {
        self.feed.mount();
        RefreshGuard {
            task: self.feed.spawn_refresh(),
        }
    }

    pub fn composer(&self) -> &PostComposer {
        &self.composer
    }

    pub fn feed(&self) -> &FeedRenderer {
        &self.feed
    }

    /// Page body inside the layout column
    ///
    /// Renders only an empty placeholder while identity is loading.
    pub fn render(&self, now: DateTime<Utc>) -> Node {
        let top = match self.identity.current() {
            IdentityState::Loading => return Element::new("div").into(),
            IdentityState::SignedOut => Element::new("div")
                .class("flex border-b border-slate-400 p-4")
                .child(
                    Element::new("div").class("flex justify-center").child(
                        Element::new("a")
                            .attr("href", self.sign_in_url.clone())
                            .text("Sign in"),
                    ),
                )
                .into(),
            IdentityState::SignedIn(_) => Element::new("div")
                .class("flex border-b border-slate-400 p-4")
                .child(self.composer.render())
                .into(),
        };

        page_layout(vec![top, self.feed.render(now)])
    }

    /// Full HTML document with head and toaster
    pub fn render_document(&self, now: DateTime<Utc>) -> String {
        let head = Element::new("head")
            .child(Element::new("title").text(self.app.title.clone()))
            .child(
                Element::new("meta")
                    .attr("name", "description")
                    .attr("content", self.app.description.clone()),
            )
            .child(
                Element::new("link")
                    .attr("rel", "icon")
                    .attr("href", FAVICON_HREF),
            );

        let body = Element::new("body")
            .child(toaster_region(&self.toaster, now))
            .child(self.render(now));

        let html: Node = Element::new("html")
            .attr("lang", "en")
            .child(head)
            .child(body)
            .into();

        format!("<!DOCTYPE html>{}", html.render_html())
    }
}

/// Owns the feed refresh task; aborts it on drop
pub struct RefreshGuard {
    task: JoinHandle<()>,
}

impl RefreshGuard {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn toaster_region(toaster: &Toaster, now: DateTime<Utc>) -> Node {
    let toasts = toaster.active(now).into_iter().map(|toast| {
        let kind = match toast.kind {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Loading => "loading",
        };
        Node::from(
            Element::new("div")
                .attr("role", "status")
                .attr("data-kind", kind)
                .text(toast.message),
        )
    });

    Element::new("div")
        .class("fixed right-4 top-4 flex flex-col gap-2")
        .attr("data-position", "top-right")
        .children(toasts)
        .into()
}
