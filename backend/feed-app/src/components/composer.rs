//! Post composer
//!
//! Owns the draft and the in-flight flag. A successful post clears the draft
//! and invalidates the feed; a failed one keeps the draft and raises a toast.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

use crate::components::loading::loading_spinner;
use crate::components::post_view::AVATAR_SIZE;
use crate::data_client::DataClient;
use crate::identity::IdentityHandle;
use crate::models::CreatePostInput;
use crate::toast::Toaster;
use crate::view::{Element, Node};

pub const SUBMIT_KEY: &str = "Enter";
pub const PLACEHOLDER: &str = "Type some text!";
pub const GENERIC_POST_ERROR: &str = "Failed to post! Please try again later.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposerState {
    pub draft: String,
    pub posting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Posted,
    /// Request failed; carries the toast text shown to the user
    Failed(String),
    /// No request was issued
    Ignored,
}

#[derive(Clone)]
pub struct PostComposer {
    identity: IdentityHandle,
    client: DataClient,
    toaster: Toaster,
    state: Arc<Mutex<ComposerState>>,
}

impl PostComposer {
    pub fn new(identity: IdentityHandle, client: DataClient, toaster: Toaster) -> Self {
        Self {
            identity,
            client,
            toaster,
            state: Arc::new(Mutex::new(ComposerState::default())),
        }
    }

    pub fn state(&self) -> ComposerState {
        self.state.lock().clone()
    }

    pub fn draft(&self) -> String {
        self.state.lock().draft.clone()
    }

    pub fn is_posting(&self) -> bool {
        self.state.lock().posting
    }

    /// Replace the draft; ignored while a post is in flight
    pub fn set_input(&self, value: impl Into<String>) -> bool {
        let mut state = self.state.lock();
        if state.posting {
            return false;
        }
        state.draft = value.into();
        true
    }

    /// Keyboard activation from the input
    pub async fn handle_key(&self, key: &str) -> SubmitOutcome {
        if key != SUBMIT_KEY {
            return SubmitOutcome::Ignored;
        }
        self.submit().await
    }

    /// Submit the current draft
    pub async fn submit(&self) -> SubmitOutcome {
        if self.identity.user().is_none() {
            debug!("Submit ignored, no signed-in user");
            return SubmitOutcome::Ignored;
        }

        let content = {
            let mut state = self.state.lock();
            if state.posting || state.draft.is_empty() {
                return SubmitOutcome::Ignored;
            }
            state.posting = true;
            state.draft.clone()
        };

        let result = self
            .client
            .create_post(&CreatePostInput::new(content))
            .await;

        let outcome = {
            let mut state = self.state.lock();
            state.posting = false;

            match &result {
                Ok(_) => {
                    state.draft.clear();
                    SubmitOutcome::Posted
                }
                Err(e) => SubmitOutcome::Failed(
                    e.first_field_error("content")
                        .unwrap_or(GENERIC_POST_ERROR)
                        .to_string(),
                ),
            }
        };

        match &outcome {
            SubmitOutcome::Posted => {
                let invalidated = self.client.invalidate_all_posts();
                info!(invalidated, "Post submitted");
            }
            SubmitOutcome::Failed(message) => {
                self.toaster.error(message.clone());
            }
            SubmitOutcome::Ignored => {}
        }

        outcome
    }

    pub fn render(&self) -> Node {
        let Some(user) = self.identity.user() else {
            return Node::Empty;
        };
        let ComposerState { draft, posting } = self.state();

        let mut row = Element::new("div")
            .class("flex w-full gap-3")
            .child(
                Element::new("img")
                    .attr("src", user.profile_image_url)
                    .attr("alt", "Profile image")
                    .class("h-14 w-14 rounded-full")
                    .attr("width", AVATAR_SIZE.to_string())
                    .attr("height", AVATAR_SIZE.to_string()),
            )
            .child(
                Element::new("input")
                    .attr("type", "text")
                    .attr("placeholder", PLACEHOLDER)
                    .class("grow bg-transparent outline-none")
                    .attr("value", draft.clone())
                    .flag("disabled", posting),
            );

        if !draft.is_empty() && !posting {
            row = row.child(Element::new("button").attr("type", "submit").text("Post"));
        }

        if posting {
            row = row.child(
                Element::new("div")
                    .class("flex items-center justify-center")
                    .child(loading_spinner(20)),
            );
        }

        row.into()
    }
}
