//! Identity state supplied by the authentication provider
//!
//! The provider owns the state and is the only writer. Components get an
//! [`IdentityHandle`] and read from it; they never issue or validate
//! credentials themselves.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

/// Signed-in user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub profile_image_url: String,
    /// Bearer token for backend calls
    #[serde(skip_serializing, default)]
    pub session_token: Option<String>,
}

/// Authentication state as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentityState {
    /// Provider has not resolved the session yet
    #[default]
    Loading,
    SignedOut,
    SignedIn(Identity),
}

impl IdentityState {
    pub fn is_loaded(&self) -> bool {
        !matches!(self, IdentityState::Loading)
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, IdentityState::SignedIn(_))
    }

    pub fn user(&self) -> Option<&Identity> {
        match self {
            IdentityState::SignedIn(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Writer side, held by the authentication integration
pub struct IdentityProvider {
    sender: watch::Sender<IdentityState>,
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider {
    /// Create a provider in the loading state
    pub fn new() -> Self {
        let (sender, _) = watch::channel(IdentityState::Loading);
        Self { sender }
    }

    pub fn handle(&self) -> IdentityHandle {
        IdentityHandle {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn sign_in(&self, identity: Identity) {
        info!(user_id = %identity.id, username = %identity.username, "Identity signed in");
        self.sender.send_replace(IdentityState::SignedIn(identity));
    }

    pub fn sign_out(&self) {
        info!("Identity signed out");
        self.sender.send_replace(IdentityState::SignedOut);
    }

    /// Back to the unresolved state, e.g. while a session refresh is pending
    pub fn reset(&self) {
        self.sender.send_replace(IdentityState::Loading);
    }
}

/// Read side, passed to components
#[derive(Clone)]
pub struct IdentityHandle {
    receiver: watch::Receiver<IdentityState>,
}

impl IdentityHandle {
    /// Current state
    pub fn current(&self) -> IdentityState {
        self.receiver.borrow().clone()
    }

    /// Current signed-in user
    pub fn user(&self) -> Option<Identity> {
        self.receiver.borrow().user().cloned()
    }

    /// Wait for the next state change
    ///
    /// Returns `None` once the provider is gone.
    pub async fn changed(&mut self) -> Option<IdentityState> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Wait until the provider has resolved the session
    pub async fn loaded(&mut self) -> IdentityState {
        loop {
            let state = self.receiver.borrow_and_update().clone();
            if state.is_loaded() {
                return state;
            }
            if self.receiver.changed().await.is_err() {
                return state;
            }
        }
    }
}
