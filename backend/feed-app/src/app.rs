//! Application wiring
//!
//! Builds every shared service from [`Config`] once and hands them to the
//! components explicitly.

use std::sync::Arc;

use query_cache::CacheOptions;
use rpc_client::{RpcClient, RpcClientConfig};
use tracing::info;

use crate::api::{PostsApi, RpcPostsApi};
use crate::components::HomePage;
use crate::config::{Config, SessionSeed};
use crate::data_client::DataClient;
use crate::error::Result;
use crate::identity::{Identity, IdentityProvider};
use crate::toast::Toaster;

pub struct App {
    pub config: Config,
    pub rpc: RpcClient,
    pub identity: IdentityProvider,
    pub client: DataClient,
    pub toaster: Toaster,
    pub page: HomePage,
}

impl App {
    /// Wire the application against the configured backend
    pub fn new(config: Config) -> Result<Self> {
        let rpc = RpcClient::new(
            RpcClientConfig::new(config.api.base_url.clone()).with_timeout(config.api.timeout()),
        )?;
        let api: Arc<dyn PostsApi> = Arc::new(RpcPostsApi::new(rpc.clone()));

        info!(base_url = %rpc.base_url(), "Procedure client ready");
        Ok(Self::with_api(config, rpc, api))
    }

    /// Wire the application around an existing [`PostsApi`]
    pub fn with_api(config: Config, rpc: RpcClient, api: Arc<dyn PostsApi>) -> Self {
        let client = DataClient::new(
            api,
            CacheOptions {
                stale_time: config.cache.stale_time(),
                event_capacity: config.cache.event_capacity,
            },
        );
        let toaster = Toaster::from_config(&config.toast);
        let identity = IdentityProvider::new();
        let page = HomePage::new(
            config.app.clone(),
            config.identity.sign_in_url.clone(),
            identity.handle(),
            client.clone(),
            toaster.clone(),
        );

        Self {
            config,
            rpc,
            identity,
            client,
            toaster,
            page,
        }
    }

    /// Resolve identity from the session handed over at start-up
    pub fn resolve_session(&self) {
        match &self.config.identity.session {
            Some(seed) => {
                self.rpc.set_session_token(seed.token.clone());
                self.identity.sign_in(identity_from_seed(seed));
            }
            None => {
                self.rpc.set_session_token(None);
                self.identity.sign_out();
            }
        }
    }
}

fn identity_from_seed(seed: &SessionSeed) -> Identity {
    Identity {
        id: seed.user_id.clone(),
        username: seed.username.clone(),
        profile_image_url: seed.avatar_url.clone(),
        session_token: seed.token.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityState;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_resolve_session_signs_in_seeded_user() {
        let app = App::new(config(&[
            ("FEED_SESSION_USER_ID", "user_1"),
            ("FEED_SESSION_USERNAME", "theo"),
            ("FEED_SESSION_TOKEN", "sess_1"),
        ]))
        .unwrap();
        let handle = app.identity.handle();
        assert_eq!(handle.current(), IdentityState::Loading);

        app.resolve_session();
        let user = handle.user().unwrap();
        assert_eq!(user.username, "theo");
        assert_eq!(user.session_token.as_deref(), Some("sess_1"));
    }

    #[test]
    fn test_resolve_session_without_seed_signs_out() {
        let app = App::new(config(&[])).unwrap();
        app.resolve_session();
        assert_eq!(app.identity.handle().current(), IdentityState::SignedOut);
        assert_eq!(app.rpc.base_url(), "http://localhost:3000/api/trpc");
    }
}
