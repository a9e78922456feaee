/// Configuration management for the feed client
///
/// Settings come from environment variables; every value except the API URL
/// in production has a development default.
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AppError, Result};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Backend procedure endpoint
    pub api: ApiConfig,
    /// Query cache configuration
    pub cache: CacheConfig,
    /// Toast notification durations
    pub toast: ToastConfig,
    /// Identity provider integration
    pub identity: IdentityConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Document title
    pub title: String,
    /// Meta description
    pub description: String,
}

/// Backend procedure endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the procedure router
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

/// Query cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a fetched feed is served without refetching
    pub stale_time_secs: u64,
    /// Cache events buffered per subscriber
    pub event_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToastConfig {
    pub error_ms: u64,
    pub success_ms: u64,
}

/// Identity provider integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Where the sign-in affordance points
    pub sign_in_url: String,
    /// Session established by the host before start-up, if any
    #[serde(default)]
    pub session: Option<SessionSeed>,
}

/// Signed-in user handed over by the authentication provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSeed {
    pub user_id: String,
    pub username: String,
    pub avatar_url: String,
    pub token: Option<String>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl CacheConfig {
    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                title: lookup("FEED_APP_TITLE").unwrap_or_else(|| "Twitter T3 Clone".to_string()),
                description: lookup("FEED_APP_DESCRIPTION")
                    .unwrap_or_else(|| "A clone of Twitter with the T3 Stack".to_string()),
            },
            api: {
                let base_url = match lookup("FEED_API_URL") {
                    Some(url) => url,
                    None if production => {
                        return Err(AppError::Config(
                            "FEED_API_URL must be set in production".to_string(),
                        ))
                    }
                    None => "http://localhost:3000/api/trpc".to_string(),
                };

                if production && !base_url.starts_with("https://") {
                    return Err(AppError::Config(
                        "FEED_API_URL must use https in production".to_string(),
                    ));
                }

                ApiConfig {
                    base_url,
                    timeout_ms: parse_or_default(&lookup, "FEED_API_TIMEOUT_MS", 30_000)?,
                }
            },
            cache: CacheConfig {
                stale_time_secs: parse_or_default(&lookup, "FEED_CACHE_STALE_TIME_SECS", 30)?,
                event_capacity: parse_or_default(&lookup, "FEED_CACHE_EVENT_CAPACITY", 64)?,
            },
            toast: ToastConfig {
                error_ms: parse_or_default(&lookup, "FEED_TOAST_ERROR_MS", 4_000)?,
                success_ms: parse_or_default(&lookup, "FEED_TOAST_SUCCESS_MS", 2_000)?,
            },
            identity: IdentityConfig {
                sign_in_url: lookup("FEED_SIGN_IN_URL").unwrap_or_else(|| "/sign-in".to_string()),
                session: parse_session_seed(&lookup)?,
            },
        })
    }
}

fn parse_session_seed<F>(lookup: &F) -> Result<Option<SessionSeed>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(user_id) = lookup("FEED_SESSION_USER_ID") else {
        return Ok(None);
    };

    let username = lookup("FEED_SESSION_USERNAME").ok_or_else(|| {
        AppError::Config("FEED_SESSION_USERNAME must be set with FEED_SESSION_USER_ID".to_string())
    })?;

    Ok(Some(SessionSeed {
        user_id,
        username,
        avatar_url: lookup("FEED_SESSION_AVATAR_URL").unwrap_or_default(),
        token: lookup("FEED_SESSION_TOKEN"),
    }))
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(val) => val
            .parse()
            .map_err(|e| AppError::Config(format!("Failed to parse {}='{}': {}", key, val, e))),
        None => Ok(default),
    }
}
