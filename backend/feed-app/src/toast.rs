//! Transient notifications
//!
//! Toasts are shown in a fixed region of the page and expire on their own.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::ToastConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    /// `None` stays until dismissed
    pub duration: Option<Duration>,
}

impl Toast {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.duration.and_then(|d| chrono::Duration::from_std(d).ok()) {
            Some(duration) => now >= self.created_at + duration,
            None => false,
        }
    }
}

/// Shared toast queue
#[derive(Clone)]
pub struct Toaster {
    toasts: Arc<Mutex<Vec<Toast>>>,
    error_duration: Duration,
    success_duration: Duration,
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(Duration::from_millis(4_000), Duration::from_millis(2_000))
    }
}

impl Toaster {
    pub fn new(error_duration: Duration, success_duration: Duration) -> Self {
        Self {
            toasts: Arc::new(Mutex::new(Vec::new())),
            error_duration,
            success_duration,
        }
    }

    pub fn from_config(config: &ToastConfig) -> Self {
        Self::new(
            Duration::from_millis(config.error_ms),
            Duration::from_millis(config.success_ms),
        )
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        let message = message.into();
        error!(message = %message, "Error toast raised");
        self.push(ToastKind::Error, message, Some(self.error_duration))
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        let message = message.into();
        info!(message = %message, "Success toast raised");
        self.push(ToastKind::Success, message, Some(self.success_duration))
    }

    pub fn loading(&self, message: impl Into<String>) -> Uuid {
        let message = message.into();
        info!(message = %message, "Loading toast raised");
        self.push(ToastKind::Loading, message, None)
    }

    /// Expired toasts are pruned here so the queue stays bounded even when
    /// nothing renders it
    fn push(&self, kind: ToastKind, message: String, duration: Option<Duration>) -> Uuid {
        let now = Utc::now();
        let toast = Toast {
            id: Uuid::new_v4(),
            kind,
            message,
            created_at: now,
            duration,
        };
        let id = toast.id;

        let mut toasts = self.toasts.lock();
        toasts.retain(|t| !t.is_expired(now));
        toasts.push(toast);
        id
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut toasts = self.toasts.lock();
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    /// Non-expired toasts, newest first; expired ones are dropped
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Toast> {
        let mut toasts = self.toasts.lock();
        toasts.retain(|t| !t.is_expired(now));
        toasts.iter().rev().cloned().collect()
    }

    /// Toasts currently held, expired or not
    pub fn queued(&self) -> usize {
        self.toasts.lock().len()
    }

    /// Most recent toast message of any kind
    pub fn latest_message(&self) -> Option<String> {
        self.toasts.lock().last().map(|t| t.message.clone())
    }
}
