/// Data models for the feed procedures
///
/// This module defines structures for:
/// - Post: a short text post as stored by the backend
/// - Author: the public profile fields joined onto every post
/// - PostWithAuthor: one feed item as returned by `posts.getAll`
/// - CreatePostInput: the `posts.create` mutation input
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A text post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_id: String,
}

/// Public author profile attached to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub username: String,
    #[serde(alias = "profileImageUrl")]
    pub profile_picture: String,
}

impl Author {
    /// Profile page route
    pub fn profile_href(&self) -> String {
        format!("/@{}", self.username)
    }

    /// Display handle
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }
}

impl Post {
    /// Permalink route
    pub fn permalink(&self) -> String {
        format!("/post/{}", self.id)
    }
}

/// Feed item: a post with its author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: Author,
}

/// Input for `posts.create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub content: String,
}

impl CreatePostInput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
