//! Posts procedures
//!
//! [`PostsApi`] is the seam between components and the backend. The real
//! implementation speaks the procedure wire format through [`RpcClient`];
//! tests substitute their own.

use async_trait::async_trait;
use rpc_client::{RpcClient, RpcError};
use tracing::{debug, instrument};

use crate::models::{CreatePostInput, Post, PostWithAuthor};

pub const GET_ALL_POSTS: &str = "posts.getAll";
pub const CREATE_POST: &str = "posts.create";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// Every post with its author, newest first as ordered by the server
    async fn get_all(&self) -> Result<Vec<PostWithAuthor>, RpcError>;

    /// Create a post for the signed-in user
    ///
    /// The backend may answer with `null`; callers only care about success.
    async fn create(&self, input: &CreatePostInput) -> Result<Option<Post>, RpcError>;
}

/// [`PostsApi`] over HTTP
#[derive(Clone)]
pub struct RpcPostsApi {
    client: RpcClient,
}

impl RpcPostsApi {
    pub fn new(client: RpcClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }
}

#[async_trait]
impl PostsApi for RpcPostsApi {
    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<PostWithAuthor>, RpcError> {
        let posts: Vec<PostWithAuthor> = self.client.query(GET_ALL_POSTS).await?;
        debug!(count = posts.len(), "Fetched posts");
        Ok(posts)
    }

    #[instrument(skip(self, input), fields(content_len = input.content.len()))]
    async fn create(&self, input: &CreatePostInput) -> Result<Option<Post>, RpcError> {
        self.client.mutation(CREATE_POST, input).await
    }
}
