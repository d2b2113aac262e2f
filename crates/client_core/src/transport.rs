use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::{Comment, CommentId, NewComment, Post, PostId, User, UserId},
    error::ApiErrorPayload,
    protocol::{CreateCommentResponse, COMMENTS_PATH, POSTS_PATH, USERS_PATH},
};
use tracing::debug;

use crate::{
    config::Settings,
    error::{ClientError, ClientResult},
    ResourceClient,
};

/// `ResourceClient` over the JSON REST API.
pub struct HttpResourceClient {
    http: Client,
    base_url: String,
}

impl HttpResourceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("failed to build http client")?;
        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Sends the request and decodes the body as JSON. An empty body decodes
    /// to `Value::Null`.
    async fn send_json(&self, request: RequestBuilder, url: &str) -> ClientResult<Value> {
        let response = request.send().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status,
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> ClientResult<Vec<T>> {
        let value = self.send_json(request, url).await?;
        if let Some(payload) = ApiErrorPayload::from_value(&value) {
            return Err(ClientError::Rejected(payload.error));
        }
        if !value.is_array() {
            return Err(ClientError::MalformedPayload {
                url: url.to_string(),
                expected: "array",
            });
        }
        serde_json::from_value(value).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn list_users(&self) -> ClientResult<Vec<User>> {
        let url = self.url(USERS_PATH);
        self.fetch_list(self.http.get(&url), &url).await
    }

    async fn list_posts(&self, user_id: UserId) -> ClientResult<Vec<Post>> {
        let url = self.url(POSTS_PATH);
        let request = self.http.get(&url).query(&[("userId", user_id.0)]);
        self.fetch_list(request, &url).await
    }

    async fn list_comments(&self, post_id: PostId) -> ClientResult<Vec<Comment>> {
        let url = self.url(COMMENTS_PATH);
        let request = self.http.get(&url).query(&[("postId", post_id.0)]);
        self.fetch_list(request, &url).await
    }

    async fn create_comment(&self, comment: &NewComment) -> ClientResult<Comment> {
        let url = self.url(COMMENTS_PATH);
        let value = self.send_json(self.http.post(&url).json(comment), &url).await?;
        match serde_json::from_value::<CreateCommentResponse>(value) {
            Ok(CreateCommentResponse::Created(created)) => Ok(created),
            Ok(CreateCommentResponse::Rejected(payload)) => Err(ClientError::Rejected(payload.error)),
            Err(err) => {
                debug!(error = %err, "create comment response did not match a comment");
                Err(ClientError::MalformedPayload {
                    url,
                    expected: "comment",
                })
            }
        }
    }

    async fn delete_comment(&self, comment_id: CommentId) -> ClientResult<()> {
        let url = self.url(&format!("{COMMENTS_PATH}/{comment_id}"));
        let value = self.send_json(self.http.delete(&url), &url).await?;
        match ApiErrorPayload::from_value(&value) {
            Some(payload) => Err(ClientError::Rejected(payload.error)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
