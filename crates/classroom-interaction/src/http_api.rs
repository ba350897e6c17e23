//! HttpClassroomApi - REST implementation of the classroom directory and feed.
//!
//! Every request carries `x-api-key` (when configured) and, except sign-in,
//! an `Authorization: Bearer` header. Payloads are JSON; responses are
//! validated in [`crate::wire`] before they leave this module.

use crate::wire::{self, CommentRequest, ContentRequest, SignInRequest, StatusRef};
use async_trait::async_trait;
use classroom_core::api::{ClassroomApi, SignIn};
use classroom_core::config::ApiConfig;
use classroom_core::error::{ClassroomError, Result};
use classroom_core::feed::Post;
use classroom_core::user::User;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client for the classroom REST API.
#[derive(Clone)]
pub struct HttpClassroomApi {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpClassroomApi {
    /// Creates a client for `base_url` (e.g. `https://cis.kku.ac.th/api`).
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        Self::with_client(Client::new(), base_url, api_key)
    }

    /// Creates a client from the `[api]` configuration section.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ClassroomError::config(format!("Failed to build HTTP client: {}", e)))?;

        let api_key = Some(config.api_key.clone()).filter(|k| !k.trim().is_empty());
        Self::with_client(client, &config.base_url, api_key)
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: &str, api_key: Option<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClassroomError::config(format!("Invalid API base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClassroomError::config(format!(
                "API base URL '{}' cannot carry a path",
                base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str], token: Option<&str>) -> RequestBuilder {
        let url = self.endpoint(segments);
        tracing::debug!("[HttpApi] {} {}", method, url.path());

        let mut request = self
            .client
            .request(method, url)
            .header("Content-Type", "application/json");

        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Sends a request and returns the body of a 2xx response.
    ///
    /// Errors are plain messages; callers wrap them in the error kind that
    /// matches the operation.
    async fn execute(request: RequestBuilder) -> std::result::Result<Vec<u8>, String> {
        let response = request
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read response: {}", e))?;

        if !status.is_success() {
            let message = wire::error_message(status.as_u16(), status.canonical_reason(), &body);
            tracing::warn!("[HttpApi] Request rejected: {}", message);
            return Err(message);
        }

        Ok(body.to_vec())
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        segments: &[&str],
        token: &str,
    ) -> Result<T> {
        let body = Self::execute(self.request(Method::GET, segments, Some(token)))
            .await
            .map_err(|e| ClassroomError::fetch(resource, e))?;
        wire::decode(&body).map_err(|e| ClassroomError::fetch(resource, e))
    }

    async fn mutate(&self, action: &'static str, request: RequestBuilder) -> Result<Vec<u8>> {
        Self::execute(request)
            .await
            .map_err(|e| ClassroomError::mutation(action, e))
    }
}

#[async_trait]
impl ClassroomApi for HttpClassroomApi {
    async fn sign_in(&self, identifier: &str, secret: &str) -> Result<SignIn> {
        let request = self
            .request(Method::POST, &["classroom", "signin"], None)
            .json(&SignInRequest { identifier, secret });

        let body = Self::execute(request)
            .await
            .map_err(ClassroomError::authentication)?;
        wire::decode_sign_in(&body).map_err(ClassroomError::authentication)
    }

    async fn current_user(&self, token: &str) -> Result<User> {
        self.fetch("profile", &["profile"], token).await
    }

    async fn class_members(&self, year: &str, token: &str) -> Result<Vec<User>> {
        self.fetch("class members", &["classroom", "class", year], token)
            .await
    }

    async fn list_posts(&self, token: &str) -> Result<Vec<Post>> {
        self.fetch("feed", &["classroom", "status"], token).await
    }

    async fn create_post(&self, content: &str, token: &str) -> Result<()> {
        let request = self
            .request(Method::POST, &["classroom", "status"], Some(token))
            .json(&ContentRequest { content });

        let body = self.mutate("create post", request).await?;
        match wire::created_id(&body) {
            Some(id) => tracing::debug!("[HttpApi] Created post {}", id),
            None => tracing::warn!("[HttpApi] Post accepted but the response carried no post id"),
        }
        Ok(())
    }

    async fn like(&self, post_id: &str, token: &str) -> Result<()> {
        let request = self
            .request(Method::POST, &["classroom", "like"], Some(token))
            .json(&StatusRef { status_id: post_id });
        self.mutate("like post", request).await.map(drop)
    }

    async fn unlike(&self, post_id: &str, token: &str) -> Result<()> {
        let request = self
            .request(Method::DELETE, &["classroom", "like"], Some(token))
            .json(&StatusRef { status_id: post_id });
        self.mutate("unlike post", request).await.map(drop)
    }

    async fn add_comment(&self, post_id: &str, content: &str, token: &str) -> Result<()> {
        let request = self
            .request(Method::POST, &["classroom", "comment"], Some(token))
            .json(&CommentRequest {
                status_id: post_id,
                content,
            });
        self.mutate("add comment", request).await.map(drop)
    }

    async fn delete_post(&self, post_id: &str, token: &str) -> Result<()> {
        let request = self.request(Method::DELETE, &["classroom", "status", post_id], Some(token));
        self.mutate("delete post", request).await.map(drop)
    }

    async fn delete_comment(&self, post_id: &str, comment_id: &str, token: &str) -> Result<()> {
        let request = self
            .request(Method::DELETE, &["classroom", "comment", comment_id], Some(token))
            .json(&StatusRef { status_id: post_id });
        self.mutate("delete comment", request).await.map(drop)
    }
}
