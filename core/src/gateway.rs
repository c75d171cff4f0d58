//! The remote list service as seen by the synchronization core.
//!
//! # Design
//! `TodoGateway` is the seam the core calls through; tests substitute an
//! in-memory implementation. `HttpGateway` is the production implementation:
//! it builds requests with `TodoClient`, executes them with `reqwest`, and
//! hands the raw response back to `TodoClient` for status and body handling.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, TodoId, UserId};

#[async_trait]
pub trait TodoGateway: Send + Sync + 'static {
    async fn list(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError>;
    async fn list_completed(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError>;
    async fn create(&self, input: &CreateTodo) -> Result<Todo, ApiError>;
    async fn delete(&self, id: TodoId) -> Result<(), ApiError>;
}

#[async_trait]
impl<G: TodoGateway + ?Sized> TodoGateway for Arc<G> {
    async fn list(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError> {
        (**self).list(user_id).await
    }

    async fn list_completed(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError> {
        (**self).list_completed(user_id).await
    }

    async fn create(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        (**self).create(input).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        (**self).delete(id).await
    }
}

/// `TodoGateway` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: TodoClient,
    http: reqwest::Client,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: TodoClient::new(base_url),
            http: reqwest::Client::new(),
        }
    }

    async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        trace!(%method, path = %req.path, "sending request");

        let mut builder = self.http.request(method, &req.path);
        for (key, value) in &req.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl TodoGateway for HttpGateway {
    async fn list(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError> {
        let response = self.execute(self.client.build_list_todos(user_id)).await?;
        self.client.parse_list_todos(response)
    }

    async fn list_completed(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError> {
        let response = self.execute(self.client.build_list_completed(user_id)).await?;
        self.client.parse_list_completed(response)
    }

    async fn create(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        let response = self.execute(self.client.build_create_todo(input)?).await?;
        self.client.parse_create_todo(response)
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let response = self.execute(self.client.build_delete_todo(id)).await?;
        self.client.parse_delete_todo(response)
    }
}
