//! Capability descriptors built on top of the configured client.
//!
//! A capability is a type describing a set of remote endpoints. Implementing
//! [`Service`] lets [`Network::service`](crate::network::Network::service) hand
//! one out bound to the current client.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::http::HttpClient;
use crate::response::Response;

/// A type that can be bound to the shared HTTP client.
pub trait Service: Sized {
    fn create(client: HttpClient) -> Self;
}

impl Service for HttpClient {
    fn create(client: HttpClient) -> Self {
        client
    }
}

/// Endpoints of any server replying with the JSON envelope.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JsonApi: Send + Sync {
    /// GET `path` and decode the envelope.
    async fn get(&self, path: &str) -> Result<Response<Value>>;

    /// GET `path` with query parameters and decode the envelope.
    async fn get_with_query(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Response<Value>>;

    /// POST a JSON body to `path` and decode the envelope.
    async fn post(&self, path: &str, body: &Value) -> Result<Response<Value>>;
}

/// [`JsonApi`] over [`HttpClient`].
#[derive(Clone)]
pub struct JsonService {
    http_client: HttpClient,
}

impl Service for JsonService {
    fn create(http_client: HttpClient) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl JsonApi for JsonService {
    async fn get(&self, path: &str) -> Result<Response<Value>> {
        self.http_client.get_json(path).await
    }

    async fn get_with_query(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Response<Value>> {
        self.http_client.get_json_with_query(path, query).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Response<Value>> {
        self.http_client.post_json(path, body).await
    }
}
