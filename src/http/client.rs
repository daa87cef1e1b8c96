//! HTTP client bound to a base address with a JSON codec.

use std::borrow::Cow;
use std::time::Instant;

use anyhow::{Context, Result};
use log::debug;
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::CallError;
use super::logging::BodyLogger;
use crate::config::ClientConfig;

/// Maximum number of redirects followed per request.
pub const MAX_REDIRECTS: usize = 10;

/// Build the shared HTTP client from configuration.
pub fn build_http_client(config: &ClientConfig) -> Result<HttpClient> {
    let mut builder = Client::builder()
        .user_agent(concat!("netcall/", env!("CARGO_PKG_VERSION")))
        .redirect(Policy::limited(MAX_REDIRECTS));

    if let Some(timeout) = config.connect_timeout() {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(timeout) = config.read_timeout() {
        builder = builder.read_timeout(timeout);
    }
    if config.write_timeout().is_some() {
        debug!("Write timeout is not enforced by the transport");
    }
    if config.debug {
        debug!("HTTP client configured with body logging");
    }

    let client = builder.build().context("Failed to build HTTP client")?;
    Ok(HttpClient::new(client, config.base_url.as_str(), config.debug))
}

/// Request factory: resolves endpoint paths against a base address and
/// exchanges JSON bodies.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    logger: BodyLogger,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client, base_url: impl Into<String>, debug: bool) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            logger: BodyLogger::new(debug),
        }
    }

    /// Base address endpoint paths are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether request and response bodies are logged.
    pub fn is_debug(&self) -> bool {
        self.logger.is_enabled()
    }

    /// Resolves an endpoint path against the base address.
    ///
    /// The base is always treated as a directory, so `https://host/api` and
    /// `https://host/api/` both resolve `users` to `https://host/api/users`.
    /// Only `http://` and `https://` URLs count as absolute and are returned
    /// unchanged; anything else, `user:42` included, is a path.
    pub fn url(&self, path: &str) -> Result<Url> {
        if is_absolute_http(path) {
            return Url::parse(path)
                .map_err(|e| CallError::InvalidUrl(format!("{}: {}", path, e)).into());
        }

        let mut base = Url::parse(&self.base_url)
            .map_err(|e| CallError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }

        // A relative reference with a colon in its first segment parses as a scheme.
        let relative = if path.starts_with('/') {
            Cow::Borrowed(path)
        } else {
            Cow::Owned(format!("./{}", path))
        };
        let url = base
            .join(&relative)
            .map_err(|e| CallError::InvalidUrl(format!("{}: {}", path, e)))?;
        Ok(url)
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("GET JSON from {}...", path);
        let url = self.url(path)?;
        self.send_json(self.client.get(url)).await
    }

    /// Performs a GET request with query parameters and deserializes the JSON response.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json_with_query<T, K, V>(&self, path: &str, query: &[(K, V)]) -> Result<T>
    where
        T: DeserializeOwned,
        K: Serialize,
        V: Serialize,
    {
        debug!("GET JSON from {} with {} query parameters...", path, query.len());
        let url = self.url(path)?;
        self.send_json(self.client.get(url).query(query)).await
    }

    /// Performs a POST request with a JSON body and deserializes the JSON response.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST JSON to {}...", path);
        let url = self.url(path)?;
        self.send_json(self.client.post(url).json(body)).await
    }

    /// Performs a PUT request with a JSON body and deserializes the JSON response.
    #[tracing::instrument(skip(self, body))]
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("PUT JSON to {}...", path);
        let url = self.url(path)?;
        self.send_json(self.client.put(url).json(body)).await
    }

    /// Performs a DELETE request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("DELETE {}...", path);
        let url = self.url(path)?;
        self.send_json(self.client.delete(url)).await
    }

    /// Sends a request once and decodes the body as JSON.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = request.build().context("Failed to build request")?;
        self.logger.log_request(&request);

        let url = request.url().clone();
        let started = Instant::now();
        let response = self
            .client
            .execute(request)
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .context("Failed to read response body")?;
        self.logger
            .log_response(&url, status, &headers, &body, started.elapsed());

        if !status.is_success() {
            return Err(CallError::Status(status).into());
        }

        let result = serde_json::from_slice(&body).map_err(CallError::Decode)?;
        Ok(result)
    }
}

fn is_absolute_http(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
