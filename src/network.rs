//! Client factory and service accessor.
//!
//! A [`Network`] owns the one HTTP client an application shares across all of
//! its services. Applications either hold their own instance or use the
//! process-wide one from [`Network::global`].

use std::sync::{PoisonError, RwLock};

use anyhow::Result;
use log::info;

use crate::config::ClientConfig;
use crate::http::{HttpClient, build_http_client};
use crate::service::Service;

/// Holder of the shared HTTP client.
pub struct Network {
    client: RwLock<Option<HttpClient>>,
}

static GLOBAL: Network = Network::new();

impl Network {
    /// Creates an uninitialized network.
    pub const fn new() -> Self {
        Self {
            client: RwLock::new(None),
        }
    }

    /// Creates a network and initializes it from `config`.
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let network = Self::new();
        network.initialize(config)?;
        Ok(network)
    }

    /// The process-wide network.
    pub fn global() -> &'static Network {
        &GLOBAL
    }

    /// Builds the client from `config` and stores it, replacing any previous one.
    ///
    /// The base address is not validated here; a malformed one surfaces on the
    /// first request. Calls already in flight keep the client they started with.
    pub fn initialize(&self, config: &ClientConfig) -> Result<()> {
        let client = build_http_client(config)?;
        let replaced = self
            .client
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(client)
            .is_some();

        info!(
            "Network {} for {} (debug: {}, timeouts: {}s/{}s/{}s)",
            if replaced { "re-initialized" } else { "initialized" },
            config.base_url,
            config.debug,
            config.connect_timeout_secs,
            config.read_timeout_secs,
            config.write_timeout_secs
        );
        Ok(())
    }

    /// Whether a client has been built by [`Network::initialize`].
    pub fn is_initialized(&self) -> bool {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Returns a clone of the current client, if initialized.
    pub fn client(&self) -> Option<HttpClient> {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `S` bound to the current client.
    ///
    /// # Panics
    ///
    /// Panics if [`initialize`](Self::initialize) has not been called.
    pub fn service<S: Service>(&self) -> S {
        match self.try_service() {
            Some(service) => service,
            None => panic!("Network::service called before Network::initialize"),
        }
    }

    /// Like [`service`](Self::service) but returns `None` when uninitialized.
    pub fn try_service<S: Service>(&self) -> Option<S> {
        self.client().map(S::create)
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Response;
    use crate::service::{JsonApi, JsonService};

    struct Probe(HttpClient);

    impl Service for Probe {
        fn create(client: HttpClient) -> Self {
            Probe(client)
        }
    }

    #[test]
    #[should_panic(expected = "Network::service called before Network::initialize")]
    fn test_service_before_initialize_panics() {
        let network = Network::new();
        let _probe: Probe = network.service();
    }

    #[test]
    fn test_try_service_before_initialize() {
        let network = Network::default();
        assert!(!network.is_initialized());
        assert!(network.client().is_none());
        assert!(network.try_service::<Probe>().is_none());
    }

    #[test]
    fn test_service_after_initialize() {
        let network = Network::new();
        network
            .initialize(&ClientConfig::new("https://example.com/api/").debug(true))
            .unwrap();

        assert!(network.is_initialized());
        let Probe(client) = network.service();
        assert_eq!(client.base_url(), "https://example.com/api/");
        assert!(client.is_debug());
    }

    #[test]
    fn test_reinitialize_replaces_client() {
        let network = Network::with_config(&ClientConfig::new("https://old.example.com/")).unwrap();
        let Probe(before) = network.service();

        network
            .initialize(&ClientConfig::new("https://new.example.com/"))
            .unwrap();
        let Probe(after) = network.service();

        assert_eq!(before.base_url(), "https://old.example.com/");
        assert_eq!(after.base_url(), "https://new.example.com/");
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(Network::global(), Network::global()));
    }

    #[tokio::test]
    async fn test_initialize_twice_behaves_the_same() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/status")
            .with_status(200)
            .with_body(r#"{"code": 200, "data": "ok"}"#)
            .expect(2)
            .create_async()
            .await;

        let config = ClientConfig::new(server.url()).timeouts(5, 5, 5);
        let network = Network::new();

        network.initialize(&config).unwrap();
        let first = network.service::<JsonService>().get("status").await.unwrap();

        network.initialize(&config).unwrap();
        let second = network.service::<JsonService>().get("status").await.unwrap();

        mock.assert_async().await;
        assert_eq!(first, second);
        assert_eq!(first, Response::new(200).with_data(serde_json::json!("ok")));
    }
}
