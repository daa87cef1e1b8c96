pub mod call;
pub mod config;
pub mod http;
pub mod network;
pub mod response;
pub mod service;

pub use call::{NETWORK_BROKEN_STATUS, SESSION_INVALID_STATUS, api_call};
pub use config::ClientConfig;
pub use network::Network;
pub use response::Response;
pub use service::{JsonApi, JsonService, Service};
