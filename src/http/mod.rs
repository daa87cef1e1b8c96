//! HTTP request factory with body logging and fault classification.

mod client;
mod error;
mod logging;

pub use client::{HttpClient, MAX_REDIRECTS, build_http_client};
pub use error::{CallError, FaultKind, classify};
pub use logging::{BodyLogger, LOG_TARGET};
