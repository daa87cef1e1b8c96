//! Verbose request/response body logging used when debug is enabled.

use std::borrow::Cow;
use std::time::Duration;

use log::info;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Request, StatusCode, Url};

/// Log target for body logging output.
pub const LOG_TARGET: &str = "netcall::http";

/// Observer that writes request and response bodies to the log.
///
/// It only ever reads what it is given; callers send and decode the same bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyLogger {
    enabled: bool,
}

impl BodyLogger {
    /// Creates a logger; a disabled one logs nothing.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Whether bodies are being logged.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs the request line, headers and body of an outgoing request.
    pub fn log_request(&self, request: &Request) {
        if !self.enabled {
            return;
        }

        info!(target: LOG_TARGET, "--> {} {}", request.method(), request.url());
        log_headers(request.headers());

        match request.body() {
            Some(body) => match body.as_bytes() {
                Some(bytes) => {
                    if !bytes.is_empty() {
                        info!(target: LOG_TARGET, "{}", render_body(bytes));
                    }
                    info!(
                        target: LOG_TARGET,
                        "--> END {} ({}-byte body)",
                        request.method(),
                        bytes.len()
                    );
                }
                None => info!(target: LOG_TARGET, "--> END {} (streamed body omitted)", request.method()),
            },
            None => info!(target: LOG_TARGET, "--> END {}", request.method()),
        }
    }

    /// Logs the status, headers and body of a received response.
    pub fn log_response(
        &self,
        url: &Url,
        status: StatusCode,
        headers: &HeaderMap,
        body: &[u8],
        elapsed: Duration,
    ) {
        if !self.enabled {
            return;
        }

        info!(
            target: LOG_TARGET,
            "<-- {} {} ({}ms)",
            status,
            url,
            elapsed.as_millis()
        );
        log_headers(headers);
        if !body.is_empty() {
            info!(target: LOG_TARGET, "{}", render_body(body));
        }
        info!(target: LOG_TARGET, "<-- END HTTP ({}-byte body)", body.len());
    }
}

fn log_headers(headers: &HeaderMap) {
    for (name, value) in headers {
        info!(target: LOG_TARGET, "{}: {}", name, render_header(value));
    }
}

fn render_header(value: &HeaderValue) -> Cow<'_, str> {
    if value.is_sensitive() {
        return Cow::Borrowed("<redacted>");
    }
    match value.to_str() {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => Cow::Borrowed("<non-ascii>"),
    }
}

fn render_body(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => Cow::Owned(format!("(binary {}-byte body omitted)", bytes.len())),
    }
}
