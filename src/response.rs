//! Uniform response envelope returned by every wrapped call.

use serde::{Deserialize, Serialize};

use crate::call::{NETWORK_BROKEN_STATUS, SESSION_INVALID_STATUS};

/// Result of a single network call.
///
/// Servers are expected to reply with `{"code": .., "errorMsg": .., "data": ..}`.
/// Local and transport faults are folded into the same shape with
/// [`NETWORK_BROKEN_STATUS`] as the code, so callers only ever inspect `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    /// Status code reported by the server, or a local sentinel.
    pub code: i32,
    /// Human readable error text, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
    /// Payload. Present on success by convention.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Response<T> {
    /// Creates an envelope with only a status code.
    pub fn new(code: i32) -> Self {
        Self {
            code,
            error_msg: None,
            data: None,
        }
    }

    /// Creates the envelope used for calls that never completed.
    pub fn network_broken() -> Self {
        Self::new(NETWORK_BROKEN_STATUS)
    }

    /// Sets the error message.
    pub fn with_error_msg(mut self, msg: impl Into<String>) -> Self {
        self.error_msg = Some(msg.into());
        self
    }

    /// Sets the payload.
    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// True when the call never produced a server reply.
    pub fn is_network_broken(&self) -> bool {
        self.code == NETWORK_BROKEN_STATUS
    }

    /// True when the server reported an expired session.
    pub fn is_session_invalid(&self) -> bool {
        self.code == SESSION_INVALID_STATUS
    }
}
