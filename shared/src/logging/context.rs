//! Per-request correlation data.
//!
//! A `RequestContext` is created once when a request arrives and travels with
//! that request only. Log calls made while handling the request attach it to
//! their records; log calls made elsewhere have no context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation data for one inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Random 128-bit identifier unique to this request.
    pub request_id: Uuid,

    /// HTTP method of the request.
    pub http_method: String,

    /// Request path.
    pub path: String,

    /// Client address, when the transport exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_address: Option<String>,

    /// `User-Agent` header value (empty when absent).
    #[serde(default)]
    pub user_agent: String,
}

impl RequestContext {
    /// Creates a context with a freshly generated request id.
    #[must_use]
    pub fn new(http_method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            http_method: http_method.into(),
            path: path.into(),
            remote_address: None,
            user_agent: String::new(),
        }
    }

    /// Sets the client address.
    #[must_use]
    pub fn with_remote_address(mut self, remote_address: impl Into<String>) -> Self {
        self.remote_address = Some(remote_address.into());
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
