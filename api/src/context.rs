//! Request context middleware.
//!
//! Every request gets a fresh [`RequestContext`]. A logger scoped to that
//! context is stored in the request extensions, where handlers pick it up
//! through the [`RequestLogger`] extractor. Once the response is ready the
//! middleware records request metrics, logs the request, and echoes the
//! request id in the `x-request-id` header.

use axum::{
    extract::{ConnectInfo, FromRequestParts, MatchedPath, Request, State},
    http::{header::USER_AGENT, request::Parts, HeaderValue},
    middleware::Next,
    response::Response,
};
use shared::logging::{RequestContext, StructuredLogger};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::ops::Deref;
use std::time::Instant;

use crate::metrics;
use crate::state::AppState;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware that scopes logging to the current request.
pub async fn request_context(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| path.clone(), |matched| matched.as_str().to_string());
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let mut context = RequestContext::new(method.clone(), path).with_user_agent(user_agent);
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        context = context.with_remote_address(addr.ip().to_string());
    }
    let request_id = context.request_id;

    let logger = state.logger().with_context(context);
    request.extensions_mut().insert(logger.clone());

    let mut response = next.run(request).await;

    let duration = start.elapsed();
    metrics::record_request(&method, &endpoint, duration);
    logger
        .log_request(
            &method,
            &endpoint,
            response.status().as_u16(),
            duration,
            None,
        )
        .await;

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Extractor yielding the logger scoped to the current request.
///
/// Falls back to the process-wide logger when the request did not pass
/// through [`request_context`].
#[derive(Debug, Clone)]
pub struct RequestLogger(pub StructuredLogger);

impl FromRequestParts<AppState> for RequestLogger {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let logger = parts
            .extensions
            .get::<StructuredLogger>()
            .cloned()
            .unwrap_or_else(|| state.logger().clone());
        Ok(Self(logger))
    }
}

impl Deref for RequestLogger {
    type Target = StructuredLogger;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
