//! Gateway dispatcher
//!
//! HTTP entry point. Each request is matched against the route registry by
//! `(method, path)`; a matching endpoint receives the request body and its
//! output becomes the JSON response. Unmatched requests fall through to a
//! fallback router (an empty `axum::Router`, i.e. 404, unless replaced).

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use error::GatewayError;
use tower::ServiceExt;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::endpoint::{CallContext, Endpoint, EndpointError, EndpointResult};
use crate::registry::RouteRegistry;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Payload substituted for methods whose body is not forwarded
const EMPTY_OBJECT: &[u8] = b"{}";

/// Dispatch tuning
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Deadline applied to every remote call
    pub call_timeout: Option<Duration>,
    /// Largest request body read before failing the request
    pub max_body_bytes: usize,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        let config = GatewayConfig::default();
        Self::from(&config)
    }
}

impl From<&GatewayConfig> for DispatchOptions {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            call_timeout: config.call_timeout(),
            max_body_bytes: config.max_body_bytes,
        }
    }
}

/// HTTP/JSON to gRPC gateway
///
/// Cheap to clone; clones share the same route registry, so endpoints
/// registered after the gateway starts serving are picked up immediately.
#[derive(Clone)]
pub struct Gateway {
    registry: Arc<RouteRegistry>,
    fallback: Router,
    options: DispatchOptions,
}

impl Gateway {
    pub fn new() -> Self {
        Self::with_options(DispatchOptions::default())
    }

    pub fn with_config(config: &GatewayConfig) -> Self {
        Self::with_options(DispatchOptions::from(config))
    }

    pub fn with_options(options: DispatchOptions) -> Self {
        Self {
            registry: Arc::new(RouteRegistry::new()),
            fallback: Router::new(),
            options,
        }
    }

    /// Replace the router that handles requests with no registered endpoint.
    pub fn with_fallback(mut self, fallback: Router) -> Self {
        self.fallback = fallback;
        self
    }

    /// Register a handler to a method and path
    pub fn register_endpoint(
        &self,
        method: impl AsRef<str>,
        path: impl Into<String>,
        endpoint: Endpoint,
    ) {
        let path = path.into();
        tracing::debug!(method = method.as_ref(), path = %path, "Registering endpoint");
        self.registry.register(method, path, endpoint);
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Invoke an endpoint by method and path without going through HTTP
    pub async fn invoke_endpoint(&self, method: &str, path: &str, body: Bytes) -> EndpointResult {
        let endpoint = self.registry.lookup(method, path).ok_or_else(|| {
            EndpointError::new(GatewayError::RouteNotFound {
                method: method.to_string(),
                path: path.to_string(),
            })
        })?;

        endpoint.invoke_with(self.call_context(), body).await
    }

    /// Build an axum router that dispatches every request through this gateway
    pub fn router(&self) -> Router {
        Router::new().fallback(dispatch).with_state(self.clone())
    }

    /// Handle one HTTP request
    pub async fn serve_http(&self, request: Request) -> Response {
        let method = request.method().clone();
        let path = decode_path(request.uri().path());

        // The registry lock is released once lookup returns.
        let Some(endpoint) = self.registry.lookup(method.as_str(), &path) else {
            tracing::debug!(%method, %path, "No endpoint matched, using fallback");
            return self.fall_through(request).await;
        };

        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let span = tracing::info_span!("dispatch", %method, %path, request_id = %request_id);
        let mut response = self
            .forward(endpoint, request)
            .instrument(span)
            .await;

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }

    async fn forward(&self, endpoint: Endpoint, request: Request) -> Response {
        let result = match self.read_body(request).await {
            Ok(body) => endpoint.invoke_with(self.call_context(), body).await,
            Err(e) => Err(EndpointError::new(e)),
        };

        match result {
            Ok(body) => {
                tracing::info!(bytes = body.len(), "Endpoint succeeded");
                (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "application/json")],
                    body,
                )
                    .into_response()
            }
            Err(e) => {
                let error = e.error();
                match error.status() {
                    Some(status) => tracing::warn!(
                        kind = error.kind(),
                        code = ?status.code(),
                        "Endpoint failed: {}",
                        status.message()
                    ),
                    None => tracing::warn!(kind = error.kind(), "Endpoint failed: {}", error),
                }
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }

    /// Body bytes handed to the endpoint: the raw body for write-style
    /// methods, `{}` for everything else.
    async fn read_body(&self, request: Request) -> Result<Bytes, GatewayError> {
        if !forwards_body(request.method()) {
            return Ok(Bytes::from_static(EMPTY_OBJECT));
        }

        axum::body::to_bytes(request.into_body(), self.options.max_body_bytes)
            .await
            .map_err(|e| GatewayError::Body(e.to_string()))
    }

    async fn fall_through(&self, request: Request) -> Response {
        match self.fallback.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }

    fn call_context(&self) -> CallContext {
        CallContext::new().with_timeout(self.options.call_timeout)
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}

fn forwards_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

/// Percent-decode a request path for route lookup.
///
/// Paths that do not decode to UTF-8 are matched as received.
fn decode_path(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

async fn dispatch(State(gateway): State<Gateway>, request: Request<Body>) -> Response {
    gateway.serve_http(request).await
}
