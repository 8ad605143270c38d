//! Endpoints and the handler factory
//!
//! An [`Endpoint`] is the uniform, type-erased `bytes -> bytes` callable
//! stored in the route registry. [`make_handler`] builds one from a typed
//! remote call and a request decoder:
//!
//! ```text
//! body bytes ─▶ decode ─▶ Req ─▶ RemoteCall ─▶ Resp ─▶ encode ─▶ body bytes
//! ```
//!
//! A decode failure returns before the remote call is attempted.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use error::GatewayError;
use futures_util::future::{self, BoxFuture, FutureExt};
use serde::Serialize;
use thiserror::Error;
use tonic::Status;

use crate::codec::JsonCodec;

/// Result of invoking an endpoint.
pub type EndpointResult = Result<Bytes, EndpointError>;

/// Error reported by an endpoint.
///
/// When the remote call fails the handler still encodes a (default)
/// response on a best-effort basis; those bytes travel in `body`.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct EndpointError {
    #[source]
    error: GatewayError,
    body: Option<Bytes>,
}

impl EndpointError {
    pub fn new(error: impl Into<GatewayError>) -> Self {
        Self {
            error: error.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Option<Bytes>) -> Self {
        self.body = body;
        self
    }

    pub fn error(&self) -> &GatewayError {
        &self.error
    }

    /// Response bytes encoded despite the failure, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn into_error(self) -> GatewayError {
        self.error
    }
}

impl From<GatewayError> for EndpointError {
    fn from(error: GatewayError) -> Self {
        Self::new(error)
    }
}

/// Per-call context handed to the remote call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    timeout: Option<Duration>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Wrap a message in a `tonic::Request` carrying this context's deadline.
    pub fn into_request<T>(&self, message: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        if let Some(timeout) = self.timeout {
            request.set_timeout(timeout);
        }
        request
    }

    /// Drive `call` to completion, failing with `DEADLINE_EXCEEDED` once the
    /// deadline passes.
    async fn run<T, F>(&self, call: F) -> Result<T, Status>
    where
        F: Future<Output = Result<T, Status>>,
    {
        match self.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, call).await {
                Ok(result) => result,
                Err(_) => Err(Status::deadline_exceeded(format!(
                    "remote call exceeded {:?}",
                    timeout
                ))),
            },
            None => call.await,
        }
    }
}

/// A typed remote operation: `invoke(context, Req) -> Resp | Status`.
///
/// Implemented for every `Fn(CallContext, Req) -> impl Future<Output = Result<Resp, Status>>`,
/// so a tonic client method wrapped in an async closure is a remote call.
pub trait RemoteCall<Req, Resp>: Send + Sync + 'static {
    fn call(&self, ctx: CallContext, request: Req) -> BoxFuture<'static, Result<Resp, Status>>;
}

impl<F, Fut, Req, Resp> RemoteCall<Req, Resp> for F
where
    F: Fn(CallContext, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Resp, Status>> + Send + 'static,
{
    fn call(&self, ctx: CallContext, request: Req) -> BoxFuture<'static, Result<Resp, Status>> {
        (self)(ctx, request).boxed()
    }
}

type EndpointFn = dyn Fn(CallContext, Bytes) -> BoxFuture<'static, EndpointResult> + Send + Sync;

/// Uniform byte-in/byte-out callable bound to one route.
#[derive(Clone)]
pub struct Endpoint {
    inner: Arc<EndpointFn>,
}

impl Endpoint {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(CallContext, Bytes) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = EndpointResult> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |ctx: CallContext, body: Bytes| f(ctx, body).boxed()),
        }
    }

    /// Invoke with a default context (no deadline).
    pub async fn invoke(&self, body: Bytes) -> EndpointResult {
        self.invoke_with(CallContext::default(), body).await
    }

    pub async fn invoke_with(&self, ctx: CallContext, body: Bytes) -> EndpointResult {
        (self.inner)(ctx, body).await
    }

    /// True when both handles point at the same endpoint.
    pub fn ptr_eq(&self, other: &Endpoint) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint").finish_non_exhaustive()
    }
}

/// What to do when a successful response cannot be encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncodePolicy {
    /// Drop the encode error and answer with an empty body
    #[default]
    BestEffort,
    /// Report the encode error
    Strict,
}

/// Bind a remote call and a request decoder into an [`Endpoint`].
pub fn make_handler<Req, Resp, C, D>(call: C, decode: D) -> Endpoint
where
    C: RemoteCall<Req, Resp>,
    D: Fn(&[u8]) -> error::Result<Req> + Send + Sync + 'static,
    Req: Send + 'static,
    Resp: Serialize + Default + Send + 'static,
{
    make_handler_with(call, decode, EncodePolicy::BestEffort)
}

/// [`make_handler`] with an explicit [`EncodePolicy`].
pub fn make_handler_with<Req, Resp, C, D>(call: C, decode: D, policy: EncodePolicy) -> Endpoint
where
    C: RemoteCall<Req, Resp>,
    D: Fn(&[u8]) -> error::Result<Req> + Send + Sync + 'static,
    Req: Send + 'static,
    Resp: Serialize + Default + Send + 'static,
{
    Endpoint::new(move |ctx: CallContext, body: Bytes| {
        let request = match decode(&body[..]) {
            Ok(request) => request,
            Err(e) => return future::ready(Err(EndpointError::new(e))).boxed(),
        };

        let pending = call.call(ctx.clone(), request);
        async move {
            match ctx.run(pending).await {
                Ok(response) => match JsonCodec::encode(&response) {
                    Ok(body) => Ok(body),
                    Err(e) if policy == EncodePolicy::Strict => Err(EndpointError::new(e)),
                    Err(e) => {
                        tracing::debug!("Dropping response encode error: {}", e);
                        Ok(Bytes::new())
                    }
                },
                Err(status) => {
                    let body = JsonCodec::encode(&Resp::default()).ok();
                    Err(EndpointError::new(status).with_body(body))
                }
            }
        }
        .boxed()
    })
}
