//! HTTP/JSON to gRPC gateway library
//!
//! Routes inbound HTTP requests by `(method, path)` to endpoints that decode
//! the JSON body into a typed request, invoke a remote gRPC call and encode
//! the typed response back to JSON.

pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod endpoint;
pub mod registry;
pub mod routes;

pub use codec::JsonCodec;
pub use config::GatewayConfig;
pub use dispatcher::{DispatchOptions, Gateway};
pub use endpoint::{
    make_handler, make_handler_with, CallContext, EncodePolicy, Endpoint, EndpointError,
    EndpointResult, RemoteCall,
};
pub use error::GatewayError;
pub use registry::RouteRegistry;
pub use routes::register_greeter;
