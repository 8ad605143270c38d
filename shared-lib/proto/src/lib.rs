//! Shared protobuf definitions for upstream services
//!
//! Generated from `proto/*.proto` by tonic-build. Message types derive both
//! `prost::Message` (gRPC wire format) and serde (JSON), so the gateway can
//! translate between the two without a separate mapping layer.
//!
//! - `greeter`: `greeter.GreeterService`

/// Greeter proto definitions
pub mod greeter {
    tonic::include_proto!("greeter");
}

// Re-export commonly used types for convenience
pub use greeter::greeter_service_client::GreeterServiceClient;
pub use greeter::greeter_service_server::{GreeterService, GreeterServiceServer};
pub use greeter::{GreetRequest, GreetResponse};
