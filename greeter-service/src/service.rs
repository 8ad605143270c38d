//! Greeter service
//!
//! Business logic for the Greet operation.

use std::sync::atomic::{AtomicU64, Ordering};

use proto::{GreetRequest, GreetResponse, GreeterService};
use tonic::{Request, Response, Status};

use crate::GreeterConfig;

/// Greeter service implementation
#[derive(Debug)]
pub struct GreeterServiceImpl {
    config: GreeterConfig,
    calls: AtomicU64,
}

impl GreeterServiceImpl {
    /// Create a greeter with the default greeting
    pub fn new() -> Self {
        Self::with_config(GreeterConfig::default())
    }

    pub fn with_config(config: GreeterConfig) -> Self {
        Self {
            config,
            calls: AtomicU64::new(0),
        }
    }

    /// Greet the caller by name
    pub async fn greet(&self, request: GreetRequest) -> Result<GreetResponse, Status> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(name = %request.name, "greet");

        Ok(GreetResponse {
            message: format!("{} {}", self.config.greeting, request.name),
        })
    }

    /// Number of Greet calls served so far
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for GreeterServiceImpl {
    fn default() -> Self {
        Self::new()
    }
}

#[tonic::async_trait]
impl GreeterService for GreeterServiceImpl {
    async fn greet(
        &self,
        request: Request<GreetRequest>,
    ) -> Result<Response<GreetResponse>, Status> {
        let response = GreeterServiceImpl::greet(self, request.into_inner()).await?;
        Ok(Response::new(response))
    }
}
