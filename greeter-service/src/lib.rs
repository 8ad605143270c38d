//! Greeter Service
//!
//! Implements `greeter.GreeterService/Greet`. The gateway binary reaches it
//! over gRPC; tests can also bind it InProcess.

pub mod service;

pub use service::GreeterServiceImpl;

/// Service configuration
#[derive(Debug, Clone)]
pub struct GreeterConfig {
    /// gRPC listen address
    pub grpc_addr: String,
    /// Prefix placed before the caller's name
    pub greeting: String,
    /// Service version
    pub version: String,
}

impl Default for GreeterConfig {
    fn default() -> Self {
        Self {
            grpc_addr: String::from("0.0.0.0:8080"),
            greeting: String::from("Hello"),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl GreeterConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("GREETER_GRPC_ADDR") {
            config.grpc_addr = addr;
        }

        if let Ok(greeting) = std::env::var("GREETER_GREETING") {
            config.greeting = greeting;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GreeterConfig::default();
        assert_eq!(config.grpc_addr, "0.0.0.0:8080");
        assert_eq!(config.greeting, "Hello");
    }
}
