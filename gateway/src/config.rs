use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// HTTP listen address
    pub http_addr: String,

    /// Upstream gRPC server URI
    pub upstream_addr: String,

    /// Deadline for each remote call in seconds (0 disables the deadline)
    pub call_timeout_secs: u64,

    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,

    /// Report response encoding failures instead of dropping them
    pub strict_encoding: bool,

    /// Service version
    pub version: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8081".to_string(),
            upstream_addr: "http://localhost:8080".to_string(),
            call_timeout_secs: 0,
            max_body_bytes: 2 * 1024 * 1024,
            strict_encoding: false,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl GatewayConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from a variable lookup, starting from defaults.
    ///
    /// Numeric values that fail to parse leave the default in place.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("GATEWAY_HTTP_ADDR") {
            config.http_addr = addr;
        }

        if let Some(addr) = lookup("GATEWAY_UPSTREAM_ADDR") {
            config.upstream_addr = addr;
        }

        if let Some(timeout) = lookup("GATEWAY_CALL_TIMEOUT_SECS") {
            if let Ok(n) = timeout.parse() {
                config.call_timeout_secs = n;
            }
        }

        if let Some(limit) = lookup("GATEWAY_MAX_BODY_BYTES") {
            if let Ok(n) = limit.parse() {
                config.max_body_bytes = n;
            }
        }

        if let Some(strict) = lookup("GATEWAY_STRICT_ENCODING") {
            config.strict_encoding = strict.to_lowercase() == "true" || strict == "1";
        }

        config
    }

    /// Get the remote call deadline, if any
    pub fn call_timeout(&self) -> Option<Duration> {
        match self.call_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
