use tonic::transport::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greeter_service::{GreeterConfig, GreeterServiceImpl};
use proto::GreeterServiceServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greeter_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = GreeterConfig::from_env();
    tracing::info!("Starting Greeter Service v{}", config.version);
    tracing::info!("gRPC server listening on {}", config.grpc_addr);

    let addr = config.grpc_addr.parse()?;
    let service = GreeterServiceImpl::with_config(config);

    Server::builder()
        .add_service(GreeterServiceServer::new(service))
        .serve_with_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
