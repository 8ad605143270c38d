//! Gateway main entry point
//!
//! Accepts HTTP/JSON requests and forwards them as gRPC calls to the
//! upstream greeter service.

use tokio::net::TcpListener;
use tonic::transport::Channel;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_lib::{register_greeter, EncodePolicy, Gateway, GatewayConfig};
use proto::GreeterServiceClient;

async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=info,gateway_lib=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = GatewayConfig::from_env();
    tracing::info!("Starting Gateway v{}", config.version);
    tracing::info!("Upstream gRPC server: {}", config.upstream_addr);

    // Dial lazily so the gateway starts even while the upstream is down
    let channel = Channel::from_shared(config.upstream_addr.clone())?.connect_lazy();
    let client = GreeterServiceClient::new(channel);

    let policy = if config.strict_encoding {
        EncodePolicy::Strict
    } else {
        EncodePolicy::BestEffort
    };

    let gateway = Gateway::with_config(&config);
    register_greeter(&gateway, client, policy);

    for (method, path) in gateway.registry().routes() {
        tracing::info!("Route registered: {} {}", method, path);
    }

    let listener = TcpListener::bind(&config.http_addr).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, gateway.router())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "run" => {}
            other => {
                eprintln!("Unknown argument: {}", other);
                print_help();
                return Ok(());
            }
        }
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_server())
}

fn print_help() {
    println!("Gateway - HTTP/JSON gateway for gRPC services");
    println!();
    println!("Usage:");
    println!("  gateway                  Run the gateway");
    println!("  gateway run              Run the gateway");
    println!("  gateway --help           Show this message");
    println!();
    println!("Environment Variables:");
    println!("  GATEWAY_HTTP_ADDR          HTTP listen address");
    println!("                             (default: 0.0.0.0:8081)");
    println!("  GATEWAY_UPSTREAM_ADDR      Upstream gRPC URI");
    println!("                             (default: http://localhost:8080)");
    println!("  GATEWAY_CALL_TIMEOUT_SECS  Remote call deadline, 0 disables (default: 0)");
    println!("  GATEWAY_MAX_BODY_BYTES     Request body limit (default: 2097152)");
    println!("  GATEWAY_STRICT_ENCODING    Fail requests whose response cannot be encoded");
    println!("  RUST_LOG                   Log filter (default: gateway=info)");
}
