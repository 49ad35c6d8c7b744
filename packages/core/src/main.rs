use clap::Parser;
use dotenvy::dotenv;
use tokio::net::TcpListener;

use request_logger::api::create_router;
use request_logger::cli::Cli;
use request_logger::{Logger, LoggerConfig};

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    let config = LoggerConfig::from_env()
        .map(|config| cli.apply(config))
        .unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        });

    let logger = Logger::new(config.clone())
        .install()
        .unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        })
        .clone();

    tracing::info!(level = %config.level, "Logging initialized");

    let listener = match TcpListener::bind(cli.bind).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind {}: {}", cli.bind, err);
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on {}", cli.bind);

    let app = create_router(logger);
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutdown signal received");
    };

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        tracing::error!("Server error: {}", err);
        std::process::exit(1);
    }

    tracing::info!("Server stopped cleanly");
}
