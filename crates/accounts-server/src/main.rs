//! Accounts Server - Main entry point

use accounts_common::logging::{init_logging, LogConfig};
use anyhow::Result;
use clap::Parser;
use serde_json::json;
use std::{future::IntoFuture, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tokio::{signal, sync::Notify};
use tracing::info;

use accounts_server::{
    api,
    auth::TokenService,
    config::Config,
    db::{self, PgUserStore},
    enrich::ShortIdGenerator,
    features::FeatureState,
};

#[derive(Debug, Parser)]
#[command(name = "accounts-server", about = "User account API server", disable_version_flag = true)]
struct Cli {
    /// Env file to load instead of `.env`
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print build information as JSON and exit
    #[arg(short = 'v', long)]
    version: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", serde_json::to_string_pretty(&version_info())?);
        return Ok(());
    }

    let log_config = LogConfig::builder()
        .log_file_prefix("accounts-server")
        .filter_directives("accounts_server=debug,tower_http=debug,sqlx=warn")
        .build()
        .merge_env()?;

    init_logging(&log_config)?;

    info!("Starting accounts server");

    let config = Config::load(cli.config.as_deref())?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let pool = db::create_pool(&config.database).await?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    info!("Database migrations completed");

    let state = FeatureState::new(
        Arc::new(PgUserStore::new(pool)),
        Arc::new(ShortIdGenerator),
        TokenService::new(
            &config.auth.jwt_secret,
            Duration::from_secs(config.auth.jwt_ttl_secs),
        ),
        config.enrich.deadline(),
    );

    let app = api::create_router(state, &config.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    tokio::spawn(probe_health(
        config.server.public_url.clone(),
        config.server.max_ping_count,
    ));

    let signalled = Arc::new(Notify::new());
    let notifier = signalled.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            notifier.notify_one();
        })
        .into_future();

    let drain_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    tokio::select! {
        result = server => {
            result?;
            info!("Server shut down gracefully");
        },
        _ = drain_deadline(signalled, drain_timeout) => {
            tracing::warn!(
                "Connections still open after {} seconds, shutting down anyway",
                drain_timeout.as_secs()
            );
        },
    }

    Ok(())
}

fn version_info() -> serde_json::Value {
    json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "rustVersion": env!("CARGO_PKG_RUST_VERSION"),
        "platform": format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
    })
}

/// Poll the liveness route until it answers or attempts run out
async fn probe_health(base_url: String, max_attempts: u32) {
    let url = format!("{}/sd/health", base_url.trim_end_matches('/'));
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build self-probe client: {}", e);
            return;
        },
    };

    for attempt in 1..=max_attempts {
        match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                info!(attempt, "The router has been deployed successfully");
                return;
            },
            Ok(response) => {
                tracing::debug!(attempt, status = %response.status(), "Self-probe not ready");
            },
            Err(e) => {
                tracing::debug!(attempt, error = %e, "Self-probe not ready");
            },
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    tracing::error!(
        url = %url,
        attempts = max_attempts,
        "The router has no response, or it might took too long to start up"
    );
}

/// Resolves once `timeout` has passed after the shutdown signal fired
async fn drain_deadline(signalled: Arc<Notify>, timeout: Duration) {
    signalled.notified().await;
    info!("Waiting up to {} seconds for connections to close", timeout.as_secs());
    tokio::time::sleep(timeout).await;
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_drain_deadline_starts_at_signal() {
        let signalled = Arc::new(Notify::new());
        let deadline = tokio::spawn(drain_deadline(signalled.clone(), Duration::from_secs(3)));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(!deadline.is_finished());

        signalled.notify_one();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!deadline.is_finished());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(deadline.is_finished());
    }

    #[test]
    fn test_cli_parses_config_path() {
        let cli = Cli::parse_from(["accounts-server", "--config", "prod.env"]);
        assert_eq!(cli.config, Some(PathBuf::from("prod.env")));
        assert!(!cli.version);
    }
}
