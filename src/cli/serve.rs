//! Serve command implementation

use crate::api::{create_router, AppState};
use crate::cli::ServeArgs;
use crate::config::{LogFormat, PhineasConfig};
use crate::engine::{AssignmentEngine, SystemClock};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ServeArgs,
) -> Result<PhineasConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        PhineasConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        PhineasConfig::default()
    };

    config = config.with_env_overrides();

    // CLI flags win over file and environment
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Initialize tracing based on configuration
pub fn init_tracing(
    config: &crate::config::LoggingConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = crate::logging::build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
    }

    Ok(())
}

/// Build API router over an engine loaded from configuration
pub fn build_app(config: PhineasConfig) -> Result<axum::Router, Box<dyn std::error::Error>> {
    let engine = Arc::new(AssignmentEngine::from_config(&config, Arc::new(SystemClock))?);
    let state = Arc::new(AppState::new(engine, Arc::new(config)));
    Ok(create_router(state))
}

/// Serve `app` on `listener` until `cancel_token` fires.
pub async fn serve_until(
    listener: TcpListener,
    app: axum::Router,
    cancel_token: CancellationToken,
) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(cancel_token.cancelled_owned())
        .await
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
        _ = cancel_token.cancelled() => {}
    }

    cancel_token.cancel();
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load and merge configuration
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;

    tracing::info!("Starting Phineas server");
    tracing::debug!(?config, "Loaded configuration");

    // 3. Build the engine and router
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_app(config)?;

    // 4. Bind and serve
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Phineas API server listening");

    let cancel_token = CancellationToken::new();
    let signals = tokio::spawn(shutdown_signal(cancel_token.clone()));

    serve_until(listener, app, cancel_token.clone()).await?;

    cancel_token.cancel();
    signals.await?;

    tracing::info!("Phineas server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn args(config: PathBuf, port: Option<u16>) -> ServeArgs {
        ServeArgs {
            config,
            port,
            host: None,
            log_level: None,
        }
    }

    #[tokio::test]
    async fn test_serve_config_loading() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[server]\nport = 8080").unwrap();

        let config = load_config_with_overrides(&args(temp.path().to_path_buf(), None)).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[tokio::test]
    async fn test_serve_cli_overrides_config() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[server]\nport = 8080").unwrap();

        let config =
            load_config_with_overrides(&args(temp.path().to_path_buf(), Some(9000))).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[tokio::test]
    async fn test_serve_works_without_config_file() {
        let config =
            load_config_with_overrides(&args(PathBuf::from("nonexistent.toml"), None)).unwrap();
        assert!(config.drivers.is_empty());
    }

    #[tokio::test]
    async fn test_build_app_from_example_config() {
        let config: PhineasConfig =
            toml::from_str(include_str!("../../phineas.example.toml")).unwrap();
        assert!(build_app(config).is_ok());
    }

    #[tokio::test]
    async fn test_serve_until_stops_on_cancel() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let app = build_app(PhineasConfig::default()).unwrap();
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(serve_until(listener, app, cancel.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let result = tokio::time::timeout(Duration::from_secs(2), handle).await;
        assert!(result.unwrap().unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_signal_returns_when_cancelled() {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(shutdown_signal(cancel.clone()));
        cancel.cancel();

        let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(result.is_ok());
    }
}
