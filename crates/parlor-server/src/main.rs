use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parlor_kernel::spawn_supervisor;
use parlor_server::{build_router, AppState, ServerConfig};
use parlor_store::{spawn_persistence, GameRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parlor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = config.port, "loaded configuration");

    // Storage first: a database we cannot open is a startup failure.
    let repository = GameRepository::connect(&config.database_url(), config.db_pool_size)
        .await
        .context("opening database")?;
    repository.init().await.context("initializing schema")?;
    tracing::info!(db = %config.db_url, "database ready");

    let persistence = spawn_persistence(repository);
    let registry = Arc::new(parlor_server::modules::default_registry());
    let supervisor = spawn_supervisor(Arc::clone(&registry), persistence);

    // Block until the snapshot restore has finished; requests arriving
    // before this would only be stashed anyway.
    supervisor
        .ready()
        .await
        .map_err(|e| anyhow::anyhow!("supervisor failed to start: {e}"))?;
    tracing::info!("supervisor ready");

    let state = AppState {
        supervisor,
        registry,
        config: Arc::new(config.clone()),
    };
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("graceful shutdown complete");
    Ok(())
}

/// Waits for SIGINT or SIGTERM so the server exits cleanly whether it
/// is stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
