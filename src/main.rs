use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tax_engine::api::{AppState, create_router};
use tax_engine::config::SettingsLoader;
use tax_engine::store::{DeductionStore, SqliteDeductionRepository};
use tokio::sync::Notify;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = SettingsLoader::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(&settings.settings().logging.filter)
            }),
        )
        .with_target(false)
        .init();

    let admin = settings.admin_credentials(|key| std::env::var(key).ok());
    if admin.is_none() {
        warn!("Admin credentials are not set; admin routes will reject every request");
    }

    let settings = settings.into_settings();
    let repository = SqliteDeductionRepository::connect(&settings.database.url).await?;
    let store = match DeductionStore::load(Arc::new(repository)).await {
        Ok(store) => store,
        Err(err) => {
            error!(error = %err, "Failed to load deductions, refusing to start");
            return Err(err.into());
        }
    };

    let state = AppState::new(store)
        .with_calculation(settings.calculation)
        .with_admin(admin);
    let app = create_router(state);

    let addr = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Tax engine listening");

    let draining = Arc::new(Notify::new());
    let server = {
        let draining = draining.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                draining.notify_one();
            })
            .into_future()
    };

    let grace = Duration::from_secs(settings.server.shutdown_timeout_secs);
    tokio::select! {
        result = server => result?,
        _ = async {
            draining.notified().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(timeout_secs = grace.as_secs(), "In-flight requests did not finish in time");
        }
    }

    info!("Tax engine stopped");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
