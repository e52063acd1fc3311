pub mod app;
pub mod auth;
pub mod config;
pub mod constants;
pub mod database;
pub mod handlers;
pub mod jobs;
pub mod liveness;
pub mod models;
pub mod state;
pub mod store;
pub mod swagger;
pub mod utils;

#[cfg(not(test))]
pub async fn start_web_server() -> anyhow::Result<()> {
    use std::{net::SocketAddr, sync::Arc};

    use crate::{config::AppConfig, database::AppDatabase, jobs::spawn_all_jobs, state::AppState};

    // import .env file
    dotenvy::dotenv().ok();
    initialize_logging();
    let config = AppConfig::from_env().map_err(|err| {
        tracing::error!("Invalid configuration: {err}");
        err
    })?;
    // create database client
    let db_client = AppDatabase::new(&config).await.map_err(|err| {
        tracing::error!("Unable to acquire database client: {err}");
        err
    })?;
    let port = config.port;
    let state = AppState::new(config, Arc::new(db_client))?;
    spawn_all_jobs(state.clone());
    // build the socket address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = app::build_app(state);
    tracing::info!("Starting the app in: {addr}");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(not(test))]
fn initialize_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // create default env filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or("smart_panchayat_backend=debug,tower_http=debug".into());

    // initialize tracing subscriber for logging
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .try_init()
        .ok();
}

#[cfg(not(test))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!("Failed to install signal handler: {err}");
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
}
