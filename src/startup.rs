//! Application startup and server initialization.
//!
//! This module wires the traffic store, the window scheduler, the CPU sampler
//! and the Prometheus registry into the HTTP server, and tears them down on
//! SIGINT/SIGTERM.

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::ConfigV1;
use crate::cpu::create_cpu_sampler;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::routes;
use crate::state::AppState;
use crate::traffic::{MetricStore, SystemClock, WindowScheduler};

/// Builds the shared state: one traffic store per process plus its readers.
pub fn build_state(config: Arc<ConfigV1>) -> Result<AppState> {
    let traffic = Arc::new(MetricStore::new());
    let cpu = create_cpu_sampler(&config.cpu);
    let metrics = Metrics::new(traffic.clone(), cpu.clone())?;

    Ok(AppState {
        config,
        traffic,
        cpu,
        metrics,
    })
}

/// Serves `state` on `listener` until `shutdown` resolves.
///
/// The window scheduler runs for exactly as long as the server does.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let scheduler =
        WindowScheduler::new(state.traffic.clone(), Arc::new(SystemClock)).spawn();
    let app = routes::create_router(state);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    scheduler.shutdown().await;
    served?;
    Ok(())
}

/// Initializes and runs the application server.
///
/// Binds to the address specified in the configuration and serves until the
/// process receives SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if the server fails to bind to the specified address
/// or encounters a runtime error during execution.
pub async fn run(config: Arc<ConfigV1>) -> Result<()> {
    let addr = config.socket_addr()?;
    let state = build_state(config)?;

    info!("Starting server on {}", addr);
    let listener = TcpListener::bind(addr).await?;

    serve(listener, state, shutdown_signal()).await?;
    info!("Server shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to register SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received, initiating graceful shutdown."),
        _ = terminate => info!("SIGTERM received, initiating graceful shutdown."),
    }
}
