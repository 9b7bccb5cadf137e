//! Duka Server - HTTP front for the directory
//!
//! Each browser session gets its own [`duka_core::Controller`]; the routes in
//! [`routes`] translate clicks into controller operations and reply with the
//! rendered view plus scroll cues.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod routes;
pub mod session;

use duka_core::{DukaConfig, Sources};
use tracing_subscriber::EnvFilter;

pub use error::{ApiError, ServerError};
pub use routes::{routes, SessionReply};
pub use session::AppState;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the global tracing subscriber
///
/// Honours `RUST_LOG`, defaulting to `info`. Safe to call more than once.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Serve until Ctrl+C or SIGTERM
///
/// # Errors
/// The generator client cannot be built or the listener cannot bind
pub async fn start_server(config: &DukaConfig) -> Result<(), ServerError> {
    tracing::info!("Initializing state...");
    let state = AppState::from_config(Sources::from_config(config)?, &config.server);

    let addr = config.server.addr();
    tracing::info!("Binding to {addr}");

    let (bound, server) =
        warp::serve(routes(state)).try_bind_with_graceful_shutdown(addr, shutdown_signal())?;
    tracing::info!("Server running on {bound}");

    server.await;
    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
