use std::sync::Arc;

use anyhow::Result;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::handlers::{self, ServerState};

/// Service configuration, resolved once at startup from the command line
/// and environment. Everything downstream receives it explicitly.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service account key JSON used to authenticate with the Drive API.
    pub service_account_json: String,
    /// Identifier of the spreadsheet file this service exposes.
    pub file_id: String,
    /// Base URL of the Drive API.
    pub drive_api_url: String,
}

pub struct SheetsrvServer {
    state: Arc<ServerState>,
}

impl SheetsrvServer {
    pub fn new(config: ServiceConfig) -> SheetsrvServer {
        SheetsrvServer {
            state: Arc::new(ServerState { config }),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/healthz", get(handlers::healthz))
            .route("/debug", get(handlers::debug))
            .route("/excel/sheets", get(handlers::list_sheets))
            .route("/excel/read-sheet", get(handlers::read_sheet))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve on the provided listener until interrupted.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        info!("Listening on: http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown triggered"),
        Err(err) => error!(%err, "unable to listen for shutdown signal"),
    }
}
