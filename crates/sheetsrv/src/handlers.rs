use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use drive_connector::{DriveClient, FileMetadata};
use excel::SheetReader;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::errors::ServerResult;
use crate::server::ServiceConfig;

/// State that's passed to all handlers.
#[derive(Debug)]
pub struct ServerState {
    /// Configuration the service was started with.
    pub config: ServiceConfig,
}

#[derive(Debug, Serialize)]
pub struct SheetsResponse {
    pub sheets: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ValuesResponse {
    pub values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct ReadSheetParams {
    pub sheet: String,
}

pub async fn healthz(State(_): State<Arc<ServerState>>) -> &'static str {
    "OK"
}

/// Report on configuration and upstream access.
///
/// Always responds 200. Failures are reported in the body so that callers
/// probing a misconfigured deployment still get a diagnosable payload.
pub async fn debug(State(state): State<Arc<ServerState>>) -> Json<Value> {
    let config = &state.config;
    let configured = !config.service_account_json.is_empty();

    match fetch_metadata(config).await {
        Ok(meta) => Json(json!({
            "file_id": meta.id,
            "file_name": meta.name,
            "mime_type": meta.mime_type,
            "service_account_configured": configured,
        })),
        Err(err) => {
            error!(%err, "debug check failed");
            Json(json!({
                "error": err.to_string(),
                "file_id": config.file_id,
                "configured": configured,
            }))
        }
    }
}

/// List sheet names in workbook order.
pub async fn list_sheets(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<Json<SheetsResponse>> {
    let reader = fetch_workbook(&state.config).await?;
    Ok(Json(SheetsResponse {
        sheets: reader.sheet_names(),
    }))
}

/// Read all rows from the requested sheet.
pub async fn read_sheet(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ReadSheetParams>,
) -> ServerResult<Json<ValuesResponse>> {
    let mut reader = fetch_workbook(&state.config).await?;
    let values = reader.read_rows(&params.sheet)?;
    Ok(Json(ValuesResponse { values }))
}

/// Download the configured file and open it as a workbook.
///
/// Runs in full on every request; neither credentials nor file content are
/// cached between calls.
async fn fetch_workbook(config: &ServiceConfig) -> ServerResult<SheetReader> {
    let client = DriveClient::connect(&config.service_account_json, &config.drive_api_url).await?;
    let bytes = client.download(&config.file_id).await?;
    debug!(len = bytes.len(), file_id = %config.file_id, "downloaded file");
    Ok(SheetReader::open(bytes)?)
}

async fn fetch_metadata(config: &ServiceConfig) -> ServerResult<FileMetadata> {
    let client = DriveClient::connect(&config.service_account_json, &config.drive_api_url).await?;
    Ok(client.file_metadata(&config.file_id).await?)
}
