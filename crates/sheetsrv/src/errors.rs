use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

pub type ServerResult<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Drive(#[from] drive_connector::errors::DriveError),

    #[error(transparent)]
    Excel(#[from] excel::errors::ExcelError),
}

impl ServerError {
    /// Requesting a sheet the workbook doesn't have is the caller's
    /// mistake; everything else is on us or the remote.
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Excel(excel::errors::ExcelError::SheetNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
