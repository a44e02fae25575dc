use bytes::Bytes;
use reqwest::{Client, IntoUrl, StatusCode, Url};
use serde::Deserialize;
use tracing::trace;

use crate::credentials::{AccessToken, ServiceAccountKey};
use crate::errors::{DriveError, Result};

pub mod credentials;
pub mod errors;

const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Field selection for metadata requests, matching what the debug surface
/// reports.
const METADATA_FIELDS: &str = "id, name, mimeType";

/// Metadata for a single remote file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

/// An authenticated Drive API client.
///
/// A client is valid for a single logical session. Connecting parses the
/// service account key and performs one token exchange; tokens are never
/// refreshed or shared across sessions.
#[derive(Debug)]
pub struct DriveClient {
    base_url: Url,
    inner: Client,
    token: AccessToken,
}

impl DriveClient {
    /// Authenticate with the given service account key against the API at
    /// `api_url`.
    pub async fn connect<U: IntoUrl>(service_account_json: &str, api_url: U) -> Result<DriveClient> {
        let key = ServiceAccountKey::try_from_str(service_account_json)?;
        let base_url = api_url.into_url()?;

        let inner = Client::builder().user_agent(APP_USER_AGENT).build()?;
        let token = key.fetch_access_token(&inner).await?;

        Ok(DriveClient {
            base_url,
            inner,
            token,
        })
    }

    /// Download the file's content. A single best-effort attempt, no
    /// retries.
    pub async fn download(&self, file_id: &str) -> Result<Bytes> {
        let res = self.get_file(file_id, &[("alt", "media")]).await?;
        Ok(res.bytes().await?)
    }

    /// Fetch the file's name and mime type.
    pub async fn file_metadata(&self, file_id: &str) -> Result<FileMetadata> {
        let res = self
            .get_file(file_id, &[("fields", METADATA_FIELDS)])
            .await?;

        let body = res.text().await?;
        trace!(%body, "metadata response");

        Ok(serde_json::from_str(&body)?)
    }

    async fn get_file(&self, file_id: &str, query: &[(&str, &str)]) -> Result<reqwest::Response> {
        let url = self
            .base_url
            .join(&format!("drive/v3/files/{file_id}"))
            // The URL crate we use is from the "reqwest" crate which doesn't
            // expose the error and hence we cast it to a string.
            .map_err(|e| DriveError::UrlParseError(format!("{e}")))?;

        let res = self
            .inner
            .get(url)
            .query(query)
            .bearer_auth(&self.token.access_token)
            .send()
            .await?;

        match res.status() {
            StatusCode::NOT_FOUND => Err(DriveError::FileNotFound(file_id.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(DriveError::PermissionDenied(res.status()))
            }
            status if !status.is_success() => Err(DriveError::UnexpectedStatus {
                code: status,
                body: res.text().await.unwrap_or_default(),
            }),
            _ => Ok(res),
        }
    }
}
