pub type Result<T, E = DriveError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    /// Credentials were missing, malformed, or rejected during the token
    /// exchange. Kept distinct from download failures so operators can tell
    /// a configuration problem from a flaky remote.
    #[error("Invalid service account configuration: {0}")]
    AuthConfig(String),

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlParseError(String),

    #[error("File '{0}' not found in remote storage")]
    FileNotFound(String),

    #[error("Remote storage denied access with status code: {0}")]
    PermissionDenied(reqwest::StatusCode),

    #[error("Request errored with status code {code}: {body}")]
    UnexpectedStatus {
        code: reqwest::StatusCode,
        body: String,
    },
}
