use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No usable credential, or the refresh/retry path gave up. The user must log in again.
    #[error("auth error: {0}")]
    Auth(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("http error: status={0} body='{1}'")]
    Http(StatusCode, String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// True when the caller should send the user back to the login flow.
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }
}
