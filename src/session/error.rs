use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Not logged in. Run `bakehouse login <email> <password>` first.")]
    NotLoggedIn,

    #[error("Session expired. Please log in again.")]
    Expired,

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
