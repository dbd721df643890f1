use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend rejected the token. The session has already been torn
    /// down by the time a caller sees this.
    #[error("Session expired, please log in again")]
    Unauthorized,

    /// Non-success response; `detail` is the backend's message.
    #[error("{detail}")]
    Api { status: StatusCode, detail: String },

    #[error("{0}")]
    Validation(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Invalid login state: {0}")]
    InvalidState(String),

    #[error("No chat selected")]
    NoSelection,

    #[error("No chat '{0}' in the current list")]
    ConversationNotFound(String),

    #[error("Local store error: {0:#}")]
    Store(anyhow::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(err)
    }
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// HTTP status for backend rejections.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
