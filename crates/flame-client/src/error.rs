use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Everything a client operation can fail with. `Display` is the message
/// shown next to the control that triggered the call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx response; `message` is the server's error text or the status line.
    #[error("{message}")]
    Http { status: StatusCode, message: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Realtime connection failed: {0}")]
    Realtime(#[from] Box<tokio_tungstenite::tungstenite::Error>),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ClientError {
    /// True when the server rejected the call with exactly this error text.
    pub fn is_server_error(&self, code: &str) -> bool {
        matches!(self, Self::Http { message, .. } if message == code)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Realtime(Box::new(e))
    }
}
