use std::time::Duration;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything a call on [`crate::SgDataClient`] can fail with.
#[derive(Debug, Error)]
pub enum SgDataError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to decode JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("client is closed")]
    Closed,

    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SgDataError {
    /// Status code carried by an [`SgDataError::Http`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SgDataError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SgDataError::Transport(TransportError::Timeout(_)))
    }
}

/// Failures below HTTP: the request never produced a status line.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("could not connect: {0}")]
    Connect(#[source] BoxError),

    #[error("request failed: {0}")]
    Request(#[source] BoxError),
}

impl TransportError {
    /// Classify a reqwest failure. `timeout` is the configured limit reported
    /// when reqwest gives up on its own.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(timeout)
        } else if err.is_connect() {
            TransportError::Connect(Box::new(err))
        } else {
            TransportError::Request(Box::new(err))
        }
    }
}
