use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectStage {
    Identifier,
    Handshake,
}

impl fmt::Display for ConnectStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => f.write_str("connection id request"),
            Self::Handshake => f.write_str("stream handshake"),
        }
    }
}

/// Identifier acquisition or stream-open failure. Terminal for the session.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
    #[error("connection id request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("connection id request returned HTTP {0}")]
    Status(StatusCode),
    #[error("connection id response had no `connection_id`")]
    MissingIdentifier,
    #[error("stream handshake failed: {0}")]
    Handshake(#[from] tungstenite::Error),
    #[error("{stage} timed out after {}ms", .after.as_millis())]
    Timeout { stage: ConnectStage, after: Duration },
}

/// A single outbound request failed. The session stays open.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend returned HTTP {0}")]
    Status(StatusCode),
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// The open streaming channel reported an error.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ChannelError(#[from] pub tungstenite::Error);

/// An inbound frame that is not a `{ type, data }` message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("malformed frame: {reason}")]
pub struct MalformedFrame {
    pub reason: String,
}

impl MalformedFrame {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
