use crate::protocol::results::DecodeError;
use crate::transport::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong with a recognition session.
///
/// Admission errors (`AlreadyActive`, `NotActive`, `QueueOverflow`) are
/// returned or emitted when a call is rejected; protocol errors
/// (`ReadyTimeout`, `Transport`, `Server`) terminate the session; `Decode`
/// is emitted for a single dropped inbound message and leaves the session
/// running.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("a recognition session is already active")]
    AlreadyActive,

    #[error("no recognition session is active")]
    NotActive,

    #[error("pending-frame queue exceeded its bound of {0} frames")]
    QueueOverflow(usize),

    #[error("server did not acknowledge readiness within {0:?}")]
    ReadyTimeout(Duration),

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("server reported an error: {0}")]
    Server(String),

    #[error("dropped malformed inbound message: {0}")]
    Decode(#[from] DecodeError),
}

impl SessionError {
    /// Whether this error closes the session when emitted on the event
    /// channel. Decode failures drop one message and keep the session alive.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SessionError::Decode(_))
    }
}
