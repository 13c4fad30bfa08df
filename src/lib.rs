//! Client for a continuous, bidirectional speech-recognition protocol.
//!
//! Callers stream [`AudioFrame`]s into an active session and receive
//! interim/final [`RecognitionEvent`]s back over a channel while the session
//! controller keeps the connection alive, suppresses silence, and recovers
//! from error conditions. The actual socket lives behind the [`Transport`]
//! trait; this crate only drives the protocol.

pub mod audio;
pub mod config;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transport;

pub use audio::AudioFrame;
pub use config::{SessionConfig, SessionLimits};
pub use error::SessionError;
pub use protocol::{
    decode_recognize_response, Alternative, DecodeError, KeywordSpot, RecognitionEvent,
    RecognitionResult,
};
pub use session::{Recognizer, SessionEvent, SessionHandle};
pub use transport::{
    EndpointParams, Transport, TransportError, TransportEvent, TransportLink, TransportSink,
};
