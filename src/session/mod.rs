pub mod controller;
pub mod keepalive;
pub mod queue;
pub mod state;

pub use controller::{Recognizer, SessionEvent, SessionHandle};
pub use keepalive::KeepAliveTimer;
pub use queue::IngestQueue;
