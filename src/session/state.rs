use crate::session::queue::IngestQueue;
use std::time::Instant;

/// Lifecycle phase of a session. `Failed` is terminal and reachable from any
/// non-idle phase; "idle" is represented by no session task existing at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Transport open in flight
    Connecting,
    /// Transport open; waiting for the server's "listening" acknowledgment
    AwaitingReady,
    /// Server is listening; frames are sent immediately
    Active,
    /// Cleanup in progress
    Stopping,
    /// Cleanup finished
    Closed,
    /// Terminal failure; cleanup has run
    Failed,
}

/// The mutable run-time record for one session. Owned exclusively by the
/// session task; every mutation happens on that task.
#[derive(Debug)]
pub struct SessionState {
    pub phase: Phase,
    /// Sample rate bound to this connection, fixed by the first frame
    pub sample_rate: Option<u32>,
    /// Whether the start message has gone out (arms the ready deadline)
    pub start_sent: bool,
    /// Whether any audio has been sent since the last stop
    pub audio_sent_since_stop: bool,
    /// Deadline for the "listening" acknowledgment, armed when start is sent
    pub ready_deadline: Option<Instant>,
    /// Frames buffered until the server is ready
    pub queue: IngestQueue,
}

impl SessionState {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            phase: Phase::Connecting,
            sample_rate: None,
            start_sent: false,
            audio_sent_since_stop: false,
            ready_deadline: None,
            queue: IngestQueue::new(queue_capacity),
        }
    }

    /// Reset to initial values during cleanup; the terminal phase is set by
    /// the caller afterwards.
    pub fn reset(&mut self) {
        self.phase = Phase::Stopping;
        self.sample_rate = None;
        self.start_sent = false;
        self.audio_sent_since_stop = false;
        self.ready_deadline = None;
        self.queue.clear();
    }
}
