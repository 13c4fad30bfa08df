use std::time::{Duration, Instant};

/// Keepalive schedule: tracks the last time anything was sent on the
/// transport and decides when a no-op is due. The session task owns the
/// actual periodic tick; this type only holds the bookkeeping so the
/// decision logic stays testable without a runtime.
#[derive(Debug)]
pub struct KeepAliveTimer {
    interval: Duration,
    last_traffic: Instant,
    last_keepalive: Option<Instant>,
}

impl KeepAliveTimer {
    pub fn new(interval: Duration) -> Self {
        // The session task feeds this interval into tokio::time::interval,
        // which rejects a zero period
        let interval = interval.max(Duration::from_millis(1));
        Self {
            interval,
            last_traffic: Instant::now(),
            last_keepalive: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Record that a control or audio message was just sent.
    pub fn record_traffic(&mut self, now: Instant) {
        self.last_traffic = now;
    }

    /// Record that a no-op was just sent.
    pub fn record_keepalive(&mut self, now: Instant) {
        self.last_keepalive = Some(now);
        self.last_traffic = now;
    }

    /// Whether the connection has been idle long enough to need a no-op.
    pub fn due(&self, now: Instant) -> bool {
        now.duration_since(self.last_traffic) >= self.interval
    }
}
