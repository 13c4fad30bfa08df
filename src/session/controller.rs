use crate::audio::AudioFrame;
use crate::config::{SessionConfig, SessionLimits};
use crate::error::SessionError;
use crate::protocol::control;
use crate::protocol::results::{decode_event, InboundMessage, RecognitionEvent};
use crate::session::keepalive::KeepAliveTimer;
use crate::session::state::{Phase, SessionState};
use crate::transport::{
    EndpointParams, Transport, TransportError, TransportEvent, TransportLink, TransportSink,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// What a session delivers on its event channel.
#[derive(Debug)]
pub enum SessionEvent {
    /// A decoded interim or final recognition event
    Recognition(RecognitionEvent),
    /// A session error; fatal unless `SessionError::is_fatal` says otherwise
    Error(SessionError),
    /// The session finished closing; emitted exactly once, last
    Closed,
}

enum Command {
    Frame(AudioFrame),
    End,
}

/// Entry point for starting recognition sessions over a transport.
///
/// Owns nothing but the transport and the occupancy flag: at most one
/// session runs at a time, and a second `begin_session` while one is active
/// is rejected rather than reusing the connection.
pub struct Recognizer {
    transport: Arc<dyn Transport>,
    limits: SessionLimits,
    active: Arc<AtomicBool>,
}

impl Recognizer {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_limits(transport, SessionLimits::default())
    }

    pub fn with_limits(transport: Arc<dyn Transport>, limits: SessionLimits) -> Self {
        Self {
            transport,
            limits,
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a session currently owns the transport.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Begin a streaming session. Non-blocking: the connection is opened by
    /// the spawned session task, and everything the session produces arrives
    /// on the returned event channel. Must be called within a tokio runtime.
    pub fn begin_session(
        &self,
        config: SessionConfig,
    ) -> Result<(SessionHandle, mpsc::UnboundedReceiver<SessionEvent>), SessionError> {
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SessionError::AlreadyActive);
        }

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let controller = SessionController {
            transport: Arc::clone(&self.transport),
            keepalive: KeepAliveTimer::new(self.limits.keepalive_interval),
            state: SessionState::new(self.limits.queue_capacity),
            limits: self.limits.clone(),
            events: event_tx,
            active: Arc::clone(&self.active),
            config,
        };
        tokio::spawn(controller.run(command_rx));

        Ok((SessionHandle { commands: command_tx }, event_rx))
    }
}

/// Caller-side handle to an active session. Both operations are non-blocking.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl SessionHandle {
    /// Hand a frame to the session. The frame is queued or sent according to
    /// the session phase; errors it provokes arrive on the event channel.
    pub fn submit_frame(&self, frame: AudioFrame) -> Result<(), SessionError> {
        self.commands
            .send(Command::Frame(frame))
            .map_err(|_| SessionError::NotActive)
    }

    /// End the session. Safe to call from any phase and idempotent; a second
    /// call after the session closed is a no-op.
    pub fn end(&self) {
        let _ = self.commands.send(Command::End);
    }
}

/// The single serialization point: one task owning [`SessionState`],
/// consuming caller commands, transport events, keepalive ticks, and the
/// readiness deadline through one `select!` loop.
struct SessionController {
    transport: Arc<dyn Transport>,
    config: SessionConfig,
    limits: SessionLimits,
    events: mpsc::UnboundedSender<SessionEvent>,
    state: SessionState,
    keepalive: KeepAliveTimer,
    active: Arc<AtomicBool>,
}

impl SessionController {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        info!(model = %self.config.model, "beginning recognition session");

        match self.connect(&mut commands).await {
            Ok(Some(link)) => {
                let TransportLink {
                    mut sink,
                    mut events,
                } = link;
                self.state.phase = Phase::AwaitingReady;

                // Frames submitted while the open was in flight may already
                // owe the server a start message
                let outcome = match self.maybe_send_start(sink.as_mut()).await {
                    Ok(()) => self.event_loop(&mut commands, sink.as_mut(), &mut events).await,
                    Err(err) => Some(err),
                };
                self.finish(Some(sink.as_mut()), outcome).await;
            }
            Ok(None) => self.finish(None, None).await,
            Err(err) => self.finish(None, Some(err)).await,
        }
    }

    /// Open the transport while still honoring commands: frames count
    /// against the queue bound, and an end call cancels the open.
    async fn connect(
        &mut self,
        commands: &mut mpsc::UnboundedReceiver<Command>,
    ) -> Result<Option<TransportLink>, SessionError> {
        let params = EndpointParams {
            model: self.config.model.clone(),
        };
        let transport = Arc::clone(&self.transport);
        let open = transport.open(params);
        tokio::pin!(open);

        loop {
            tokio::select! {
                opened = &mut open => {
                    return opened.map(Some).map_err(SessionError::from);
                }
                cmd = commands.recv() => match cmd {
                    Some(Command::Frame(frame)) => self.admit_pending(frame)?,
                    Some(Command::End) | None => {
                        info!("session ended while connecting");
                        return Ok(None);
                    }
                }
            }
        }
    }

    async fn event_loop(
        &mut self,
        commands: &mut mpsc::UnboundedReceiver<Command>,
        sink: &mut dyn TransportSink,
        inbound: &mut mpsc::UnboundedReceiver<TransportEvent>,
    ) -> Option<SessionError> {
        let mut tick = tokio::time::interval(self.keepalive.interval());
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let ready_deadline = self.state.ready_deadline;

            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(Command::Frame(frame)) => {
                        if let Err(err) = self.handle_frame(frame, sink).await {
                            return Some(err);
                        }
                    }
                    Some(Command::End) | None => {
                        info!("session end requested");
                        return None;
                    }
                },
                event = inbound.recv() => match event {
                    Some(TransportEvent::Message(payload)) => {
                        if let Err(err) = self.handle_inbound(&payload, sink).await {
                            return Some(err);
                        }
                    }
                    Some(TransportEvent::Closed(reason)) => {
                        return Some(TransportError::Closed(reason).into());
                    }
                    None => {
                        return Some(
                            TransportError::Closed("transport event channel dropped".into())
                                .into(),
                        );
                    }
                },
                _ = tick.tick(), if self.state.start_sent => {
                    let now = Instant::now();
                    if self.keepalive.due(now) {
                        debug!("connection idle; sending no-op keepalive");
                        if let Err(err) = sink.send_text(control::no_op_message()).await {
                            return Some(err.into());
                        }
                        self.keepalive.record_keepalive(now);
                    }
                },
                _ = wait_until(ready_deadline), if ready_deadline.is_some() => {
                    warn!("server never acknowledged readiness");
                    return Some(SessionError::ReadyTimeout(self.limits.ready_timeout));
                }
            }
        }
    }

    /// Buffer a frame while the server is not yet ready. Overflow is a hard
    /// session failure, never a silent drop.
    fn admit_pending(&mut self, frame: AudioFrame) -> Result<(), SessionError> {
        self.state
            .queue
            .enqueue(frame)
            .map_err(|_| SessionError::QueueOverflow(self.state.queue.capacity()))
    }

    /// Send the start message once the first frame has fixed the sample
    /// rate. No-op until a frame is queued or after start has gone out.
    async fn maybe_send_start(&mut self, sink: &mut dyn TransportSink) -> Result<(), SessionError> {
        if self.state.start_sent {
            return Ok(());
        }
        let rate = match self.state.queue.front() {
            Some(first) => first.sample_rate,
            None => return Ok(()),
        };

        self.state.sample_rate = Some(rate);
        info!(sample_rate = rate, "sending start message");
        self.send_text(sink, control::start_message(&self.config, rate))
            .await?;
        self.state.start_sent = true;
        self.state.ready_deadline = Some(Instant::now() + self.limits.ready_timeout);
        Ok(())
    }

    async fn handle_frame(
        &mut self,
        frame: AudioFrame,
        sink: &mut dyn TransportSink,
    ) -> Result<(), SessionError> {
        match self.state.phase {
            Phase::AwaitingReady => {
                self.admit_pending(frame)?;
                self.maybe_send_start(sink).await
            }
            Phase::Active => {
                if !self.config.silence_detection || frame.peak >= self.config.silence_threshold {
                    self.send_audio(sink, &frame).await
                } else if self.state.audio_sent_since_stop {
                    debug!("speech ended; closing utterance");
                    self.send_text(sink, control::stop_message()).await?;
                    self.state.audio_sent_since_stop = false;
                    Ok(())
                } else {
                    debug!(peak = %frame.peak, "suppressing silent frame");
                    Ok(())
                }
            }
            // Stopping/Closed/Failed never reach here; Connecting frames go
            // through admit_pending directly
            _ => Ok(()),
        }
    }

    async fn handle_inbound(
        &mut self,
        payload: &str,
        sink: &mut dyn TransportSink,
    ) -> Result<(), SessionError> {
        match decode_event(payload) {
            Ok(InboundMessage::Listening) => {
                if self.state.phase == Phase::AwaitingReady {
                    info!(
                        queued = self.state.queue.len(),
                        "server listening; draining pending frames"
                    );
                    self.state.ready_deadline = None;
                    self.state.phase = Phase::Active;
                    for frame in self.state.queue.drain_all() {
                        self.send_audio(sink, &frame).await?;
                    }
                } else {
                    debug!("listening acknowledgment while already active");
                }
                Ok(())
            }
            Ok(InboundMessage::State(state)) => {
                debug!(state = %state, "informational state message");
                Ok(())
            }
            Ok(InboundMessage::Results(event)) => {
                let reopen = !self.config.continuous && event.has_final();
                let _ = self.events.send(SessionEvent::Recognition(event));
                if reopen {
                    // Non-continuous mode: the server stops listening after a
                    // final result; reopen the next utterance on the same
                    // connection before any further frame is admitted
                    let rate = self.state.sample_rate.unwrap_or(self.config.sample_rate);
                    info!("final result in non-continuous mode; re-sending start");
                    self.send_text(sink, control::start_message(&self.config, rate))
                        .await?;
                }
                Ok(())
            }
            Ok(InboundMessage::Error(message)) => Err(SessionError::Server(message)),
            Err(err) => {
                warn!(error = %err, "dropping malformed inbound message");
                let _ = self.events.send(SessionEvent::Error(SessionError::Decode(err)));
                Ok(())
            }
        }
    }

    async fn send_text(
        &mut self,
        sink: &mut dyn TransportSink,
        payload: String,
    ) -> Result<(), SessionError> {
        sink.send_text(payload).await?;
        self.keepalive.record_traffic(Instant::now());
        Ok(())
    }

    async fn send_audio(
        &mut self,
        sink: &mut dyn TransportSink,
        frame: &AudioFrame,
    ) -> Result<(), SessionError> {
        sink.send_binary(frame.to_wire_bytes()).await?;
        self.keepalive.record_traffic(Instant::now());
        self.state.audio_sent_since_stop = true;
        Ok(())
    }

    /// Idempotent cleanup: discard queued frames, close the transport,
    /// report any terminal error, then announce the close. Runs exactly once
    /// per session, at the end of the task.
    async fn finish(&mut self, sink: Option<&mut dyn TransportSink>, error: Option<SessionError>) {
        self.state.reset();
        if let Some(sink) = sink {
            sink.close().await;
        }

        let failed = error.is_some();
        if let Some(err) = error {
            warn!(error = %err, "session failed");
            let _ = self.events.send(SessionEvent::Error(err));
        }
        self.state.phase = if failed { Phase::Failed } else { Phase::Closed };

        let _ = self.events.send(SessionEvent::Closed);
        self.active.store(false, Ordering::SeqCst);
        info!("session closed");
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => std::future::pending().await,
    }
}
