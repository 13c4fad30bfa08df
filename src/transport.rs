use thiserror::Error;
use tokio::sync::mpsc;

/// Connection parameters passed to [`Transport::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointParams {
    /// Recognition model identifier, encoded into the connection URL or
    /// query string by the transport implementation
    pub model: String,
}

/// Inbound traffic and lifecycle notifications from an open connection.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A text message from the server (control, state, or results payload)
    Message(String),
    /// The connection closed; carries the transport's reason string
    Closed(String),
}

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("failed to open connection: {0}")]
    Connect(String),

    #[error("send failed: {0}")]
    Send(String),

    #[error("connection closed: {0}")]
    Closed(String),
}

/// An open bidirectional connection: an outbound sink plus the channel on
/// which inbound [`TransportEvent`]s arrive.
pub struct TransportLink {
    pub sink: Box<dyn TransportSink>,
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
}

/// Factory side of the transport contract.
///
/// Implementations own the actual socket (WebSocket, in-process pair, ...);
/// the session core is written against this interface only.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Open a connection for the given endpoint parameters.
    async fn open(&self, params: EndpointParams) -> Result<TransportLink, TransportError>;
}

/// Outbound side of an open connection. Sends are asynchronous; transport
/// failures after a send has been accepted surface as a
/// [`TransportEvent::Closed`] on the link's event channel.
#[async_trait::async_trait]
pub trait TransportSink: Send {
    /// Send a text (control) message.
    async fn send_text(&mut self, payload: String) -> Result<(), TransportError>;

    /// Send a binary (audio) frame.
    async fn send_binary(&mut self, bytes: Vec<u8>) -> Result<(), TransportError>;

    /// Close the connection. Must be safe to call more than once.
    async fn close(&mut self);
}
