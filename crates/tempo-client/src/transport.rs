//! The outbound command seam.
//!
//! The session core never talks to a socket. It hands every outbound
//! [`ClientCommand`] to a [`Transport`], fire-and-forget; delivery,
//! framing, and reconnection live behind the trait. Inbound traffic
//! flows the other way, as [`tempo_core::events::ServerEvent`] values
//! fed into [`crate::SessionClient::handle_event`].

use tempo_core::events::ClientCommand;
use tokio::sync::mpsc;
use tracing::debug;

/// Outbound side of the wire.
///
/// `send` must not block: implementations queue or drop. There is no
/// delivery acknowledgement at this layer; confirmation comes back as
/// server events (e.g. the `opponent-move` echo of a submitted move).
pub trait Transport {
    /// Queue a command toward the authoritative peer.
    fn send(&self, command: ClientCommand);
}

/// A [`Transport`] backed by an unbounded channel.
///
/// The receiving half is drained by whatever owns the actual connection
/// (a websocket writer task, typically). If the receiver is gone the
/// command is dropped; the session core stays usable offline.
#[derive(Clone, Debug)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<ClientCommand>,
}

impl ChannelTransport {
    /// A transport plus the receiver its commands arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ClientCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Transport for ChannelTransport {
    fn send(&self, command: ClientCommand) {
        if self.tx.send(command).is_err() {
            debug!("dropping outbound command, connection writer is gone");
        }
    }
}
