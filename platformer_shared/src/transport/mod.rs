//! Point-to-point messaging abstraction.
//!
//! The replication channel never creates or tears down links itself. A
//! transport announces a usable link with [`NetEvent::Opened`] (both for
//! links we dialed and links a remote dialed to us) and delivers inbound
//! payloads as [`NetEvent::Data`]. Events are queued on an unbounded channel
//! and drained by the tick, so transports may produce them at any time.
//!
//! Implementations:
//! - [`loopback`]: in-process links for tests and local demos
//! - [`udp`]: one UDP socket, one link per remote address

pub mod loopback;
pub mod udp;

use std::fmt;

use bytes::Bytes;
use tokio::sync::mpsc;

/// An open link to one remote peer.
pub trait Connection: Send {
    /// Opaque identifier of the remote end (transport-specific).
    fn remote(&self) -> &str;

    /// False once the link is known to be closed.
    fn is_open(&self) -> bool;

    /// Best-effort send. Callers are expected to ignore failures.
    fn send(&self, payload: Bytes) -> anyhow::Result<()>;
}

/// Something a transport wants the tick to know about.
pub enum NetEvent {
    Opened(Box<dyn Connection>),
    Data { from: String, payload: Bytes },
}

impl fmt::Debug for NetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetEvent::Opened(conn) => f.debug_tuple("Opened").field(&conn.remote()).finish(),
            NetEvent::Data { from, payload } => f
                .debug_struct("Data")
                .field("from", from)
                .field("len", &payload.len())
                .finish(),
        }
    }
}

pub type EventTx = mpsc::UnboundedSender<NetEvent>;
pub type EventRx = mpsc::UnboundedReceiver<NetEvent>;

/// Creates the event queue a transport feeds and the tick drains.
pub fn event_channel() -> (EventTx, EventRx) {
    mpsc::unbounded_channel()
}
