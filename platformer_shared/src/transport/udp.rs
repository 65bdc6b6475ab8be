//! UDP links.
//!
//! A single socket serves every peer. Dialing an address opens a link to it
//! immediately (there is no handshake). The first datagram from an address
//! we have not seen opens an inbound link before its payload is delivered,
//! but only if it decodes as a state message; anything else from a stranger
//! is dropped without linking.
//! The bound local address doubles as the room id a peer shares.

use std::{
    collections::HashSet,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use anyhow::Context;
use bytes::Bytes;
use tokio::{net::UdpSocket, task::JoinHandle};
use tracing::{debug, info};

use super::{event_channel, Connection, EventRx, EventTx, NetEvent};
use crate::net::decode_from_bytes;

const MAX_DATAGRAM: usize = 64 * 1024;

/// Link to one remote address over the shared socket.
pub struct UdpConnection {
    socket: Arc<UdpSocket>,
    peer: SocketAddr,
    remote: String,
}

impl UdpConnection {
    fn new(socket: Arc<UdpSocket>, peer: SocketAddr) -> Self {
        Self {
            socket,
            peer,
            remote: peer.to_string(),
        }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl Connection for UdpConnection {
    fn remote(&self) -> &str {
        &self.remote
    }

    fn is_open(&self) -> bool {
        true
    }

    fn send(&self, payload: Bytes) -> anyhow::Result<()> {
        self.socket
            .try_send_to(&payload, self.peer)
            .with_context(|| format!("udp send to {}", self.peer))?;
        Ok(())
    }
}

/// Owns the socket and the background receive task.
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    events: EventTx,
    known: Arc<Mutex<HashSet<SocketAddr>>>,
    recv_task: JoinHandle<()>,
}

impl UdpTransport {
    /// Binds the socket and starts receiving. Must be called inside a tokio runtime.
    pub async fn bind(addr: SocketAddr) -> anyhow::Result<(Self, EventRx)> {
        let socket = Arc::new(UdpSocket::bind(addr).await.context("udp bind")?);
        let (events, rx) = event_channel();
        let known = Arc::new(Mutex::new(HashSet::new()));

        let recv_task = tokio::spawn(recv_loop(socket.clone(), events.clone(), known.clone()));

        Ok((
            Self {
                socket,
                events,
                known,
                recv_task,
            },
            rx,
        ))
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Waits until the socket accepts sends.
    ///
    /// Sends never block, so a send issued before the reactor has reported
    /// the socket writable fails with `WouldBlock`.
    pub async fn writable(&self) -> anyhow::Result<()> {
        self.socket.writable().await.context("udp writable")
    }

    /// Opens a link to `peer` and announces it on the event queue.
    pub fn connect(&self, peer: SocketAddr) -> anyhow::Result<()> {
        if !mark_known(&self.known, peer) {
            debug!(%peer, "Already linked");
            return Ok(());
        }
        let conn = UdpConnection::new(self.socket.clone(), peer);
        self.events
            .send(NetEvent::Opened(Box::new(conn)))
            .ok()
            .context("event queue closed")?;
        info!(%peer, "Dialed peer");
        Ok(())
    }
}

impl Drop for UdpTransport {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}

/// Returns true if `peer` was not known before.
fn mark_known(known: &Mutex<HashSet<SocketAddr>>, peer: SocketAddr) -> bool {
    known
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .insert(peer)
}

fn is_known(known: &Mutex<HashSet<SocketAddr>>, peer: SocketAddr) -> bool {
    known
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .contains(&peer)
}

async fn recv_loop(
    socket: Arc<UdpSocket>,
    events: EventTx,
    known: Arc<Mutex<HashSet<SocketAddr>>>,
) {
    let mut buf = vec![0u8; MAX_DATAGRAM];
    loop {
        let (n, from) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                debug!(error = %e, "udp recv failed");
                continue;
            }
        };

        let datagram = &buf[..n];
        if !is_known(&known, from) {
            if let Err(e) = decode_from_bytes(datagram) {
                debug!(peer = %from, error = %e, "Ignoring datagram from unknown address");
                continue;
            }
        }

        if mark_known(&known, from) {
            info!(peer = %from, "Inbound link");
            let conn = UdpConnection::new(socket.clone(), from);
            if events.send(NetEvent::Opened(Box::new(conn))).is_err() {
                break;
            }
        }

        let payload = Bytes::copy_from_slice(datagram);
        if events
            .send(NetEvent::Data {
                from: from.to_string(),
                payload,
            })
            .is_err()
        {
            break;
        }
    }
}
