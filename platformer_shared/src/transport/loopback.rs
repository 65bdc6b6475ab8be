//! In-process links.
//!
//! [`link`] wires two event queues together and announces the link on both
//! sides, the same way a real transport reports an opened connection.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::bail;
use bytes::Bytes;

use super::{Connection, EventTx, NetEvent};

/// One side of an in-process link.
pub struct LoopbackConnection {
    local: String,
    remote: String,
    remote_events: EventTx,
    open: Arc<AtomicBool>,
}

impl Connection for LoopbackConnection {
    fn remote(&self) -> &str {
        &self.remote
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Relaxed) && !self.remote_events.is_closed()
    }

    fn send(&self, payload: Bytes) -> anyhow::Result<()> {
        if !self.open.load(Ordering::Relaxed) {
            bail!("link to {} is closed", self.remote);
        }
        if self
            .remote_events
            .send(NetEvent::Data {
                from: self.local.clone(),
                payload,
            })
            .is_err()
        {
            bail!("{} is no longer receiving", self.remote);
        }
        Ok(())
    }
}

/// Handle that can sever a link from outside either peer.
#[derive(Debug, Clone)]
pub struct LinkHandle {
    open: Arc<AtomicBool>,
}

impl LinkHandle {
    pub fn close(&self) {
        self.open.store(false, Ordering::Relaxed);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Relaxed)
    }
}

/// Links `a` and `b`, pushing an `Opened` event into each queue.
///
/// Names are what each side reports as the remote and stamps on delivered
/// data. Returns `None` if either queue is already gone.
pub fn link(a: &str, a_events: &EventTx, b: &str, b_events: &EventTx) -> Option<LinkHandle> {
    let open = Arc::new(AtomicBool::new(true));
    let a_side = LoopbackConnection {
        local: a.to_string(),
        remote: b.to_string(),
        remote_events: b_events.clone(),
        open: open.clone(),
    };
    let b_side = LoopbackConnection {
        local: b.to_string(),
        remote: a.to_string(),
        remote_events: a_events.clone(),
        open: open.clone(),
    };
    a_events.send(NetEvent::Opened(Box::new(a_side))).ok()?;
    b_events.send(NetEvent::Opened(Box::new(b_side))).ok()?;
    Some(LinkHandle { open })
}
