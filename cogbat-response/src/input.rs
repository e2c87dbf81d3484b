//! Host-facing input publication.
//!
//! The host's event loop publishes every raw input event into an [`InputHub`];
//! collectors subscribe when they arm. Because a broadcast subscription only
//! sees events sent after it was created, events already in flight when a
//! wait begins can never match retroactively.

use tokio::sync::broadcast;
use tokio::time::Instant;

use cogbat_core::ResponseKind;

const HUB_CAPACITY: usize = 64;

/// One input event as the host saw it, timestamped on the same monotonic
/// clock domain as the trial clock.
#[derive(Debug, Clone)]
pub struct RawInput {
    pub kind: ResponseKind,
    /// Key name for keyboard events.
    pub identifier: Option<String>,
    pub timestamp: Instant,
    pub coordinates: Option<(f64, f64)>,
    /// Key auto-repeat; only the initial press counts as a response.
    pub repeat: bool,
}

impl RawInput {
    /// Keyboard press, timestamped now.
    pub fn key(identifier: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::Keyboard,
            identifier: Some(identifier.into()),
            timestamp: Instant::now(),
            coordinates: None,
            repeat: false,
        }
    }

    /// Auto-repeated keyboard press.
    pub fn key_repeat(identifier: impl Into<String>) -> Self {
        Self {
            repeat: true,
            ..Self::key(identifier)
        }
    }

    /// Pointer press, timestamped now.
    pub fn pointer(x: f64, y: f64) -> Self {
        Self {
            kind: ResponseKind::Pointer,
            identifier: None,
            timestamp: Instant::now(),
            coordinates: Some((x, y)),
            repeat: false,
        }
    }

    /// Touch start, timestamped now.
    pub fn touch(x: f64, y: f64) -> Self {
        Self {
            kind: ResponseKind::Touch,
            ..Self::pointer(x, y)
        }
    }
}

/// Broadcast channel of raw input events, shared between the host event loop
/// and any number of collectors.
#[derive(Clone)]
pub struct InputHub {
    tx: broadcast::Sender<RawInput>,
}

impl InputHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(HUB_CAPACITY);
        Self { tx }
    }

    /// Publish one event. A hub with no armed collector simply drops it.
    pub fn publish(&self, event: RawInput) {
        let _ = self.tx.send(event);
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<RawInput> {
        self.tx.subscribe()
    }
}

impl Default for InputHub {
    fn default() -> Self {
        Self::new()
    }
}
