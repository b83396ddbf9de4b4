//! Event sources the engine subscribes to.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::event::VaultEvent;

/// Capacity used by [`channel`] when the caller has no preference.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// A stream of vault events delivered by the host.
#[async_trait]
pub trait EventSource: Send {
    /// Wait for the next event. `None` once the source is closed.
    async fn next_event(&mut self) -> Option<VaultEvent>;
}

/// Event source backed by a tokio channel.
///
/// Hosts that already know when notes change push events through the
/// paired [`mpsc::Sender`].
pub struct ChannelSource {
    rx: mpsc::Receiver<VaultEvent>,
}

impl ChannelSource {
    /// Wrap an existing receiver.
    pub fn new(rx: mpsc::Receiver<VaultEvent>) -> Self {
        Self { rx }
    }
}

#[async_trait]
impl EventSource for ChannelSource {
    async fn next_event(&mut self) -> Option<VaultEvent> {
        self.rx.recv().await
    }
}

/// Create a sender and its [`ChannelSource`].
pub fn channel(capacity: usize) -> (mpsc::Sender<VaultEvent>, ChannelSource) {
    let (tx, rx) = mpsc::channel(capacity);
    (tx, ChannelSource::new(rx))
}
