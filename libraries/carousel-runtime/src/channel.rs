//! Signal channel between spawned tasks and the carousel owner

use carousel_core::{HostSignal, SignalSink};
use tokio::sync::mpsc;
use tracing::debug;

/// Sending half handed to transports and schedulers
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<HostSignal>,
}

impl SignalSink for ChannelSink {
    fn deliver(&self, signal: HostSignal) {
        // The runtime may already be gone while a timer or play task finishes
        if let Err(e) = self.tx.send(signal) {
            debug!(signal = ?e.0, "Signal receiver dropped");
        }
    }
}

/// Create a signal channel
pub fn channel() -> (ChannelSink, mpsc::UnboundedReceiver<HostSignal>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelSink { tx }, rx)
}
