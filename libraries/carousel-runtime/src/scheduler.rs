//! Snippet timers on tokio

use crate::channel::ChannelSink;
use carousel_core::{HostSignal, PlaybackToken, SignalSink, SnippetScheduler};
use std::collections::HashMap;
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::debug;

/// One spawned sleep per armed token
///
/// Must be used from inside a tokio runtime. Dropping the scheduler aborts
/// every outstanding timer.
#[derive(Debug)]
pub struct TokioScheduler {
    sink: ChannelSink,
    timers: HashMap<PlaybackToken, AbortHandle>,
}

impl TokioScheduler {
    /// Create a scheduler reporting expiries to `sink`
    pub fn new(sink: ChannelSink) -> Self {
        Self {
            sink,
            timers: HashMap::new(),
        }
    }

    /// Number of timers that have not fired or been cancelled
    pub fn pending(&self) -> usize {
        self.timers.values().filter(|h| !h.is_finished()).count()
    }
}

impl SnippetScheduler for TokioScheduler {
    fn arm(&mut self, token: PlaybackToken, after: Duration) {
        self.timers.retain(|_, handle| !handle.is_finished());
        self.cancel(token);

        let sink = self.sink.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            sink.deliver(HostSignal::SnippetExpired { token });
        });

        debug!(%token, ?after, "Snippet timer armed");
        self.timers.insert(token, task.abort_handle());
    }

    fn cancel(&mut self, token: PlaybackToken) {
        if let Some(handle) = self.timers.remove(&token) {
            handle.abort();
            debug!(%token, "Snippet timer cancelled");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for handle in self.timers.values() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::channel;

    #[tokio::test(start_paused = true)]
    async fn armed_timer_fires_once() {
        let (sink, mut rx) = channel();
        let mut scheduler = TokioScheduler::new(sink);
        let token = PlaybackToken::new(0, 1);

        scheduler.arm(token, Duration::from_secs(60));
        tokio::time::sleep(Duration::from_millis(59_999)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.try_recv(), Ok(HostSignal::SnippetExpired { token }));
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_stays_silent() {
        let (sink, mut rx) = channel();
        let mut scheduler = TokioScheduler::new(sink);
        let token = PlaybackToken::new(2, 7);

        scheduler.arm(token, Duration::from_secs(1));
        scheduler.cancel(token);
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_replaces_the_deadline() {
        let (sink, mut rx) = channel();
        let mut scheduler = TokioScheduler::new(sink);
        let token = PlaybackToken::new(1, 3);

        scheduler.arm(token, Duration::from_secs(1));
        scheduler.arm(token, Duration::from_secs(10));
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(rx.try_recv(), Ok(HostSignal::SnippetExpired { token }));
    }
}
