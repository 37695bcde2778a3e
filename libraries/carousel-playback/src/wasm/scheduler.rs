//! `setTimeout`-backed snippet timers

use carousel_core::{HostSignal, PlaybackToken, SignalSink, SnippetScheduler};
use gloo_timers::future::TimeoutFuture;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen_futures::spawn_local;

/// Timers run as local futures; cancelling flips a flag the future checks
/// when it wakes up.
pub(crate) struct TimeoutScheduler {
    sink: Rc<dyn SignalSink>,
    timers: HashMap<PlaybackToken, Rc<Cell<bool>>>,
}

impl TimeoutScheduler {
    pub(crate) fn new(sink: Rc<dyn SignalSink>) -> Self {
        Self {
            sink,
            timers: HashMap::new(),
        }
    }
}

impl SnippetScheduler for TimeoutScheduler {
    fn arm(&mut self, token: PlaybackToken, after: Duration) {
        let cancelled = Rc::new(Cell::new(false));
        if let Some(previous) = self.timers.insert(token, Rc::clone(&cancelled)) {
            previous.set(true);
        }

        let sink = Rc::clone(&self.sink);
        let millis = u32::try_from(after.as_millis()).unwrap_or(u32::MAX);
        spawn_local(async move {
            TimeoutFuture::new(millis).await;
            if !cancelled.get() {
                sink.deliver(HostSignal::SnippetExpired { token });
            }
        });
    }

    fn cancel(&mut self, token: PlaybackToken) {
        if let Some(cancelled) = self.timers.remove(&token) {
            cancelled.set(true);
        }
    }
}
