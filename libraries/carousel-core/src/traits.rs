//! Capabilities the playback coordinator calls into
//!
//! Each host (browser DOM, native runtime, tests) provides its own
//! implementations. Every method is synchronous; anything the platform
//! finishes later comes back through a `SignalSink` as a `HostSignal`.

use crate::types::{HostSignal, PlaybackToken};
use std::time::Duration;

/// Audio transport: one audio resource per slide
///
/// Slides without an audio element must be tolerated by every method
/// (calls become no-ops, state queries report paused).
pub trait AudioTransport {
    /// Address currently bound to the slide's audio resource, if any
    fn bound_source(&self, slide: usize) -> Option<String>;

    /// Bind a source address to the slide's audio resource
    fn bind_source(&mut self, slide: usize, src: &str);

    /// Ask the platform to (re)load the bound resource
    fn load(&mut self, slide: usize);

    /// Begin playback of the bound resource
    ///
    /// Returns immediately. The platform must later deliver exactly one
    /// `HostSignal::PlaySettled { token, .. }` for this call.
    fn begin_playback(&mut self, slide: usize, token: PlaybackToken);

    /// Pause playback (position is kept)
    fn pause(&mut self, slide: usize);

    /// Seek to time zero
    fn rewind(&mut self, slide: usize);

    /// Platform-reported paused flag
    fn is_paused(&self, slide: usize) -> bool;

    /// Platform-reported ended flag
    fn is_ended(&self, slide: usize) -> bool;

    /// Unlock handshake: play and immediately pause the resource
    ///
    /// Called once, right after the first user gesture. Failures are ignored.
    fn prime(&mut self, slide: usize, src: &str) {
        let _ = (slide, src);
    }
}

/// Per-slide play/pause indicators
pub trait Affordances {
    /// Show the slide's control as playing or not playing
    fn set_playing(&mut self, slide: usize, playing: bool);

    /// Show every control as not playing
    fn reset_all(&mut self);
}

/// Cancellable one-shot timers for snippet expiry
///
/// `arm` must eventually deliver `HostSignal::SnippetExpired { token }` unless
/// `cancel(token)` is called first. Delivering after a cancel is tolerated;
/// the coordinator ignores expiries for tokens it no longer has armed.
pub trait SnippetScheduler {
    /// Schedule expiry for `token` after `after`
    fn arm(&mut self, token: PlaybackToken, after: Duration);

    /// Cancel the timer armed for `token` (no-op if none)
    fn cancel(&mut self, token: PlaybackToken);
}

/// Visual state of the carousel outside the play/pause controls
pub trait SlideView {
    /// Move the active marker from `previous` (if any) to `next`
    fn activate(&mut self, previous: Option<usize>, next: usize);

    /// Show or hide the previous/next controls
    fn set_nav_visibility(&mut self, show_previous: bool, show_next: bool);

    /// Open or close the overlay menu
    fn set_menu_open(&mut self, open: bool);

    /// Publish the slider diagonal in pixels
    fn set_diameter(&mut self, diameter: f64);
}

/// Where transports and schedulers report deferred results
pub trait SignalSink {
    /// Hand a signal back to the coordinator
    fn deliver(&self, signal: HostSignal);
}

impl<T: SignalSink + ?Sized> SignalSink for std::rc::Rc<T> {
    fn deliver(&self, signal: HostSignal) {
        (**self).deliver(signal);
    }
}

impl<T: SignalSink + ?Sized> SignalSink for std::sync::Arc<T> {
    fn deliver(&self, signal: HostSignal) {
        (**self).deliver(signal);
    }
}

impl SignalSink for std::cell::RefCell<Vec<HostSignal>> {
    fn deliver(&self, signal: HostSignal) {
        self.borrow_mut().push(signal);
    }
}
