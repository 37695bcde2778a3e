//! Playback coordinator - core orchestration
//!
//! Owns the single "now playing" handle, the user-controlled flag and the
//! snippet timer. Navigation-triggered (snippet) playback and explicit
//! play/pause (user) playback go through here so that at most one audio
//! resource is ever current.
//!
//! Starting playback and the snippet timer are both suspend points: the
//! platform reports back later with a `HostSignal`. Every such signal carries
//! the `PlaybackToken` it was issued for and is only applied while that token
//! is still current.

use crate::events::{PlaybackEvent, StopReason};
use crate::gate::GestureGate;
use crate::sync;
use carousel_core::{
    Affordances, AudioTransport, CarouselError, HostSignal, MediaEvent, PlayOutcome,
    PlaybackConfig, PlaybackMode, PlaybackToken, Result, SlideDeck, SnippetScheduler,
};
use tracing::{debug, info, warn};

/// The handle currently owned by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NowPlaying {
    /// Request identity
    pub token: PlaybackToken,

    /// Snippet or user playback
    pub mode: PlaybackMode,

    /// Whether the platform confirmed the start
    pub started: bool,
}

/// Shared playback state
///
/// Read-only outside the coordinator; every mutation goes through
/// `PlaybackCoordinator` methods so the invariants below always hold:
/// - at most one handle is current
/// - no timer is armed while `user_controlled` is set
/// - no timer is armed without a current handle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    current: Option<NowPlaying>,
    user_controlled: bool,
    armed_timer: Option<PlaybackToken>,
}

impl PlaybackState {
    /// Current handle, if any
    pub fn current(&self) -> Option<NowPlaying> {
        self.current
    }

    /// Whether an explicit play/pause happened since the last navigation
    pub fn is_user_controlled(&self) -> bool {
        self.user_controlled
    }

    /// Token the snippet timer is armed for, if any
    pub fn armed_timer(&self) -> Option<PlaybackToken> {
        self.armed_timer
    }
}

/// Observable playback phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Nothing is current
    Idle,

    /// Play requested, platform has not answered yet
    Starting(PlaybackMode),

    /// Snippet playing with the expiry timer armed
    AutoPlaying,

    /// Full playback, no timer
    UserPlaying,

    /// Current handle reported paused or ended by the platform
    Paused,
}

/// Result of an automatic playback attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoPlay {
    /// Playback requested for this token
    Started(PlaybackToken),

    /// Suppressed: a manual session is in progress
    UserControlled,

    /// Suppressed: no user gesture yet
    Locked,

    /// Suppressed: active slide has no narration
    NoAudio,
}

/// Result of a play/pause toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The slide was playing and is now paused
    Paused(usize),

    /// Full playback requested for this token
    Started(PlaybackToken),
}

/// Slide/audio playback coordinator
pub struct PlaybackCoordinator<T, A, S> {
    config: PlaybackConfig,
    transport: T,
    affordances: A,
    scheduler: S,
    gate: GestureGate,
    state: PlaybackState,
    next_generation: u64,
    pending_events: Vec<PlaybackEvent>,
}

impl<T, A, S> PlaybackCoordinator<T, A, S>
where
    T: AudioTransport,
    A: Affordances,
    S: SnippetScheduler,
{
    /// Create a coordinator with a locked gesture gate
    pub fn new(config: PlaybackConfig, transport: T, affordances: A, scheduler: S) -> Self {
        Self {
            config,
            transport,
            affordances,
            scheduler,
            gate: GestureGate::new(),
            state: PlaybackState::default(),
            next_generation: 0,
            pending_events: Vec::new(),
        }
    }

    /// Replace the gesture gate (e.g. `GestureGate::unlocked()` for kiosks)
    pub fn with_gate(mut self, gate: GestureGate) -> Self {
        self.gate = gate;
        self
    }

    // ===== Gesture Gate =====

    /// Record a user gesture
    ///
    /// Returns true for the first gesture only. That first gesture primes the
    /// first narrated slide when `prime_on_unlock` is set.
    pub fn unlock(&mut self, deck: &SlideDeck) -> bool {
        if !self.gate.unlock() {
            return false;
        }

        info!("Audio unlocked by user gesture");
        self.emit(PlaybackEvent::AudioUnlocked);

        if self.config.prime_on_unlock {
            if let Some(slide) = deck.slides_with_audio().next() {
                if let Some(src) = slide.audio_source() {
                    debug!(slide = slide.index, "Priming audio");
                    self.transport.prime(slide.index, src);
                }
            }
        }

        true
    }

    /// Whether automatic playback is allowed
    pub fn is_unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    // ===== Automatic Playback =====

    /// Clear the manual-session flag (every navigation does this)
    pub fn reset_user_control(&mut self) {
        self.state.user_controlled = false;
    }

    /// Navigation hook: clear manual control, then auto-play the active slide
    pub fn on_navigation(&mut self, deck: &SlideDeck, active: usize) -> AutoPlay {
        self.reset_user_control();
        self.play_active_snippet(deck, active)
    }

    /// Play the snippet for the active slide
    ///
    /// Suppressed while user-controlled. Otherwise whatever is playing is
    /// stopped first, even when the new slide turns out to have no audio.
    pub fn play_active_snippet(&mut self, deck: &SlideDeck, active: usize) -> AutoPlay {
        if self.state.user_controlled {
            debug!(slide = active, "Auto-play suppressed: user controlled");
            return AutoPlay::UserControlled;
        }

        self.stop_with(StopReason::Superseded);

        if !self.gate.is_unlocked() {
            debug!(slide = active, "Auto-play suppressed: audio locked");
            return AutoPlay::Locked;
        }

        let Some(src) = deck.audio_source(active) else {
            debug!(slide = active, "No audio source for slide");
            return AutoPlay::NoAudio;
        };

        self.transport.bind_source(active, src);
        self.transport.rewind(active);
        self.transport.load(active);

        AutoPlay::Started(self.begin(active, PlaybackMode::Snippet))
    }

    // ===== User Playback =====

    /// Explicit play/pause for `slide`
    ///
    /// Always enters user-controlled mode first (cancelling any snippet
    /// timer). Pausing ends the manual session again.
    ///
    /// # Errors
    /// `InvalidIndex` for an unknown slide, `MissingResource` when it has no
    /// audio. Neither changes playback.
    pub fn toggle_user_playback(&mut self, deck: &SlideDeck, slide: usize) -> Result<Toggle> {
        self.state.user_controlled = true;
        self.disarm_timer();

        let src = deck
            .slide(slide)?
            .audio_source()
            .ok_or(CarouselError::MissingResource { slide })?;

        let bound = self
            .transport
            .bound_source(slide)
            .is_some_and(|current| current.contains(src));
        if !bound {
            self.transport.bind_source(slide, src);
            self.transport.load(slide);
        }

        if self.is_playing(slide) {
            self.transport.pause(slide);
            self.state.current = None;
            self.state.user_controlled = false;
            sync::project(&mut self.affordances, slide, false);
            info!(slide, "Playback paused by user");
            self.emit(PlaybackEvent::PlaybackStopped {
                slide,
                reason: StopReason::UserPaused,
            });
            return Ok(Toggle::Paused(slide));
        }

        if let Some(previous) = self.state.current.take() {
            let other = previous.token.slide;
            if other != slide {
                self.transport.pause(other);
                self.transport.rewind(other);
                sync::project(&mut self.affordances, other, false);
                self.emit(PlaybackEvent::PlaybackStopped {
                    slide: other,
                    reason: StopReason::Superseded,
                });
            }
        }

        self.transport.rewind(slide);
        Ok(Toggle::Started(self.begin(slide, PlaybackMode::User)))
    }

    /// Whether `slide` is current and audible
    pub fn is_playing(&self, slide: usize) -> bool {
        self.state
            .current
            .is_some_and(|np| np.token.slide == slide)
            && sync::is_audible(&self.transport, slide)
    }

    // ===== Stopping =====

    /// Stop everything
    ///
    /// Pauses and rewinds the current handle, cancels the timer and resets
    /// every play/pause control. Idempotent.
    pub fn stop_all(&mut self) {
        self.stop_with(StopReason::StopAll);
    }

    fn stop_with(&mut self, reason: StopReason) {
        if let Some(np) = self.state.current.take() {
            let slide = np.token.slide;
            self.transport.pause(slide);
            self.transport.rewind(slide);
            debug!(slide, ?reason, "Stopped current audio");
            self.emit(PlaybackEvent::PlaybackStopped { slide, reason });
        }
        self.disarm_timer();
        self.affordances.reset_all();
    }

    // ===== Host Signals =====

    /// Apply a deferred result from the platform
    pub fn handle_signal(&mut self, signal: HostSignal) {
        match signal {
            HostSignal::PlaySettled { token, outcome } => self.on_play_settled(token, outcome),
            HostSignal::SnippetExpired { token } => self.on_snippet_expired(token),
            HostSignal::Media { slide, event } => self.on_media_event(slide, event),
        }
    }

    fn on_play_settled(&mut self, token: PlaybackToken, outcome: PlayOutcome) {
        let Some(np) = self.state.current.filter(|np| np.token == token) else {
            let error = CarouselError::StaleResolution { slide: token.slide };
            debug!(%token, %error, "Discarding playback result");
            self.emit(PlaybackEvent::StaleResolution { slide: token.slide });
            return;
        };

        let slide = token.slide;
        match outcome {
            Ok(()) => {
                self.state.current = Some(NowPlaying {
                    started: true,
                    ..np
                });
                sync::project(&mut self.affordances, slide, true);
                info!(slide, mode = %np.mode, "Audio playing");
                self.emit(PlaybackEvent::PlaybackStarted {
                    slide,
                    mode: np.mode,
                });

                self.disarm_timer();
                if np.mode == PlaybackMode::Snippet && !self.state.user_controlled {
                    self.scheduler.arm(token, self.config.snippet_duration());
                    self.state.armed_timer = Some(token);
                }
            }
            Err(reason) => {
                let error = CarouselError::PlaybackRejected {
                    slide,
                    reason: reason.clone(),
                };
                warn!(mode = %np.mode, %error, "Audio play failed");
                self.transport.pause(slide);
                self.state.current = None;
                self.disarm_timer();
                if np.mode == PlaybackMode::User {
                    self.state.user_controlled = false;
                }
                sync::project(&mut self.affordances, slide, false);
                self.emit(PlaybackEvent::PlaybackRejected {
                    slide,
                    mode: np.mode,
                    message: reason,
                });
            }
        }
    }

    fn on_snippet_expired(&mut self, token: PlaybackToken) {
        if self.state.armed_timer != Some(token) {
            debug!(%token, "Ignoring cancelled snippet timer");
            return;
        }
        self.state.armed_timer = None;
        self.scheduler.cancel(token);

        match self.state.current {
            Some(np) if np.token == token && !self.state.user_controlled => {
                let slide = token.slide;
                self.transport.pause(slide);
                self.transport.rewind(slide);
                self.state.current = None;
                sync::project(&mut self.affordances, slide, false);
                info!(slide, "Snippet finished");
                self.emit(PlaybackEvent::PlaybackStopped {
                    slide,
                    reason: StopReason::SnippetExpired,
                });
            }
            _ => debug!(%token, "Snippet timer outlived its handle"),
        }
    }

    fn on_media_event(&mut self, slide: usize, event: MediaEvent) {
        debug!(slide, ?event, "Media notification");
        sync::project(&mut self.affordances, slide, event.is_playing());
    }

    // ===== Internals =====

    fn begin(&mut self, slide: usize, mode: PlaybackMode) -> PlaybackToken {
        self.next_generation += 1;
        let token = PlaybackToken::new(slide, self.next_generation);
        self.state.current = Some(NowPlaying {
            token,
            mode,
            started: false,
        });
        debug!(%token, %mode, "Requesting playback");
        self.transport.begin_playback(slide, token);
        token
    }

    fn disarm_timer(&mut self) {
        if let Some(token) = self.state.armed_timer.take() {
            self.scheduler.cancel(token);
        }
    }

    pub(crate) fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }

    // ===== State Queries =====

    /// Playback state snapshot
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Token of the current handle
    pub fn current_token(&self) -> Option<PlaybackToken> {
        self.state.current.map(|np| np.token)
    }

    /// Whether a manual session is in progress
    pub fn is_user_controlled(&self) -> bool {
        self.state.user_controlled
    }

    /// Token the snippet timer is armed for
    pub fn armed_timer(&self) -> Option<PlaybackToken> {
        self.state.armed_timer
    }

    /// Current phase, with paused/ended taken from the transport
    pub fn phase(&self) -> PlaybackPhase {
        match self.state.current {
            None => PlaybackPhase::Idle,
            Some(np) if !np.started => PlaybackPhase::Starting(np.mode),
            Some(np) if !sync::is_audible(&self.transport, np.token.slide) => PlaybackPhase::Paused,
            Some(np) => match np.mode {
                PlaybackMode::Snippet => PlaybackPhase::AutoPlaying,
                PlaybackMode::User => PlaybackPhase::UserPlaying,
            },
        }
    }

    /// Coordinator configuration
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    /// Audio transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Audio transport (mutable)
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Play/pause controls
    pub fn affordances(&self) -> &A {
        &self.affordances
    }

    /// Snippet scheduler
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}
