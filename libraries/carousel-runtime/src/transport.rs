//! Simulated audio transport
//!
//! One in-memory audio resource per narrated slide, following browser media
//! element semantics closely enough to exercise the coordinator:
//! - `begin_playback` resolves after a start latency, or is rejected for
//!   slides configured as blocked
//! - `pause` (or `load`) while a start is pending rejects it with an
//!   `AbortError`
//! - Play/pause/ended notifications are reported as `HostSignal::Media`
//! - A track stops by itself once it reaches its duration
//!
//! Positions follow tokio time, so a paused test clock controls them.

use crate::channel::ChannelSink;
use carousel_core::{
    AudioTransport, HostSignal, MediaEvent, PlaybackToken, SignalSink, SlideDeck,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

const ABORTED: &str = "AbortError: The play() request was interrupted by a call to pause()";
const NOT_ALLOWED: &str = "NotAllowedError: play() failed because the user didn't interact";
const NO_ELEMENT: &str = "NotSupportedError: no audio element for slide";

/// Behaviour of the simulated audio
#[derive(Debug, Clone)]
pub struct SimulatedAudioConfig {
    /// Delay between `begin_playback` and the play result
    pub start_latency: Duration,
    /// Track length for slides without an explicit duration
    pub default_duration: Duration,
    /// Per-slide track lengths
    pub durations: HashMap<usize, Duration>,
    /// Slides whose playback the platform refuses
    pub rejected: HashSet<usize>,
}

impl Default for SimulatedAudioConfig {
    fn default() -> Self {
        Self {
            start_latency: Duration::from_millis(50),
            default_duration: Duration::from_secs(180),
            durations: HashMap::new(),
            rejected: HashSet::new(),
        }
    }
}

impl SimulatedAudioConfig {
    /// Set the start latency
    pub fn with_start_latency(mut self, latency: Duration) -> Self {
        self.start_latency = latency;
        self
    }

    /// Set the track length of one slide
    pub fn with_duration(mut self, slide: usize, duration: Duration) -> Self {
        self.durations.insert(slide, duration);
        self
    }

    /// Make the platform refuse playback for `slide`
    pub fn reject(mut self, slide: usize) -> Self {
        self.rejected.insert(slide);
        self
    }

    fn duration_of(&self, slide: usize) -> Duration {
        self.durations
            .get(&slide)
            .copied()
            .unwrap_or(self.default_duration)
    }
}

#[derive(Debug)]
struct SimAudio {
    bound: Option<String>,
    duration: Duration,
    paused: bool,
    ended: bool,
    /// Position at the last pause/seek
    offset: Duration,
    /// When audible playback (re)started
    resumed_at: Option<Instant>,
    /// Bumped by every call that invalidates in-flight tasks
    claim: u64,
    loads: u32,
}

impl SimAudio {
    fn new(duration: Duration) -> Self {
        Self {
            bound: None,
            duration,
            paused: true,
            ended: false,
            offset: Duration::ZERO,
            resumed_at: None,
            claim: 0,
            loads: 0,
        }
    }

    fn position(&self, now: Instant) -> Duration {
        let running = self
            .resumed_at
            .map(|at| now.saturating_duration_since(at))
            .unwrap_or_default();
        (self.offset + running).min(self.duration)
    }

    fn is_audible(&self) -> bool {
        self.resumed_at.is_some()
    }

    /// Freeze the position; returns true when audio was playing or starting
    fn halt(&mut self, now: Instant) -> bool {
        let was_running = !self.paused;
        self.offset = self.position(now);
        self.resumed_at = None;
        self.paused = true;
        self.claim += 1;
        was_running
    }
}

type Shared = Arc<Mutex<Vec<Option<SimAudio>>>>;

fn lock(audio: &Shared) -> MutexGuard<'_, Vec<Option<SimAudio>>> {
    audio.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory transport driven by tokio time
///
/// Must be used from inside a tokio runtime. Slides without audio in the deck
/// get no resource: calls on them are no-ops and playback requests are
/// rejected.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    audio: Shared,
    config: Arc<SimulatedAudioConfig>,
    sink: ChannelSink,
}

impl SimulatedTransport {
    /// Create resources for every narrated slide of `deck`
    pub fn new(deck: &SlideDeck, config: SimulatedAudioConfig, sink: ChannelSink) -> Self {
        let audio = deck
            .iter()
            .map(|slide| {
                slide
                    .audio_source()
                    .map(|_| SimAudio::new(config.duration_of(slide.index)))
            })
            .collect();

        Self {
            audio: Arc::new(Mutex::new(audio)),
            config: Arc::new(config),
            sink,
        }
    }

    /// Slides currently producing sound
    pub fn audible(&self) -> Vec<usize> {
        lock(&self.audio)
            .iter()
            .enumerate()
            .filter(|(_, audio)| audio.as_ref().is_some_and(SimAudio::is_audible))
            .map(|(slide, _)| slide)
            .collect()
    }

    /// Playback position of a slide's audio
    pub fn position(&self, slide: usize) -> Option<Duration> {
        let now = Instant::now();
        lock(&self.audio)
            .get(slide)
            .and_then(Option::as_ref)
            .map(|audio| audio.position(now))
    }

    /// How often the slide's resource was (re)loaded
    pub fn loads(&self, slide: usize) -> u32 {
        lock(&self.audio)
            .get(slide)
            .and_then(Option::as_ref)
            .map_or(0, |audio| audio.loads)
    }

    fn with_audio<R>(&self, slide: usize, f: impl FnOnce(&mut SimAudio) -> R) -> Option<R> {
        lock(&self.audio)
            .get_mut(slide)
            .and_then(Option::as_mut)
            .map(f)
    }

    fn media(&self, slide: usize, event: MediaEvent) {
        self.sink.deliver(HostSignal::Media { slide, event });
    }

    /// Stop the track when it reaches its end, unless something intervened
    fn schedule_end(&self, slide: usize, claim: u64, remaining: Duration) {
        let audio = Arc::clone(&self.audio);
        let sink = self.sink.clone();

        tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            let now = Instant::now();
            {
                let mut guard = lock(&audio);
                let Some(track) = guard.get_mut(slide).and_then(Option::as_mut) else {
                    return;
                };
                if track.claim != claim {
                    return;
                }
                track.halt(now);
                track.offset = track.duration;
                track.ended = true;
            }
            debug!(slide, "Simulated track ended");
            sink.deliver(HostSignal::Media {
                slide,
                event: MediaEvent::Ended,
            });
        });
    }

    /// Resolve one `begin_playback` call after the start latency
    fn settle_later(&self, token: PlaybackToken, claim: u64) {
        let transport = self.clone();
        let latency = self.config.start_latency;
        let rejected = self.config.rejected.contains(&token.slide);

        tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            let slide = token.slide;
            let now = Instant::now();

            let outcome = transport
                .with_audio(slide, |audio| {
                    if audio.claim != claim {
                        // Paused or reloaded in the meantime; a newer start keeps going
                        return if audio.paused { Err(ABORTED) } else { Ok(None) };
                    }
                    if rejected {
                        audio.halt(now);
                        return Err(NOT_ALLOWED);
                    }
                    audio.resumed_at = Some(now);
                    Ok(Some(audio.duration.saturating_sub(audio.offset)))
                })
                .unwrap_or(Err(NO_ELEMENT));

            let outcome = match outcome {
                Ok(Some(remaining)) => {
                    transport.media(slide, MediaEvent::Play);
                    transport.schedule_end(slide, claim, remaining);
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(reason) => Err(reason.to_string()),
            };

            trace!(%token, ?outcome, "Simulated play settled");
            transport
                .sink
                .deliver(HostSignal::PlaySettled { token, outcome });
        });
    }
}

impl AudioTransport for SimulatedTransport {
    fn bound_source(&self, slide: usize) -> Option<String> {
        lock(&self.audio)
            .get(slide)
            .and_then(Option::as_ref)
            .and_then(|audio| audio.bound.clone())
    }

    fn bind_source(&mut self, slide: usize, src: &str) {
        self.with_audio(slide, |audio| audio.bound = Some(src.to_string()));
    }

    fn load(&mut self, slide: usize) {
        let now = Instant::now();
        self.with_audio(slide, |audio| {
            audio.halt(now);
            audio.offset = Duration::ZERO;
            audio.ended = false;
            audio.loads += 1;
        });
    }

    fn begin_playback(&mut self, slide: usize, token: PlaybackToken) {
        let claim = self.with_audio(slide, |audio| {
            if audio.ended {
                audio.offset = Duration::ZERO;
                audio.ended = false;
            }
            audio.paused = false;
            audio.claim += 1;
            audio.claim
        });

        match claim {
            Some(claim) => self.settle_later(token, claim),
            None => self.sink.deliver(HostSignal::PlaySettled {
                token,
                outcome: Err(NO_ELEMENT.to_string()),
            }),
        }
    }

    fn pause(&mut self, slide: usize) {
        let now = Instant::now();
        if self.with_audio(slide, |audio| audio.halt(now)) == Some(true) {
            self.media(slide, MediaEvent::Pause);
        }
    }

    fn rewind(&mut self, slide: usize) {
        let now = Instant::now();
        let restart = self.with_audio(slide, |audio| {
            audio.offset = Duration::ZERO;
            audio.ended = false;
            if !audio.is_audible() {
                return None;
            }
            audio.resumed_at = Some(now);
            audio.claim += 1;
            Some((audio.claim, audio.duration))
        });

        if let Some((claim, duration)) = restart.flatten() {
            self.schedule_end(slide, claim, duration);
        }
    }

    fn is_paused(&self, slide: usize) -> bool {
        !lock(&self.audio)
            .get(slide)
            .and_then(Option::as_ref)
            .is_some_and(|audio| !audio.paused)
    }

    fn is_ended(&self, slide: usize) -> bool {
        lock(&self.audio)
            .get(slide)
            .and_then(Option::as_ref)
            .is_some_and(|audio| audio.ended)
    }

    fn prime(&mut self, slide: usize, src: &str) {
        self.with_audio(slide, |audio| {
            if audio.bound.is_none() {
                audio.bound = Some(src.to_string());
            }
        });
        debug!(slide, "Simulated audio primed");
    }
}
