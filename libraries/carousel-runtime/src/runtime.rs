//! Carousel runtime
//!
//! Owns a carousel wired to the simulated transport and tokio timers, plus the
//! receiving end of their signal channel. Commands are applied synchronously;
//! deferred results are fed back by `pump` or while `run_for` waits.

use crate::channel::{channel, ChannelSink};
use crate::scheduler::TokioScheduler;
use crate::transport::{SimulatedAudioConfig, SimulatedTransport};
use carousel_core::{Affordances, HostSignal, PlaybackConfig, Result, SlideDeck, SlideView};
use carousel_playback::{AutoPlay, Carousel, CarouselCommand, GestureGate, PlaybackEvent};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Carousel type driven by the runtime
pub type RuntimeCarousel<A, V> = Carousel<SimulatedTransport, A, TokioScheduler, V>;

/// Single-task host for a carousel
pub struct CarouselRuntime<A, V> {
    carousel: RuntimeCarousel<A, V>,
    signals: UnboundedReceiver<HostSignal>,
    sink: ChannelSink,
}

impl<A, V> CarouselRuntime<A, V>
where
    A: Affordances,
    V: SlideView,
{
    /// Build the runtime
    ///
    /// Must be called from inside a tokio runtime.
    pub fn new(
        deck: SlideDeck,
        config: PlaybackConfig,
        audio: SimulatedAudioConfig,
        affordances: A,
        view: V,
    ) -> Result<Self> {
        let (sink, signals) = channel();
        let transport = SimulatedTransport::new(&deck, audio, sink.clone());
        let scheduler = TokioScheduler::new(sink.clone());
        let carousel = Carousel::new(deck, config, transport, affordances, scheduler, view)?;

        Ok(Self {
            carousel,
            signals,
            sink,
        })
    }

    /// Replace the gesture gate
    pub fn with_gate(mut self, gate: GestureGate) -> Self {
        self.carousel = self.carousel.with_gate(gate);
        self
    }

    /// Render the start slide and try its snippet
    pub fn start(&mut self) -> AutoPlay {
        self.carousel.start()
    }

    /// Apply one command
    pub fn dispatch(&mut self, command: CarouselCommand) -> Result<()> {
        self.carousel.apply(command)
    }

    /// Apply every signal that is already queued; returns how many there were
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(signal) = self.signals.try_recv() {
            self.apply_signal(signal);
            applied += 1;
        }
        applied
    }

    /// Wait for the next signal until `deadline` at the latest
    ///
    /// Returns true when a signal was applied, false once the deadline passed.
    pub async fn run_until(&mut self, deadline: Instant) -> bool {
        tokio::select! {
            biased;
            Some(signal) = self.signals.recv() => {
                self.apply_signal(signal);
                true
            }
            _ = tokio::time::sleep_until(deadline) => false,
        }
    }

    /// Let tasks woken at the current instant report, then apply their signals
    pub async fn flush(&mut self) -> usize {
        tokio::task::yield_now().await;
        self.pump()
    }

    /// Let `duration` pass, applying signals as they arrive
    ///
    /// Signals that become due exactly at the deadline are applied as well.
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        let mut applied = 0usize;
        while self.run_until(deadline).await {
            applied += 1;
        }
        applied += self.flush().await;
        debug!(?duration, applied, "Runtime advanced");
    }

    fn apply_signal(&mut self, signal: HostSignal) {
        trace!(?signal, "Applying signal");
        self.carousel.handle_signal(signal);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.carousel.drain_events()
    }

    /// Sink feeding this runtime, for signals injected from outside
    pub fn sink(&self) -> ChannelSink {
        self.sink.clone()
    }

    /// The carousel
    pub fn carousel(&self) -> &RuntimeCarousel<A, V> {
        &self.carousel
    }

    /// The carousel (mutable)
    pub fn carousel_mut(&mut self) -> &mut RuntimeCarousel<A, V> {
        &mut self.carousel
    }

    /// The simulated audio
    pub fn transport(&self) -> &SimulatedTransport {
        self.carousel.coordinator().transport()
    }
}
