//! Script replay against the native runtime

use crate::config::SimConfig;
use crate::error::Result;
use crate::script::{Script, Step};
use crate::view::{TracingButtons, TracingView};
use carousel_playback::{CarouselCommand, PlaybackEvent};
use carousel_runtime::CarouselRuntime;
use serde::Serialize;
use std::fmt;
use tokio::time::Instant;
use tracing::{info, warn};

/// Runtime type used by the simulator
pub type SimRuntime = CarouselRuntime<TracingButtons, TracingView>;

/// A playback event with its virtual timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedEvent {
    /// Milliseconds since the session started
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: PlaybackEvent,
}

impl fmt::Display for TimedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.at_ms as f64 / 1000.0;
        write!(f, "[{:>9.3}s] ", seconds)?;
        match &self.event {
            PlaybackEvent::SlideChanged { from, to } => match from {
                Some(from) => write!(f, "slide {} -> {}", from, to),
                None => write!(f, "slide {}", to),
            },
            PlaybackEvent::PlaybackStarted { slide, mode } => {
                write!(f, "playing slide {} ({})", slide, mode)
            }
            PlaybackEvent::PlaybackStopped { slide, reason } => {
                write!(f, "stopped slide {} ({:?})", slide, reason)
            }
            PlaybackEvent::PlaybackRejected {
                slide,
                mode,
                message,
            } => write!(f, "rejected slide {} ({}): {}", slide, mode, message),
            PlaybackEvent::StaleResolution { slide } => {
                write!(f, "discarded late result for slide {}", slide)
            }
            PlaybackEvent::AudioUnlocked => write!(f, "audio unlocked"),
            PlaybackEvent::MenuToggled { open } => {
                write!(f, "menu {}", if *open { "open" } else { "closed" })
            }
            PlaybackEvent::DiameterChanged { diameter } => {
                write!(f, "diameter {:.1}px", diameter)
            }
        }
    }
}

/// Outcome of a replayed session
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Every event, in order
    pub events: Vec<TimedEvent>,
    /// Slide shown at the end
    pub active: usize,
    /// Slides still audible at the end
    pub audible: Vec<usize>,
    /// Virtual session length
    pub elapsed_ms: u64,
}

/// Build a runtime for `config`
///
/// Must be called from inside a tokio runtime.
pub fn build(config: &SimConfig) -> Result<SimRuntime> {
    let deck = config.deck()?;
    let buttons = TracingButtons::new(deck.len());
    let runtime = CarouselRuntime::new(
        deck,
        config.playback.clone(),
        config.audio_config(),
        buttons,
        TracingView::default(),
    )?
    .with_gate(config.gate());
    Ok(runtime)
}

/// Replay `script` and collect what happened
///
/// Commands that fail recoverably (bad index, silent slide) are logged and
/// skipped; anything else aborts the session.
pub async fn simulate(config: &SimConfig, script: &Script) -> Result<Report> {
    let mut runtime = build(config)?;
    let started = Instant::now();
    let mut events = Vec::new();

    if let Some(viewport) = config.viewport {
        runtime.dispatch(CarouselCommand::Resize {
            width: viewport.width,
            height: viewport.height,
        })?;
    }
    runtime.start();
    collect(&mut runtime, started, &mut events);

    for (line, step) in script.numbered() {
        match *step {
            Step::Command(command) => {
                if let Err(e) = runtime.dispatch(command) {
                    if !e.is_recoverable() {
                        return Err(e.into());
                    }
                    warn!(line, %command, error = %e, "Command had no effect");
                }
            }
            Step::Wait(duration) => {
                let deadline = Instant::now() + duration;
                while runtime.run_until(deadline).await {
                    collect(&mut runtime, started, &mut events);
                }
                runtime.flush().await;
            }
        }
        collect(&mut runtime, started, &mut events);
    }

    let report = Report {
        events,
        active: runtime.carousel().active(),
        audible: runtime.transport().audible(),
        elapsed_ms: elapsed_ms(started),
    };
    info!(
        steps = script.len(),
        events = report.events.len(),
        elapsed_ms = report.elapsed_ms,
        "Session finished"
    );
    Ok(report)
}

fn collect(runtime: &mut SimRuntime, started: Instant, events: &mut Vec<TimedEvent>) {
    let at_ms = elapsed_ms(started);
    events.extend(
        runtime
            .drain_events()
            .into_iter()
            .map(|event| TimedEvent { at_ms, event }),
    );
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
