//! Carousel Runtime
//!
//! Native host for the Carousel playback coordinator, built on tokio.
//!
//! # Architecture
//!
//! - **`ChannelSink`**: deferred results (`HostSignal`s) travel over an
//!   unbounded mpsc channel back to the task that owns the carousel
//! - **`TokioScheduler`**: snippet timers as spawned sleeps, cancelled through
//!   their `AbortHandle`
//! - **`SimulatedTransport`**: in-memory audio with start latency, track
//!   lengths and rejected slides, driven by tokio time
//! - **`CarouselRuntime`**: owns the carousel and the signal receiver; applies
//!   commands and feeds signals back in
//!
//! Everything runs on one task. Timers and simulated audio need a tokio
//! runtime; tests use a paused clock (`start_paused = true`).
//!
//! # Example
//!
//! ```rust,no_run
//! use carousel_core::{Affordances, PlaybackConfig, Slide, SlideDeck, SlideView};
//! use carousel_runtime::{CarouselRuntime, SimulatedAudioConfig};
//! use carousel_playback::CarouselCommand;
//! use std::time::Duration;
//!
//! struct NoButtons;
//! impl Affordances for NoButtons {
//!     fn set_playing(&mut self, _slide: usize, _playing: bool) {}
//!     fn reset_all(&mut self) {}
//! }
//!
//! struct NoView;
//! impl SlideView for NoView {
//!     fn activate(&mut self, _previous: Option<usize>, _next: usize) {}
//!     fn set_nav_visibility(&mut self, _show_previous: bool, _show_next: bool) {}
//!     fn set_menu_open(&mut self, _open: bool) {}
//!     fn set_diameter(&mut self, _diameter: f64) {}
//! }
//!
//! # async fn demo() -> carousel_core::Result<()> {
//! let deck = SlideDeck::new(vec![Slide::new(0).with_audio("a0.mp3"), Slide::new(1)])?;
//! let mut runtime = CarouselRuntime::new(
//!     deck,
//!     PlaybackConfig::default(),
//!     SimulatedAudioConfig::default(),
//!     NoButtons,
//!     NoView,
//! )?;
//!
//! runtime.dispatch(CarouselCommand::Gesture)?;
//! runtime.start();
//! runtime.run_for(Duration::from_secs(61)).await;
//! for event in runtime.drain_events() {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

mod channel;
mod runtime;
mod scheduler;
mod transport;

pub use channel::{channel, ChannelSink};
pub use runtime::{CarouselRuntime, RuntimeCarousel};
pub use scheduler::TokioScheduler;
pub use transport::{SimulatedAudioConfig, SimulatedTransport};
