//! Carousel - Slide & Narration Playback
//!
//! Platform-agnostic controller for a slide carousel whose slides carry an
//! optional narration track.
//!
//! This crate provides:
//! - Navigation (next/previous clamped at the bounds, direct jumps)
//! - Snippet playback: the active slide's audio plays for a fixed duration
//!   after every navigation
//! - User playback: per-slide play/pause that overrides snippets until the
//!   next navigation
//! - Play/pause control sync driven by the audio transport
//! - Overlay menu and track links
//! - Backdrop geometry on resize
//!
//! # Architecture
//!
//! The coordinator is a synchronous state machine. Starting playback and the
//! snippet timer are deferred by the platform; their results come back as
//! [`HostSignal`]s tagged with the [`PlaybackToken`] they were issued for.
//! Results for tokens that are no longer current are discarded.
//!
//! Platform-specific code (audio elements, timers, DOM) is provided via the
//! traits in `carousel-core`. The `wasm` feature ships a browser binding.
//!
//! # Example
//!
//! ```rust
//! use carousel_playback::{AutoPlay, Carousel};
//! use carousel_core::{
//!     Affordances, AudioTransport, HostSignal, PlaybackConfig, PlaybackToken, SlideDeck,
//!     SlideView, SnippetScheduler,
//! };
//! use std::time::Duration;
//!
//! #[derive(Default)]
//! struct Silent {
//!     playing: Option<usize>,
//! }
//!
//! impl AudioTransport for Silent {
//!     fn bound_source(&self, _slide: usize) -> Option<String> { None }
//!     fn bind_source(&mut self, _slide: usize, _src: &str) {}
//!     fn load(&mut self, _slide: usize) {}
//!     fn begin_playback(&mut self, slide: usize, _token: PlaybackToken) {
//!         self.playing = Some(slide);
//!     }
//!     fn pause(&mut self, _slide: usize) { self.playing = None; }
//!     fn rewind(&mut self, _slide: usize) {}
//!     fn is_paused(&self, slide: usize) -> bool { self.playing != Some(slide) }
//!     fn is_ended(&self, _slide: usize) -> bool { false }
//! }
//!
//! struct NoUi;
//! impl Affordances for NoUi {
//!     fn set_playing(&mut self, _slide: usize, _playing: bool) {}
//!     fn reset_all(&mut self) {}
//! }
//! impl SnippetScheduler for NoUi {
//!     fn arm(&mut self, _token: PlaybackToken, _after: Duration) {}
//!     fn cancel(&mut self, _token: PlaybackToken) {}
//! }
//! impl SlideView for NoUi {
//!     fn activate(&mut self, _previous: Option<usize>, _next: usize) {}
//!     fn set_nav_visibility(&mut self, _show_previous: bool, _show_next: bool) {}
//!     fn set_menu_open(&mut self, _open: bool) {}
//!     fn set_diameter(&mut self, _diameter: f64) {}
//! }
//!
//! let deck = SlideDeck::from_sources([Some("audio/intro.mp3"), Some("audio/gallery.mp3")])?;
//! let mut carousel = Carousel::new(
//!     deck,
//!     PlaybackConfig::default(),
//!     Silent::default(),
//!     NoUi,
//!     NoUi,
//!     NoUi,
//! )?;
//!
//! // Browsers keep audio locked until the first gesture
//! assert_eq!(carousel.start(), AutoPlay::Locked);
//! carousel.register_gesture();
//!
//! if let Some(AutoPlay::Started(token)) = carousel.go_next() {
//!     // The platform reports back once playback really started
//!     carousel.handle_signal(HostSignal::PlaySettled { token, outcome: Ok(()) });
//! }
//! assert_eq!(carousel.coordinator().armed_timer().map(|t| t.slide), Some(1));
//! # Ok::<(), carousel_core::CarouselError>(())
//! ```

mod carousel;
mod command;
mod coordinator;
pub mod events;
mod gate;
pub mod geometry;
mod navigation;
pub mod sync;

#[cfg(test)]
mod testing;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use carousel::Carousel;
pub use command::CarouselCommand;
pub use coordinator::{
    AutoPlay, NowPlaying, PlaybackCoordinator, PlaybackPhase, PlaybackState, Toggle,
};
pub use events::{PlaybackEvent, StopReason};
pub use gate::GestureGate;
pub use navigation::{NavigationState, Transition};

pub use carousel_core::{
    CarouselError, HostSignal, MediaEvent, PlaybackConfig, PlaybackMode, PlaybackToken, Result,
    SlideDeck,
};
