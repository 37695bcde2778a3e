//! Carousel Core
//!
//! Platform-agnostic types, traits, and error handling for the Carousel slide
//! player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Slide`, `SlideDeck`, `PlaybackToken`, `HostSignal`
//! - **Core Traits**: `AudioTransport`, `Affordances`, `SnippetScheduler`, `SlideView`, `SignalSink`
//! - **Configuration**: `PlaybackConfig`
//! - **Error Handling**: Unified `CarouselError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use carousel_core::{Slide, SlideDeck};
//!
//! let deck = SlideDeck::new(vec![
//!     Slide::new(0).with_audio("audio/intro.mp3"),
//!     Slide::new(1).with_title("Gallery"),
//! ])
//! .unwrap();
//!
//! assert_eq!(deck.last_index(), 1);
//! assert_eq!(deck.audio_source(0), Some("audio/intro.mp3"));
//! assert_eq!(deck.audio_source(1), None);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod deck;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::PlaybackConfig;
pub use deck::{Slide, SlideDeck};
pub use error::{CarouselError, Result};
pub use traits::{Affordances, AudioTransport, SignalSink, SlideView, SnippetScheduler};
pub use types::{HostSignal, MediaEvent, PlayOutcome, PlaybackMode, PlaybackToken};
