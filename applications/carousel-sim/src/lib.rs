//! Carousel Simulator Library
//!
//! Loads a slide deck from configuration, replays scripted sessions against
//! the native runtime with simulated audio, and reports the resulting
//! playback events with their virtual timestamps.
//!
//! This library exposes the components for testing purposes.

pub mod config;
pub mod error;
pub mod script;
pub mod simulation;
pub mod view;

// Re-export commonly used types for convenience
pub use config::SimConfig;
pub use error::{Result, SimError};
pub use script::{Script, ScriptError, Step};
pub use simulation::{simulate, TimedEvent};
pub use view::{TracingButtons, TracingView};
