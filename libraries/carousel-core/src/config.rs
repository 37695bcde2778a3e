//! Playback configuration

use crate::error::{CarouselError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default snippet length: one minute
pub const DEFAULT_SNIPPET_DURATION_MS: u64 = 60_000;

/// Configuration for the playback coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// How long navigation-triggered playback runs before auto-stop (default: 60 000 ms)
    pub snippet_duration_ms: u64,

    /// Slide activated at startup (default: 0)
    pub start_index: usize,

    /// Play/pause the first narrated slide on the first gesture (default: true)
    pub prime_on_unlock: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            snippet_duration_ms: DEFAULT_SNIPPET_DURATION_MS,
            start_index: 0,
            prime_on_unlock: true,
        }
    }
}

impl PlaybackConfig {
    /// Snippet length as a `Duration`
    pub fn snippet_duration(&self) -> Duration {
        Duration::from_millis(self.snippet_duration_ms)
    }

    /// Validate against a deck of `deck_len` slides
    pub fn validate(&self, deck_len: usize) -> Result<()> {
        if self.snippet_duration_ms == 0 {
            return Err(CarouselError::config("snippet_duration_ms must be positive"));
        }

        if self.start_index >= deck_len {
            return Err(CarouselError::config(format!(
                "start_index {} is outside a deck of {} slides",
                self.start_index, deck_len
            )));
        }

        Ok(())
    }
}
