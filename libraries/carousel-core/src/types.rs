//! Core types shared between the coordinator and its hosts

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a playback request was initiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    /// Automatic, time-boxed playback triggered by navigation
    Snippet,

    /// Full playback started by an explicit play/pause action
    User,
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackMode::Snippet => write!(f, "snippet"),
            PlaybackMode::User => write!(f, "user"),
        }
    }
}

/// Identity of one playback request
///
/// The generation is handed out by the coordinator and never reused, so two
/// requests for the same slide compare unequal. Deferred results carry the
/// token they were started for; the coordinator only applies them while the
/// token is still the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaybackToken {
    /// Slide whose audio resource the request targets
    pub slide: usize,

    /// Request generation
    pub generation: u64,
}

impl PlaybackToken {
    /// Create a new token
    pub fn new(slide: usize, generation: u64) -> Self {
        Self { slide, generation }
    }
}

impl fmt::Display for PlaybackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slide {}#{}", self.slide, self.generation)
    }
}

/// Outcome of a deferred `play()` call
///
/// `Err` carries the platform's reason for diagnostics.
pub type PlayOutcome = std::result::Result<(), String>;

/// Notifications the platform emits for an audio resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaEvent {
    /// Playback started or resumed
    Play,

    /// Playback paused
    Pause,

    /// Playback reached the end of the resource
    Ended,
}

impl MediaEvent {
    /// Whether the resource is audible after this event
    pub fn is_playing(self) -> bool {
        matches!(self, MediaEvent::Play)
    }
}

/// Signals delivered back into the coordinator after a suspend point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSignal {
    /// A `begin_playback` call settled
    PlaySettled {
        /// Request the result belongs to
        token: PlaybackToken,
        /// Success, or the rejection reason
        outcome: PlayOutcome,
    },

    /// A snippet timer fired
    SnippetExpired {
        /// Request the timer was armed for
        token: PlaybackToken,
    },

    /// The platform reported a play/pause/ended notification
    Media {
        /// Slide owning the audio resource
        slide: usize,
        /// Notification kind
        event: MediaEvent,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_for_same_slide_differ_by_generation() {
        let first = PlaybackToken::new(2, 1);
        let second = PlaybackToken::new(2, 2);
        assert_ne!(first, second);
        assert_eq!(first.to_string(), "slide 2#1");
    }

    #[test]
    fn only_play_is_audible() {
        assert!(MediaEvent::Play.is_playing());
        assert!(!MediaEvent::Pause.is_playing());
        assert!(!MediaEvent::Ended.is_playing());
    }

    #[test]
    fn mode_serializes_lowercase() {
        let json = serde_json::to_string(&PlaybackMode::Snippet).unwrap();
        assert_eq!(json, "\"snippet\"");
    }
}
