//! Playback Events
//!
//! Event-based communication for hosts that mirror carousel state outside the
//! built-in affordances (JS callbacks, simulator output, logs).
//! Events are queued while commands and signals are applied and handed out by
//! `drain_events`.

use carousel_core::PlaybackMode;
use serde::{Deserialize, Serialize};

/// Why a playback handle stopped being current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Another playback request took over
    Superseded,

    /// `stop_all` (menu opened, host request)
    StopAll,

    /// The snippet timer ran out
    SnippetExpired,

    /// The user paused it with the play/pause control
    UserPaused,
}

/// Events emitted by the carousel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Active slide changed (also emitted when a slide is re-selected)
    SlideChanged {
        /// Previously active slide (`None` on startup)
        from: Option<usize>,
        /// Newly active slide
        to: usize,
    },

    /// The platform confirmed playback started
    PlaybackStarted {
        /// Slide being played
        slide: usize,
        /// Snippet or user playback
        mode: PlaybackMode,
    },

    /// A current handle was stopped
    PlaybackStopped {
        /// Slide that stopped
        slide: usize,
        /// What stopped it
        reason: StopReason,
    },

    /// The platform refused to start playback
    PlaybackRejected {
        /// Slide that failed
        slide: usize,
        /// Mode of the failed request
        mode: PlaybackMode,
        /// Platform-provided reason
        message: String,
    },

    /// A deferred play result arrived after its handle was replaced
    StaleResolution {
        /// Slide the outdated request targeted
        slide: usize,
    },

    /// The first user gesture unlocked audio
    AudioUnlocked,

    /// Overlay menu opened or closed
    MenuToggled {
        /// New menu state
        open: bool,
    },

    /// Slider diagonal recomputed
    DiameterChanged {
        /// Diagonal in pixels
        diameter: f64,
    },
}

impl PlaybackEvent {
    /// Slide the event concerns, if any
    pub fn slide(&self) -> Option<usize> {
        match self {
            PlaybackEvent::SlideChanged { to, .. } => Some(*to),
            PlaybackEvent::PlaybackStarted { slide, .. }
            | PlaybackEvent::PlaybackStopped { slide, .. }
            | PlaybackEvent::PlaybackRejected { slide, .. }
            | PlaybackEvent::StaleResolution { slide } => Some(*slide),
            PlaybackEvent::AudioUnlocked
            | PlaybackEvent::MenuToggled { .. }
            | PlaybackEvent::DiameterChanged { .. } => None,
        }
    }
}
