//! Carousel commands
//!
//! Every user-facing operation as a value, so hosts can queue, log or replay
//! them (`Carousel::apply`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single user or host action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CarouselCommand {
    /// Pointer/touch interaction (unlocks audio)
    Gesture,

    /// Next control
    Next,

    /// Previous control
    Previous,

    /// Direct navigation
    JumpTo {
        /// Target slide
        index: usize,
    },

    /// Per-slide play/pause control
    Toggle {
        /// Slide whose control was pressed
        slide: usize,
    },

    /// Silence everything
    StopAll,

    /// Open the overlay menu
    OpenMenu,

    /// Close the overlay menu
    CloseMenu,

    /// Menu link (jump, then close the menu)
    SelectMenuItem {
        /// Target slide
        index: usize,
    },

    /// Track link (jump, menu untouched)
    SelectTrack {
        /// Target slide
        index: usize,
    },

    /// Slider resized
    Resize {
        /// Width in CSS pixels
        width: f64,
        /// Height in CSS pixels
        height: f64,
    },
}

impl CarouselCommand {
    /// Commands a browser only issues in response to a user interaction
    pub fn is_user_interaction(&self) -> bool {
        !matches!(self, Self::StopAll | Self::Resize { .. })
    }
}

impl fmt::Display for CarouselCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gesture => write!(f, "gesture"),
            Self::Next => write!(f, "next"),
            Self::Previous => write!(f, "prev"),
            Self::JumpTo { index } => write!(f, "jump {}", index),
            Self::Toggle { slide } => write!(f, "toggle {}", slide),
            Self::StopAll => write!(f, "stop"),
            Self::OpenMenu => write!(f, "menu open"),
            Self::CloseMenu => write!(f, "menu close"),
            Self::SelectMenuItem { index } => write!(f, "menu select {}", index),
            Self::SelectTrack { index } => write!(f, "track {}", index),
            Self::Resize { width, height } => write!(f, "resize {} {}", width, height),
        }
    }
}
