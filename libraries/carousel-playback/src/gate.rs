//! Gesture unlock gate
//!
//! Browsers only allow audio to start after a user interaction. The gate is a
//! one-shot flag flipped by the first pointer/touch gesture.

/// One-shot audio unlock flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureGate {
    unlocked: bool,
}

impl GestureGate {
    /// Create a locked gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an already unlocked gate (hosts without autoplay restrictions)
    pub fn unlocked() -> Self {
        Self { unlocked: true }
    }

    /// Record a gesture; returns true only for the first one
    pub fn unlock(&mut self) -> bool {
        !std::mem::replace(&mut self.unlocked, true)
    }

    /// Whether automatic playback is allowed
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }
}
