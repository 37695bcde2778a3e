//! Navigation state
//!
//! Tracks the active slide inside `[first, last]`. Next/previous are clamped at
//! the bounds; out-of-range jumps are rejected without mutation.

use carousel_core::{CarouselError, Result};

/// A successful change of the active slide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Slide that was active before
    pub from: usize,

    /// Slide that is active now (may equal `from` for a re-selection)
    pub to: usize,
}

/// Active index and bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    active: usize,
    len: usize,
}

impl NavigationState {
    /// Create navigation over `len` slides starting at `start`
    ///
    /// # Errors
    /// `EmptyDeck` when `len == 0`, `InvalidIndex` when `start` is out of range.
    pub fn new(len: usize, start: usize) -> Result<Self> {
        if len == 0 {
            return Err(CarouselError::EmptyDeck);
        }
        if start >= len {
            return Err(CarouselError::InvalidIndex { index: start, len });
        }
        Ok(Self { active: start, len })
    }

    /// Currently active slide
    pub fn active(&self) -> usize {
        self.active
    }

    /// Number of slides
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false (construction rejects zero slides)
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `(first, last)`
    pub fn bounds(&self) -> (usize, usize) {
        (0, self.len - 1)
    }

    /// Active slide is the first one (previous control hidden)
    pub fn is_first(&self) -> bool {
        self.active == 0
    }

    /// Active slide is the last one (next control hidden)
    pub fn is_last(&self) -> bool {
        self.active == self.len - 1
    }

    /// Advance by one; `None` at the last slide
    pub fn go_next(&mut self) -> Option<Transition> {
        if self.is_last() {
            return None;
        }
        Some(self.move_to(self.active + 1))
    }

    /// Go back by one; `None` at the first slide
    pub fn go_previous(&mut self) -> Option<Transition> {
        if self.is_first() {
            return None;
        }
        Some(self.move_to(self.active - 1))
    }

    /// Jump directly to `index`
    ///
    /// # Errors
    /// `InvalidIndex` when `index` is out of range; the active slide is unchanged.
    pub fn jump_to(&mut self, index: usize) -> Result<Transition> {
        if index >= self.len {
            return Err(CarouselError::InvalidIndex {
                index,
                len: self.len,
            });
        }
        Ok(self.move_to(index))
    }

    fn move_to(&mut self, index: usize) -> Transition {
        let from = self.active;
        self.active = index;
        Transition { from, to: index }
    }
}
