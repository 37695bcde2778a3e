//! Headless view and affordances that report through `tracing`

use carousel_core::{Affordances, SlideView};
use tracing::{debug, info};

/// Play/pause controls kept in memory
#[derive(Debug, Clone, Default)]
pub struct TracingButtons {
    playing: Vec<bool>,
}

impl TracingButtons {
    /// Controls for `slides` slides, all showing "not playing"
    pub fn new(slides: usize) -> Self {
        Self {
            playing: vec![false; slides],
        }
    }

    /// Slides whose control shows "playing"
    pub fn playing(&self) -> Vec<usize> {
        self.playing
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(slide, _)| slide)
            .collect()
    }
}

impl Affordances for TracingButtons {
    fn set_playing(&mut self, slide: usize, playing: bool) {
        if let Some(button) = self.playing.get_mut(slide) {
            if *button != playing {
                debug!(slide, playing, "Play/pause control");
            }
            *button = playing;
        }
    }

    fn reset_all(&mut self) {
        self.playing.iter_mut().for_each(|on| *on = false);
    }
}

/// Slide view kept in memory
#[derive(Debug, Clone, Default)]
pub struct TracingView {
    pub active: Option<usize>,
    pub show_previous: bool,
    pub show_next: bool,
    pub menu_open: bool,
    pub diameter: f64,
}

impl SlideView for TracingView {
    fn activate(&mut self, previous: Option<usize>, next: usize) {
        info!(?previous, next, "Slide shown");
        self.active = Some(next);
    }

    fn set_nav_visibility(&mut self, show_previous: bool, show_next: bool) {
        debug!(show_previous, show_next, "Navigation controls");
        self.show_previous = show_previous;
        self.show_next = show_next;
    }

    fn set_menu_open(&mut self, open: bool) {
        info!(open, "Menu");
        self.menu_open = open;
    }

    fn set_diameter(&mut self, diameter: f64) {
        debug!(diameter, "Slider diameter");
        self.diameter = diameter;
    }
}
