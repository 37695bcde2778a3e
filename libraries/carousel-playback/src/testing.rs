//! In-memory platform fakes for unit tests

use carousel_core::{Affordances, AudioTransport, PlaybackToken, SlideView, SnippetScheduler};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FakeAudio {
    pub bound: Option<String>,
    pub paused: bool,
    pub ended: bool,
    pub position_ms: u64,
    pub loads: u32,
    pub plays: Vec<PlaybackToken>,
}

impl Default for FakeAudio {
    fn default() -> Self {
        Self {
            bound: None,
            paused: true,
            ended: false,
            position_ms: 0,
            loads: 0,
            plays: Vec::new(),
        }
    }
}

/// Transport that records calls; play requests stay pending until the test
/// settles them through the coordinator.
#[derive(Debug, Clone)]
pub struct FakeTransport {
    pub audio: Vec<FakeAudio>,
    pub primed: Vec<(usize, String)>,
}

impl FakeTransport {
    pub fn new(slides: usize) -> Self {
        Self {
            audio: vec![FakeAudio::default(); slides],
            primed: Vec::new(),
        }
    }

    /// Simulate the resource reaching its end
    pub fn finish(&mut self, slide: usize) {
        let audio = &mut self.audio[slide];
        audio.ended = true;
        audio.paused = true;
    }

    /// Let `ms` of playback pass for every audible resource
    pub fn advance(&mut self, ms: u64) {
        for audio in self.audio.iter_mut().filter(|a| !a.paused && !a.ended) {
            audio.position_ms += ms;
        }
    }

    pub fn audible(&self) -> Vec<usize> {
        self.audio
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.paused && !a.ended)
            .map(|(i, _)| i)
            .collect()
    }
}

impl AudioTransport for FakeTransport {
    fn bound_source(&self, slide: usize) -> Option<String> {
        self.audio.get(slide).and_then(|a| a.bound.clone())
    }

    fn bind_source(&mut self, slide: usize, src: &str) {
        if let Some(audio) = self.audio.get_mut(slide) {
            audio.bound = Some(src.to_string());
        }
    }

    fn load(&mut self, slide: usize) {
        if let Some(audio) = self.audio.get_mut(slide) {
            audio.loads += 1;
            audio.position_ms = 0;
        }
    }

    fn begin_playback(&mut self, slide: usize, token: PlaybackToken) {
        if let Some(audio) = self.audio.get_mut(slide) {
            audio.paused = false;
            audio.ended = false;
            audio.plays.push(token);
        }
    }

    fn pause(&mut self, slide: usize) {
        if let Some(audio) = self.audio.get_mut(slide) {
            audio.paused = true;
        }
    }

    fn rewind(&mut self, slide: usize) {
        if let Some(audio) = self.audio.get_mut(slide) {
            audio.position_ms = 0;
        }
    }

    fn is_paused(&self, slide: usize) -> bool {
        !self.audio.get(slide).is_some_and(|a| !a.paused)
    }

    fn is_ended(&self, slide: usize) -> bool {
        self.audio.get(slide).is_some_and(|a| a.ended)
    }

    fn prime(&mut self, slide: usize, src: &str) {
        self.primed.push((slide, src.to_string()));
    }
}

#[derive(Debug, Clone)]
pub struct FakeAffordances {
    state: Vec<bool>,
    pub resets: u32,
}

impl FakeAffordances {
    pub fn new(slides: usize) -> Self {
        Self {
            state: vec![false; slides],
            resets: 0,
        }
    }

    pub fn is_playing(&self, slide: usize) -> bool {
        self.state[slide]
    }

    pub fn playing(&self) -> Vec<bool> {
        self.state.clone()
    }
}

impl Affordances for FakeAffordances {
    fn set_playing(&mut self, slide: usize, playing: bool) {
        if let Some(state) = self.state.get_mut(slide) {
            *state = playing;
        }
    }

    fn reset_all(&mut self) {
        self.resets += 1;
        self.state.iter_mut().for_each(|s| *s = false);
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeScheduler {
    pub armed: Vec<(PlaybackToken, Duration)>,
    pub cancelled: Vec<PlaybackToken>,
}

impl FakeScheduler {
    pub fn is_armed(&self, token: PlaybackToken) -> bool {
        self.armed.iter().any(|(t, _)| *t == token)
    }
}

impl SnippetScheduler for FakeScheduler {
    fn arm(&mut self, token: PlaybackToken, after: Duration) {
        self.armed.push((token, after));
    }

    fn cancel(&mut self, token: PlaybackToken) {
        let before = self.armed.len();
        self.armed.retain(|(t, _)| *t != token);
        if self.armed.len() != before {
            self.cancelled.push(token);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeView {
    pub active: Option<usize>,
    pub show_previous: bool,
    pub show_next: bool,
    pub menu_open: bool,
    pub diameter: Option<f64>,
    pub activations: u32,
}

impl SlideView for FakeView {
    fn activate(&mut self, _previous: Option<usize>, next: usize) {
        self.active = Some(next);
        self.activations += 1;
    }

    fn set_nav_visibility(&mut self, show_previous: bool, show_next: bool) {
        self.show_previous = show_previous;
        self.show_next = show_next;
    }

    fn set_menu_open(&mut self, open: bool) {
        self.menu_open = open;
    }

    fn set_diameter(&mut self, diameter: f64) {
        self.diameter = Some(diameter);
    }
}
