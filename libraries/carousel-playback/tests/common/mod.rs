//! Common test utilities: an in-memory page with a manual clock
#![allow(dead_code)]

use carousel_core::{
    Affordances, AudioTransport, HostSignal, MediaEvent, PlaybackConfig, PlaybackToken, Slide,
    SlideDeck, SlideView, SnippetScheduler,
};
use carousel_playback::{Carousel, GestureGate};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Audio {
    pub bound: Option<String>,
    pub paused: bool,
    pub ended: bool,
    pub position_ms: u64,
    pub loads: u32,
    pub plays: Vec<PlaybackToken>,
}

impl Default for Audio {
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

/// Everything the platform fakes share
#[derive(Debug, Default)]
pub struct World {
    pub now_ms: u64,
    pub audio: Vec<Audio>,
    pub pending: Vec<PlaybackToken>,
    pub timers: Vec<(PlaybackToken, u64)>,
    pub buttons: Vec<bool>,
    pub active: Option<usize>,
    pub show_previous: bool,
    pub show_next: bool,
    pub menu_open: bool,
    pub diameter: Option<f64>,
}

pub type Shared = Rc<RefCell<World>>;

pub struct PageTransport(pub Shared);
pub struct PageButtons(pub Shared);
pub struct ManualScheduler(pub Shared);
pub struct PageView(pub Shared);

impl AudioTransport for PageTransport {
    fn bound_source(&self, slide: usize) -> Option<String> {
        self.0.borrow().audio[slide].bound.clone()
    }

    fn bind_source(&mut self, slide: usize, src: &str) {
        self.0.borrow_mut().audio[slide].bound = Some(src.to_string());
    }

    fn load(&mut self, slide: usize) {
        let mut world = self.0.borrow_mut();
        let audio = &mut world.audio[slide];
        audio.loads += 1;
        audio.position_ms = 0;
    }

    fn begin_playback(&mut self, slide: usize, token: PlaybackToken) {
        let mut world = self.0.borrow_mut();
        let audio = &mut world.audio[slide];
        audio.paused = false;
        audio.ended = false;
        audio.plays.push(token);
        world.pending.push(token);
    }

    fn pause(&mut self, slide: usize) {
        self.0.borrow_mut().audio[slide].paused = true;
    }

    fn rewind(&mut self, slide: usize) {
        self.0.borrow_mut().audio[slide].position_ms = 0;
    }

    fn is_paused(&self, slide: usize) -> bool {
        self.0.borrow().audio[slide].paused
    }

    fn is_ended(&self, slide: usize) -> bool {
        self.0.borrow().audio[slide].ended
    }
}

impl Affordances for PageButtons {
    fn set_playing(&mut self, slide: usize, playing: bool) {
        if let Some(button) = self.0.borrow_mut().buttons.get_mut(slide) {
            *button = playing;
        }
    }

    fn reset_all(&mut self) {
        self.0.borrow_mut().buttons.iter_mut().for_each(|b| *b = false);
    }
}

impl SnippetScheduler for ManualScheduler {
    fn arm(&mut self, token: PlaybackToken, after: Duration) {
        let mut world = self.0.borrow_mut();
        let deadline = world.now_ms + after.as_millis() as u64;
        world.timers.push((token, deadline));
    }

    fn cancel(&mut self, token: PlaybackToken) {
        self.0.borrow_mut().timers.retain(|(t, _)| *t != token);
    }
}

impl SlideView for PageView {
    fn activate(&mut self, _previous: Option<usize>, next: usize) {
        self.0.borrow_mut().active = Some(next);
    }

    fn set_nav_visibility(&mut self, show_previous: bool, show_next: bool) {
        let mut world = self.0.borrow_mut();
        world.show_previous = show_previous;
        world.show_next = show_next;
    }

    fn set_menu_open(&mut self, open: bool) {
        self.0.borrow_mut().menu_open = open;
    }

    fn set_diameter(&mut self, diameter: f64) {
        self.0.borrow_mut().diameter = Some(diameter);
    }
}

pub type PageCarousel = Carousel<PageTransport, PageButtons, ManualScheduler, PageView>;

/// A carousel on an in-memory page
pub struct Page {
    pub world: Shared,
    pub carousel: PageCarousel,
}

impl Page {
    /// Slides with the given audio (None = silent slide), audio already unlocked
    pub fn new(sources: &[Option<&str>]) -> Self {
        Self::build(sources, PlaybackConfig::default(), GestureGate::unlocked())
    }

    /// Same as `new`, but audio stays locked until a gesture
    pub fn locked(sources: &[Option<&str>]) -> Self {
        Self::build(sources, PlaybackConfig::default(), GestureGate::new())
    }

    pub fn build(sources: &[Option<&str>], config: PlaybackConfig, gate: GestureGate) -> Self {
        let slides = sources
            .iter()
            .enumerate()
            .map(|(index, src)| match src {
                Some(src) => Slide::new(index).with_audio(*src),
                None => Slide::new(index),
            })
            .collect();
        let deck = SlideDeck::new(slides).unwrap();

        let world = Rc::new(RefCell::new(World {
            audio: vec![Audio::default(); sources.len()],
            buttons: vec![false; sources.len()],
            ..World::default()
        }));

        let carousel = Carousel::new(
            deck,
            config,
            PageTransport(Rc::clone(&world)),
            PageButtons(Rc::clone(&world)),
            ManualScheduler(Rc::clone(&world)),
            PageView(Rc::clone(&world)),
        )
        .unwrap()
        .with_gate(gate);

        Self { world, carousel }
    }

    /// Oldest unsettled play request
    pub fn next_pending(&self) -> Option<PlaybackToken> {
        self.world.borrow().pending.first().copied()
    }

    /// Settle one specific request
    pub fn settle(&mut self, token: PlaybackToken, accepted: bool) {
        self.world.borrow_mut().pending.retain(|t| *t != token);
        let outcome = if accepted {
            Ok(())
        } else {
            Err("NotAllowedError".to_string())
        };
        self.carousel
            .handle_signal(HostSignal::PlaySettled { token, outcome });
    }

    /// Accept every pending request, oldest first
    pub fn settle_all(&mut self) {
        while let Some(token) = self.next_pending() {
            self.settle(token, true);
        }
    }

    /// Move the clock forward, firing due timers in deadline order
    pub fn advance(&mut self, ms: u64) {
        let target = self.world.borrow().now_ms + ms;
        loop {
            let due = {
                let world = self.world.borrow();
                world
                    .timers
                    .iter()
                    .filter(|(_, deadline)| *deadline <= target)
                    .min_by_key(|(_, deadline)| *deadline)
                    .copied()
            };
            let Some((token, deadline)) = due else {
                break;
            };
            self.tick_to(deadline);
            self.world.borrow_mut().timers.retain(|(t, _)| *t != token);
            self.carousel
                .handle_signal(HostSignal::SnippetExpired { token });
        }
        self.tick_to(target);
    }

    fn tick_to(&mut self, to: u64) {
        let mut world = self.world.borrow_mut();
        let elapsed = to.saturating_sub(world.now_ms);
        world.now_ms = to;
        for audio in world.audio.iter_mut().filter(|a| !a.paused && !a.ended) {
            audio.position_ms += elapsed;
        }
    }

    /// The resource reaches its end; the platform reports it
    pub fn finish(&mut self, slide: usize) {
        {
            let mut world = self.world.borrow_mut();
            world.audio[slide].ended = true;
            world.audio[slide].paused = true;
        }
        self.media(slide, MediaEvent::Ended);
    }

    pub fn media(&mut self, slide: usize, event: MediaEvent) {
        self.carousel.handle_signal(HostSignal::Media { slide, event });
    }

    /// Slides whose audio is not paused and not ended
    pub fn audible(&self) -> Vec<usize> {
        self.world
            .borrow()
            .audio
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.paused && !a.ended)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn button(&self, slide: usize) -> bool {
        self.world.borrow().buttons[slide]
    }

    pub fn position_ms(&self, slide: usize) -> u64 {
        self.world.borrow().audio[slide].position_ms
    }

    pub fn is_paused(&self, slide: usize) -> bool {
        self.world.borrow().audio[slide].paused
    }

    pub fn timers(&self) -> Vec<(PlaybackToken, u64)> {
        self.world.borrow().timers.clone()
    }
}
