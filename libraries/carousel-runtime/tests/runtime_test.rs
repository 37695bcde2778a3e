//! Runtime tests on a paused tokio clock
//!
//! The simulated transport starts playback 50 ms after a request, so snippet
//! timers are armed at 50 ms and fire at 60 050 ms.

use carousel_core::{
    Affordances, HostSignal, MediaEvent, PlaybackConfig, PlaybackMode, SignalSink, Slide,
    SlideDeck, SlideView,
};
use carousel_playback::{
    AutoPlay, CarouselCommand, GestureGate, PlaybackEvent, PlaybackPhase, StopReason,
};
use carousel_runtime::{CarouselRuntime, SimulatedAudioConfig};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Default)]
struct Screen {
    buttons: Vec<bool>,
    active: Option<usize>,
    menu_open: bool,
}

#[derive(Clone)]
struct Buttons(Rc<RefCell<Screen>>);

#[derive(Clone)]
struct View(Rc<RefCell<Screen>>);

impl Affordances for Buttons {
    fn set_playing(&mut self, slide: usize, playing: bool) {
        if let Some(button) = self.0.borrow_mut().buttons.get_mut(slide) {
            *button = playing;
        }
    }

    fn reset_all(&mut self) {
        self.0.borrow_mut().buttons.iter_mut().for_each(|b| *b = false);
    }
}

impl SlideView for View {
    fn activate(&mut self, _previous: Option<usize>, next: usize) {
        self.0.borrow_mut().active = Some(next);
    }

    fn set_nav_visibility(&mut self, _show_previous: bool, _show_next: bool) {}

    fn set_menu_open(&mut self, open: bool) {
        self.0.borrow_mut().menu_open = open;
    }

    fn set_diameter(&mut self, _diameter: f64) {}
}

type Runtime = CarouselRuntime<Buttons, View>;

fn runtime(audio: SimulatedAudioConfig, gate: GestureGate) -> (Runtime, Rc<RefCell<Screen>>) {
    let deck = SlideDeck::new(vec![
        Slide::new(0).with_audio("a0.mp3"),
        Slide::new(1).with_audio("a1.mp3"),
        Slide::new(2),
    ])
    .unwrap();
    let screen = Rc::new(RefCell::new(Screen {
        buttons: vec![false; 3],
        ..Screen::default()
    }));

    let runtime = CarouselRuntime::new(
        deck,
        PlaybackConfig::default(),
        audio,
        Buttons(Rc::clone(&screen)),
        View(Rc::clone(&screen)),
    )
    .unwrap()
    .with_gate(gate);

    (runtime, screen)
}

fn unlocked() -> (Runtime, Rc<RefCell<Screen>>) {
    runtime(SimulatedAudioConfig::default(), GestureGate::unlocked())
}

fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

#[tokio::test(start_paused = true)]
async fn snippet_stops_after_a_minute() {
    let (mut rt, screen) = unlocked();

    assert!(matches!(rt.start(), AutoPlay::Started(_)));
    rt.run_for(ms(100)).await;
    assert_eq!(rt.transport().audible(), vec![0]);
    assert!(screen.borrow().buttons[0]);

    rt.run_for(ms(59_800)).await;
    assert_eq!(rt.transport().audible(), vec![0]);

    rt.run_for(ms(200)).await;
    assert!(rt.transport().audible().is_empty());
    assert_eq!(rt.transport().position(0), Some(Duration::ZERO));
    assert!(!screen.borrow().buttons[0]);
    assert_eq!(rt.carousel().phase(), PlaybackPhase::Idle);
    assert!(rt.drain_events().contains(&PlaybackEvent::PlaybackStopped {
        slide: 0,
        reason: StopReason::SnippetExpired,
    }));
}

#[tokio::test(start_paused = true)]
async fn nothing_plays_until_a_gesture() {
    let (mut rt, _screen) = runtime(SimulatedAudioConfig::default(), GestureGate::new());

    assert_eq!(rt.start(), AutoPlay::Locked);
    rt.run_for(ms(500)).await;
    assert!(rt.transport().audible().is_empty());

    rt.dispatch(CarouselCommand::Gesture).unwrap();
    rt.dispatch(CarouselCommand::Next).unwrap();
    rt.run_for(ms(100)).await;

    assert_eq!(rt.transport().audible(), vec![1]);
    let events = rt.drain_events();
    assert!(events.contains(&PlaybackEvent::AudioUnlocked));
    assert!(events.contains(&PlaybackEvent::PlaybackStarted {
        slide: 1,
        mode: PlaybackMode::Snippet,
    }));
}

#[tokio::test(start_paused = true)]
async fn navigation_hands_over_with_a_fresh_timer() {
    let (mut rt, screen) = unlocked();
    rt.start();
    rt.run_for(ms(10_000)).await;

    rt.dispatch(CarouselCommand::Next).unwrap();
    rt.run_for(ms(100)).await;

    assert_eq!(rt.transport().audible(), vec![1]);
    assert_eq!(rt.transport().position(0), Some(Duration::ZERO));
    assert_eq!(screen.borrow().buttons, vec![false, true, false]);
    assert_eq!(rt.carousel().coordinator().scheduler().pending(), 1);

    // Slide 0's deadline (60 050 ms) passes without effect
    rt.run_for(ms(55_000)).await;
    assert_eq!(rt.transport().audible(), vec![1]);

    rt.run_for(ms(5_000)).await;
    assert!(rt.transport().audible().is_empty());
}

#[tokio::test(start_paused = true)]
async fn request_aborted_by_navigation_is_stale() {
    let (mut rt, _screen) = unlocked();
    rt.start();

    // Still within the start latency of slide 0
    rt.dispatch(CarouselCommand::Next).unwrap();
    rt.run_for(ms(100)).await;

    assert_eq!(rt.transport().audible(), vec![1]);
    let events = rt.drain_events();
    assert!(events.contains(&PlaybackEvent::StaleResolution { slide: 0 }));
    assert!(!events
        .iter()
        .any(|e| matches!(e, PlaybackEvent::PlaybackRejected { .. })));
}

#[tokio::test(start_paused = true)]
async fn manual_play_runs_until_the_track_ends() {
    let audio = SimulatedAudioConfig::default().with_duration(0, Duration::from_secs(90));
    let (mut rt, screen) = runtime(audio, GestureGate::unlocked());
    rt.start();
    rt.run_for(ms(100)).await;

    // First press pauses the snippet, second starts manual playback
    rt.dispatch(CarouselCommand::Toggle { slide: 0 }).unwrap();
    rt.dispatch(CarouselCommand::Toggle { slide: 0 }).unwrap();
    rt.run_for(ms(100)).await;
    assert_eq!(rt.carousel().phase(), PlaybackPhase::UserPlaying);
    assert_eq!(rt.carousel().coordinator().scheduler().pending(), 0);

    rt.run_for(Duration::from_secs(70)).await;
    assert_eq!(rt.transport().audible(), vec![0]);
    assert!(screen.borrow().buttons[0]);

    rt.run_for(Duration::from_secs(25)).await;
    assert!(rt.transport().audible().is_empty());
    assert!(!screen.borrow().buttons[0]);
    assert!(!rt.carousel().coordinator().is_playing(0));
}

#[tokio::test(start_paused = true)]
async fn refused_playback_is_reported() {
    let audio = SimulatedAudioConfig::default().reject(1);
    let (mut rt, screen) = runtime(audio, GestureGate::unlocked());
    rt.start();
    rt.run_for(ms(100)).await;

    rt.dispatch(CarouselCommand::Next).unwrap();
    rt.run_for(ms(100)).await;

    assert!(rt.transport().audible().is_empty());
    assert!(!screen.borrow().buttons[1]);
    assert_eq!(rt.carousel().coordinator().current_token(), None);
    assert!(rt.drain_events().iter().any(|e| matches!(
        e,
        PlaybackEvent::PlaybackRejected {
            slide: 1,
            mode: PlaybackMode::Snippet,
            ..
        }
    )));
}

#[tokio::test(start_paused = true)]
async fn opening_the_menu_silences_everything() {
    let (mut rt, screen) = unlocked();
    rt.start();
    rt.run_for(ms(100)).await;

    rt.dispatch(CarouselCommand::OpenMenu).unwrap();
    rt.run_for(ms(100)).await;
    assert!(screen.borrow().menu_open);
    assert!(rt.transport().audible().is_empty());
    assert_eq!(rt.carousel().coordinator().scheduler().pending(), 0);

    rt.dispatch(CarouselCommand::SelectMenuItem { index: 1 }).unwrap();
    rt.run_for(ms(100)).await;
    assert!(!screen.borrow().menu_open);
    assert_eq!(screen.borrow().active, Some(1));
    assert_eq!(rt.transport().audible(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn silent_slide_stops_previous_audio() {
    let (mut rt, _screen) = unlocked();
    rt.start();
    rt.run_for(ms(100)).await;

    rt.dispatch(CarouselCommand::JumpTo { index: 2 }).unwrap();
    rt.run_for(ms(100)).await;

    assert!(rt.transport().audible().is_empty());
    assert_eq!(rt.carousel().coordinator().scheduler().pending(), 0);
    assert!(rt.dispatch(CarouselCommand::Toggle { slide: 2 }).is_err());
}

#[tokio::test(start_paused = true)]
async fn pump_applies_injected_signals() {
    let (mut rt, screen) = unlocked();
    assert_eq!(rt.pump(), 0);

    rt.sink().deliver(HostSignal::Media {
        slide: 1,
        event: MediaEvent::Play,
    });
    assert_eq!(rt.pump(), 1);
    assert!(screen.borrow().buttons[1]);
}
