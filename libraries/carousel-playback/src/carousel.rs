//! Carousel controller
//!
//! Ties the slide deck, navigation, playback coordinator and view together.
//! Every successful navigation runs the same activation path:
//! 1. Update the view (active slide, previous/next visibility)
//! 2. Clear manual playback control
//! 3. Auto-play the new slide's snippet

use crate::command::CarouselCommand;
use crate::coordinator::{AutoPlay, PlaybackCoordinator, PlaybackPhase, Toggle};
use crate::events::PlaybackEvent;
use crate::gate::GestureGate;
use crate::geometry;
use crate::navigation::{NavigationState, Transition};
use carousel_core::{
    Affordances, AudioTransport, HostSignal, PlaybackConfig, Result, SlideDeck, SlideView,
    SnippetScheduler,
};
use tracing::{debug, error, info};

/// Slide carousel with synchronized narration
pub struct Carousel<T, A, S, V> {
    deck: SlideDeck,
    navigation: NavigationState,
    coordinator: PlaybackCoordinator<T, A, S>,
    view: V,
    menu_open: bool,
    diameter: f64,
}

impl<T, A, S, V> Carousel<T, A, S, V>
where
    T: AudioTransport,
    A: Affordances,
    S: SnippetScheduler,
    V: SlideView,
{
    /// Create a carousel over `deck`
    ///
    /// Nothing is rendered or played until [`Carousel::start`].
    pub fn new(
        deck: SlideDeck,
        config: PlaybackConfig,
        transport: T,
        affordances: A,
        scheduler: S,
        view: V,
    ) -> Result<Self> {
        config.validate(deck.len())?;
        let navigation = NavigationState::new(deck.len(), config.start_index)?;

        Ok(Self {
            deck,
            navigation,
            coordinator: PlaybackCoordinator::new(config, transport, affordances, scheduler),
            view,
            menu_open: false,
            diameter: 0.0,
        })
    }

    /// Replace the gesture gate
    pub fn with_gate(mut self, gate: GestureGate) -> Self {
        self.coordinator = self.coordinator.with_gate(gate);
        self
    }

    /// Render the start slide and try its snippet
    pub fn start(&mut self) -> AutoPlay {
        let active = self.navigation.active();
        info!(slides = self.deck.len(), active, "Carousel started");
        self.activate(None, active)
    }

    // ===== Navigation =====

    /// Next control; `None` at the last slide
    pub fn go_next(&mut self) -> Option<AutoPlay> {
        match self.navigation.go_next() {
            Some(transition) => Some(self.on_transition(transition)),
            None => {
                debug!("Already at the last slide");
                None
            }
        }
    }

    /// Previous control; `None` at the first slide
    pub fn go_previous(&mut self) -> Option<AutoPlay> {
        match self.navigation.go_previous() {
            Some(transition) => Some(self.on_transition(transition)),
            None => {
                debug!("Already at the first slide");
                None
            }
        }
    }

    /// Activate `index` directly
    pub fn jump_to(&mut self, index: usize) -> Result<AutoPlay> {
        let transition = self.navigation.jump_to(index).map_err(|e| {
            debug!(index, error = %e, "Ignoring jump");
            e
        })?;
        Ok(self.on_transition(transition))
    }

    /// Track link: same as a jump, the menu is left alone
    pub fn select_track(&mut self, index: usize) -> Result<AutoPlay> {
        self.jump_to(index)
    }

    fn on_transition(&mut self, transition: Transition) -> AutoPlay {
        self.activate(Some(transition.from), transition.to)
    }

    fn activate(&mut self, from: Option<usize>, to: usize) -> AutoPlay {
        self.view.activate(from, to);
        self.view
            .set_nav_visibility(!self.navigation.is_first(), !self.navigation.is_last());
        self.coordinator.emit(PlaybackEvent::SlideChanged { from, to });
        self.coordinator.on_navigation(&self.deck, to)
    }

    // ===== Playback =====

    /// Per-slide play/pause control
    pub fn toggle_playback(&mut self, slide: usize) -> Result<Toggle> {
        self.coordinator
            .toggle_user_playback(&self.deck, slide)
            .map_err(|e| {
                error!(slide, error = %e, "Play/pause failed");
                e
            })
    }

    /// Silence everything
    pub fn stop_all(&mut self) {
        self.coordinator.stop_all();
    }

    /// Record a user gesture; true the first time
    pub fn register_gesture(&mut self) -> bool {
        self.coordinator.unlock(&self.deck)
    }

    /// Apply a deferred platform result
    pub fn handle_signal(&mut self, signal: HostSignal) {
        self.coordinator.handle_signal(signal);
    }

    // ===== Menu =====

    /// Stop all audio and show the overlay
    pub fn open_menu(&mut self) {
        self.coordinator.stop_all();
        self.set_menu(true);
    }

    /// Hide the overlay
    pub fn close_menu(&mut self) {
        self.set_menu(false);
    }

    /// Menu link: jump, then close; an invalid index keeps the menu open
    pub fn select_menu_item(&mut self, index: usize) -> Result<AutoPlay> {
        let outcome = self.jump_to(index)?;
        self.close_menu();
        Ok(outcome)
    }

    fn set_menu(&mut self, open: bool) {
        self.view.set_menu_open(open);
        if self.menu_open != open {
            self.menu_open = open;
            debug!(open, "Menu toggled");
            self.coordinator.emit(PlaybackEvent::MenuToggled { open });
        }
    }

    // ===== Layout =====

    /// Recompute the backdrop diameter for a slider of `width` x `height`
    pub fn resize(&mut self, width: f64, height: f64) -> f64 {
        let diameter = geometry::diameter(width, height);
        self.view.set_diameter(diameter);
        if diameter != self.diameter {
            self.diameter = diameter;
            self.coordinator
                .emit(PlaybackEvent::DiameterChanged { diameter });
        }
        diameter
    }

    // ===== Commands =====

    /// Apply a command value
    ///
    /// Navigation at a bound is not an error; invalid indices and missing
    /// audio are.
    pub fn apply(&mut self, command: CarouselCommand) -> Result<()> {
        debug!(%command, "Applying command");
        match command {
            CarouselCommand::Gesture => {
                self.register_gesture();
            }
            CarouselCommand::Next => {
                self.go_next();
            }
            CarouselCommand::Previous => {
                self.go_previous();
            }
            CarouselCommand::JumpTo { index } => {
                self.jump_to(index)?;
            }
            CarouselCommand::Toggle { slide } => {
                self.toggle_playback(slide)?;
            }
            CarouselCommand::StopAll => self.stop_all(),
            CarouselCommand::OpenMenu => self.open_menu(),
            CarouselCommand::CloseMenu => self.close_menu(),
            CarouselCommand::SelectMenuItem { index } => {
                self.select_menu_item(index)?;
            }
            CarouselCommand::SelectTrack { index } => {
                self.select_track(index)?;
            }
            CarouselCommand::Resize { width, height } => {
                self.resize(width, height);
            }
        }
        Ok(())
    }

    // ===== Events =====

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.coordinator.drain_events()
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        self.coordinator.has_pending_events()
    }

    // ===== State Queries =====

    /// Slide registry
    pub fn deck(&self) -> &SlideDeck {
        &self.deck
    }

    /// Active slide
    pub fn active(&self) -> usize {
        self.navigation.active()
    }

    /// Navigation state
    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    /// Playback coordinator
    pub fn coordinator(&self) -> &PlaybackCoordinator<T, A, S> {
        &self.coordinator
    }

    /// Playback coordinator (mutable), for hosts that reach the transport
    pub fn coordinator_mut(&mut self) -> &mut PlaybackCoordinator<T, A, S> {
        &mut self.coordinator
    }

    /// Playback phase
    pub fn phase(&self) -> PlaybackPhase {
        self.coordinator.phase()
    }

    /// View
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Whether the overlay menu is open
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Last computed backdrop diameter
    pub fn diameter(&self) -> f64 {
        self.diameter
    }
}
