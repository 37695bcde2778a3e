//! WASM-compatible carousel wrapper

use super::affordance::DomAffordances;
use super::config::WebConfig;
use super::dom;
use super::logging;
use super::scheduler::TimeoutScheduler;
use super::transport::DomAudioTransport;
use super::view::DomView;
use crate::{Carousel, PlaybackEvent, PlaybackPhase};
use carousel_core::{
    CarouselError, HostSignal, MediaEvent, SignalSink, Slide, SlideDeck,
};
use js_sys::Function;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use tracing::{debug, error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlAudioElement, HtmlElement};

type DomCarousel = Carousel<DomAudioTransport, DomAffordances, TimeoutScheduler, DomView>;

/// Forwards transport/timer results to the host once it exists
#[derive(Default)]
struct SignalRouter {
    target: RefCell<Option<Weak<dyn SignalSink>>>,
}

impl SignalRouter {
    fn connect<T: SignalSink + 'static>(&self, target: &Rc<T>) {
        let target: Weak<T> = Rc::downgrade(target);
        *self.target.borrow_mut() = Some(target);
    }
}

impl SignalSink for SignalRouter {
    fn deliver(&self, signal: HostSignal) {
        let target = self.target.borrow().as_ref().and_then(Weak::upgrade);
        match target {
            Some(target) => target.deliver(signal),
            None => debug!(?signal, "Carousel is gone, dropping signal"),
        }
    }
}

/// Shared state behind `WasmCarousel` and the DOM listeners
struct Host {
    carousel: RefCell<DomCarousel>,
    backlog: RefCell<VecDeque<HostSignal>>,
    slider: Option<Element>,
    on_event: RefCell<Option<Function>>,
}

impl Host {
    /// Run `action`, then apply queued signals and forward events
    fn run<R>(&self, action: impl FnOnce(&mut DomCarousel) -> R) -> R {
        let result = action(&mut self.carousel.borrow_mut());
        self.settle();
        result
    }

    fn settle(&self) {
        loop {
            let Some(signal) = self.backlog.borrow_mut().pop_front() else {
                break;
            };
            match self.carousel.try_borrow_mut() {
                Ok(mut carousel) => carousel.handle_signal(signal),
                Err(_) => {
                    self.backlog.borrow_mut().push_front(signal);
                    return;
                }
            }
        }

        let events = match self.carousel.try_borrow_mut() {
            Ok(mut carousel) => carousel.drain_events(),
            Err(_) => return,
        };
        self.forward(&events);
    }

    fn forward(&self, events: &[PlaybackEvent]) {
        let callback = self.on_event.borrow().clone();
        let Some(callback) = callback else {
            return;
        };

        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        for event in events {
            if let Ok(value) = event.serialize(&serializer) {
                callback.call1(&JsValue::NULL, &value).ok();
            }
        }
    }

    fn resize(&self) {
        if let Some((width, height)) = self.slider.as_ref().and_then(dom::size) {
            self.run(|c| c.resize(width, height));
        }
    }
}

impl SignalSink for Host {
    fn deliver(&self, signal: HostSignal) {
        self.backlog.borrow_mut().push_back(signal);
        self.settle();
    }
}

/// Carousel bound to the current document
#[wasm_bindgen]
pub struct WasmCarousel {
    host: Rc<Host>,
}

#[wasm_bindgen]
impl WasmCarousel {
    /// Bind to the page and render the start slide
    ///
    /// `options` is an optional object shaped like `WebConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<WasmCarousel, JsValue> {
        console_error_panic_hook::set_once();

        let config = WebConfig::from_js(options).map_err(to_js)?;
        logging::init(&config.log_filter);

        let host = mount(&config).map_err(|e| {
            error!(error = %e, "Carousel binding failed");
            to_js(e)
        })?;
        Ok(Self { host })
    }

    // ===== Navigation =====

    /// Show the next slide
    pub fn next(&self) {
        self.host.run(|c| {
            c.register_gesture();
            c.go_next();
        });
    }

    /// Show the previous slide
    pub fn previous(&self) {
        self.host.run(|c| {
            c.register_gesture();
            c.go_previous();
        });
    }

    /// Show slide `index`
    #[wasm_bindgen(js_name = jumpTo)]
    pub fn jump_to(&self, index: usize) -> Result<(), JsValue> {
        self.host.run(|c| c.jump_to(index)).map(|_| ()).map_err(to_js)
    }

    /// Show slide `index` without touching the menu
    #[wasm_bindgen(js_name = selectTrack)]
    pub fn select_track(&self, index: usize) -> Result<(), JsValue> {
        self.host
            .run(|c| c.select_track(index))
            .map(|_| ())
            .map_err(to_js)
    }

    // ===== Playback =====

    /// Play/pause slide `slide`'s narration in full
    pub fn toggle(&self, slide: usize) -> Result<(), JsValue> {
        self.host
            .run(|c| {
                c.register_gesture();
                c.toggle_playback(slide)
            })
            .map(|_| ())
            .map_err(to_js)
    }

    /// Silence everything
    #[wasm_bindgen(js_name = stopAll)]
    pub fn stop_all(&self) {
        self.host.run(|c| c.stop_all());
    }

    /// Record a user gesture; true the first time
    pub fn unlock(&self) -> bool {
        self.host.run(|c| c.register_gesture())
    }

    // ===== Menu =====

    /// Open the overlay menu (stops audio)
    #[wasm_bindgen(js_name = openMenu)]
    pub fn open_menu(&self) {
        self.host.run(|c| c.open_menu());
    }

    /// Close the overlay menu
    #[wasm_bindgen(js_name = closeMenu)]
    pub fn close_menu(&self) {
        self.host.run(|c| c.close_menu());
    }

    /// Jump to `index` and close the menu
    #[wasm_bindgen(js_name = selectMenuItem)]
    pub fn select_menu_item(&self, index: usize) -> Result<(), JsValue> {
        self.host
            .run(|c| c.select_menu_item(index))
            .map(|_| ())
            .map_err(to_js)
    }

    // ===== State Queries =====

    /// Active slide index
    #[wasm_bindgen(js_name = getActive)]
    pub fn get_active(&self) -> usize {
        self.host.carousel.borrow().active()
    }

    /// Number of slides
    #[wasm_bindgen(js_name = slideCount)]
    pub fn slide_count(&self) -> usize {
        self.host.carousel.borrow().deck().len()
    }

    /// "idle" | "starting" | "snippet" | "user" | "paused"
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        match self.host.carousel.borrow().phase() {
            PlaybackPhase::Idle => "idle".to_string(),
            PlaybackPhase::Starting(_) => "starting".to_string(),
            PlaybackPhase::AutoPlaying => "snippet".to_string(),
            PlaybackPhase::UserPlaying => "user".to_string(),
            PlaybackPhase::Paused => "paused".to_string(),
        }
    }

    /// Check if the overlay menu is open
    #[wasm_bindgen(js_name = isMenuOpen)]
    pub fn is_menu_open(&self) -> bool {
        self.host.carousel.borrow().is_menu_open()
    }

    // ===== Event Listeners =====

    /// Register a callback receiving every `PlaybackEvent` as a plain object
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: Function) {
        *self.host.on_event.borrow_mut() = Some(callback);
    }
}

fn to_js(error: CarouselError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

// ===== Binding =====

fn mount(config: &WebConfig) -> carousel_core::Result<Rc<Host>> {
    let document = dom::document()?;
    let selectors = &config.selectors;

    let items = dom::query_all(&document, &selectors.slides)?;
    if items.is_empty() {
        return Err(CarouselError::binding("no slider items found"));
    }
    let previous = dom::require(&document, &selectors.previous)?;
    let next = dom::require(&document, &selectors.next)?;

    let mut slides = Vec::with_capacity(items.len());
    let mut audio = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let element = dom::query_in(item, &selectors.audio)
            .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok());
        let src = element
            .as_ref()
            .and_then(|el| dom::query_in(el, &selectors.source))
            .and_then(|source| source.get_attribute("src"));

        let mut slide = Slide::new(index);
        if let Some(src) = src {
            slide = slide.with_audio(src);
        }
        if let Some(title) = item.get_attribute("data-title") {
            slide = slide.with_title(title);
        }
        slides.push(slide);
        audio.push(element);
    }
    let deck = SlideDeck::new(slides)?;
    info!(
        slides = deck.len(),
        narrated = deck.slides_with_audio().count(),
        "Slides found"
    );

    let router = Rc::new(SignalRouter::default());
    let sink: Rc<dyn SignalSink> = router.clone();

    let view = DomView {
        slides: items,
        previous: previous.clone(),
        next: next.clone(),
        overlay: dom::query(&document, &selectors.menu_overlay),
        body: document.body(),
        root: document
            .document_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok()),
        classes: selectors.clone(),
    };

    let carousel = Carousel::new(
        deck,
        config.playback.clone(),
        DomAudioTransport::new(audio.clone(), Rc::clone(&sink)),
        DomAffordances::new(
            dom::query_all(&document, &selectors.play_pause)?,
            &selectors.playing_class,
        ),
        TimeoutScheduler::new(sink),
        view,
    )?;

    let host = Rc::new(Host {
        carousel: RefCell::new(carousel),
        backlog: RefCell::new(VecDeque::new()),
        slider: dom::query(&document, &selectors.slider),
        on_event: RefCell::new(None),
    });
    router.connect(&host);

    wire(&host, &document, config, &previous, &next, &audio)?;

    host.run(|c| c.start());
    host.resize();
    Ok(host)
}

/// Call `action` on the host if it is still alive
fn with_host(host: &Weak<Host>, action: impl FnOnce(&Host)) {
    if let Some(host) = host.upgrade() {
        action(&host);
    }
}

fn wire(
    host: &Rc<Host>,
    document: &Document,
    config: &WebConfig,
    previous: &Element,
    next: &Element,
    audio: &[Option<HtmlAudioElement>],
) -> carousel_core::Result<()> {
    let selectors = &config.selectors;
    let weak = Rc::downgrade(host);

    // Any interaction unlocks audio
    for event in ["click", "touchstart"] {
        let weak = weak.clone();
        dom::listen(document, event, move |_| {
            with_host(&weak, |h| {
                h.run(|c| c.register_gesture());
            });
        })?;
    }

    {
        let weak = weak.clone();
        dom::listen(next, "click", move |_| {
            with_host(&weak, |h| {
                h.run(|c| {
                    c.register_gesture();
                    c.go_next();
                });
            });
        })?;
    }

    {
        let weak = weak.clone();
        dom::listen(previous, "click", move |_| {
            with_host(&weak, |h| {
                h.run(|c| {
                    c.register_gesture();
                    c.go_previous();
                });
            });
        })?;
    }

    let buttons = dom::query_all(document, &selectors.play_pause)?;
    if buttons.is_empty() {
        debug!("No play/pause buttons found");
    }
    for button in &buttons {
        let weak = weak.clone();
        let slide = dom::slide_index(button);
        dom::listen(button, "click", move |event: Event| {
            event.stop_propagation();
            event.prevent_default();
            let Some(slide) = slide else {
                error!("Play/pause button has no valid data-slide");
                return;
            };
            with_host(&weak, |h| {
                h.run(|c| {
                    c.register_gesture();
                    c.toggle_playback(slide).ok();
                });
            });
        })?;
    }

    for link in dom::query_all(document, &selectors.track_links)? {
        let weak = weak.clone();
        let slide = dom::slide_index(&link);
        dom::listen(&link, "click", move |event: Event| {
            event.prevent_default();
            event.stop_propagation();
            if let Some(slide) = slide {
                with_host(&weak, |h| {
                    h.run(|c| c.select_track(slide).ok());
                });
            }
        })?;
    }

    if let Some(toggle) = dom::query(document, &selectors.menu_toggle) {
        let weak = weak.clone();
        dom::listen(&toggle, "click", move |_| {
            with_host(&weak, |h| h.run(|c| c.open_menu()));
        })?;
    }

    if let Some(close) = dom::query(document, &selectors.menu_close) {
        let weak = weak.clone();
        dom::listen(&close, "click", move |_| {
            with_host(&weak, |h| h.run(|c| c.close_menu()));
        })?;
    }

    if let Some(overlay) = dom::query(document, &selectors.menu_overlay) {
        let weak = weak.clone();
        let backdrop = overlay.clone();
        dom::listen(&overlay, "click", move |event: Event| {
            let on_backdrop = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .is_some_and(|target| target == backdrop);
            if on_backdrop {
                with_host(&weak, |h| h.run(|c| c.close_menu()));
            }
        })?;
    }

    for link in dom::query_all(document, &selectors.menu_links)? {
        let weak = weak.clone();
        let slide = dom::slide_index(&link);
        dom::listen(&link, "click", move |event: Event| {
            event.prevent_default();
            if let Some(slide) = slide {
                with_host(&weak, |h| {
                    h.run(|c| {
                        c.register_gesture();
                        c.select_menu_item(slide).ok();
                    });
                });
            }
        })?;
    }

    for (slide, element) in audio.iter().enumerate() {
        let Some(element) = element else {
            continue;
        };
        for (name, event) in [
            ("play", MediaEvent::Play),
            ("pause", MediaEvent::Pause),
            ("ended", MediaEvent::Ended),
        ] {
            let weak = weak.clone();
            dom::listen(element, name, move |_| {
                with_host(&weak, |h| h.deliver(HostSignal::Media { slide, event }));
            })?;
        }
    }

    let window = dom::window()?;
    dom::listen(&window, "resize", move |_| {
        with_host(&weak, Host::resize);
    })?;

    Ok(())
}
