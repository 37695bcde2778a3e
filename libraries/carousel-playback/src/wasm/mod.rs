//! WASM bindings for carousel-playback
//!
//! Binds the carousel to the page's fixed DOM structure (slides, audio
//! elements, navigation and menu controls) and exposes a small JavaScript
//! API for hosts that want to drive it or observe its events.

mod affordance;
mod carousel;
mod config;
mod dom;
mod logging;
mod scheduler;
mod transport;
mod view;

pub use carousel::WasmCarousel;
pub use config::{DomSelectors, WebConfig};
