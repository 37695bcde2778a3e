//! Browser host configuration

use carousel_core::{CarouselError, PlaybackConfig, Result};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

/// CSS selectors and class names the binding relies on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomSelectors {
    pub slider: String,
    pub slides: String,
    pub audio: String,
    pub source: String,
    pub previous: String,
    pub next: String,
    pub play_pause: String,
    pub track_links: String,
    pub menu_toggle: String,
    pub menu_overlay: String,
    pub menu_close: String,
    pub menu_links: String,
    pub active_class: String,
    pub hidden_class: String,
    pub playing_class: String,
    pub menu_open_class: String,
}

impl Default for DomSelectors {
    fn default() -> Self {
        Self {
            slider: ".slider".to_string(),
            slides: ".slider .list .item".to_string(),
            audio: ".slide-audio".to_string(),
            source: "source".to_string(),
            previous: "#prev".to_string(),
            next: "#next".to_string(),
            play_pause: ".play-pause-btn".to_string(),
            track_links: ".track-link".to_string(),
            menu_toggle: "#menu-toggle".to_string(),
            menu_overlay: "#menu-overlay".to_string(),
            menu_close: "#menu-close".to_string(),
            menu_links: ".menu-link[data-slide]".to_string(),
            active_class: "active".to_string(),
            hidden_class: "d-none".to_string(),
            playing_class: "playing".to_string(),
            menu_open_class: "menu-open".to_string(),
        }
    }
}

/// Everything `new WasmCarousel(config)` accepts
///
/// Every field is optional on the JS side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Snippet length, start slide, priming
    pub playback: PlaybackConfig,

    /// DOM contract
    pub selectors: DomSelectors,

    /// `tracing` filter directive for console output
    pub log_filter: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            selectors: DomSelectors::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl WebConfig {
    /// Decode a JS object; `undefined`/`null` give the defaults
    pub fn from_js(value: JsValue) -> Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }

        serde_wasm_bindgen::from_value(value)
            .map_err(|e| CarouselError::config(format!("Invalid carousel options: {}", e)))
    }
}
