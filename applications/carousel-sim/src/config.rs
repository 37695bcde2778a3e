/// Simulator configuration
use crate::error::{Result, SimError};
use carousel_core::{PlaybackConfig, Slide, SlideDeck};
use carousel_playback::GestureGate;
use carousel_runtime::SimulatedAudioConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "carousel.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimConfig {
    #[serde(default)]
    pub slides: Vec<SlideSettings>,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_audio")]
    pub audio: AudioSettings,

    #[serde(default)]
    pub viewport: Option<ViewportSettings>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SlideSettings {
    #[serde(default)]
    pub title: Option<String>,

    /// Narration address; slides without one are silent
    #[serde(default)]
    pub audio: Option<String>,

    /// Track length (falls back to `audio.default_duration_ms`)
    #[serde(default)]
    pub duration_ms: Option<u64>,

    /// Simulate the platform refusing to play this slide
    #[serde(default)]
    pub reject: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioSettings {
    #[serde(default = "default_start_latency_ms")]
    pub start_latency_ms: u64,

    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u64,

    /// Start as if the visitor had already interacted with the page
    #[serde(default)]
    pub unlocked: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ViewportSettings {
    pub width: f64,
    pub height: f64,
}

impl SimConfig {
    /// Load configuration from file and environment
    ///
    /// Without an explicit path, `carousel.toml` in the working directory is
    /// used when present. Environment variables prefixed with `CAROUSEL_`
    /// override file values, with `__` between nested keys
    /// (`CAROUSEL_PLAYBACK__SNIPPET_DURATION_MS=15000`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    settings = settings.add_source(config::File::from(fallback));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CAROUSEL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document (no environment overrides)
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.slides.is_empty() {
            return Err(SimError::Config(
                "No slides configured (add [[slides]] entries)".to_string(),
            ));
        }

        self.playback.validate(self.slides.len())?;

        if self.audio.default_duration_ms == 0 {
            return Err(SimError::Config(
                "audio.default_duration_ms must be positive".to_string(),
            ));
        }

        if let Some(index) = self.slides.iter().position(|s| s.duration_ms == Some(0)) {
            return Err(SimError::Config(format!(
                "slides[{}].duration_ms must be positive",
                index
            )));
        }

        if let Some(viewport) = self.viewport {
            if !(viewport.width.is_finite() && viewport.height.is_finite()) {
                return Err(SimError::Config(
                    "viewport dimensions must be finite".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Slide registry
    pub fn deck(&self) -> Result<SlideDeck> {
        let slides = self
            .slides
            .iter()
            .enumerate()
            .map(|(index, settings)| Slide {
                index,
                title: settings.title.clone(),
                audio: settings.audio.clone(),
            })
            .collect();
        Ok(SlideDeck::new(slides)?)
    }

    /// Simulated audio behaviour
    pub fn audio_config(&self) -> SimulatedAudioConfig {
        let mut audio = SimulatedAudioConfig {
            start_latency: Duration::from_millis(self.audio.start_latency_ms),
            default_duration: Duration::from_millis(self.audio.default_duration_ms),
            ..SimulatedAudioConfig::default()
        };

        for (index, slide) in self.slides.iter().enumerate() {
            if let Some(ms) = slide.duration_ms {
                audio = audio.with_duration(index, Duration::from_millis(ms));
            }
            if slide.reject {
                audio = audio.reject(index);
            }
        }

        audio
    }

    /// Gesture gate the session starts with
    pub fn gate(&self) -> GestureGate {
        if self.audio.unlocked {
            GestureGate::unlocked()
        } else {
            GestureGate::new()
        }
    }
}

// Default values
fn default_audio() -> AudioSettings {
    AudioSettings {
        start_latency_ms: default_start_latency_ms(),
        default_duration_ms: default_duration_ms(),
        unlocked: false,
    }
}

fn default_start_latency_ms() -> u64 {
    50
}

fn default_duration_ms() -> u64 {
    180_000
}
