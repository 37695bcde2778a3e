/// Core error types for Carousel
use thiserror::Error;

/// Result type alias using `CarouselError`
pub type Result<T> = std::result::Result<T, CarouselError>;

/// Core error type for Carousel
///
/// None of these are fatal for a running carousel: the worst case is that
/// nothing plays. Construction-time variants (`EmptyDeck`, `Config`,
/// `Binding`) stop a carousel from being built at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CarouselError {
    /// The platform declined to start playback (autoplay policy, decode error, network)
    #[error("Playback rejected for slide {slide}: {reason}")]
    PlaybackRejected { slide: usize, reason: String },

    /// Slide has no audio, or its source address is absent
    #[error("No audio resource for slide {slide}")]
    MissingResource { slide: usize },

    /// Navigation or toggle target out of range
    #[error("Slide index {index} out of range (deck has {len} slides)")]
    InvalidIndex { index: usize, len: usize },

    /// A deferred playback result arrived after its handle stopped being current
    #[error("Stale playback resolution for slide {slide}")]
    StaleResolution { slide: usize },

    /// A deck needs at least one slide
    #[error("Slide deck is empty")]
    EmptyDeck,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Host binding errors (missing DOM elements, unavailable window, ...)
    #[error("Binding error: {0}")]
    Binding(String),
}

impl CarouselError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a binding error
    pub fn binding(msg: impl Into<String>) -> Self {
        Self::Binding(msg.into())
    }

    /// Whether the error is one the carousel silently recovers from
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PlaybackRejected { .. }
                | Self::MissingResource { .. }
                | Self::InvalidIndex { .. }
                | Self::StaleResolution { .. }
        )
    }
}
