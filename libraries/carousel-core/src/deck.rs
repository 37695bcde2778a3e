//! Slide registry
//!
//! Ordered, immutable sequence of slides built once at startup.

use crate::error::{CarouselError, Result};
use serde::{Deserialize, Serialize};

/// One unit of the carousel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Position in the deck (stable for the session)
    pub index: usize,

    /// Label shown in the overlay menu (optional)
    #[serde(default)]
    pub title: Option<String>,

    /// Address of the narration audio (optional)
    #[serde(default)]
    pub audio: Option<String>,
}

impl Slide {
    /// Create a slide with no title and no audio
    pub fn new(index: usize) -> Self {
        Self {
            index,
            title: None,
            audio: None,
        }
    }

    /// Attach a narration address
    pub fn with_audio(mut self, src: impl Into<String>) -> Self {
        self.audio = Some(src.into());
        self
    }

    /// Attach a menu label
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Resolved audio address
    ///
    /// Empty or whitespace-only addresses count as absent.
    pub fn audio_source(&self) -> Option<&str> {
        self.audio
            .as_deref()
            .map(str::trim)
            .filter(|src| !src.is_empty())
    }
}

/// The slide registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideDeck {
    slides: Vec<Slide>,
}

impl SlideDeck {
    /// Build a deck
    ///
    /// Slides are re-indexed by position so `slides[i].index == i` always holds.
    ///
    /// # Errors
    /// Returns `EmptyDeck` when `slides` is empty.
    pub fn new(slides: Vec<Slide>) -> Result<Self> {
        if slides.is_empty() {
            return Err(CarouselError::EmptyDeck);
        }

        let slides = slides
            .into_iter()
            .enumerate()
            .map(|(index, slide)| Slide { index, ..slide })
            .collect();

        Ok(Self { slides })
    }

    /// Build a deck from audio addresses, one slide per entry
    ///
    /// `None` entries become silent slides.
    pub fn from_sources<I, S>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let slides = sources
            .into_iter()
            .enumerate()
            .map(|(index, src)| Slide {
                index,
                title: None,
                audio: src.map(Into::into),
            })
            .collect();
        Self::new(slides)
    }

    /// Number of slides
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false: construction rejects empty decks
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// First valid index
    pub fn first_index(&self) -> usize {
        0
    }

    /// Last valid index
    pub fn last_index(&self) -> usize {
        self.slides.len() - 1
    }

    /// Whether `index` names a slide
    pub fn contains(&self, index: usize) -> bool {
        index < self.slides.len()
    }

    /// Slide at `index`
    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// Slide at `index`, or `InvalidIndex`
    pub fn slide(&self, index: usize) -> Result<&Slide> {
        self.slides.get(index).ok_or(CarouselError::InvalidIndex {
            index,
            len: self.slides.len(),
        })
    }

    /// Audio address of the slide at `index`, if any
    pub fn audio_source(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(Slide::audio_source)
    }

    /// All slides, in order
    pub fn iter(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter()
    }

    /// Slides that carry narration
    pub fn slides_with_audio(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter().filter(|s| s.audio_source().is_some())
    }
}
