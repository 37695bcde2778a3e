//! Play/pause button classes

use super::dom::{self, set_class};
use carousel_core::Affordances;
use web_sys::Element;

/// `.play-pause-btn[data-slide]` buttons, toggled with the playing class
pub(crate) struct DomAffordances {
    buttons: Vec<(Option<usize>, Element)>,
    playing_class: String,
}

impl DomAffordances {
    pub(crate) fn new(buttons: Vec<Element>, playing_class: &str) -> Self {
        Self {
            buttons: buttons
                .into_iter()
                .map(|button| (dom::slide_index(&button), button))
                .collect(),
            playing_class: playing_class.to_string(),
        }
    }
}

impl Affordances for DomAffordances {
    fn set_playing(&mut self, slide: usize, playing: bool) {
        self.buttons
            .iter()
            .filter(|(index, _)| *index == Some(slide))
            .for_each(|(_, button)| set_class(button, &self.playing_class, playing));
    }

    fn reset_all(&mut self) {
        for (_, button) in &self.buttons {
            set_class(button, &self.playing_class, false);
        }
    }
}
