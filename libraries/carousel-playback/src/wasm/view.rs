//! Slide, navigation and menu classes

use super::config::DomSelectors;
use super::dom::set_class;
use tracing::debug;
use web_sys::{Element, HtmlElement};

pub(crate) struct DomView {
    pub(crate) slides: Vec<Element>,
    pub(crate) previous: Element,
    pub(crate) next: Element,
    pub(crate) overlay: Option<Element>,
    pub(crate) body: Option<HtmlElement>,
    pub(crate) root: Option<HtmlElement>,
    pub(crate) classes: DomSelectors,
}

impl carousel_core::SlideView for DomView {
    fn activate(&mut self, _previous: Option<usize>, next: usize) {
        for (index, slide) in self.slides.iter().enumerate() {
            set_class(slide, &self.classes.active_class, index == next);
        }
    }

    fn set_nav_visibility(&mut self, show_previous: bool, show_next: bool) {
        set_class(&self.previous, &self.classes.hidden_class, !show_previous);
        set_class(&self.next, &self.classes.hidden_class, !show_next);
    }

    fn set_menu_open(&mut self, open: bool) {
        if let Some(overlay) = &self.overlay {
            set_class(overlay, &self.classes.active_class, open);
        }
        if let Some(body) = &self.body {
            set_class(body, &self.classes.menu_open_class, open);
        }
    }

    fn set_diameter(&mut self, diameter: f64) {
        let Some(root) = &self.root else {
            return;
        };
        if let Err(e) = root
            .style()
            .set_property("--diameter", &format!("{}px", diameter))
        {
            debug!(error = ?e, "Cannot set --diameter");
        }
    }
}
