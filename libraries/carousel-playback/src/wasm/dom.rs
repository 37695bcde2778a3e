//! DOM lookup and listener helpers

use carousel_core::{CarouselError, Result};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Window};

pub(crate) fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| CarouselError::binding("window is not available"))
}

pub(crate) fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| CarouselError::binding("document is not available"))
}

/// All elements matching `selector`, in document order
pub(crate) fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>> {
    let nodes = document
        .query_selector_all(selector)
        .map_err(|e| CarouselError::binding(format!("bad selector {}: {}", selector, js_error(&e))))?;

    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

pub(crate) fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub(crate) fn require(document: &Document, selector: &str) -> Result<Element> {
    query(document, selector)
        .ok_or_else(|| CarouselError::binding(format!("element not found: {}", selector)))
}

pub(crate) fn query_in(parent: &Element, selector: &str) -> Option<Element> {
    parent.query_selector(selector).ok().flatten()
}

/// Parsed `data-slide` attribute
pub(crate) fn slide_index(element: &Element) -> Option<usize> {
    element
        .get_attribute("data-slide")
        .and_then(|value| value.trim().parse().ok())
}

pub(crate) fn set_class(element: &Element, class: &str, on: bool) {
    let classes = element.class_list();
    let result = if on {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
    if let Err(e) = result {
        tracing::debug!(class, error = %js_error(&e), "Class update failed");
    }
}

/// `(offsetWidth, offsetHeight)` of an element
pub(crate) fn size(element: &Element) -> Option<(f64, f64)> {
    element
        .dyn_ref::<HtmlElement>()
        .map(|el| (f64::from(el.offset_width()), f64::from(el.offset_height())))
}

/// Attach `handler` for the lifetime of the page
pub(crate) fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(|e| CarouselError::binding(format!("cannot listen for {}: {}", event, js_error(&e))))?;
    callback.forget();
    Ok(())
}

/// Best-effort message for a thrown JS value
pub(crate) fn js_error(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return format!("{}: {}", String::from(error.name()), String::from(error.message()));
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
