//! `<audio>` element transport

use super::dom::js_error;
use carousel_core::{AudioTransport, HostSignal, PlaybackToken, SignalSink};
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::HtmlAudioElement;

/// One optional `<audio>` element per slide
///
/// `play()` promises are awaited on the microtask queue and reported back as
/// `HostSignal::PlaySettled`.
pub(crate) struct DomAudioTransport {
    audio: Vec<Option<HtmlAudioElement>>,
    claims: Vec<Rc<Cell<u64>>>,
    sink: Rc<dyn SignalSink>,
}

impl DomAudioTransport {
    pub(crate) fn new(audio: Vec<Option<HtmlAudioElement>>, sink: Rc<dyn SignalSink>) -> Self {
        let claims = audio.iter().map(|_| Rc::new(Cell::new(0))).collect();
        Self {
            audio,
            claims,
            sink,
        }
    }

    fn element(&self, slide: usize) -> Option<&HtmlAudioElement> {
        self.audio.get(slide).and_then(Option::as_ref)
    }
}

impl AudioTransport for DomAudioTransport {
    fn bound_source(&self, slide: usize) -> Option<String> {
        self.element(slide)
            .map(|audio| audio.src())
            .filter(|src| !src.is_empty())
    }

    fn bind_source(&mut self, slide: usize, src: &str) {
        if let Some(audio) = self.element(slide) {
            audio.set_src(src);
        }
    }

    fn load(&mut self, slide: usize) {
        if let Some(audio) = self.element(slide) {
            audio.load();
        }
    }

    fn begin_playback(&mut self, slide: usize, token: PlaybackToken) {
        if let Some(claim) = self.claims.get(slide) {
            claim.set(claim.get() + 1);
        }

        let sink = Rc::clone(&self.sink);
        let started = match self.element(slide) {
            Some(audio) => audio.play().map_err(|e| js_error(&e)),
            None => Err("no audio element".to_string()),
        };

        spawn_local(async move {
            let outcome = match started {
                Ok(promise) => JsFuture::from(promise)
                    .await
                    .map(|_| ())
                    .map_err(|e| js_error(&e)),
                Err(reason) => Err(reason),
            };
            sink.deliver(HostSignal::PlaySettled { token, outcome });
        });
    }

    fn pause(&mut self, slide: usize) {
        if let Some(audio) = self.element(slide) {
            if let Err(e) = audio.pause() {
                debug!(slide, error = %js_error(&e), "pause() threw");
            }
        }
    }

    fn rewind(&mut self, slide: usize) {
        if let Some(audio) = self.element(slide) {
            audio.set_current_time(0.0);
        }
    }

    fn is_paused(&self, slide: usize) -> bool {
        !self.element(slide).is_some_and(|audio| !audio.paused())
    }

    fn is_ended(&self, slide: usize) -> bool {
        self.element(slide).is_some_and(|audio| audio.ended())
    }

    /// Play then immediately pause, so later programmatic `play()` calls are
    /// allowed. Skipped if real playback claimed the element meanwhile.
    fn prime(&mut self, slide: usize, src: &str) {
        let (Some(audio), Some(claim)) = (self.element(slide).cloned(), self.claims.get(slide))
        else {
            return;
        };

        audio.set_src(src);
        let Ok(promise) = audio.play() else {
            return;
        };

        let claim = Rc::clone(claim);
        let claimed_at = claim.get();
        spawn_local(async move {
            if JsFuture::from(promise).await.is_err() {
                debug!(slide, "Priming play was refused");
                return;
            }
            if claim.get() == claimed_at {
                audio.pause().ok();
                audio.set_current_time(0.0);
            }
        });
    }
}
