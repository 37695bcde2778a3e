//! Button state sync
//!
//! Stateless projection of playback state onto the per-slide play/pause
//! controls. Safe to call redundantly.

use carousel_core::{Affordances, AudioTransport};

/// Whether the transport reports the slide audible
pub fn is_audible<T: AudioTransport + ?Sized>(transport: &T, slide: usize) -> bool {
    !transport.is_paused(slide) && !transport.is_ended(slide)
}

/// Show `slide` as playing or not playing
pub fn project<A: Affordances + ?Sized>(affordances: &mut A, slide: usize, playing: bool) {
    affordances.set_playing(slide, playing);
}

/// Show `slide` the way the transport reports it
pub fn project_transport<A, T>(affordances: &mut A, transport: &T, slide: usize)
where
    A: Affordances + ?Sized,
    T: AudioTransport + ?Sized,
{
    project(affordances, slide, is_audible(transport, slide));
}
