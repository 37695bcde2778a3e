//! Property-based tests for the carousel
//!
//! Random sessions of navigation, play/pause, menu use, platform results and
//! elapsed time. After every step the playback invariants must hold.

mod common;

use carousel_core::{MediaEvent, PlaybackConfig};
use carousel_playback::GestureGate;
use common::Page;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Gesture,
    Next,
    Previous,
    Jump(usize),
    Toggle(usize),
    StopAll,
    OpenMenu,
    CloseMenu,
    SelectMenuItem(usize),
    /// Settle the oldest pending play request
    Settle(bool),
    /// Settle the newest pending play request
    SettleNewest(bool),
    Advance(u64),
    Finish(usize),
    Media(usize, MediaEvent),
}

// ===== Helpers =====

fn arbitrary_sources() -> impl Strategy<Value = Vec<Option<String>>> {
    prop::collection::vec(
        proptest::option::weighted(0.75, "[a-z]{1,8}\\.mp3"),
        1..6,
    )
}

fn arbitrary_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => Just(Step::Gesture),
        3 => Just(Step::Next),
        2 => Just(Step::Previous),
        1 => (0usize..8).prop_map(Step::Jump),
        3 => (0usize..6).prop_map(Step::Toggle),
        1 => Just(Step::StopAll),
        1 => Just(Step::OpenMenu),
        1 => Just(Step::CloseMenu),
        1 => (0usize..8).prop_map(Step::SelectMenuItem),
        4 => any::<bool>().prop_map(Step::Settle),
        2 => any::<bool>().prop_map(Step::SettleNewest),
        3 => (0u64..90_000).prop_map(Step::Advance),
        1 => (0usize..6).prop_map(Step::Finish),
        1 => (
            0usize..6,
            prop_oneof![
                Just(MediaEvent::Play),
                Just(MediaEvent::Pause),
                Just(MediaEvent::Ended)
            ]
        )
            .prop_map(|(slide, event)| Step::Media(slide, event)),
    ]
}

fn page_for(sources: &[Option<String>], locked: bool) -> Page {
    let sources: Vec<Option<&str>> = sources.iter().map(|s| s.as_deref()).collect();
    let gate = if locked {
        GestureGate::new()
    } else {
        GestureGate::unlocked()
    };
    Page::build(&sources, PlaybackConfig::default(), gate)
}

/// Apply a step; returns true when it was a navigation that changed the slide
fn apply(page: &mut Page, step: &Step) -> bool {
    let len = page.carousel.deck().len();
    match *step {
        Step::Gesture => {
            page.carousel.register_gesture();
        }
        Step::Next => return page.carousel.go_next().is_some(),
        Step::Previous => return page.carousel.go_previous().is_some(),
        Step::Jump(index) => return page.carousel.jump_to(index).is_ok(),
        Step::Toggle(slide) => {
            page.carousel.toggle_playback(slide).ok();
        }
        Step::StopAll => page.carousel.stop_all(),
        Step::OpenMenu => page.carousel.open_menu(),
        Step::CloseMenu => page.carousel.close_menu(),
        Step::SelectMenuItem(index) => return page.carousel.select_menu_item(index).is_ok(),
        Step::Settle(accepted) => {
            if let Some(token) = page.next_pending() {
                page.settle(token, accepted);
            }
        }
        Step::SettleNewest(accepted) => {
            let newest = page.world.borrow().pending.last().copied();
            if let Some(token) = newest {
                page.settle(token, accepted);
            }
        }
        Step::Advance(ms) => page.advance(ms),
        Step::Finish(slide) => {
            if slide < len {
                page.finish(slide);
            }
        }
        Step::Media(slide, event) => {
            if slide < len {
                page.media(slide, event);
            }
        }
    }
    false
}

fn check_invariants(page: &Page) -> Result<(), TestCaseError> {
    let coordinator = page.carousel.coordinator();
    let current = coordinator.current_token();

    // Only the current handle may be audible
    let audible = page.audible();
    prop_assert!(audible.len() <= 1, "overlapping audio: {:?}", audible);
    if let Some(slide) = audible.first() {
        prop_assert_eq!(current.map(|t| t.slide), Some(*slide));
    }

    // Manual control never coexists with a snippet timer
    if coordinator.is_user_controlled() {
        prop_assert_eq!(coordinator.armed_timer(), None);
    }

    // A timer only exists for the current handle
    if let Some(armed) = coordinator.armed_timer() {
        prop_assert_eq!(current, Some(armed));
    }

    // The page's scheduler agrees with the coordinator
    let timers: Vec<_> = page.timers().into_iter().map(|(t, _)| t).collect();
    prop_assert_eq!(timers, coordinator.armed_timer().into_iter().collect::<Vec<_>>());

    // Exactly one slide is shown
    prop_assert_eq!(page.world.borrow().active, Some(page.carousel.active()));

    Ok(())
}

// ===== Property Tests =====

proptest! {
    /// Property: invariants hold after every step of any session
    #[test]
    fn invariants_hold_across_sessions(
        sources in arbitrary_sources(),
        locked in any::<bool>(),
        steps in prop::collection::vec(arbitrary_step(), 1..60)
    ) {
        let mut page = page_for(&sources, locked);
        page.carousel.start();
        check_invariants(&page)?;

        for step in &steps {
            apply(&mut page, step);
            check_invariants(&page)?;
        }
    }

    /// Property: every successful navigation ends manual control
    #[test]
    fn navigation_clears_manual_control(
        sources in arbitrary_sources(),
        steps in prop::collection::vec(arbitrary_step(), 1..40)
    ) {
        let mut page = page_for(&sources, false);
        page.carousel.start();

        for step in &steps {
            if apply(&mut page, step) {
                prop_assert!(!page.carousel.coordinator().is_user_controlled());
            }
        }
    }

    /// Property: stop_all twice leaves the same state as once
    #[test]
    fn stop_all_is_idempotent(
        sources in arbitrary_sources(),
        steps in prop::collection::vec(arbitrary_step(), 0..40)
    ) {
        let mut page = page_for(&sources, false);
        page.carousel.start();
        for step in &steps {
            apply(&mut page, step);
        }

        page.carousel.stop_all();
        let once = (
            page.carousel.coordinator().state().clone(),
            page.audible(),
            page.world.borrow().buttons.clone(),
            page.timers(),
        );

        page.carousel.stop_all();
        let twice = (
            page.carousel.coordinator().state().clone(),
            page.audible(),
            page.world.borrow().buttons.clone(),
            page.timers(),
        );

        prop_assert_eq!(&once, &twice);
        prop_assert!(once.1.is_empty());
        prop_assert!(once.2.iter().all(|playing| !playing));
    }

    /// Property: navigation never leaves the deck
    #[test]
    fn active_slide_stays_in_bounds(
        len in 1usize..8,
        steps in prop::collection::vec(arbitrary_step(), 1..80)
    ) {
        let sources = vec![None; len];
        let mut page = page_for(&sources, true);
        page.carousel.start();

        for step in &steps {
            apply(&mut page, step);
            prop_assert!(page.carousel.active() < len);
            let world = page.world.borrow();
            prop_assert_eq!(world.show_previous, page.carousel.active() > 0);
            prop_assert_eq!(world.show_next, page.carousel.active() + 1 < len);
        }
    }
}
