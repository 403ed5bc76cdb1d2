//! Property-based tests for the field key-up path.
//!
//! Random typing, caret moves and range selections are replayed against a
//! field; after every key the buffer must match what `decide` predicts and
//! the dispatched events must match the replay strategy.

use proptest::prelude::*;

use kc_core::settings::{ReplayMode, Settings};
use kc_core::unicode::char_len;
use kc_core::decide;

use super::Harness;
use crate::cache::MappingState;
use crate::dom::{Document, KeyEvent, NodeId, Selection};
use crate::field::Outcome;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Action {
    Type(char),
    /// Move the caret to `pos` (clamped to the text length).
    MoveCaret(usize),
    /// Select `[a, b)` (clamped, non-empty when the text allows).
    Select(usize, usize),
    Enter,
}

fn arb_key() -> impl Strategy<Value = char> {
    prop_oneof![
        5 => prop::sample::select(vec!['a', 'b', 'c', 'h', 's', 'y']),
        1 => prop::sample::select(vec!['1', ' ', 'q', 'S', 'я']),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        20 => arb_key().prop_map(Action::Type),
        3 => (0usize..12).prop_map(Action::MoveCaret),
        2 => (0usize..12, 0usize..12).prop_map(|(a, b)| Action::Select(a, b)),
        1 => Just(Action::Enter),
    ]
}

// ---------------------------------------------------------------------------
// Invariants
// ---------------------------------------------------------------------------

/// Press `c` on `el` and check the replacement against a model run of
/// `decide` on the natively typed buffer.
fn check_type(h: &mut Harness, el: NodeId, c: char, mode: ReplayMode) {
    let event = KeyEvent::from_char(c);
    h.fields.key_down(&mut h.doc, el, &event);
    h.doc.type_char(el, c);
    let typed = h.value(el);
    let caret = h.doc.selection(el).caret().expect("native typing collapses the caret");
    h.doc.take_events();

    let outcome = h.fields.key_up(&mut h.doc, &h.cache, el, &event);
    let events = h.doc.take_events();

    let MappingState::Ready(table) = h.cache.get("ru") else {
        panic!("ru should be loaded");
    };
    match decide(&typed, caret, &table) {
        Some(expected) => {
            assert_eq!(outcome, Outcome::Replaced(expected.clone()));
            let (value, new_caret) = expected.apply(&typed, caret);
            assert_eq!(h.value(el), value);
            assert_eq!(h.doc.selection(el), Selection::collapsed(new_caret));
            let expected_events = match mode {
                ReplayMode::Keystrokes => {
                    3 * expected.remove_len + 4 * char_len(&expected.insert_text)
                }
                ReplayMode::Bulk => 1,
            };
            assert_eq!(events.len(), expected_events);
        }
        None => {
            assert_eq!(outcome, Outcome::NoMatch);
            assert_eq!(h.value(el), typed);
            assert!(events.is_empty());
        }
    }
}

fn run(actions: &[Action], mode: ReplayMode) {
    let mut settings = Settings::default();
    settings.fields.replay = mode;
    let mut h = Harness::with_settings(settings);
    let el = h.textarea(Some("ru"));
    h.scan_and_settle();

    for action in actions {
        let len = char_len(&h.value(el));
        match *action {
            Action::Type(c) => check_type(&mut h, el, c, mode),
            Action::MoveCaret(pos) => {
                h.doc.set_selection(el, Selection::collapsed(pos.min(len)));
            }
            Action::Select(a, b) => {
                let (a, b) = (a.min(b).min(len), a.max(b).min(len));
                h.doc.set_selection(el, Selection::range(a, b));
                if a != b {
                    // A range selection never remaps, whatever precedes it.
                    let before = h.value(el);
                    let outcome =
                        h.fields
                            .key_up(&mut h.doc, &h.cache, el, &KeyEvent::from_char('h'));
                    assert_eq!(outcome, Outcome::NoSelection);
                    assert_eq!(h.value(el), before);
                }
            }
            Action::Enter => {
                let before = h.doc.selection(el);
                h.fields.key_down(&mut h.doc, el, &KeyEvent::enter());
                assert_eq!(h.doc.selection(el), before);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn keystroke_replay_matches_decide(
        actions in prop::collection::vec(arb_action(), 1..40)
    ) {
        run(&actions, ReplayMode::Keystrokes);
    }

    #[test]
    fn bulk_replace_matches_decide(
        actions in prop::collection::vec(arb_action(), 1..40)
    ) {
        run(&actions, ReplayMode::Bulk);
    }
}
