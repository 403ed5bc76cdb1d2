//! Writing a decided replacement back into a field.
//!
//! Pages often watch editing key by key, so the default strategy replays the
//! edit as the keystrokes a user would have made: one Backspace per removed
//! char, then one key per inserted char, each with its input event. This is
//! a best-effort compatibility shim; hosts that need a different dispatch
//! sequence plug in their own `EditStrategy`.

use kc_core::settings::ReplayMode;
use kc_core::unicode::splice;
use kc_core::Replacement;

use crate::dom::{Document, InputInit, KeyEvent, KeyInit, NodeId, Selection, SyntheticEvent};

pub trait EditStrategy {
    /// Apply `replacement` to `el`, whose value is `text` with a collapsed
    /// cursor at `cursor`. `origin` is the key-up that triggered it.
    ///
    /// Afterwards the value is `text[..cursor - remove_len] + insert_text +
    /// text[cursor..]` and the cursor sits collapsed after the inserted text.
    fn apply(
        &self,
        doc: &mut dyn Document,
        el: NodeId,
        origin: &KeyEvent,
        text: &str,
        cursor: usize,
        replacement: &Replacement,
    );
}

pub fn strategy_for(mode: ReplayMode) -> Box<dyn EditStrategy> {
    match mode {
        ReplayMode::Keystrokes => Box::new(KeystrokeReplay),
        ReplayMode::Bulk => Box::new(BulkReplace),
    }
}

/// Char-by-char delete/insert replay.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeystrokeReplay;

impl EditStrategy for KeystrokeReplay {
    fn apply(
        &self,
        doc: &mut dyn Document,
        el: NodeId,
        origin: &KeyEvent,
        text: &str,
        cursor: usize,
        replacement: &Replacement,
    ) {
        let removed = replacement.remove_len.min(cursor);
        let start = cursor - removed;

        // 1. Delete the key, one Backspace at a time.
        for c in 1..=removed {
            doc.dispatch(el, SyntheticEvent::KeyDown(KeyInit::backspace()));
            doc.set_value(el, &splice(text, cursor - c, cursor, ""));
            doc.set_selection(el, Selection::collapsed(cursor - c));
            doc.dispatch(el, SyntheticEvent::Input(InputInit::delete_backward()));
            doc.dispatch(el, SyntheticEvent::KeyUp(KeyInit::backspace()));
        }

        // 2. Type the replacement, growing it one char at a time.
        let mut typed = String::with_capacity(replacement.insert_text.len());
        for (i, ch) in replacement.insert_text.chars().enumerate() {
            let key = KeyInit {
                key: ch.to_string(),
                code: origin.code.clone(),
                shift: origin.shift,
            };
            typed.push(ch);

            doc.dispatch(el, SyntheticEvent::KeyDown(key.clone()));
            doc.set_value(el, &splice(text, start, cursor, &typed));
            doc.dispatch(el, SyntheticEvent::KeyPress(key.clone()));
            doc.dispatch(
                el,
                SyntheticEvent::Input(InputInit::insert_text(&key.key)),
            );
            doc.set_selection(el, Selection::collapsed(start + i + 1));
            doc.dispatch(el, SyntheticEvent::KeyUp(key));
        }
    }
}

/// One value write and one `insertReplacementText` input event.
#[derive(Debug, Clone, Copy, Default)]
pub struct BulkReplace;

impl EditStrategy for BulkReplace {
    fn apply(
        &self,
        doc: &mut dyn Document,
        el: NodeId,
        _origin: &KeyEvent,
        text: &str,
        cursor: usize,
        replacement: &Replacement,
    ) {
        let (value, caret) = replacement.apply(text, cursor);
        doc.set_value(el, &value);
        doc.dispatch(
            el,
            SyntheticEvent::Input(InputInit::replacement_text(&replacement.insert_text)),
        );
        doc.set_selection(el, Selection::collapsed(caret));
    }
}
