//! Host key-event normalisation.
//!
//! Converts winit keyboard input into the host-neutral [`KeyEvent`] the
//! interpreter consumes: the produced character (or DOM-style key name),
//! whether Meta or Ctrl is held, and whether focus sits in a text field.

use crate::event::KeyEvent;
use crate::platform::named_key_name;
use winit::event::{ElementState, KeyEvent as WinitKeyEvent, Modifiers};
use winit::keyboard::{Key, ModifiersState};

/// Convert a winit key event. Releases and unidentified keys yield `None`.
///
/// `target_is_text_input` comes from the host's focus tracking; winit has no
/// notion of widgets.
pub fn from_winit(
    event: &WinitKeyEvent,
    modifiers: &Modifiers,
    target_is_text_input: bool,
) -> Option<KeyEvent> {
    from_parts(
        event.state,
        &event.logical_key,
        modifiers.state(),
        target_is_text_input,
    )
}

/// [`from_winit`] over the individual event fields.
///
/// winit's `KeyEvent` has private fields and cannot be built outside winit,
/// so replay tools and tests enter here.
pub fn from_parts(
    state: ElementState,
    logical_key: &Key,
    modifiers: ModifiersState,
    target_is_text_input: bool,
) -> Option<KeyEvent> {
    if state != ElementState::Pressed {
        return None;
    }
    normalize_key(logical_key, modifiers, target_is_text_input)
}

/// Convert a logical key plus modifier state, regardless of press state.
pub fn normalize_key(
    logical_key: &Key,
    modifiers: ModifiersState,
    target_is_text_input: bool,
) -> Option<KeyEvent> {
    let key = match logical_key {
        Key::Character(c) => c.to_string(),
        Key::Named(named) => named_key_name(*named)?.to_string(),
        _ => return None,
    };

    Some(KeyEvent {
        key,
        has_modifier: modifiers.control_key() || modifiers.super_key(),
        target_is_text_input,
    })
}
