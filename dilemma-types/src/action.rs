//! Keyboard actions.
//!
//! Key types:
//! - [`Action`] - Single operations that the keyboard sends or executes
//! - [`KeyAction`] - What a key position does, stored in the layer table
//! - [`EncoderAction`] - Rotary encoder actions, one pair per encoder per layer

use crate::keycode::KeyCode;
use crate::modifier::ModifierCombination;

/// EncoderAction is the action at an encoder position, stored in the encoder map.
///
/// It is declared in (counter-clockwise, clockwise) order, the same order as the keymap source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderAction {
    counter_clockwise: KeyAction,
    clockwise: KeyAction,
}

impl Default for EncoderAction {
    fn default() -> Self {
        Self {
            counter_clockwise: KeyAction::No,
            clockwise: KeyAction::No,
        }
    }
}

impl EncoderAction {
    /// Create a new encoder action.
    pub const fn new(counter_clockwise: KeyAction, clockwise: KeyAction) -> Self {
        Self {
            counter_clockwise,
            clockwise,
        }
    }

    /// Get the clockwise action.
    pub fn clockwise(&self) -> KeyAction {
        self.clockwise
    }

    /// Get the counter clockwise action.
    pub fn counter_clockwise(&self) -> KeyAction {
        self.counter_clockwise
    }
}

/// A KeyAction is the action at a keyboard position, stored in keymap.
/// It can be a single action like triggering a key, or a composite keyboard action like tap/hold
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// No action.
    No,
    /// Transparent action, next layer will be checked.
    Transparent,
    /// A single action, such as triggering a key, or activating a layer. Action is triggered when pressed and cancelled when released.
    Single(Action),
    /// Don't wait the release of the key, auto-release after the press is reported.
    Tap(Action),
    /// Tap action and hold action. A modifier hold makes a mod-tap key, a `LayerOn` hold makes a layer-tap key.
    TapHold(Action, Action),
    /// Tap dance, references a tap dance binding by index.
    TapDance(u8),
}

impl KeyAction {
    /// Convert `KeyAction` to the internal `Action`.
    /// Only valid for `Single` and `Tap` variant, returns `Action::No` for other variants.
    pub fn to_action(self) -> Action {
        match self {
            KeyAction::Single(a) | KeyAction::Tap(a) => a,
            _ => Action::No,
        }
    }

    /// Layer-tap: tap sends a key, hold activates a layer
    pub fn is_layer_tap(&self) -> bool {
        matches!(self, KeyAction::TapHold(_, Action::LayerOn(_)))
    }

    /// Modifier-tap: tap sends a key, hold registers modifiers
    pub fn is_mod_tap(&self) -> bool {
        matches!(self, KeyAction::TapHold(_, Action::Modifier(_)))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, KeyAction::No)
    }
}

/// A single basic action that a keyboard can execute.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Default action, no action.
    No,
    /// Transparent action, next layer will be checked.
    Transparent,
    /// A normal key stroke, uses for all keycodes defined in `KeyCode` enum, including mouse key, consumer control, etc.
    Key(KeyCode),
    /// Modifier Combination, used for the hold side of mod-tap keys.
    Modifier(ModifierCombination),
    /// Key stroke with modifier combination triggered, e.g. `~` is Shift + Grave.
    KeyWithModifier(KeyCode, ModifierCombination),
    /// Activate a layer while the key is held
    LayerOn(u8),
    /// Deactivate a layer while the key is held
    LayerOff(u8),
    /// Toggle a layer
    LayerToggle(u8),
    /// Set default layer
    DefaultLayer(u8),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tap_hold_kinds() {
        let layer_tap = KeyAction::TapHold(Action::Key(KeyCode::Space), Action::LayerOn(2));
        let mod_tap = KeyAction::TapHold(Action::Key(KeyCode::A), Action::Modifier(ModifierCombination::LGUI));
        assert!(layer_tap.is_layer_tap());
        assert!(!layer_tap.is_mod_tap());
        assert!(mod_tap.is_mod_tap());
        assert_eq!(layer_tap.to_action(), Action::No);
    }

    #[test]
    fn test_encoder_action_order() {
        let e = EncoderAction::new(
            KeyAction::Single(Action::Key(KeyCode::AudioVolDown)),
            KeyAction::Single(Action::Key(KeyCode::AudioVolUp)),
        );
        assert_eq!(e.counter_clockwise(), KeyAction::Single(Action::Key(KeyCode::AudioVolDown)));
        assert_eq!(e.clockwise(), KeyAction::Single(Action::Key(KeyCode::AudioVolUp)));
    }
}
