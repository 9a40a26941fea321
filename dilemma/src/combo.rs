use heapless::Vec;

use crate::{action::KeyAction, event::KeyEvent};

// Max number of combos
pub(crate) const COMBO_MAX_NUM: usize = 8;
// Max number of trigger keys in a combo
pub(crate) const COMBO_MAX_LENGTH: usize = 4;

/// A combo: pressing all trigger keys together sends `output` instead.
#[derive(Clone, Debug)]
pub struct Combo {
    pub(crate) actions: Vec<KeyAction, COMBO_MAX_LENGTH>,
    pub(crate) output: KeyAction,
    pub(crate) layer: Option<u8>,
    state: u8,
}

impl Default for Combo {
    fn default() -> Self {
        Self::empty()
    }
}

impl Combo {
    pub fn new<I: IntoIterator<Item = KeyAction>>(actions: I, output: KeyAction, layer: Option<u8>) -> Self {
        Self {
            actions: Vec::from_iter(actions),
            output,
            layer,
            state: 0,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::<KeyAction, COMBO_MAX_LENGTH>::new(), KeyAction::No, None)
    }

    /// Trigger actions of the combo
    pub fn actions(&self) -> &[KeyAction] {
        &self.actions
    }

    pub fn output(&self) -> KeyAction {
        self.output
    }

    /// Whether `key_action` is one of the triggers, with the combo's layer restriction applied
    pub(crate) fn is_trigger(&self, key_action: KeyAction, active_layer: u8) -> bool {
        if key_action == KeyAction::No {
            return false;
        }
        if let Some(layer) = self.layer
            && layer != active_layer
        {
            return false;
        }
        self.actions.contains(&key_action)
    }

    pub(crate) fn update(&mut self, key_action: KeyAction, key_event: KeyEvent, active_layer: u8) -> bool {
        if !key_event.pressed || !self.is_trigger(key_action, active_layer) {
            if key_event.pressed && !self.done() {
                self.reset();
            }
            return false;
        }

        if let Some(i) = self.actions.iter().position(|&a| a == key_action) {
            self.state |= 1 << i;
        }
        true
    }

    pub(crate) fn done(&self) -> bool {
        self.started() && self.keys_pressed() == self.actions.len() as u32
    }

    pub(crate) fn started(&self) -> bool {
        self.state != 0
    }

    pub(crate) fn keys_pressed(&self) -> u32 {
        self.state.count_ones()
    }

    pub(crate) fn reset(&mut self) {
        self.state = 0;
    }
}
