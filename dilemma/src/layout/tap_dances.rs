use embassy_time::Duration;
use heapless::Vec;

use crate::action::Action;
use crate::keycode::KeyCode;
use crate::modifier::ModifierCombination;
use crate::tap_dance::{TAP_DANCE_MAX_NUM, TapDance, TapDanceState};

/// Tap dance indexes, referenced by `td!` in the keymap
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapDanceId {
    /// `V`, double tap jumps one word back
    VWordBack = 0,
    /// Backtick, double tap is tilde
    GrvTild = 1,
}

/// Single tap: `V`. Double tap: Alt+Ctrl+Left.
pub fn td_v_word_back(state: &TapDanceState) -> Option<Action> {
    match state.count {
        1 => Some(Action::Key(KeyCode::V)),
        2 => Some(Action::KeyWithModifier(
            KeyCode::Left,
            ModifierCombination::LALT.merge(ModifierCombination::LCTRL),
        )),
        _ => None,
    }
}

/// Single tap: `` ` ``. Double tap: `~`.
pub fn td_grv_tild(state: &TapDanceState) -> Option<Action> {
    match state.count {
        1 => Some(Action::Key(KeyCode::Grave)),
        2 => Some(Action::KeyWithModifier(KeyCode::Grave, ModifierCombination::LSHIFT)),
        _ => None,
    }
}

pub fn tap_dances() -> Vec<TapDance, TAP_DANCE_MAX_NUM> {
    let tapping_term = Duration::from_millis(200);
    Vec::from_iter([
        TapDance::new(td_v_word_back, tapping_term),
        TapDance::new(td_grv_tild, tapping_term),
    ])
}
