//! The `jochen` layout of the Dilemma 3x5_3.
//!
//! A Colemak-DH base layer with home-row mods, plus six layers reached from the thumbs
//! (function, navigation, media, symbols, numeral) or from the outer bottom keys (pointer).

mod combos;
#[cfg(feature = "encoder_map")]
mod encoders;
#[cfg(feature = "auto_sniping")]
mod hooks;
mod layers;
mod tap_dances;

pub use combos::combos;
#[cfg(feature = "encoder_map")]
pub use encoders::ENCODER_MAP;
#[cfg(feature = "auto_sniping")]
pub use hooks::layer_state_set_user;
pub use layers::KEYMAP;
pub use tap_dances::{TapDanceId, tap_dances, td_grv_tild, td_v_word_back};

use crate::config::{BehaviorConfig, CombosConfig, TapDancesConfig};
use crate::keyboard::Keyboard;
use crate::keymap::KeyMap;

/// Rows of the matrix, the 4th row holds the thumb keys
pub const ROW: usize = 4;
/// Columns of the matrix, 5 per hand
pub const COL: usize = 10;
pub const NUM_LAYER: usize = 7;
pub const NUM_ENCODER: usize = 2;

/// Layers of the keymap, in stacking order
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layer {
    Base = 0,
    Function,
    Navigation,
    Media,
    Pointer,
    Numeral,
    Symbols,
}

impl Layer {
    pub const ALL: [Layer; NUM_LAYER] = [
        Layer::Base,
        Layer::Function,
        Layer::Navigation,
        Layer::Media,
        Layer::Pointer,
        Layer::Numeral,
        Layer::Symbols,
    ];

    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// The keyboard type of this layout
pub type DilemmaKeyboard = Keyboard<ROW, COL, NUM_LAYER, NUM_ENCODER>;

/// Behavior config with the tap dances and combos of this layout
pub fn behavior_config() -> BehaviorConfig {
    BehaviorConfig {
        tap_dance: TapDancesConfig {
            tap_dances: tap_dances(),
        },
        combo: CombosConfig {
            combos: combos(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Keymap over the static tables of this layout
pub fn create_keymap() -> KeyMap<ROW, COL, NUM_LAYER, NUM_ENCODER> {
    #[cfg(feature = "encoder_map")]
    let encoders = Some(&ENCODER_MAP);
    #[cfg(not(feature = "encoder_map"))]
    let encoders = None;

    KeyMap::new(&KEYMAP, encoders)
}

/// Build the keyboard, with the layer state hook installed when `auto_sniping` is enabled
pub fn create_keyboard() -> DilemmaKeyboard {
    #[allow(unused_mut)]
    let mut keyboard = Keyboard::new(create_keymap(), behavior_config());
    #[cfg(feature = "auto_sniping")]
    keyboard.set_layer_state_hook(Some(layer_state_set_user));
    keyboard
}
