use super::tap_dances::TapDanceId;
use super::{COL, Layer, NUM_LAYER, ROW};
use crate::action::KeyAction;
use crate::modifier::ModifierCombination;
use crate::{a, k, layout_split_3x5_3, lt, mt, shifted, td};

const XXXXXXX: KeyAction = a!(No);
const _______: KeyAction = a!(Transparent);

const ESC_MED: KeyAction = lt!(Layer::Media as u8, Escape);
const SPC_NAV: KeyAction = lt!(Layer::Navigation as u8, Space);
const TAB_SYM: KeyAction = lt!(Layer::Symbols as u8, Tab);
const ENT_FUN: KeyAction = lt!(Layer::Function as u8, Enter);
const BSP_NUM: KeyAction = lt!(Layer::Numeral as u8, Backspace);
const PT_Z: KeyAction = lt!(Layer::Pointer as u8, Z);
const PT_SLSH: KeyAction = lt!(Layer::Pointer as u8, Slash);

const LGUI: ModifierCombination = ModifierCombination::LGUI;
const LALT: ModifierCombination = ModifierCombination::LALT;
const LCTL: ModifierCombination = ModifierCombination::LCTRL;
const LSFT: ModifierCombination = ModifierCombination::LSHIFT;
const RALT: ModifierCombination = ModifierCombination::RALT;

const TD_V_WORD_BACK: KeyAction = td!(TapDanceId::VWordBack as u8);
const TD_GRV_TILD: KeyAction = td!(TapDanceId::GrvTild as u8);

#[cfg(feature = "pointing_device")]
mod pointer_keys {
    use crate::action::KeyAction;
    use crate::k;

    pub(super) const DRGSCRL: KeyAction = k!(PointerDragScroll);
    pub(super) const DPI_MOD: KeyAction = k!(PointerDefaultDpiForward);
    pub(super) const S_D_MOD: KeyAction = k!(PointerSnipingDpiForward);
    pub(super) const SNIPING: KeyAction = k!(PointerSniping);
}

// Pointer keys are `No` without a pointing device
#[cfg(not(feature = "pointing_device"))]
mod pointer_keys {
    use crate::a;
    use crate::action::KeyAction;

    pub(super) const DRGSCRL: KeyAction = a!(No);
    pub(super) const DPI_MOD: KeyAction = a!(No);
    pub(super) const S_D_MOD: KeyAction = a!(No);
    pub(super) const SNIPING: KeyAction = a!(No);
}

use pointer_keys::{DPI_MOD, DRGSCRL, S_D_MOD, SNIPING};

#[rustfmt::skip]
pub static KEYMAP: [[[KeyAction; COL]; ROW]; NUM_LAYER] = [
    // Base
    layout_split_3x5_3!(
        k!(Q),          k!(W),          k!(F),          k!(P),          k!(B),          k!(J),  k!(L),          k!(U),          k!(Y),          k!(Semicolon),
        mt!(A, LGUI),   mt!(R, LALT),   mt!(S, LCTL),   mt!(T, LSFT),   k!(G),          k!(M),  mt!(N, LSFT),   mt!(E, LCTL),   mt!(I, LALT),   mt!(O, LGUI),
        PT_Z,           mt!(X, RALT),   k!(C),          k!(D),          TD_V_WORD_BACK, k!(K),  k!(H),          k!(Comma),      mt!(Dot, RALT), PT_SLSH,
                                        ESC_MED,        TAB_SYM,        SPC_NAV,        ENT_FUN, BSP_NUM,       k!(MediaPlayPause)
    ),
    // Function
    layout_split_3x5_3!(
        k!(PrintScreen), k!(F7),  k!(F8),  k!(F9),  k!(F12), XXXXXXX, XXXXXXX,   XXXXXXX,  XXXXXXX,  XXXXXXX,
        k!(ScrollLock),  k!(F4),  k!(F5),  k!(F6),  k!(F11), XXXXXXX, k!(LShift), k!(LCtrl), k!(LAlt), k!(LGui),
        k!(Pause),       k!(F1),  k!(F2),  k!(F3),  k!(F10), XXXXXXX, XXXXXXX,   XXXXXXX,  XXXXXXX,  XXXXXXX,
                                  XXXXXXX, XXXXXXX, XXXXXXX, _______, XXXXXXX,   XXXXXXX
    ),
    // Navigation
    layout_split_3x5_3!(
        XXXXXXX,  XXXXXXX,  XXXXXXX,   XXXXXXX,    XXXXXXX, XXXXXXX,  shifted!(Kc9),   shifted!(Kc0),    shifted!(LeftBracket), shifted!(RightBracket),
        k!(LGui), k!(LAlt), k!(LCtrl), k!(LShift), XXXXXXX, k!(Left), k!(Down),        k!(Up),           k!(Right),             XXXXXXX,
        XXXXXXX,  k!(RAlt), XXXXXXX,   XXXXXXX,    XXXXXXX, XXXXXXX,  k!(LeftBracket), k!(RightBracket), shifted!(Dot),         shifted!(Comma),
                            XXXXXXX,   XXXXXXX,    _______, k!(Enter), k!(Backspace),  k!(Delete)
    ),
    // Media
    layout_split_3x5_3!(
        XXXXXXX,            k!(RgbMatrixModePrevious), k!(RgbMatrixToggle), k!(RgbMatrixModeNext), XXXXXXX,            XXXXXXX,            k!(RgbMatrixModePrevious), k!(RgbMatrixToggle), k!(RgbMatrixModeNext), XXXXXXX,
        k!(MediaPrevTrack), k!(AudioVolDown),          k!(AudioMute),       k!(AudioVolUp),        k!(MediaNextTrack), k!(MediaPrevTrack), k!(AudioVolDown),          k!(AudioMute),       k!(AudioVolUp),        k!(MediaNextTrack),
        XXXXXXX,            XXXXXXX,                   XXXXXXX,             XXXXXXX,               XXXXXXX,            XXXXXXX,            XXXXXXX,                   XXXXXXX,             XXXXXXX,               XXXXXXX,
                                                       _______,             k!(MediaPlayPause),    k!(MediaStop),      k!(MediaStop),      k!(MediaPlayPause),        k!(AudioMute)
    ),
    // Pointer
    layout_split_3x5_3!(
        k!(Bootloader), k!(ClearEeprom), XXXXXXX,       DPI_MOD,        S_D_MOD,        S_D_MOD,        DPI_MOD,        XXXXXXX,   k!(ClearEeprom), k!(Bootloader),
        k!(LGui),       k!(LAlt),        k!(LCtrl),     k!(LShift),     XXXXXXX,        XXXXXXX,        k!(LShift),     k!(LCtrl), k!(LAlt),        k!(LGui),
        _______,        DRGSCRL,         SNIPING,       k!(MouseBtn3),  XXXXXXX,        XXXXXXX,        k!(MouseBtn3),  SNIPING,   DRGSCRL,         _______,
                                         k!(MouseBtn3), k!(MouseBtn2),  k!(MouseBtn1),  k!(MouseBtn1),  k!(MouseBtn2),  k!(MouseBtn3)
    ),
    // Numeral
    layout_split_3x5_3!(
        k!(LeftBracket), k!(Kc7), k!(Kc8),   k!(Kc9),   k!(RightBracket), XXXXXXX, XXXXXXX,    XXXXXXX,   XXXXXXX,  XXXXXXX,
        k!(Semicolon),   k!(Kc4), k!(Kc5),   k!(Kc6),   k!(Equal),        XXXXXXX, k!(LShift), k!(LCtrl), k!(LAlt), k!(LGui),
        k!(Kc0),         k!(Kc1), k!(Kc2),   k!(Kc3),   k!(Backslash),    XXXXXXX, XXXXXXX,    XXXXXXX,   k!(RAlt), XXXXXXX,
                                  k!(Dot),   k!(Minus), k!(Dot),          XXXXXXX, _______,    XXXXXXX
    ),
    // Symbols
    layout_split_3x5_3!(
        XXXXXXX,  XXXXXXX,  XXXXXXX,   XXXXXXX,    XXXXXXX,    shifted!(Kc6),   shifted!(Kc5),   shifted!(Kc8),   shifted!(Kc7),   k!(Backslash),
        k!(LGui), k!(LAlt), k!(LCtrl), k!(LShift), XXXXXXX,    TD_GRV_TILD,     k!(Quote),       shifted!(Quote), shifted!(Kc1),   shifted!(Equal),
        XXXXXXX,  k!(RAlt), XXXXXXX,   XXXXXXX,    XXXXXXX,    shifted!(Grave), shifted!(Kc3),   shifted!(Kc2),   shifted!(Kc4),   shifted!(Backslash),
                            XXXXXXX,   _______,    XXXXXXX,    k!(Minus),       k!(Equal),       shifted!(Minus)
    ),
];
