//! Key codes.
//!
//! `KeyCode` is a flat 16-bit code space. The low byte range follows the HID
//! keyboard/keypad usage page, extended with the consumer and mouse ranges used by
//! QMK's basic keycodes. Codes above 0xFF are firmware keys that never reach the
//! host directly.

use serde::{Deserialize, Serialize};
use strum::FromRepr;

use crate::modifier::{HidModifiers, ModifierCombination};

#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, PartialOrd, Ord, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyCode {
    /// Reserved, no-key.
    No = 0x0000,
    A = 0x0004,
    B = 0x0005,
    C = 0x0006,
    D = 0x0007,
    E = 0x0008,
    F = 0x0009,
    G = 0x000A,
    H = 0x000B,
    I = 0x000C,
    J = 0x000D,
    K = 0x000E,
    L = 0x000F,
    M = 0x0010,
    N = 0x0011,
    O = 0x0012,
    P = 0x0013,
    Q = 0x0014,
    R = 0x0015,
    S = 0x0016,
    T = 0x0017,
    U = 0x0018,
    V = 0x0019,
    W = 0x001A,
    X = 0x001B,
    Y = 0x001C,
    Z = 0x001D,
    /// `1` and `!`
    Kc1 = 0x001E,
    /// `2` and `@`
    Kc2 = 0x001F,
    /// `3` and `#`
    Kc3 = 0x0020,
    /// `4` and `$`
    Kc4 = 0x0021,
    /// `5` and `%`
    Kc5 = 0x0022,
    /// `6` and `^`
    Kc6 = 0x0023,
    /// `7` and `&`
    Kc7 = 0x0024,
    /// `8` and `*`
    Kc8 = 0x0025,
    /// `9` and `(`
    Kc9 = 0x0026,
    /// `0` and `)`
    Kc0 = 0x0027,
    Enter = 0x0028,
    Escape = 0x0029,
    Backspace = 0x002A,
    Tab = 0x002B,
    Space = 0x002C,
    /// `-` and `_`
    Minus = 0x002D,
    /// `=` and `+`
    Equal = 0x002E,
    /// `[` and `{`
    LeftBracket = 0x002F,
    /// `]` and `}`
    RightBracket = 0x0030,
    /// `\` and `|`
    Backslash = 0x0031,
    /// Non-US `#` and `~`
    NonusHash = 0x0032,
    /// `;` and `:`
    Semicolon = 0x0033,
    /// `'` and `"`
    Quote = 0x0034,
    /// `` ` `` and `~`
    Grave = 0x0035,
    /// `,` and `<`
    Comma = 0x0036,
    /// `.` and `>`
    Dot = 0x0037,
    /// `/` and `?`
    Slash = 0x0038,
    CapsLock = 0x0039,
    F1 = 0x003A,
    F2 = 0x003B,
    F3 = 0x003C,
    F4 = 0x003D,
    F5 = 0x003E,
    F6 = 0x003F,
    F7 = 0x0040,
    F8 = 0x0041,
    F9 = 0x0042,
    F10 = 0x0043,
    F11 = 0x0044,
    F12 = 0x0045,
    PrintScreen = 0x0046,
    ScrollLock = 0x0047,
    Pause = 0x0048,
    Insert = 0x0049,
    Home = 0x004A,
    PageUp = 0x004B,
    Delete = 0x004C,
    End = 0x004D,
    PageDown = 0x004E,
    Right = 0x004F,
    Left = 0x0050,
    Down = 0x0051,
    Up = 0x0052,
    NumLock = 0x0053,
    Application = 0x0065,
    F13 = 0x0068,
    F14 = 0x0069,
    F15 = 0x006A,
    F16 = 0x006B,
    F17 = 0x006C,
    F18 = 0x006D,
    F19 = 0x006E,
    F20 = 0x006F,
    F21 = 0x0070,
    F22 = 0x0071,
    F23 = 0x0072,
    F24 = 0x0073,
    // Consumer page keys, sent in the consumer report
    AudioMute = 0x00A8,
    AudioVolUp = 0x00A9,
    AudioVolDown = 0x00AA,
    MediaNextTrack = 0x00AB,
    MediaPrevTrack = 0x00AC,
    MediaStop = 0x00AD,
    MediaPlayPause = 0x00AE,
    MediaSelect = 0x00AF,
    MediaEject = 0x00B0,
    MediaFastForward = 0x00BB,
    MediaRewind = 0x00BC,
    BrightnessUp = 0x00BD,
    BrightnessDown = 0x00BE,
    // Mouse keys, sent in the mouse report
    MouseUp = 0x00CD,
    MouseDown = 0x00CE,
    MouseLeft = 0x00CF,
    MouseRight = 0x00D0,
    MouseBtn1 = 0x00D1,
    MouseBtn2 = 0x00D2,
    MouseBtn3 = 0x00D3,
    MouseBtn4 = 0x00D4,
    MouseBtn5 = 0x00D5,
    MouseWheelUp = 0x00D9,
    MouseWheelDown = 0x00DA,
    MouseWheelLeft = 0x00DB,
    MouseWheelRight = 0x00DC,
    LCtrl = 0x00E0,
    LShift = 0x00E1,
    LAlt = 0x00E2,
    LGui = 0x00E3,
    RCtrl = 0x00E4,
    RShift = 0x00E5,
    RAlt = 0x00E6,
    RGui = 0x00E7,
    // RGB matrix keys, use 0x620 ~ 0x63F
    RgbMatrixToggle = 0x620,
    RgbMatrixModeNext = 0x621,
    RgbMatrixModePrevious = 0x622,
    RgbMatrixHueUp = 0x623,
    RgbMatrixHueDown = 0x624,
    RgbMatrixSaturationUp = 0x625,
    RgbMatrixSaturationDown = 0x626,
    RgbMatrixValueUp = 0x627,
    RgbMatrixValueDown = 0x628,
    RgbMatrixSpeedUp = 0x629,
    RgbMatrixSpeedDown = 0x62A,
    // Firmware keys, use 0x700 ~ 0x77F
    Bootloader = 0x700,
    Reboot = 0x701,
    ClearEeprom = 0x703,
    CapsWordToggle = 0x773,
    // Dilemma pointing device keys, use 0x7C0 ~ 0x7CF
    PointerDefaultDpiForward = 0x7C0,
    PointerDefaultDpiReverse = 0x7C1,
    PointerSnipingDpiForward = 0x7C2,
    PointerSnipingDpiReverse = 0x7C3,
    PointerSniping = 0x7C4,
    PointerSnipingToggle = 0x7C5,
    PointerDragScroll = 0x7C6,
    PointerDragScrollToggle = 0x7C7,
}

impl KeyCode {
    /// Returns `true` if the keycode goes into the 6-key array of the keyboard report
    pub fn is_basic(self) -> bool {
        KeyCode::A <= self && self <= KeyCode::F24
    }

    /// Returns `true` if the keycode is a modifier keycode
    pub fn is_modifier(self) -> bool {
        KeyCode::LCtrl <= self && self <= KeyCode::RGui
    }

    /// Returns `true` if the keycode is a keycode in consumer page
    pub fn is_consumer(self) -> bool {
        KeyCode::AudioMute <= self && self <= KeyCode::BrightnessDown
    }

    /// Returns `true` if the keycode is a mouse keycode
    pub fn is_mouse_key(self) -> bool {
        KeyCode::MouseUp <= self && self <= KeyCode::MouseWheelRight
    }

    pub fn is_rgb_matrix(self) -> bool {
        KeyCode::RgbMatrixToggle <= self && self <= KeyCode::RgbMatrixSpeedDown
    }

    /// Returns `true` for keys handled by the firmware itself: bootloader, reboot, EEPROM and caps word.
    pub fn is_firmware(self) -> bool {
        KeyCode::Bootloader <= self && self <= KeyCode::CapsWordToggle
    }

    pub fn is_pointer(self) -> bool {
        KeyCode::PointerDefaultDpiForward <= self && self <= KeyCode::PointerDragScrollToggle
    }

    /// Returns the byte with the bit corresponding to the USB HID
    /// modifier bitfield set.
    pub fn as_modifier_bit(self) -> u8 {
        if self.is_modifier() {
            1 << (self as u16 - KeyCode::LCtrl as u16)
        } else {
            0
        }
    }

    /// Modifier combination of a modifier keycode, empty for other keys
    pub fn as_modifier_combination(self) -> ModifierCombination {
        match self {
            KeyCode::LCtrl => ModifierCombination::LCTRL,
            KeyCode::LShift => ModifierCombination::LSHIFT,
            KeyCode::LAlt => ModifierCombination::LALT,
            KeyCode::LGui => ModifierCombination::LGUI,
            KeyCode::RCtrl => ModifierCombination::RCTRL,
            KeyCode::RShift => ModifierCombination::RSHIFT,
            KeyCode::RAlt => ModifierCombination::RALT,
            KeyCode::RGui => ModifierCombination::RGUI,
            _ => ModifierCombination::new(),
        }
    }

    pub fn to_hid_modifiers(self) -> HidModifiers {
        HidModifiers::from_bits(self.as_modifier_bit())
    }

    /// Keys that keep caps word active
    pub fn is_caps_word_continue_key(self) -> bool {
        if self >= KeyCode::A && self <= KeyCode::Z {
            return true;
        }
        if self >= KeyCode::Kc1 && self <= KeyCode::Kc0 {
            return true;
        }
        if self == KeyCode::Minus || self == KeyCode::Backspace || self == KeyCode::Delete {
            return true;
        }
        self.is_modifier()
    }

    /// Keys that are sent shifted while caps word is active
    pub fn is_caps_word_shifted_key(self) -> bool {
        (self >= KeyCode::A && self <= KeyCode::Z) || self == KeyCode::Minus
    }

    /// Convert a consumer keycode to its usage id in the consumer page
    pub fn as_consumer_usage_id(self) -> Option<ConsumerKey> {
        match self {
            KeyCode::AudioMute => Some(ConsumerKey::Mute),
            KeyCode::AudioVolUp => Some(ConsumerKey::VolumeIncrement),
            KeyCode::AudioVolDown => Some(ConsumerKey::VolumeDecrement),
            KeyCode::MediaNextTrack => Some(ConsumerKey::NextTrack),
            KeyCode::MediaPrevTrack => Some(ConsumerKey::PrevTrack),
            KeyCode::MediaStop => Some(ConsumerKey::StopPlay),
            KeyCode::MediaPlayPause => Some(ConsumerKey::PlayPause),
            KeyCode::MediaSelect => Some(ConsumerKey::Record),
            KeyCode::MediaEject => Some(ConsumerKey::Eject),
            KeyCode::MediaFastForward => Some(ConsumerKey::FastForward),
            KeyCode::MediaRewind => Some(ConsumerKey::Rewind),
            KeyCode::BrightnessUp => Some(ConsumerKey::BrightnessUp),
            KeyCode::BrightnessDown => Some(ConsumerKey::BrightnessDown),
            _ => None,
        }
    }
}

impl From<u16> for KeyCode {
    fn from(value: u16) -> Self {
        Self::from_repr(value).unwrap_or(KeyCode::No)
    }
}

/// Keys in consumer page
/// Ref: <https://www.usb.org/sites/default/files/documents/hut1_12v2.pdf#page=75>
#[non_exhaustive]
#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsumerKey {
    No = 0x00,
    BrightnessUp = 0x6F,
    BrightnessDown = 0x70,
    Record = 0xB2,
    FastForward = 0xB3,
    Rewind = 0xB4,
    NextTrack = 0xB5,
    PrevTrack = 0xB6,
    StopPlay = 0xB7,
    Eject = 0xB8,
    PlayPause = 0xCD,
    Mute = 0xE2,
    VolumeIncrement = 0xE9,
    VolumeDecrement = 0xEA,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_modifier_bits() {
        assert_eq!(KeyCode::LCtrl.as_modifier_bit(), 0b0000_0001);
        assert_eq!(KeyCode::RGui.as_modifier_bit(), 0b1000_0000);
        assert_eq!(KeyCode::A.as_modifier_bit(), 0);
        assert_eq!(
            KeyCode::RAlt.to_hid_modifiers(),
            KeyCode::RAlt.as_modifier_combination().to_hid_modifiers()
        );
    }

    #[test]
    fn test_key_ranges() {
        assert!(KeyCode::Grave.is_basic());
        assert!(!KeyCode::LShift.is_basic());
        assert!(KeyCode::MediaPlayPause.is_consumer());
        assert!(KeyCode::MouseWheelDown.is_mouse_key());
        assert!(KeyCode::RgbMatrixSpeedDown.is_rgb_matrix());
        assert!(KeyCode::CapsWordToggle.is_firmware());
        assert!(KeyCode::PointerDragScroll.is_pointer());
        assert!(!KeyCode::PointerDragScroll.is_firmware());
    }

    #[test]
    fn test_from_raw_code() {
        assert_eq!(KeyCode::from(0x0019), KeyCode::V);
        assert_eq!(KeyCode::from(0x0001), KeyCode::No);
        assert_eq!(KeyCode::from(0x773), KeyCode::CapsWordToggle);
    }
}
