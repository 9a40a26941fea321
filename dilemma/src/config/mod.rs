use ::heapless::Vec;
use embassy_time::Duration;

use crate::combo::{COMBO_MAX_NUM, Combo};
use crate::tap_dance::{TAP_DANCE_MAX_NUM, TapDance};

/// Config for configurable action behavior
#[derive(Clone, Debug, Default)]
pub struct BehaviorConfig {
    pub tap_hold: TapHoldConfig,
    pub tap_dance: TapDancesConfig,
    pub combo: CombosConfig,
    pub caps_word: CapsWordConfig,
    #[cfg(feature = "pointing_device")]
    pub pointer: PointerConfig,
    pub rgb: RgbMatrixConfig,
}

/// Configurations for tap hold behavior
#[derive(Clone, Copy, Debug)]
pub struct TapHoldConfig {
    /// A tap-hold key held longer than this is a hold
    pub tapping_term: Duration,
    /// Decide hold as soon as another key is pressed and released while the tap-hold key is held
    pub permissive_hold: bool,
}

impl Default for TapHoldConfig {
    fn default() -> Self {
        Self {
            tapping_term: Duration::from_millis(200),
            permissive_hold: false,
        }
    }
}

/// Config for tap dance behavior
#[derive(Clone, Debug, Default)]
pub struct TapDancesConfig {
    pub tap_dances: Vec<TapDance, TAP_DANCE_MAX_NUM>,
}

/// Config for combo behavior
#[derive(Clone, Debug)]
pub struct CombosConfig {
    pub combos: Vec<Combo, COMBO_MAX_NUM>,
    pub timeout: Duration,
}

impl Default for CombosConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(50),
            combos: Vec::new(),
        }
    }
}

/// Config for caps word
#[derive(Clone, Copy, Debug)]
pub struct CapsWordConfig {
    /// Caps word turns off after this long without a key press
    pub idle_timeout: Duration,
}

impl Default for CapsWordConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(5),
        }
    }
}

/// A DPI range, the DPI of step `i` is `minimum + step * i`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DpiConfig {
    pub minimum: u16,
    pub step: u16,
    pub count: u8,
}

impl DpiConfig {
    pub fn dpi_at(&self, index: u8) -> u16 {
        self.minimum.saturating_add(self.step.saturating_mul(index as u16))
    }
}

/// Config for the pointer keys
#[cfg(feature = "pointing_device")]
#[derive(Clone, Copy, Debug)]
pub struct PointerConfig {
    pub default_dpi: DpiConfig,
    pub sniping_dpi: DpiConfig,
}

#[cfg(feature = "pointing_device")]
impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            default_dpi: DpiConfig {
                minimum: 400,
                step: 200,
                count: 16,
            },
            sniping_dpi: DpiConfig {
                minimum: 200,
                step: 100,
                count: 4,
            },
        }
    }
}

/// Config for RGB matrix keys
#[derive(Clone, Copy, Debug)]
pub struct RgbMatrixConfig {
    pub hue_step: u8,
    pub saturation_step: u8,
    pub value_step: u8,
    pub speed_step: u8,
    /// Number of enabled effects, modes are numbered from 1
    pub mode_count: u8,
}

impl Default for RgbMatrixConfig {
    fn default() -> Self {
        Self {
            hue_step: 8,
            saturation_step: 16,
            value_step: 16,
            speed_step: 16,
            mode_count: 1,
        }
    }
}
