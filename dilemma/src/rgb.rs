use log::debug;

use crate::config::RgbMatrixConfig;
use crate::keycode::KeyCode;

/// State of the RGB matrix, driven by the `RM_*` keys.
///
/// Hue wraps around, saturation/value/speed saturate at the ends of their range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RgbMatrixState {
    pub enabled: bool,
    pub mode: u8,
    pub hue: u8,
    pub saturation: u8,
    pub value: u8,
    pub speed: u8,
}

impl Default for RgbMatrixState {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: 1,
            hue: 0,
            saturation: u8::MAX,
            value: u8::MAX,
            speed: 128,
        }
    }
}

impl RgbMatrixState {
    /// Apply an RGB matrix keycode, other keycodes are ignored
    pub fn process_keycode(&mut self, key: KeyCode, config: &RgbMatrixConfig) {
        let mode_count = config.mode_count.max(1);
        match key {
            KeyCode::RgbMatrixToggle => self.enabled = !self.enabled,
            KeyCode::RgbMatrixModeNext => {
                self.mode = if self.mode >= mode_count { 1 } else { self.mode + 1 };
            }
            KeyCode::RgbMatrixModePrevious => {
                self.mode = if self.mode <= 1 { mode_count } else { self.mode - 1 };
            }
            KeyCode::RgbMatrixHueUp => self.hue = self.hue.wrapping_add(config.hue_step),
            KeyCode::RgbMatrixHueDown => self.hue = self.hue.wrapping_sub(config.hue_step),
            KeyCode::RgbMatrixSaturationUp => {
                self.saturation = self.saturation.saturating_add(config.saturation_step)
            }
            KeyCode::RgbMatrixSaturationDown => {
                self.saturation = self.saturation.saturating_sub(config.saturation_step)
            }
            KeyCode::RgbMatrixValueUp => self.value = self.value.saturating_add(config.value_step),
            KeyCode::RgbMatrixValueDown => self.value = self.value.saturating_sub(config.value_step),
            KeyCode::RgbMatrixSpeedUp => self.speed = self.speed.saturating_add(config.speed_step),
            KeyCode::RgbMatrixSpeedDown => self.speed = self.speed.saturating_sub(config.speed_step),
            _ => return,
        }
        debug!("RGB matrix: {:?}", self);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hue_wraps() {
        let config = RgbMatrixConfig::default();
        let mut rgb = RgbMatrixState::default();
        rgb.process_keycode(KeyCode::RgbMatrixHueDown, &config);
        assert_eq!(rgb.hue, 248);
        rgb.process_keycode(KeyCode::RgbMatrixHueUp, &config);
        assert_eq!(rgb.hue, 0);
    }

    #[test]
    fn test_value_saturates() {
        let config = RgbMatrixConfig::default();
        let mut rgb = RgbMatrixState::default();
        rgb.process_keycode(KeyCode::RgbMatrixValueUp, &config);
        assert_eq!(rgb.value, 255);
        rgb.process_keycode(KeyCode::RgbMatrixSpeedDown, &config);
        assert_eq!(rgb.speed, 112);
    }

    #[test]
    fn test_mode_cycles() {
        let config = RgbMatrixConfig {
            mode_count: 3,
            ..Default::default()
        };
        let mut rgb = RgbMatrixState::default();
        rgb.process_keycode(KeyCode::RgbMatrixModePrevious, &config);
        assert_eq!(rgb.mode, 3);
        rgb.process_keycode(KeyCode::RgbMatrixModeNext, &config);
        assert_eq!(rgb.mode, 1);
        rgb.process_keycode(KeyCode::RgbMatrixToggle, &config);
        assert!(!rgb.enabled);
    }
}
