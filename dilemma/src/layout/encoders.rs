use super::{NUM_ENCODER, NUM_LAYER};
use crate::action::EncoderAction;
use crate::{encoder, k};

/// Encoder actions per layer, `encoder!(counter-clockwise, clockwise)` for the left and right encoder
#[rustfmt::skip]
pub static ENCODER_MAP: [[EncoderAction; NUM_ENCODER]; NUM_LAYER] = [
    // Base
    [encoder!(k!(MouseWheelDown), k!(MouseWheelUp)),             encoder!(k!(AudioVolDown), k!(AudioVolUp))],
    // Function
    [encoder!(k!(Down), k!(Up)),                                 encoder!(k!(Left), k!(Right))],
    // Navigation
    [encoder!(k!(PageDown), k!(PageUp)),                         encoder!(k!(AudioVolUp), k!(AudioVolDown))],
    // Media
    [encoder!(k!(PageDown), k!(PageUp)),                         encoder!(k!(AudioVolUp), k!(AudioVolDown))],
    // Pointer
    [encoder!(k!(RgbMatrixHueDown), k!(RgbMatrixHueUp)),         encoder!(k!(RgbMatrixSaturationDown), k!(RgbMatrixSaturationUp))],
    // Numeral
    [encoder!(k!(RgbMatrixValueDown), k!(RgbMatrixValueUp)),     encoder!(k!(RgbMatrixSpeedDown), k!(RgbMatrixSpeedUp))],
    // Symbols
    [encoder!(k!(RgbMatrixModePrevious), k!(RgbMatrixModeNext)), encoder!(k!(Left), k!(Right))],
];
