use serde::{Deserialize, Serialize};

/// A key position changed state.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub row: u8,
    pub col: u8,
    pub pressed: bool,
}

impl KeyEvent {
    pub const fn new(row: u8, col: u8, pressed: bool) -> Self {
        Self { row, col, pressed }
    }

    /// Whether two events are on the same key position
    pub fn same_position(&self, other: &KeyEvent) -> bool {
        self.row == other.row && self.col == other.col
    }
}

/// Rotation direction of an encoder detent
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise direction
    Clockwise,
    /// Counter-clockwise direction
    CounterClockwise,
}

/// One detent of a rotary encoder.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RotaryEncoderEvent {
    /// Index of the encoder
    pub id: u8,
    pub direction: Direction,
}
