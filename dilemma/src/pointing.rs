//! Pointer state of the Dilemma trackpad: DPI cycling, sniping and drag-scroll.
//!
//! The sensor itself is out of scope, this only tracks the mode the sensor driver should run in.

use log::info;

use crate::config::PointerConfig;
use crate::keycode::KeyCode;
use crate::keymap::LayerState;

/// Hook called after every layer state change.
///
/// It can adjust the pointer state, the returned value becomes the new layer state.
pub type LayerStateHook = fn(LayerState, &mut PointerState) -> LayerState;

#[derive(Clone, Copy, Debug)]
pub struct PointerState {
    config: PointerConfig,
    default_dpi_index: u8,
    sniping_dpi_index: u8,
    sniping: bool,
    drag_scroll: bool,
}

impl PointerState {
    pub fn new(config: PointerConfig) -> Self {
        Self {
            config,
            default_dpi_index: 0,
            sniping_dpi_index: 0,
            sniping: false,
            drag_scroll: false,
        }
    }

    /// DPI used while sniping is off
    pub fn default_dpi(&self) -> u16 {
        self.config.default_dpi.dpi_at(self.default_dpi_index)
    }

    /// DPI used while sniping is on
    pub fn sniping_dpi(&self) -> u16 {
        self.config.sniping_dpi.dpi_at(self.sniping_dpi_index)
    }

    /// DPI the sensor should currently run at
    pub fn current_dpi(&self) -> u16 {
        if self.sniping { self.sniping_dpi() } else { self.default_dpi() }
    }

    pub fn cycle_default_dpi(&mut self, forward: bool) {
        self.default_dpi_index = step_index(self.default_dpi_index, self.config.default_dpi.count, forward);
        info!("Default DPI: {}", self.default_dpi());
    }

    pub fn cycle_sniping_dpi(&mut self, forward: bool) {
        self.sniping_dpi_index = step_index(self.sniping_dpi_index, self.config.sniping_dpi.count, forward);
        info!("Sniping DPI: {}", self.sniping_dpi());
    }

    pub fn is_sniping_enabled(&self) -> bool {
        self.sniping
    }

    pub fn set_sniping_enabled(&mut self, enabled: bool) {
        if self.sniping != enabled {
            self.sniping = enabled;
            info!("Sniping {}, DPI: {}", enabled, self.current_dpi());
        }
    }

    pub fn is_drag_scroll_enabled(&self) -> bool {
        self.drag_scroll
    }

    pub fn set_drag_scroll_enabled(&mut self, enabled: bool) {
        self.drag_scroll = enabled;
    }

    /// Apply a pointer keycode.
    ///
    /// DPI keys act on press, `shift` reverses the cycle direction. Sniping and drag-scroll keys are
    /// momentary, their toggle variants flip the mode on press.
    pub fn process_keycode(&mut self, key: KeyCode, pressed: bool, shift: bool) {
        match key {
            KeyCode::PointerDefaultDpiForward if pressed => self.cycle_default_dpi(!shift),
            KeyCode::PointerDefaultDpiReverse if pressed => self.cycle_default_dpi(shift),
            KeyCode::PointerSnipingDpiForward if pressed => self.cycle_sniping_dpi(!shift),
            KeyCode::PointerSnipingDpiReverse if pressed => self.cycle_sniping_dpi(shift),
            KeyCode::PointerSniping => self.set_sniping_enabled(pressed),
            KeyCode::PointerSnipingToggle if pressed => self.set_sniping_enabled(!self.sniping),
            KeyCode::PointerDragScroll => self.set_drag_scroll_enabled(pressed),
            KeyCode::PointerDragScrollToggle if pressed => self.set_drag_scroll_enabled(!self.drag_scroll),
            _ => (),
        }
    }
}

fn step_index(index: u8, count: u8, forward: bool) -> u8 {
    let count = count.max(1);
    if forward {
        (index + 1) % count
    } else if index == 0 {
        count - 1
    } else {
        index - 1
    }
}
