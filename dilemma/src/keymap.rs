use log::warn;

use crate::action::{EncoderAction, KeyAction};
use crate::event::KeyEvent;

/// Bitmask of active layers, bit `n` set means layer `n` is on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerState(pub u32);

impl LayerState {
    /// Compare the state with a layer.
    ///
    /// An empty state counts as the base layer, so it only matches layer 0.
    pub fn cmp(self, layer: u8) -> bool {
        if self.0 == 0 {
            return layer == 0;
        }
        layer < 32 && self.0 & (1 << layer) != 0
    }

    pub fn is_on(self, layer: u8) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }

    /// Highest active layer, 0 if no layer is on
    pub fn highest(self) -> u8 {
        if self.0 == 0 { 0 } else { 31 - self.0.leading_zeros() as u8 }
    }
}

/// Keymap represents the stack of layers.
///
/// The conception of Keymap is borrowed from qmk: <https://docs.qmk.fm/#/keymap>.
///
/// Tables are static, the keymap only owns the layer state and the layer cache.
pub struct KeyMap<const ROW: usize, const COL: usize, const NUM_LAYER: usize, const NUM_ENCODER: usize = 0> {
    /// Layers
    layers: &'static [[[KeyAction; COL]; ROW]; NUM_LAYER],
    /// Rotary encoders, each rotary encoder is represented as (CounterClockwise, Clockwise)
    encoders: Option<&'static [[EncoderAction; NUM_ENCODER]; NUM_LAYER]>,
    /// Current state of each layer
    layer_state: [bool; NUM_LAYER],
    /// Default layer number, max: 32
    default_layer: u8,
    /// Layer cache
    layer_cache: [[u8; COL]; ROW],
}

impl<const ROW: usize, const COL: usize, const NUM_LAYER: usize, const NUM_ENCODER: usize>
    KeyMap<ROW, COL, NUM_LAYER, NUM_ENCODER>
{
    pub fn new(
        action_map: &'static [[[KeyAction; COL]; ROW]; NUM_LAYER],
        encoder_map: Option<&'static [[EncoderAction; NUM_ENCODER]; NUM_LAYER]>,
    ) -> Self {
        KeyMap {
            layers: action_map,
            encoders: encoder_map,
            layer_state: [false; NUM_LAYER],
            default_layer: 0,
            layer_cache: [[0; COL]; ROW],
        }
    }

    pub fn get_keymap_config(&self) -> (usize, usize, usize) {
        (ROW, COL, NUM_LAYER)
    }

    /// Get the default layer number
    pub fn get_default_layer(&self) -> u8 {
        self.default_layer
    }

    /// Set the default layer number
    pub fn set_default_layer(&mut self, layer_num: u8) {
        if layer_num as usize >= NUM_LAYER {
            warn!(
                "Not a valid default layer {}, keyboard supports only {} layers",
                layer_num, NUM_LAYER
            );
            return;
        }
        self.default_layer = layer_num;
    }

    /// Fetch the action in keymap, without layer cache
    pub fn get_action_at(&self, row: usize, col: usize, layer_num: usize) -> KeyAction {
        self.layers
            .get(layer_num)
            .and_then(|layer| layer.get(row))
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(KeyAction::No)
    }

    /// Resolve the action at a position through the active layers, without touching the layer cache
    pub fn peek_action(&self, row: usize, col: usize) -> KeyAction {
        match self.resolve_layer(row, col) {
            Some(layer) => self.layers[layer as usize][row][col],
            None => KeyAction::No,
        }
    }

    /// Fetch the action in keymap, with layer cache
    pub fn get_action_with_layer_cache(&mut self, key_event: KeyEvent) -> KeyAction {
        let row = key_event.row as usize;
        let col = key_event.col as usize;
        if row >= ROW || col >= COL {
            warn!("Key event out of the matrix: ({}, {})", row, col);
            return KeyAction::No;
        }
        if !key_event.pressed {
            // Releasing a pressed key, use cached layer and restore the cache
            let layer = self.pop_layer_from_cache(row, col);
            return self.layers[layer as usize][row][col];
        }

        match self.resolve_layer(row, col) {
            Some(layer) => {
                // Found a valid action in the layer, cache it
                self.save_layer_cache(row, col, layer);
                self.layers[layer as usize][row][col]
            }
            None => KeyAction::No,
        }
    }

    /// Find the layer which provides the action at the position.
    ///
    /// Iterate from higher layer to lower layer, the lowest checked layer is the default layer
    fn resolve_layer(&self, row: usize, col: usize) -> Option<u8> {
        if row >= ROW || col >= COL {
            return None;
        }
        for (layer_idx, layer) in self.layers.iter().enumerate().rev() {
            if self.layer_state[layer_idx] || layer_idx as u8 == self.default_layer {
                if layer[row][col] != KeyAction::Transparent {
                    return Some(layer_idx as u8);
                }
            }

            if layer_idx as u8 == self.default_layer {
                break;
            }
        }
        None
    }

    /// Fetch the encoder action of the given layer, transparent entries fall through to lower active layers
    pub fn get_encoder_action(&self, id: u8, layer_num: u8) -> Option<EncoderAction> {
        let encoders = self.encoders?;
        if id as usize >= NUM_ENCODER {
            warn!("Not a valid encoder {}, keyboard has only {} encoders", id, NUM_ENCODER);
            return None;
        }
        for layer_idx in (0..=(layer_num as usize).min(NUM_LAYER.saturating_sub(1))).rev() {
            let active = self.layer_state[layer_idx] || layer_idx as u8 == self.default_layer;
            if !active && layer_idx != layer_num as usize {
                continue;
            }
            let action = encoders[layer_idx][id as usize];
            let transparent = action.clockwise() == KeyAction::Transparent
                && action.counter_clockwise() == KeyAction::Transparent;
            if !transparent {
                return Some(action);
            }
            if layer_idx as u8 == self.default_layer {
                break;
            }
        }
        None
    }

    /// Fetch the encoder action of the highest active layer
    pub fn get_encoder_with_active_layer(&self, id: u8) -> Option<EncoderAction> {
        self.get_encoder_action(id, self.get_activated_layer())
    }

    /// Highest active layer, falls back to the default layer
    pub fn get_activated_layer(&self) -> u8 {
        for (layer_idx, _) in self.layers.iter().enumerate().rev() {
            if self.layer_state[layer_idx] || layer_idx as u8 == self.default_layer {
                return layer_idx as u8;
            }
        }

        self.default_layer
    }

    /// Current layer state as a bitmask
    pub fn layer_state(&self) -> LayerState {
        let mut state = 0u32;
        for (layer_idx, on) in self.layer_state.iter().enumerate().take(32) {
            if *on {
                state |= 1 << layer_idx;
            }
        }
        LayerState(state)
    }

    /// Overwrite the layer state from a bitmask, bits above `NUM_LAYER` are ignored
    pub fn set_layer_state(&mut self, state: LayerState) {
        for (layer_idx, on) in self.layer_state.iter_mut().enumerate() {
            *on = state.is_on(layer_idx as u8);
        }
    }

    fn pop_layer_from_cache(&mut self, row: usize, col: usize) -> u8 {
        let layer = self.layer_cache[row][col];
        self.layer_cache[row][col] = self.default_layer;

        layer
    }

    fn save_layer_cache(&mut self, row: usize, col: usize, layer_num: u8) {
        self.layer_cache[row][col] = layer_num;
    }

    /// Activate given layer
    pub fn activate_layer(&mut self, layer_num: u8) {
        if layer_num as usize >= NUM_LAYER {
            warn!(
                "Not a valid layer {}, keyboard supports only {} layers",
                layer_num, NUM_LAYER
            );
            return;
        }
        self.layer_state[layer_num as usize] = true;
    }

    /// Deactivate given layer
    pub fn deactivate_layer(&mut self, layer_num: u8) {
        if layer_num as usize >= NUM_LAYER {
            warn!(
                "Not a valid layer {}, keyboard supports only {} layers",
                layer_num, NUM_LAYER
            );
            return;
        }
        self.layer_state[layer_num as usize] = false;
    }

    /// Toggle given layer
    pub fn toggle_layer(&mut self, layer_num: u8) {
        if layer_num as usize >= NUM_LAYER {
            warn!(
                "Not a valid layer {}, keyboard supports only {} layers",
                layer_num, NUM_LAYER
            );
            return;
        }

        self.layer_state[layer_num as usize] = !self.layer_state[layer_num as usize];
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{a, encoder, k, layer};

    #[rustfmt::skip]
    static LAYERS: [[[KeyAction; 3]; 1]; 3] = [
        layer!([[k!(A), k!(B), k!(C)]]),
        layer!([[k!(Kc1), a!(Transparent), a!(Transparent)]]),
        layer!([[a!(Transparent), k!(Kc2), a!(Transparent)]]),
    ];

    static ENCODERS: [[EncoderAction; 1]; 3] = [
        [encoder!(k!(AudioVolDown), k!(AudioVolUp))],
        [encoder!(k!(Down), k!(Up))],
        [encoder!(a!(Transparent), a!(Transparent))],
    ];

    fn keymap() -> KeyMap<1, 3, 3, 1> {
        KeyMap::new(&LAYERS, Some(&ENCODERS))
    }

    #[test]
    fn test_layer_state_cmp() {
        assert!(LayerState(0).cmp(0));
        assert!(!LayerState(0).cmp(4));
        assert!(LayerState(1 << 4).cmp(4));
        assert!(!LayerState(1 << 4).cmp(0));
        assert_eq!(LayerState(0b1010).highest(), 3);
    }

    #[test]
    fn test_transparent_falls_through() {
        let mut keymap = keymap();
        keymap.activate_layer(1);
        keymap.activate_layer(2);
        assert_eq!(keymap.peek_action(0, 0), k!(Kc1));
        assert_eq!(keymap.peek_action(0, 1), k!(Kc2));
        assert_eq!(keymap.peek_action(0, 2), k!(C));
        assert_eq!(keymap.layer_state(), LayerState(0b110));
    }

    #[test]
    fn test_release_uses_cached_layer() {
        let mut keymap = keymap();
        keymap.activate_layer(1);
        assert_eq!(keymap.get_action_with_layer_cache(KeyEvent::new(0, 0, true)), k!(Kc1));
        keymap.deactivate_layer(1);
        assert_eq!(keymap.get_action_with_layer_cache(KeyEvent::new(0, 0, false)), k!(Kc1));
        assert_eq!(keymap.get_action_with_layer_cache(KeyEvent::new(0, 0, true)), k!(A));
    }

    #[test]
    fn test_invalid_layer_is_ignored() {
        let mut keymap = keymap();
        keymap.activate_layer(7);
        keymap.toggle_layer(3);
        assert_eq!(keymap.layer_state(), LayerState(0));
        assert_eq!(keymap.get_activated_layer(), 0);
    }

    #[test]
    fn test_encoder_transparent_falls_through() {
        let mut keymap = keymap();
        keymap.activate_layer(1);
        keymap.activate_layer(2);
        let action = keymap.get_encoder_with_active_layer(0).unwrap();
        assert_eq!(action.clockwise(), k!(Up));
        assert_eq!(keymap.get_encoder_with_active_layer(1), None);
    }
}
