use super::Layer;
use crate::keymap::LayerState;
use crate::pointing::PointerState;

/// Turn sniping on while the pointer layer is active.
pub fn layer_state_set_user(state: LayerState, pointer: &mut PointerState) -> LayerState {
    pointer.set_sniping_enabled(state.cmp(Layer::Pointer.index()));
    state
}
