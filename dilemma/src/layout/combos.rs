use heapless::Vec;

use crate::combo::{COMBO_MAX_NUM, Combo};

/// Combos of the base layer: `H`+`,` deletes a word, `F`+`U` toggles caps word, `P`+`L` types `_`.
///
/// Empty when the `combo` feature is off.
#[cfg(feature = "combo")]
pub fn combos() -> Vec<Combo, COMBO_MAX_NUM> {
    use crate::modifier::ModifierCombination;
    use crate::{k, shifted, wm};

    Vec::from_iter([
        Combo::new([k!(H), k!(Comma)], wm!(Backspace, ModifierCombination::LALT), None),
        Combo::new([k!(F), k!(U)], k!(CapsWordToggle), None),
        Combo::new([k!(P), k!(L)], shifted!(Minus), None),
    ])
}

#[cfg(not(feature = "combo"))]
pub fn combos() -> Vec<Combo, COMBO_MAX_NUM> {
    Vec::new()
}
