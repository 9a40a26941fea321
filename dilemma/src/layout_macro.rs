/// Create a layer in keymap
#[macro_export]
macro_rules! layer {
    ([$([$($x: expr), +]), +]) => {
        [$([$($x), +]),+]
    };
}

/// Create a layer of the split 3x5_3 layout.
///
/// Takes the 30 finger keys row by row (left hand then right hand), followed by the 6 thumb keys.
/// The thumbs land on row 3, columns 2 to 7; the unpopulated corners of row 3 are `No`.
#[cfg_attr(rustfmt, rustfmt::skip)]
#[macro_export]
macro_rules! layout_split_3x5_3 {
    (
        $k00: expr, $k01: expr, $k02: expr, $k03: expr, $k04: expr, $k05: expr, $k06: expr, $k07: expr, $k08: expr, $k09: expr,
        $k10: expr, $k11: expr, $k12: expr, $k13: expr, $k14: expr, $k15: expr, $k16: expr, $k17: expr, $k18: expr, $k19: expr,
        $k20: expr, $k21: expr, $k22: expr, $k23: expr, $k24: expr, $k25: expr, $k26: expr, $k27: expr, $k28: expr, $k29: expr,
                                $k32: expr, $k33: expr, $k34: expr, $k35: expr, $k36: expr, $k37: expr $(,)?
    ) => {
        $crate::layer!([
            [$k00, $k01, $k02, $k03, $k04, $k05, $k06, $k07, $k08, $k09],
            [$k10, $k11, $k12, $k13, $k14, $k15, $k16, $k17, $k18, $k19],
            [$k20, $k21, $k22, $k23, $k24, $k25, $k26, $k27, $k28, $k29],
            [$crate::a!(No), $crate::a!(No), $k32, $k33, $k34, $k35, $k36, $k37, $crate::a!(No), $crate::a!(No)]
        ])
    };
}

/// Create a normal key. For example, `k!(A)` represents `KeyAction::Single(Action::Key(KeyCode::A))`
#[macro_export]
macro_rules! k {
    ($k: ident) => {
        $crate::action::KeyAction::Single($crate::action::Action::Key($crate::keycode::KeyCode::$k))
    };
}

/// Create a normal key with modifier action, e.g. `wm!(Backspace, ModifierCombination::LALT)`
#[macro_export]
macro_rules! wm {
    ($x: ident, $m: expr) => {
        $crate::action::KeyAction::Single($crate::action::Action::KeyWithModifier(
            $crate::keycode::KeyCode::$x,
            $m,
        ))
    };
}

/// Create a normal action: `KeyAction`
#[macro_export]
macro_rules! a {
    ($a: ident) => {
        $crate::action::KeyAction::$a
    };
}

/// Create a layer activate action. For example, `mo!(1)` activates layer 1.
#[macro_export]
macro_rules! mo {
    ($x: expr) => {
        $crate::action::KeyAction::Single($crate::action::Action::LayerOn($x))
    };
}

/// Create a layer activate action or tap key(tap/hold)
#[macro_export]
macro_rules! lt {
    ($x: expr, $k: ident) => {
        $crate::action::KeyAction::TapHold(
            $crate::action::Action::Key($crate::keycode::KeyCode::$k),
            $crate::action::Action::LayerOn($x),
        )
    };
}

/// Create a modifier-tap-hold action
#[macro_export]
macro_rules! mt {
    ($k: ident, $m: expr) => {
        $crate::action::KeyAction::TapHold(
            $crate::action::Action::Key($crate::keycode::KeyCode::$k),
            $crate::action::Action::Modifier($m),
        )
    };
}

/// Create a shifted key
#[macro_export]
macro_rules! shifted {
    ($x: ident) => {
        $crate::wm!(
            $x,
            $crate::modifier::ModifierCombination::new_from(false, false, false, true, false)
        )
    };
}

/// Create a tap dance key, `n` is the index of the tap dance
#[macro_export]
macro_rules! td {
    ($n: expr) => {
        $crate::action::KeyAction::TapDance($n)
    };
}

/// Create an encoder action, the first argument is the counter-clockwise action, the second is the clockwise action
#[macro_export]
macro_rules! encoder {
    ($counter_clockwise: expr, $clockwise: expr) => {
        $crate::action::EncoderAction::new($counter_clockwise, $clockwise)
    };
}
