use embassy_time::Duration;

use crate::action::Action;

// Max number of tap dances
pub(crate) const TAP_DANCE_MAX_NUM: usize = 8;

/// Progress of a running tap dance, handed to the resolver when the dance finishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapDanceState {
    /// Number of presses on the dance key
    pub count: u8,
    /// The dance key is still held when the dance finishes
    pub pressed: bool,
    /// Another key was pressed before the tapping term expired
    pub interrupted: bool,
}

/// Resolver called once when a tap dance finishes.
///
/// The returned action is tapped: pressed and released immediately. `None` emits nothing.
pub type TapDanceFn = fn(&TapDanceState) -> Option<Action>;

#[derive(Clone, Debug)]
pub struct TapDance {
    pub on_finished: TapDanceFn,
    pub tapping_term: Duration,
}

fn no_action(_: &TapDanceState) -> Option<Action> {
    None
}

impl Default for TapDance {
    fn default() -> Self {
        Self {
            on_finished: no_action,
            tapping_term: Duration::from_millis(200),
        }
    }
}

impl TapDance {
    pub const fn new(on_finished: TapDanceFn, tapping_term: Duration) -> Self {
        Self {
            on_finished,
            tapping_term,
        }
    }

    pub fn finish(&self, state: &TapDanceState) -> Option<Action> {
        (self.on_finished)(state)
    }
}
