use embassy_time::Instant;
use heapless::{Deque, Vec};
use log::{debug, error, info, warn};

use crate::action::{Action, KeyAction};
use crate::combo::COMBO_MAX_LENGTH;
use crate::config::BehaviorConfig;
use crate::event::{Direction, KeyEvent, RotaryEncoderEvent};
use crate::hid::{KeyboardReport, MediaKeyboardReport, MouseReport, Report};
use crate::keycode::KeyCode;
use crate::keymap::{KeyMap, LayerState};
use crate::modifier::HidModifiers;
#[cfg(feature = "pointing_device")]
use crate::pointing::{LayerStateHook, PointerState};
use crate::rgb::RgbMatrixState;
use crate::tap_dance::TapDanceState;

/// Capacity of the outgoing report queue
pub const REPORT_QUEUE_SIZE: usize = 32;
// Max number of key events buffered while a tap-hold key is undecided
const KEY_EVENT_BUFFER_SIZE: usize = 16;
// Max number of tap-hold keys held at the same time
const HELD_TAP_HOLD_NUM: usize = 8;
// Encoder taps are registered on this row, with the encoder id as column
const ENCODER_ROW: u8 = u8::MAX;
// Cursor movement of a mouse key press
const MOUSE_KEY_MOVE: i8 = 8;

/// Requests raised by firmware keys, acted on by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemRequest {
    /// Jump to the bootloader
    Bootloader,
    Reboot,
    /// Clear the persistent configuration
    ClearEeprom,
}

/// An event held back while a tap-hold key is undecided
#[derive(Clone, Copy, Debug)]
enum BufferedEvent {
    Key(KeyEvent),
    Encoder(RotaryEncoderEvent),
}

/// A tap-hold key which is pressed, before the tap/hold decision
#[derive(Clone, Copy, Debug)]
struct PendingTapHold {
    event: KeyEvent,
    tap: Action,
    hold: Action,
    pressed_at: Instant,
}

/// A running tap dance
#[derive(Clone, Copy, Debug)]
struct ActiveTapDance {
    id: u8,
    event: KeyEvent,
    state: TapDanceState,
    last_press: Instant,
}

/// A triggered combo whose trigger keys are not all released yet
#[derive(Clone, Debug)]
struct ActiveCombo {
    output: KeyAction,
    /// Position the output is registered on
    event: KeyEvent,
    held: Vec<KeyEvent, COMBO_MAX_LENGTH>,
    output_released: bool,
}

pub struct Keyboard<const ROW: usize, const COL: usize, const NUM_LAYER: usize, const NUM_ENCODER: usize = 0> {
    /// Keymap
    keymap: KeyMap<ROW, COL, NUM_LAYER, NUM_ENCODER>,

    /// Options for configurable action behavior
    behavior: BehaviorConfig,

    /// Combo trigger presses waiting for the rest of the combo
    combo_buffer: Vec<(KeyEvent, Instant), COMBO_MAX_LENGTH>,

    active_combo: Option<ActiveCombo>,

    /// Tap-hold key waiting for the decision
    pending_tap_hold: Option<PendingTapHold>,

    /// Key and encoder events received while a tap-hold key is undecided, replayed after the decision
    buffered_events: Vec<(BufferedEvent, Instant), KEY_EVENT_BUFFER_SIZE>,

    /// Tap-hold keys resolved as hold, with the hold action to release
    held_tap_holds: Vec<(KeyEvent, Action), HELD_TAP_HOLD_NUM>,

    tap_dance: Option<ActiveTapDance>,

    /// Timestamp of the event being processed
    now: Instant,

    /// The held modifiers for the keyboard hid report
    held_modifiers: HidModifiers,

    /// The modifiers coming from (last) Action::KeyWithModifier
    with_modifiers: HidModifiers,

    /// The held keys for the keyboard hid report, except the modifiers
    held_keycodes: [KeyCode; 6],

    /// Registered key position for each slot of `held_keycodes`
    registered_keys: [Option<(u8, u8)>; 6],

    /// Time of the last key press while caps word is on
    caps_word: Option<Instant>,

    /// Position of the key which is shifted by caps word
    caps_word_shift: Option<(u8, u8)>,

    mouse_report: MouseReport,

    rgb: RgbMatrixState,

    #[cfg(feature = "pointing_device")]
    pointer: PointerState,

    #[cfg(feature = "pointing_device")]
    layer_state_hook: Option<LayerStateHook>,

    system_request: Option<SystemRequest>,

    /// Reports waiting to be sent to the host
    reports: Deque<Report, REPORT_QUEUE_SIZE>,
}

impl<const ROW: usize, const COL: usize, const NUM_LAYER: usize, const NUM_ENCODER: usize>
    Keyboard<ROW, COL, NUM_LAYER, NUM_ENCODER>
{
    pub fn new(keymap: KeyMap<ROW, COL, NUM_LAYER, NUM_ENCODER>, behavior: BehaviorConfig) -> Self {
        Self {
            keymap,
            combo_buffer: Vec::new(),
            active_combo: None,
            pending_tap_hold: None,
            buffered_events: Vec::new(),
            held_tap_holds: Vec::new(),
            tap_dance: None,
            now: Instant::from_ticks(0),
            held_modifiers: HidModifiers::new(),
            with_modifiers: HidModifiers::new(),
            held_keycodes: [KeyCode::No; 6],
            registered_keys: [None; 6],
            caps_word: None,
            caps_word_shift: None,
            mouse_report: MouseReport {
                buttons: 0,
                x: 0,
                y: 0,
                wheel: 0,
                pan: 0,
            },
            rgb: RgbMatrixState::default(),
            #[cfg(feature = "pointing_device")]
            pointer: PointerState::new(behavior.pointer),
            #[cfg(feature = "pointing_device")]
            layer_state_hook: None,
            system_request: None,
            reports: Deque::new(),
            behavior,
        }
    }

    /// Install the hook which runs after every layer state change
    #[cfg(feature = "pointing_device")]
    pub fn set_layer_state_hook(&mut self, hook: Option<LayerStateHook>) {
        self.layer_state_hook = hook;
    }

    pub fn keymap(&self) -> &KeyMap<ROW, COL, NUM_LAYER, NUM_ENCODER> {
        &self.keymap
    }

    pub fn layer_state(&self) -> LayerState {
        self.keymap.layer_state()
    }

    pub fn rgb(&self) -> &RgbMatrixState {
        &self.rgb
    }

    #[cfg(feature = "pointing_device")]
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn is_caps_word_active(&self) -> bool {
        self.caps_word.is_some()
    }

    /// Take the pending firmware request, if any
    pub fn take_system_request(&mut self) -> Option<SystemRequest> {
        self.system_request.take()
    }

    /// Pop the oldest report
    pub fn next_report(&mut self) -> Option<Report> {
        self.reports.pop_front()
    }

    /// Pop all queued reports, oldest first
    pub fn drain_reports(&mut self) -> impl Iterator<Item = Report> + '_ {
        core::iter::from_fn(move || self.reports.pop_front())
    }

    /// Process a key event which happened at `now`.
    ///
    /// Timeouts which expired before `now` are resolved first.
    pub fn process_key_event(&mut self, event: KeyEvent, now: Instant) {
        self.tick(now);
        if self.process_combo(event, now) {
            return;
        }
        self.process_inner(event, now);
    }

    /// Process one encoder detent, the action of the active layer is tapped.
    ///
    /// A detent goes through the same stages as a key press: it interrupts a running tap dance
    /// and waits behind an undecided tap-hold key.
    pub fn process_encoder_event(&mut self, event: RotaryEncoderEvent, now: Instant) {
        self.tick(now);
        if !self.combo_buffer.is_empty() {
            self.flush_combo_buffer();
        }
        self.process_encoder_inner(event, now);
    }

    fn process_encoder_inner(&mut self, event: RotaryEncoderEvent, now: Instant) {
        self.tick_tap_stage(now);
        self.advance_clock(now);

        if self.pending_tap_hold.is_some() {
            if self.buffered_events.push((BufferedEvent::Encoder(event), now)).is_err() {
                error!("Key event buffer full, deciding hold");
                self.decide_hold();
                self.process_encoder_inner(event, now);
            }
            return;
        }

        if self.tap_dance.is_some() {
            self.finish_tap_dance(true);
        }

        let Some(encoder_action) = self.keymap.get_encoder_with_active_layer(event.id) else {
            debug!("No encoder action for encoder {}", event.id);
            return;
        };
        let key_action = match event.direction {
            Direction::Clockwise => encoder_action.clockwise(),
            Direction::CounterClockwise => encoder_action.counter_clockwise(),
        };
        debug!("Encoder {} {:?}: {:?}", event.id, event.direction, key_action);
        self.tap_key_action(key_action, KeyEvent::new(ENCODER_ROW, event.id, true));
    }

    /// Resolve every timeout which expired at `now`: combo timeout, tap-hold decision, tap dance end and caps word idle.
    pub fn tick(&mut self, now: Instant) {
        if let Some((_, pressed_at)) = self.combo_buffer.first()
            && now >= *pressed_at + self.behavior.combo.timeout
        {
            debug!("Combo timeout, flushing {} buffered keys", self.combo_buffer.len());
            self.flush_combo_buffer();
        }

        self.tick_tap_stage(now);

        if let Some(last_press) = self.caps_word
            && now >= last_press + self.behavior.caps_word.idle_timeout
        {
            info!("Caps word idle timeout");
            self.set_caps_word(false);
        }
        self.advance_clock(now);
    }

    /// Move the clock forward, events replayed from a buffer never move it back
    fn advance_clock(&mut self, now: Instant) {
        if now > self.now {
            self.now = now;
        }
    }

    fn tick_tap_stage(&mut self, now: Instant) {
        loop {
            if let Some(pending) = self.pending_tap_hold
                && now >= pending.pressed_at + self.behavior.tap_hold.tapping_term
            {
                self.decide_hold();
                continue;
            }

            if let Some(dance) = self.tap_dance {
                let tapping_term = self
                    .behavior
                    .tap_dance
                    .tap_dances
                    .get(dance.id as usize)
                    .map(|td| td.tapping_term)
                    .unwrap_or(self.behavior.tap_hold.tapping_term);
                if now >= dance.last_press + tapping_term {
                    self.finish_tap_dance(false);
                    continue;
                }
            }

            break;
        }
    }

    /// Combo stage. Returns true if the event is consumed.
    fn process_combo(&mut self, event: KeyEvent, now: Instant) -> bool {
        if !event.pressed
            && let Some(active) = &mut self.active_combo
            && let Some(idx) = active.held.iter().position(|e| e.same_position(&event))
        {
            active.held.swap_remove(idx);
            let release = !active.output_released;
            active.output_released = true;
            let output = active.output;
            let output_event = active.event;
            if active.held.is_empty() {
                self.active_combo = None;
            }
            if release {
                debug!("Combo released: {:?}", output);
                self.process_key_action_simple(output, KeyEvent { pressed: false, ..output_event });
            }
            return true;
        }

        if self.behavior.combo.combos.is_empty() {
            return false;
        }

        if !event.pressed {
            if self.combo_buffer.iter().any(|(e, _)| e.same_position(&event)) {
                self.flush_combo_buffer();
            }
            return false;
        }

        // Combos are not recognized while a tap-hold key is undecided
        if self.pending_tap_hold.is_some() {
            return false;
        }

        let key_action = self.keymap.peek_action(event.row as usize, event.col as usize);
        let active_layer = self.keymap.get_activated_layer();
        if !self
            .behavior
            .combo
            .combos
            .iter()
            .any(|c| c.is_trigger(key_action, active_layer))
        {
            self.flush_combo_buffer();
            return false;
        }
        // The press doesn't continue any started combo
        if !self.combo_buffer.is_empty()
            && !self
                .behavior
                .combo
                .combos
                .iter()
                .any(|c| c.started() && c.is_trigger(key_action, active_layer))
        {
            self.flush_combo_buffer();
        }

        for combo in self.behavior.combo.combos.iter_mut() {
            combo.update(key_action, event, active_layer);
        }
        if self.combo_buffer.push((event, now)).is_err() {
            warn!("Combo buffer full");
            self.flush_combo_buffer();
            return false;
        }

        let Some(output) = self.behavior.combo.combos.iter().find(|c| c.done()).map(|c| c.output) else {
            return true;
        };

        debug!("Combo triggered: {:?}", output);
        let mut held = Vec::new();
        for (e, _) in self.combo_buffer.iter() {
            let _ = held.push(*e);
        }
        self.combo_buffer.clear();
        for combo in self.behavior.combo.combos.iter_mut() {
            combo.reset();
        }
        if self.tap_dance.is_some() {
            self.finish_tap_dance(true);
        }

        self.active_combo = Some(ActiveCombo {
            output,
            event,
            held,
            output_released: false,
        });
        self.process_key_action_simple(output, event);
        true
    }

    /// Send buffered combo keys as normal key presses
    fn flush_combo_buffer(&mut self) {
        for combo in self.behavior.combo.combos.iter_mut() {
            combo.reset();
        }
        let events = core::mem::take(&mut self.combo_buffer);
        for (event, pressed_at) in events {
            self.process_inner(event, pressed_at);
        }
    }

    /// Tap-hold and tap dance stage, then action dispatch
    fn process_inner(&mut self, event: KeyEvent, now: Instant) {
        self.tick_tap_stage(now);
        self.advance_clock(now);

        if let Some(pending) = self.pending_tap_hold {
            if pending.event.same_position(&event) {
                if !event.pressed {
                    // Released within the tapping term
                    self.pending_tap_hold = None;
                    self.keymap.get_action_with_layer_cache(event);
                    debug!("Tap-hold key ({}, {}) tapped", event.row, event.col);
                    self.process_action(pending.tap, pending.event);
                    self.process_action(pending.tap, event);
                    self.replay_buffered_events();
                }
                return;
            }

            let permissive_hold = self.behavior.tap_hold.permissive_hold
                && !event.pressed
                && self
                    .buffered_events
                    .iter()
                    .any(|(e, _)| matches!(e, BufferedEvent::Key(e) if e.pressed && e.same_position(&event)));

            if self.buffered_events.push((BufferedEvent::Key(event), now)).is_err() {
                error!("Key event buffer full, deciding hold");
                self.decide_hold();
                self.process_inner(event, now);
                return;
            }
            if permissive_hold {
                debug!("Permissive hold on ({}, {})", pending.event.row, pending.event.col);
                self.decide_hold();
            }
            return;
        }

        if let Some(dance) = self.tap_dance
            && event.pressed
            && !dance.event.same_position(&event)
        {
            self.finish_tap_dance(true);
        }

        let key_action = self.keymap.get_action_with_layer_cache(event);
        match key_action {
            KeyAction::No | KeyAction::Transparent => (),
            KeyAction::Single(action) => self.process_action(action, event),
            KeyAction::Tap(action) => {
                if event.pressed {
                    self.tap_action(action, event);
                }
            }
            KeyAction::TapHold(tap, hold) => self.process_tap_hold(tap, hold, event, now),
            KeyAction::TapDance(id) => self.process_tap_dance(id, event, now),
        }
    }

    fn process_tap_hold(&mut self, tap: Action, hold: Action, event: KeyEvent, now: Instant) {
        if event.pressed {
            self.pending_tap_hold = Some(PendingTapHold {
                event,
                tap,
                hold,
                pressed_at: now,
            });
            return;
        }

        if let Some(idx) = self.held_tap_holds.iter().position(|(e, _)| e.same_position(&event)) {
            let (_, hold_action) = self.held_tap_holds.swap_remove(idx);
            self.process_action(hold_action, event);
        }
    }

    /// Resolve the pending tap-hold key as hold and replay the keys buffered meanwhile
    fn decide_hold(&mut self) {
        let Some(pending) = self.pending_tap_hold.take() else {
            return;
        };
        debug!("Tap-hold key ({}, {}) held", pending.event.row, pending.event.col);
        if self.held_tap_holds.push((pending.event, pending.hold)).is_err() {
            warn!("Too many tap-hold keys held, hold action ignored");
        } else {
            self.process_action(pending.hold, pending.event);
        }
        self.replay_buffered_events();
    }

    fn replay_buffered_events(&mut self) {
        let events = core::mem::take(&mut self.buffered_events);
        for (event, at) in events {
            match event {
                BufferedEvent::Key(event) => self.process_inner(event, at),
                BufferedEvent::Encoder(event) => self.process_encoder_inner(event, at),
            }
        }
    }

    fn process_tap_dance(&mut self, id: u8, event: KeyEvent, now: Instant) {
        if self.behavior.tap_dance.tap_dances.get(id as usize).is_none() {
            warn!("Tap dance {} is not defined", id);
            return;
        }

        if !event.pressed {
            if let Some(dance) = &mut self.tap_dance
                && dance.event.same_position(&event)
            {
                dance.state.pressed = false;
            }
            return;
        }

        if let Some(dance) = &mut self.tap_dance
            && dance.id == id
            && dance.event.same_position(&event)
        {
            dance.state.count = dance.state.count.saturating_add(1);
            dance.state.pressed = true;
            dance.last_press = now;
            return;
        }

        if self.tap_dance.is_some() {
            self.finish_tap_dance(true);
        }
        self.tap_dance = Some(ActiveTapDance {
            id,
            event,
            state: TapDanceState {
                count: 1,
                pressed: true,
                interrupted: false,
            },
            last_press: now,
        });
    }

    /// Run the resolver of the active tap dance and tap its action
    fn finish_tap_dance(&mut self, interrupted: bool) {
        let Some(mut dance) = self.tap_dance.take() else {
            return;
        };
        dance.state.interrupted = interrupted;
        let output = self
            .behavior
            .tap_dance
            .tap_dances
            .get(dance.id as usize)
            .and_then(|td| td.finish(&dance.state));
        debug!("Tap dance {} finished with {:?}: {:?}", dance.id, dance.state, output);
        if let Some(action) = output {
            self.tap_action(action, KeyEvent { pressed: true, ..dance.event });
        }
    }

    /// Press and release an action on the event's position
    fn tap_action(&mut self, action: Action, event: KeyEvent) {
        self.process_action(action, KeyEvent { pressed: true, ..event });
        self.process_action(action, KeyEvent { pressed: false, ..event });
    }

    fn tap_key_action(&mut self, key_action: KeyAction, event: KeyEvent) {
        match key_action {
            KeyAction::Single(action) | KeyAction::Tap(action) | KeyAction::TapHold(action, _) => {
                self.tap_action(action, event)
            }
            KeyAction::No | KeyAction::Transparent => (),
            KeyAction::TapDance(_) => warn!("Tap dance can't be tapped: {:?}", key_action),
        }
    }

    /// Process a combo output, which is a plain action
    fn process_key_action_simple(&mut self, key_action: KeyAction, event: KeyEvent) {
        match key_action {
            KeyAction::Single(action) => self.process_action(action, event),
            KeyAction::Tap(action) => {
                if event.pressed {
                    self.tap_action(action, event);
                }
            }
            _ => warn!("Unsupported combo output: {:?}", key_action),
        }
    }

    fn process_action(&mut self, action: Action, event: KeyEvent) {
        match action {
            Action::No | Action::Transparent => (),
            Action::Key(key) => self.process_key(key, event),
            Action::Modifier(modifiers) => {
                let modifiers = modifiers.to_hid_modifiers();
                if event.pressed {
                    self.held_modifiers |= modifiers;
                } else {
                    self.held_modifiers &= !modifiers;
                }
                self.send_keyboard_report();
            }
            Action::KeyWithModifier(key, modifiers) => {
                if event.pressed {
                    self.with_modifiers |= modifiers.to_hid_modifiers();
                } else {
                    self.with_modifiers &= !modifiers.to_hid_modifiers();
                }
                self.process_key(key, event);
            }
            Action::LayerOn(layer) => {
                if event.pressed {
                    self.keymap.activate_layer(layer);
                } else {
                    self.keymap.deactivate_layer(layer);
                }
                self.run_layer_state_hook();
            }
            Action::LayerOff(layer) => {
                if event.pressed {
                    self.keymap.deactivate_layer(layer);
                    self.run_layer_state_hook();
                }
            }
            Action::LayerToggle(layer) => {
                if event.pressed {
                    self.keymap.toggle_layer(layer);
                    self.run_layer_state_hook();
                }
            }
            Action::DefaultLayer(layer) => {
                if event.pressed {
                    self.keymap.set_default_layer(layer);
                    self.run_layer_state_hook();
                }
            }
        }
    }

    #[cfg(feature = "pointing_device")]
    fn run_layer_state_hook(&mut self) {
        let state = self.keymap.layer_state();
        if let Some(hook) = self.layer_state_hook {
            let new_state = hook(state, &mut self.pointer);
            if new_state != state {
                self.keymap.set_layer_state(new_state);
            }
        }
        debug!("Layer state: {:#b}", self.keymap.layer_state().0);
    }

    #[cfg(not(feature = "pointing_device"))]
    fn run_layer_state_hook(&mut self) {
        debug!("Layer state: {:#b}", self.keymap.layer_state().0);
    }

    fn process_key(&mut self, key: KeyCode, event: KeyEvent) {
        if key.is_basic() || key.is_modifier() {
            if event.pressed {
                self.update_caps_word(key, event);
                self.register_key(key, event);
            } else {
                if self.caps_word_shift == Some((event.row, event.col)) {
                    self.caps_word_shift = None;
                }
                self.unregister_key(key, event);
            }
            self.send_keyboard_report();
        } else if key.is_consumer() {
            self.process_consumer(key, event.pressed);
        } else if key.is_mouse_key() {
            self.process_mouse(key, event.pressed);
        } else if key.is_rgb_matrix() {
            if event.pressed {
                self.rgb.process_keycode(key, &self.behavior.rgb);
            }
        } else if key.is_firmware() {
            self.process_firmware(key, event.pressed);
        } else if key.is_pointer() {
            self.process_pointer(key, event.pressed);
        } else if key != KeyCode::No {
            warn!("Unsupported keycode: {:?}", key);
        }
    }

    fn process_consumer(&mut self, key: KeyCode, pressed: bool) {
        let usage_id = match key.as_consumer_usage_id() {
            Some(usage) if pressed => usage as u16,
            _ => 0,
        };
        self.send_report(Report::MediaKeyboardReport(MediaKeyboardReport { usage_id }));
    }

    fn process_mouse(&mut self, key: KeyCode, pressed: bool) {
        if key >= KeyCode::MouseBtn1 && key <= KeyCode::MouseBtn5 {
            let bit = 1 << (key as u16 - KeyCode::MouseBtn1 as u16);
            if pressed {
                self.mouse_report.buttons |= bit;
            } else {
                self.mouse_report.buttons &= !bit;
            }
        } else {
            let delta = |d: i8| if pressed { d } else { 0 };
            match key {
                KeyCode::MouseUp => self.mouse_report.y = delta(-MOUSE_KEY_MOVE),
                KeyCode::MouseDown => self.mouse_report.y = delta(MOUSE_KEY_MOVE),
                KeyCode::MouseLeft => self.mouse_report.x = delta(-MOUSE_KEY_MOVE),
                KeyCode::MouseRight => self.mouse_report.x = delta(MOUSE_KEY_MOVE),
                KeyCode::MouseWheelUp => self.mouse_report.wheel = delta(1),
                KeyCode::MouseWheelDown => self.mouse_report.wheel = delta(-1),
                KeyCode::MouseWheelLeft => self.mouse_report.pan = delta(-1),
                KeyCode::MouseWheelRight => self.mouse_report.pan = delta(1),
                _ => return,
            }
        }
        self.send_report(Report::MouseReport(self.mouse_report));
    }

    fn process_firmware(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::CapsWordToggle => {
                if pressed {
                    let active = self.caps_word.is_none();
                    self.set_caps_word(active);
                }
            }
            KeyCode::Bootloader | KeyCode::Reboot | KeyCode::ClearEeprom => {
                if !pressed {
                    let request = match key {
                        KeyCode::Bootloader => SystemRequest::Bootloader,
                        KeyCode::Reboot => SystemRequest::Reboot,
                        _ => SystemRequest::ClearEeprom,
                    };
                    info!("System request: {:?}", request);
                    self.system_request = Some(request);
                }
            }
            _ => (),
        }
    }

    #[cfg(feature = "pointing_device")]
    fn process_pointer(&mut self, key: KeyCode, pressed: bool) {
        let shift = self.resolve_modifiers().has_shift();
        self.pointer.process_keycode(key, pressed, shift);
    }

    #[cfg(not(feature = "pointing_device"))]
    fn process_pointer(&mut self, key: KeyCode, _pressed: bool) {
        debug!("Pointing device is disabled, {:?} ignored", key);
    }

    fn set_caps_word(&mut self, active: bool) {
        self.caps_word = if active { Some(self.now) } else { None };
        self.caps_word_shift = None;
        info!("Caps word {}", if active { "on" } else { "off" });
    }

    /// Caps word handling of a key press, before the key is registered
    fn update_caps_word(&mut self, key: KeyCode, event: KeyEvent) {
        if self.caps_word.is_none() {
            return;
        }
        if !key.is_caps_word_continue_key() {
            self.set_caps_word(false);
            return;
        }
        self.caps_word = Some(self.now);
        if key.is_caps_word_shifted_key() {
            self.caps_word_shift = Some((event.row, event.col));
        } else if !key.is_modifier() {
            self.caps_word_shift = None;
        }
    }

    /// Modifiers of the next keyboard report
    fn resolve_modifiers(&self) -> HidModifiers {
        let mut modifiers = self.held_modifiers | self.with_modifiers;
        if self.caps_word_shift.is_some() {
            modifiers |= HidModifiers::new().with_left_shift(true);
        }
        modifiers
    }

    fn send_keyboard_report(&mut self) {
        let report = KeyboardReport {
            modifier: self.resolve_modifiers().into_bits(),
            reserved: 0,
            leds: 0,
            keycodes: self.held_keycodes.map(|k| k as u8),
        };
        self.send_report(Report::KeyboardReport(report));
    }

    fn send_report(&mut self, report: Report) {
        if self.reports.push_back(report).is_err() {
            error!("Report queue full, dropping report");
        }
    }

    /// Register a key, the key can be a basic keycode or a modifier.
    fn register_key(&mut self, key: KeyCode, key_event: KeyEvent) {
        if key.is_modifier() {
            self.held_modifiers |= key.to_hid_modifiers();
        } else if key.is_basic() {
            self.register_keycode(key, key_event);
        }
    }

    /// Unregister a key, the key can be a basic keycode or a modifier.
    fn unregister_key(&mut self, key: KeyCode, key_event: KeyEvent) {
        if key.is_modifier() {
            self.held_modifiers &= !key.to_hid_modifiers();
        } else if key.is_basic() {
            self.unregister_keycode(key, key_event);
        }
    }

    fn find_registered_slot(&self, key_event: KeyEvent) -> Option<usize> {
        self.registered_keys
            .iter()
            .position(|k| *k == Some((key_event.row, key_event.col)))
    }

    /// Register a key to be sent in hid report.
    fn register_keycode(&mut self, key: KeyCode, key_event: KeyEvent) {
        // First, find the key event slot according to the position
        if let Some(index) = self.find_registered_slot(key_event) {
            self.held_keycodes[index] = key;
        } else if let Some(index) = self.held_keycodes.iter().position(|&k| k == KeyCode::No) {
            // Otherwise, find the first free slot
            self.held_keycodes[index] = key;
            self.registered_keys[index] = Some((key_event.row, key_event.col));
        } else {
            warn!("Too many keys held, {:?} dropped", key);
        }
    }

    /// Unregister a key from hid report.
    fn unregister_keycode(&mut self, key: KeyCode, key_event: KeyEvent) {
        let slot = self
            .find_registered_slot(key_event)
            // Otherwise, release the first same key
            .or_else(|| self.held_keycodes.iter().position(|&k| k == key));
        if let Some(index) = slot {
            self.held_keycodes[index] = KeyCode::No;
            self.registered_keys[index] = None;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{a, k, layer, lt, mo, mt, wm};
    use crate::modifier::ModifierCombination;

    // Init logger for tests
    #[ctor::ctor]
    fn init_log() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    #[rustfmt::skip]
    static KEYMAP: [[[KeyAction; 4]; 1]; 2] = [
        layer!([[k!(A), lt!(1, Space), mt!(S, ModifierCombination::LCTRL), wm!(Backspace, ModifierCombination::LALT)]]),
        layer!([[k!(Kc1), a!(Transparent), k!(MediaPlayPause), k!(MouseBtn1)]]),
    ];

    fn keyboard() -> Keyboard<1, 4, 2> {
        Keyboard::new(KeyMap::new(&KEYMAP, None), BehaviorConfig::default())
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn keyboard_reports(keyboard: &mut Keyboard<1, 4, 2>) -> std::vec::Vec<KeyboardReport> {
        keyboard
            .drain_reports()
            .filter_map(|r| match r {
                Report::KeyboardReport(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_register_and_release_key() {
        let mut keyboard = keyboard();
        keyboard.process_key_event(KeyEvent::new(0, 0, true), at(0));
        keyboard.process_key_event(KeyEvent::new(0, 0, false), at(10));
        let reports = keyboard_reports(&mut keyboard);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].keycodes, [KeyCode::A as u8, 0, 0, 0, 0, 0]);
        assert_eq!(reports[1].keycodes, [0; 6]);
    }

    #[test]
    fn test_key_with_modifier() {
        let mut keyboard = keyboard();
        keyboard.process_key_event(KeyEvent::new(0, 3, true), at(0));
        keyboard.process_key_event(KeyEvent::new(0, 3, false), at(10));
        let reports = keyboard_reports(&mut keyboard);
        assert_eq!(reports[0].modifier, 1 << 2);
        assert_eq!(reports[0].keycodes[0], KeyCode::Backspace as u8);
        assert_eq!(reports[1], KeyboardReport::default());
    }

    #[test]
    fn test_layer_tap_hold_then_release() {
        let mut keyboard = keyboard();
        keyboard.process_key_event(KeyEvent::new(0, 1, true), at(0));
        keyboard.tick(at(250));
        assert_eq!(keyboard.layer_state(), LayerState(0b10));
        keyboard.process_key_event(KeyEvent::new(0, 2, true), at(260));
        keyboard.process_key_event(KeyEvent::new(0, 2, false), at(270));
        keyboard.process_key_event(KeyEvent::new(0, 1, false), at(300));
        assert_eq!(keyboard.layer_state(), LayerState(0));
        let reports: std::vec::Vec<Report> = keyboard.drain_reports().collect();
        assert_eq!(
            reports,
            [
                Report::MediaKeyboardReport(MediaKeyboardReport { usage_id: 0xCD }),
                Report::MediaKeyboardReport(MediaKeyboardReport { usage_id: 0 }),
            ]
        );
    }

    #[test]
    fn test_buffered_key_replayed_after_tap() {
        let mut keyboard = keyboard();
        keyboard.process_key_event(KeyEvent::new(0, 2, true), at(0));
        keyboard.process_key_event(KeyEvent::new(0, 0, true), at(50));
        assert!(keyboard.next_report().is_none());
        keyboard.process_key_event(KeyEvent::new(0, 2, false), at(100));
        keyboard.process_key_event(KeyEvent::new(0, 0, false), at(120));
        let reports = keyboard_reports(&mut keyboard);
        assert_eq!(reports.len(), 4);
        assert_eq!(reports[0].keycodes[0], KeyCode::S as u8);
        assert_eq!(reports[1].keycodes, [0; 6]);
        assert_eq!(reports[2].keycodes[0], KeyCode::A as u8);
        assert_eq!(reports[3].keycodes, [0; 6]);
    }

    #[test]
    fn test_permissive_hold() {
        let mut behavior = BehaviorConfig::default();
        behavior.tap_hold.permissive_hold = true;
        let mut keyboard: Keyboard<1, 4, 2> = Keyboard::new(KeyMap::new(&KEYMAP, None), behavior);
        keyboard.process_key_event(KeyEvent::new(0, 2, true), at(0));
        keyboard.process_key_event(KeyEvent::new(0, 0, true), at(50));
        keyboard.process_key_event(KeyEvent::new(0, 0, false), at(80));
        keyboard.process_key_event(KeyEvent::new(0, 2, false), at(100));
        let reports = keyboard_reports(&mut keyboard);
        assert_eq!(reports.len(), 4);
        // Ctrl held, A tapped under it
        assert_eq!(reports[0].modifier, 1);
        assert_eq!(reports[1].modifier, 1);
        assert_eq!(reports[1].keycodes[0], KeyCode::A as u8);
        assert_eq!(reports[2].modifier, 1);
        assert_eq!(reports[3], KeyboardReport::default());
    }

    #[test]
    fn test_report_queue_overflow_drops_newest() {
        let mut keyboard = keyboard();
        for i in 0..REPORT_QUEUE_SIZE as u64 {
            keyboard.process_key_event(KeyEvent::new(0, 0, i % 2 == 0), at(i * 10));
        }
        keyboard.process_key_event(KeyEvent::new(0, 0, true), at(1000));
        assert_eq!(keyboard.drain_reports().count(), REPORT_QUEUE_SIZE);
    }

    #[test]
    fn test_mouse_button_on_layer() {
        let mut keyboard = keyboard();
        keyboard.process_key_event(KeyEvent::new(0, 1, true), at(0));
        keyboard.process_key_event(KeyEvent::new(0, 3, true), at(300));
        keyboard.process_key_event(KeyEvent::new(0, 3, false), at(320));
        let reports: std::vec::Vec<Report> = keyboard.drain_reports().collect();
        assert_eq!(
            reports,
            [
                Report::MouseReport(MouseReport {
                    buttons: 1,
                    x: 0,
                    y: 0,
                    wheel: 0,
                    pan: 0,
                }),
                Report::MouseReport(MouseReport {
                    buttons: 0,
                    x: 0,
                    y: 0,
                    wheel: 0,
                    pan: 0,
                }),
            ]
        );
    }

    #[test]
    fn test_replay_keeps_clock_monotonic() {
        let mut keyboard = keyboard();
        keyboard.set_caps_word(true);
        keyboard.process_key_event(KeyEvent::new(0, 2, true), at(0));
        keyboard.process_key_event(KeyEvent::new(0, 0, true), at(50));
        // Tapped at 150, A is replayed with its own timestamp
        keyboard.process_key_event(KeyEvent::new(0, 2, false), at(150));
        assert_eq!(keyboard.now, at(150));
        assert_eq!(keyboard.caps_word, Some(at(150)));
    }

    #[test]
    fn test_momentary_layer() {
        #[rustfmt::skip]
        static MO_KEYMAP: [[[KeyAction; 2]; 1]; 2] = [
            layer!([[mo!(1), k!(A)]]),
            layer!([[a!(Transparent), k!(B)]]),
        ];
        let mut keyboard: Keyboard<1, 2, 2> = Keyboard::new(KeyMap::new(&MO_KEYMAP, None), BehaviorConfig::default());
        keyboard.process_key_event(KeyEvent::new(0, 0, true), at(0));
        assert_eq!(keyboard.layer_state(), LayerState(0b10));
        keyboard.process_key_event(KeyEvent::new(0, 1, true), at(10));
        keyboard.process_key_event(KeyEvent::new(0, 1, false), at(20));
        keyboard.process_key_event(KeyEvent::new(0, 0, false), at(30));
        assert_eq!(keyboard.layer_state(), LayerState(0));
        let reports: std::vec::Vec<Report> = keyboard.drain_reports().collect();
        assert_eq!(reports.len(), 2);
        assert_eq!(
            reports[0],
            Report::KeyboardReport(KeyboardReport {
                keycodes: [KeyCode::B as u8, 0, 0, 0, 0, 0],
                ..Default::default()
            })
        );
    }
}
