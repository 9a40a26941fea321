pub mod test_macro;

use dilemma::event::{KeyEvent, RotaryEncoderEvent};
use dilemma::hid::{KeyboardReport, MediaKeyboardReport, MouseReport, Report};
use dilemma::layout::DilemmaKeyboard;
use embassy_time::{Duration, Instant};
use log::debug;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

#[allow(dead_code)]
pub(crate) const KC_LCTRL: u8 = 1 << 0;
#[allow(dead_code)]
pub(crate) const KC_LSHIFT: u8 = 1 << 1;
#[allow(dead_code)]
pub(crate) const KC_LALT: u8 = 1 << 2;
#[allow(dead_code)]
pub(crate) const KC_LGUI: u8 = 1 << 3;

/// Mouse report with the given buttons and wheel, no movement
#[allow(dead_code)]
pub fn mouse_report(buttons: u8, wheel: i8) -> Report {
    Report::MouseReport(MouseReport {
        buttons,
        x: 0,
        y: 0,
        wheel,
        pan: 0,
    })
}

#[allow(dead_code)]
pub fn media_report(usage_id: u16) -> Report {
    Report::MediaKeyboardReport(MediaKeyboardReport { usage_id })
}

#[derive(Debug, Clone)]
pub struct TestKeyPress {
    pub row: u8,
    pub col: u8,
    pub pressed: bool,
    pub delay: u64, // Delay before this key event in milliseconds
}

/// Feed a key sequence with delays, then let every pending timeout expire.
///
/// Returns all reports, in order.
pub fn run_sequence(keyboard: &mut DilemmaKeyboard, key_sequence: &[TestKeyPress]) -> Vec<Report> {
    let mut now = Instant::from_millis(0);
    for key in key_sequence {
        now += Duration::from_millis(key.delay);
        keyboard.process_key_event(KeyEvent::new(key.row, key.col, key.pressed), now);
    }
    keyboard.tick(now + Duration::from_secs(1));
    keyboard.drain_reports().collect()
}

/// Turn one encoder by one detent at `at_ms`
#[allow(dead_code)]
pub fn turn_encoder(keyboard: &mut DilemmaKeyboard, event: RotaryEncoderEvent, at_ms: u64) -> Vec<Report> {
    keyboard.process_encoder_event(event, Instant::from_millis(at_ms));
    keyboard.drain_reports().collect()
}

// run a keyboard test: input is a seq of key input with delay, use expected keyboard reports to verify
#[allow(dead_code)]
pub fn run_key_sequence_test(
    keyboard: &mut DilemmaKeyboard,
    key_sequence: &[TestKeyPress],
    expected_reports: &[KeyboardReport],
) {
    let reports: Vec<KeyboardReport> = run_sequence(keyboard, key_sequence)
        .into_iter()
        .filter_map(|report| match report {
            Report::KeyboardReport(report) => Some(report),
            report => {
                debug!("other reports {:?}", report);
                None
            }
        })
        .collect();

    for (report_index, (expected, actual)) in expected_reports.iter().zip(reports.iter()).enumerate() {
        assert_eq!(
            expected, actual,
            "on #{} reports, expected left but actually right",
            report_index
        );
    }
    assert_eq!(
        expected_reports.len(),
        reports.len(),
        "expected {} reports, got {:?}",
        expected_reports.len(),
        reports
    );
}
