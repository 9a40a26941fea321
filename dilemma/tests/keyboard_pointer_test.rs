#![cfg(feature = "pointing_device")]

pub mod common;

use dilemma::event::KeyEvent;
use dilemma::hid::Report;
use dilemma::keyboard::SystemRequest;
use dilemma::layout::{DilemmaKeyboard, create_keyboard};
use embassy_time::Instant;

use crate::common::mouse_report;

/// Hold PT_Z until the pointer layer is on
fn hold_pointer_layer(keyboard: &mut DilemmaKeyboard) {
    keyboard.process_key_event(KeyEvent::new(2, 0, true), Instant::from_millis(0));
    keyboard.tick(Instant::from_millis(250));
}

fn tap(keyboard: &mut DilemmaKeyboard, row: u8, col: u8, at_ms: u64) {
    keyboard.process_key_event(KeyEvent::new(row, col, true), Instant::from_millis(at_ms));
    keyboard.process_key_event(KeyEvent::new(row, col, false), Instant::from_millis(at_ms + 10));
}

#[test]
fn test_default_dpi_cycle() {
    let mut keyboard = create_keyboard();
    assert_eq!(keyboard.pointer().default_dpi(), 400);
    hold_pointer_layer(&mut keyboard);
    tap(&mut keyboard, 0, 3, 300);
    assert_eq!(keyboard.pointer().default_dpi(), 600);
    // The right hand DPI_MOD does the same
    tap(&mut keyboard, 0, 6, 400);
    assert_eq!(keyboard.pointer().default_dpi(), 800);
}

#[test]
fn test_default_dpi_reverse_with_shift() {
    let mut keyboard = create_keyboard();
    hold_pointer_layer(&mut keyboard);
    tap(&mut keyboard, 0, 3, 300);
    assert_eq!(keyboard.pointer().default_dpi(), 600);

    // Shift on the pointer layer
    keyboard.process_key_event(KeyEvent::new(1, 3, true), Instant::from_millis(400));
    tap(&mut keyboard, 0, 3, 420);
    keyboard.process_key_event(KeyEvent::new(1, 3, false), Instant::from_millis(500));
    assert_eq!(keyboard.pointer().default_dpi(), 400);
}

#[test]
fn test_sniping_dpi_cycle() {
    let mut keyboard = create_keyboard();
    hold_pointer_layer(&mut keyboard);
    assert_eq!(keyboard.pointer().sniping_dpi(), 200);
    tap(&mut keyboard, 0, 4, 300);
    assert_eq!(keyboard.pointer().sniping_dpi(), 300);
    tap(&mut keyboard, 0, 5, 400);
    assert_eq!(keyboard.pointer().sniping_dpi(), 400);
}

#[test]
fn test_sniping_is_momentary() {
    let mut keyboard = create_keyboard();
    hold_pointer_layer(&mut keyboard);
    keyboard.process_key_event(KeyEvent::new(2, 2, true), Instant::from_millis(300));
    assert!(keyboard.pointer().is_sniping_enabled());
    assert_eq!(keyboard.pointer().current_dpi(), 200);
    keyboard.process_key_event(KeyEvent::new(2, 2, false), Instant::from_millis(400));
    assert!(!keyboard.pointer().is_sniping_enabled());
    assert_eq!(keyboard.pointer().current_dpi(), 400);
}

#[test]
fn test_drag_scroll_is_momentary() {
    let mut keyboard = create_keyboard();
    hold_pointer_layer(&mut keyboard);
    keyboard.process_key_event(KeyEvent::new(2, 8, true), Instant::from_millis(300));
    assert!(keyboard.pointer().is_drag_scroll_enabled());
    keyboard.process_key_event(KeyEvent::new(2, 8, false), Instant::from_millis(400));
    assert!(!keyboard.pointer().is_drag_scroll_enabled());
}

#[test]
fn test_mouse_buttons_on_thumbs() {
    let mut keyboard = create_keyboard();
    hold_pointer_layer(&mut keyboard);
    tap(&mut keyboard, 3, 4, 300);
    tap(&mut keyboard, 3, 6, 400);
    let reports: Vec<Report> = keyboard.drain_reports().collect();
    assert_eq!(
        reports,
        [
            mouse_report(0b001, 0),
            mouse_report(0, 0),
            mouse_report(0b010, 0),
            mouse_report(0, 0),
        ]
    );
}

#[test]
fn test_bootloader_on_release() {
    let mut keyboard = create_keyboard();
    hold_pointer_layer(&mut keyboard);
    keyboard.process_key_event(KeyEvent::new(0, 0, true), Instant::from_millis(300));
    assert_eq!(keyboard.take_system_request(), None);
    keyboard.process_key_event(KeyEvent::new(0, 0, false), Instant::from_millis(320));
    assert_eq!(keyboard.take_system_request(), Some(SystemRequest::Bootloader));
    assert_eq!(keyboard.take_system_request(), None);

    tap(&mut keyboard, 0, 8, 400);
    assert_eq!(keyboard.take_system_request(), Some(SystemRequest::ClearEeprom));
}

#[cfg(feature = "auto_sniping")]
#[test]
fn test_sniping_follows_pointer_layer() {
    let mut keyboard = create_keyboard();
    assert!(!keyboard.pointer().is_sniping_enabled());
    hold_pointer_layer(&mut keyboard);
    assert!(keyboard.pointer().is_sniping_enabled());
    keyboard.process_key_event(KeyEvent::new(2, 0, false), Instant::from_millis(300));
    assert!(!keyboard.pointer().is_sniping_enabled());
}

#[cfg(not(feature = "auto_sniping"))]
#[test]
fn test_pointer_layer_keeps_sniping_off() {
    let mut keyboard = create_keyboard();
    hold_pointer_layer(&mut keyboard);
    assert!(!keyboard.pointer().is_sniping_enabled());
    keyboard.process_key_event(KeyEvent::new(2, 0, false), Instant::from_millis(300));
    assert!(!keyboard.pointer().is_sniping_enabled());
}
