//! Keymap of the Bastard Keyboards Dilemma 3x5_3 (`jochen` layout).
//!
//! The [`layout`] module holds the static tables: seven layers, two tap dances, three
//! combos, the per-layer encoder map and the layer state hook. The rest of the crate is
//! a small runtime that evaluates these tables the way the keyboard firmware does:
//! [`keymap::KeyMap`] resolves actions through the layer stack and [`keyboard::Keyboard`]
//! turns key and encoder events into HID reports.
//!
//! The runtime is synchronous. The host calls [`keyboard::Keyboard::process_key_event`],
//! [`keyboard::Keyboard::process_encoder_event`] and [`keyboard::Keyboard::tick`] with
//! explicit timestamps and drains the reports afterwards.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]

pub use dilemma_types as types;
pub use dilemma_types::{action, keycode, modifier};

pub mod combo;
pub mod config;
pub mod event;
pub mod hid;
pub mod keyboard;
pub mod keymap;
pub mod layout;
pub mod layout_macro;
#[cfg(feature = "pointing_device")]
pub mod pointing;
pub mod rgb;
pub mod tap_dance;
