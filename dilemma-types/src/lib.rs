//! # Dilemma Types
//!
//! Fundamental type definitions shared by the Dilemma 3x5_3 keymap and the
//! runtime that evaluates it.
//!
//! ## Modules
//!
//! - [`action`] - Key actions stored in the keymap: plain keys, tap-hold, tap dance, encoder pairs
//! - [`keycode`] - Flat key code space: HID keys, consumer keys, mouse keys and firmware keys
//! - [`modifier`] - Modifier combinations and HID modifier bits

#![no_std]

pub mod action;
pub mod keycode;
pub mod modifier;
