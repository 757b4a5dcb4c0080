//! Core logic for the TI-99/4A keyboard matrix emulator.
//!
//! Everything in here is pure and runs on the host for testing, the
//! firmware crate owns the pins and the scheduling.
#![cfg_attr(not(test), no_std)]

pub mod event;
pub mod keycode;
pub mod matrix;
pub mod scan;
pub mod state;
