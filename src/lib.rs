//! Keymap, lighting and trackball behaviour for a 36-key split keyboard with
//! an integrated trackball.
//!
//! The embedding firmware owns the hardware services (matrix scan, USB HID,
//! the LED driver, the sensor SPI link) and calls in here once per scan:
//! [`keystate::Keymap::process`] turns debounced key states into HID usages
//! and behaviour [`keystate::Event`]s, and [`behavior::Behavior`] routes those
//! events to the RGB matrix and the trackball through the [`light::RgbMatrix`]
//! and [`pointer::Trackball`] seams.

#![no_std]

pub mod behavior;
pub mod keystate;
pub mod layout;
pub mod light;
pub mod pointer;
