#![cfg_attr(not(test), no_std)]
//! # `ad9850-vfo` - AD9850 DDS driver with tuning front-ends
//!
//! The AD9850 is a DDS Synthesizer chip sold by Analog Devices. Check the [datasheet](https://www.analog.com/media/en/technical-documentation/data-sheets/AD9850.pdf) for general information about it.
//!
//! This crate implements an interface for embedded devices to control such an AD9850 chip,
//! plus two optional ways of tuning it:
//!
//! - [`encoder`]: a rotary encoder with a step-size button,
//! - [`console`]: decimal frequencies typed over a serial line.
//!
//! The driver needs 4 digital output pins which implement the [`embedded_hal::digital::v2::OutputPin`] trait,
//! and a delay provider implementing [`DelayUs<u16>`](embedded_hal::blocking::delay::DelayUs) and
//! [`DelayMs<u16>`](embedded_hal::blocking::delay::DelayMs).
//!
//! ## Usage example
//!
//! This example uses the [`arduino-hal`](https://github.com/Rahix/avr-hal). The library is not device specific though, so
//! it should be easy to adapt the example to other devices.
//!
//! ```ignore
//! #[arduino_hal::entry]
//! fn main() -> ! {
//!     let dp = arduino_hal::Peripherals::take().unwrap();
//!     let pins = arduino_hal::pins!(dp);
//!
//!     // Initialize the device
//!     let mut ad9850 = ad9850_vfo::Ad9850::new(
//!         pins.d4.into_output(), // Connect D4 (Arduino) to RESET (AD9850)
//!         pins.d5.into_output(), // Connect D5 (Arduino) to DATA (AD9850)
//!         pins.d6.into_output(), // Connect D6 (Arduino) to FQ_UD (AD9850)
//!         pins.d7.into_output(), // Connect D7 (Arduino) to W_CLK (AD9850)
//!         arduino_hal::Delay::new(),
//!     ).into_serial_mode().unwrap();
//!     //                   ^^^^ unwrap is ok here, since `set_low`/`set_high`
//!     //                        are infallible in the arduino-hal.
//!
//!     // Set output frequency to 1 MHz
//!     ad9850.set_frequency(1_000_000).unwrap();
//!     loop {}
//! }
//! ```
//!
//! ## Wiring
//!
//! Only the serial load interface is supported: DATA, W_CLK and FQ_UD carry the
//! update, RESET is pulsed once at start-up. Boards that wire a separate word
//! clock next to the bit clock are not supported.
//!
//! ## A note about timing
//!
//! Communication with the Ad9850 involves sending "pulses" on the
//! RESET, W_CLK and FQ_UD lines. According to the datasheet, these
//! pulses must be at least $3.5ns$ long for RESET and W_CLK and at
//! least $7ns$ for the FQ_UD line.
//!
//! Every transition is followed by a delay from [`config::Timing`]
//! (1 µs by default), so pulse widths do not depend on the CPU frequency.
//! RESET is held for 20 ms per level.
//!
//! ## Logging
//!
//! Enable the `defmt` feature to get resets and frequency updates logged through `defmt`.

#[macro_use]
mod fmt;

pub mod config;
pub mod console;
mod device;
pub mod encoder;
pub mod error;
pub mod mailbox;
pub mod tuning;

pub use config::{Config, FrequencyRange, Timing};
pub use device::{mode, Ad9850};
pub use error::Error;
