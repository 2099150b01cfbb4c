//! Hardware Abstraction Layer (HAL) for the DOG clock
//!
//! This crate provides the bus primitive, register maps and data formats for
//! every peripheral on the board, enabling driver development and testing
//! without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: controller, drivers)
//!         ↓
//! Feature Layer (ui crate: state machine, screens)
//!         ↓
//! Platform HAL (this crate - bus primitive, register maps)
//!         ↓
//! Hardware Layer (Embassy HAL + PAC)
//! ```
//!
//! # Modules
//!
//! - [`peripheral`] - byte-level SPI controller trait
//! - [`gpio`] - polarity-aware chip-select lines
//! - [`bus`] - shared-bus transaction primitive with timing margins
//! - [`ds1306`] - real-time clock register map
//! - [`humidicon`] - humidity/temperature frame decoding and scaling
//! - [`lcd_dog`] - character LCD instruction set
//! - [`clock_types`] - BCD and time-of-day newtypes
//! - [`mocks`] - simulated board (`std` feature or tests)
//!
//! # Features
//!
//! - `std`: Enable the simulated board for downstream tests
//! - `defmt`: Enable defmt logging and `defmt::Format` derives
//!
//! # Example
//!
//! ```no_run
//! use platform::bus::{BusError, SpiHost};
//! use platform::gpio::SelectLine;
//! use platform::{ds1306, SpiPeripheral};
//!
//! fn read_seconds<S, D, P>(
//!     bus: &mut SpiHost<S, D>,
//!     ce: &mut SelectLine<P>,
//! ) -> Result<u8, BusError>
//! where
//!     S: SpiPeripheral,
//!     D: embedded_hal::delay::DelayNs,
//!     P: embedded_hal::digital::OutputPin,
//! {
//!     bus.transaction(ce, &ds1306::PROFILE, |t| {
//!         t.write(ds1306::SEC_RD)?;
//!         t.exchange(ds1306::READ_DUMMY)
//!     })
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod bus;
pub mod clock_types;
pub mod ds1306;
pub mod gpio;
pub mod humidicon;
pub mod lcd_dog;
pub mod mocks;
pub mod peripheral;

// Re-export the bus primitive
pub use bus::{BusError, DeviceProfile, SpiHost, Transfer};

// Re-export GPIO types
pub use gpio::{Polarity, SelectLine};

// Re-export peripheral types
pub use peripheral::{BitOrder, SpiConfig, SpiMode, SpiPeripheral};

// Re-export domain types
pub use clock_types::{format_time, Bcd, RawTime, TimeOfDay};
pub use humidicon::{RawSample, Reading, SensorStatus};
