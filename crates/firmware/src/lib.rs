//! DOG clock firmware
//!
//! Clock / environment display for STM32H7: a DS1306 real-time clock, a
//! HumidIcon humidity/temperature sensor and an LCD DOG 3×16 character
//! display share one SPI bus; a 16-key keypad drives a table-driven state
//! machine.
//!
//! # Architecture
//!
//! ```text
//! main.rs (embassy executor, main loop)
//!         ↓
//! app (controller: FSM actions, tick and alarm service)   ← events (queue)
//!         ↓                                                    ↑
//! Device drivers (rtc, sensor, display)                    input (EXTI tasks)
//!         ↓
//! platform (bus transaction primitive, register maps)
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for STM32H7 target (embassy, defmt, panic-probe)
//! - `defmt-logging` - defmt log calls without the rest of the hardware stack
//! - `std` - Enable standard library (for testing)
//!
//! # Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for firmware application code:
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_arguments)] // Board::new takes every device

pub mod app;
pub mod boot;
pub mod config;
pub mod display;
pub mod events;
pub mod exception_handlers;
#[cfg(feature = "hardware")]
pub mod hal;
pub mod input;
pub mod rtc;
pub mod sensor;

// Re-export key types
pub use app::{AppError, Board, ConversionTrigger, Controller};
pub use display::{DisplayError, LcdDog};
pub use events::{AdcLatch, Event, SignalTrigger, ADC_LATCH, ADC_REQUEST, EVENTS};
pub use rtc::{ClockError, Ds1306};
pub use sensor::{HumidIcon, SensorError};
