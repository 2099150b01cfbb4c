//! Clock UI layer: keypad symbols, the table-driven state machine, and the
//! screens it draws into an off-screen display buffer.
//!
//! This crate is `no_std` by default; it only uses `core` + `heapless`.
//! Nothing here touches the bus: the firmware runs each [`fsm::Action`] and
//! copies the [`display_buffer::DisplayBuffer`] to the LCD.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![warn(missing_docs)]

pub mod display_buffer;
pub mod fsm;
pub mod keypad;
pub mod pages;
pub mod screens;
pub mod time_entry;

pub use display_buffer::DisplayBuffer;
pub use fsm::{Action, Machine, State, TableError};
pub use keypad::Key;
pub use pages::HomePage;
pub use time_entry::{EntryError, TimeEntry};
