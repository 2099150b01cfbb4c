//! LCD DOG character display.
//!
//! The driver is always compiled (no hardware gate) so that `cargo test`
//! can exercise it against the simulated board on the host.

pub mod driver;

pub use driver::{DisplayError, LcdDog};
