//! DS1306 real-time clock.

pub mod ds1306;

pub use ds1306::Ds1306;

use platform::BusError;
use thiserror_no_std::Error;

/// Clock driver failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// The bus transaction failed.
    #[error("bus: {0}")]
    Bus(#[from] BusError),
    /// A block transfer asked for more bytes than the buffer holds.
    #[error("block of {count} bytes does not fit a {len}-byte buffer")]
    BufferTooSmall {
        /// Requested byte count.
        count: usize,
        /// Buffer length.
        len: usize,
    },
    /// User RAM read back differently from what was written.
    #[error("NV RAM at {address:#04x}: wrote {expected:#04x}, read {found:#04x}")]
    NvramMismatch {
        /// Read address of the first differing byte.
        address: u8,
        /// Byte written.
        expected: u8,
        /// Byte read back.
        found: u8,
    },
}
