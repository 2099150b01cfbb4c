//! HumidIcon humidity / temperature sensor.

pub mod humidicon;

pub use humidicon::HumidIcon;

use platform::BusError;
use thiserror_no_std::Error;

/// Sensor driver failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// The bus transaction failed.
    #[error("bus: {0}")]
    Bus(#[from] BusError),
}
