//! Honeywell HumidIcon (HIH6000 SPI family) data format and scaling.
//!
//! A measurement is four bytes clocked out of the sensor:
//!
//! ```text
//! byte 1: S1 S0 H13 H12 H11 H10 H9 H8     status + humidity high
//! byte 2: H7 .. H0                        humidity low
//! byte 3: T13 .. T6                       temperature high
//! byte 4: T5 .. T0 x x                    temperature low, 2 don't-care bits
//! ```
//!
//! Both readings are 14-bit counts scaled against `2^14 - 2`.

use crate::bus::DeviceProfile;
use crate::peripheral::{SpiConfig, SpiMode};

/// Dummy byte clocked out for every read.
pub const READ_DUMMY: u8 = 0xFF;

/// Conversion time after the first byte wakes the sensor (36.65 ms).
pub const MEASUREMENT_SETTLE_US: u32 = 36_650;

/// Full-scale divisor, `2^14 - 2`.
pub const COUNTS_FULL_SCALE: u32 = 16_382;

/// Largest 14-bit count.
pub const RAW_MAX: u16 = 0x3FFF;

/// Bus settings: CPOL=1 / CPHA=1, 500 kHz, SS active-low. No extra margins.
pub const PROFILE: DeviceProfile = DeviceProfile {
    config: SpiConfig::msb_first(500_000, SpiMode::Mode3),
    setup_ns: 0,
    hold_ns: 0,
    settle_ns: 0,
};

/// Two status bits reported in byte 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorStatus {
    /// Fresh measurement.
    Valid,
    /// Data already read since the last measurement.
    Stale,
    /// Sensor in command mode.
    Command,
    /// Diagnostic condition.
    Diagnostic,
}

impl SensorStatus {
    /// Decode bits 7:6 of the first byte.
    pub const fn from_byte(byte: u8) -> Self {
        match byte >> 6 {
            0 => Self::Valid,
            1 => Self::Stale,
            2 => Self::Command,
            _ => Self::Diagnostic,
        }
    }
}

/// Raw 14-bit counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// Status bits from byte 1.
    pub status: SensorStatus,
    /// Humidity count, 0..=0x3FFF.
    pub humidity: u16,
    /// Temperature count, 0..=0x3FFF.
    pub temperature: u16,
}

impl RawSample {
    /// Reassemble the four received bytes.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        let [b1, b2, b3, b4] = bytes;
        Self {
            status: SensorStatus::from_byte(b1),
            humidity: ((b1 as u16 & 0x3F) << 8) | b2 as u16,
            temperature: ((b3 as u16) << 6) | (b4 as u16 >> 2),
        }
    }

    /// Physical units.
    pub fn scale(self) -> Reading {
        Reading {
            humidity_pct: scale_humidity(self.humidity),
            temperature_c: scale_temperature(self.temperature),
        }
    }
}

/// Scaled measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Relative humidity in percent.
    pub humidity_pct: f32,
    /// Temperature in degrees Celsius.
    pub temperature_c: f32,
}

/// `raw * 100 / (2^14 - 2)`.
#[allow(clippy::cast_precision_loss)]
pub fn scale_humidity(raw: u16) -> f32 {
    f32::from(raw & RAW_MAX) * 100.0 / COUNTS_FULL_SCALE as f32
}

/// `raw * 165 / (2^14 - 2) - 40`.
#[allow(clippy::cast_precision_loss)]
pub fn scale_temperature(raw: u16) -> f32 {
    f32::from(raw & RAW_MAX) * 165.0 / COUNTS_FULL_SCALE as f32 - 40.0
}
