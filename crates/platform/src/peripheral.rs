//! Peripheral abstraction layer
//!
//! Byte-level access to the SPI controller. Drivers never touch this trait
//! directly; they go through [`crate::bus::SpiHost`], which adds chip-select
//! framing, timing margins and a bounded completion wait.

/// Single-byte SPI controller abstraction.
///
/// Models a classic shift-register SPI master: a byte is loaded into the
/// data register, the hardware clocks it out while clocking one byte in,
/// and a transfer-complete flag is raised. Reading the data register
/// returns the received byte and clears that flag.
pub trait SpiPeripheral {
    /// Error type
    type Error: core::fmt::Debug;

    /// Reprogram clock polarity/phase, clock rate and bit order.
    fn configure(&mut self, config: SpiConfig) -> Result<(), Self::Error>;

    /// Load `byte` into the data register, starting a transfer.
    fn start_transfer(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Poll the transfer-complete flag.
    fn transfer_complete(&mut self) -> Result<bool, Self::Error>;

    /// Read the data register. Returns the last byte shifted in and clears
    /// the transfer-complete flag.
    fn read_data(&mut self) -> Result<u8, Self::Error>;
}

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// SPI mode (CPOL, CPHA)
    pub mode: SpiMode,
    /// Bit order
    pub bit_order: BitOrder,
}

impl SpiConfig {
    /// MSB-first configuration at `frequency` Hz in `mode`.
    pub const fn msb_first(frequency: u32, mode: SpiMode) -> Self {
        Self {
            frequency,
            mode,
            bit_order: BitOrder::MsbFirst,
        }
    }
}

/// SPI modes (CPOL, CPHA)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl SpiMode {
    /// Clock idles high.
    pub const fn cpol(self) -> bool {
        matches!(self, Self::Mode2 | Self::Mode3)
    }

    /// Data sampled on the second clock edge.
    pub const fn cpha(self) -> bool {
        matches!(self, Self::Mode1 | Self::Mode3)
    }
}

/// Bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_polarity_and_phase() {
        assert!(!SpiMode::Mode0.cpol() && !SpiMode::Mode0.cpha());
        assert!(!SpiMode::Mode1.cpol() && SpiMode::Mode1.cpha());
        assert!(SpiMode::Mode2.cpol() && !SpiMode::Mode2.cpha());
        assert!(SpiMode::Mode3.cpol() && SpiMode::Mode3.cpha());
    }

    #[test]
    fn msb_first_constructor() {
        let cfg = SpiConfig::msb_first(2_000_000, SpiMode::Mode1);
        assert_eq!(cfg.frequency, 2_000_000);
        assert_eq!(cfg.bit_order, BitOrder::MsbFirst);
    }
}
