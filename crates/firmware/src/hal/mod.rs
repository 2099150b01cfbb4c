//! STM32H7 binding of the byte-level SPI controller trait.
//!
//! [`Spi1Controller`] wraps embassy-stm32's blocking SPI1 driver and exposes
//! it as a [`SpiPeripheral`]: a started byte is shifted immediately, the
//! received byte is held until [`SpiPeripheral::read_data`] and the
//! completion flag reports whether an unread byte is waiting. The bounded
//! wait in `platform::bus` therefore always succeeds on the first poll.

use embassy_stm32::dma::NoDma;
use embassy_stm32::peripherals::SPI1;
use embassy_stm32::spi::{self, Mode, Phase, Polarity, Spi};
use embassy_stm32::time::Hertz;
use platform::{BitOrder, SpiConfig, SpiPeripheral};

/// SPI1 failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spi1Error {
    /// The requested clock rate or mode was rejected.
    Config,
    /// The peripheral reported an error during a transfer.
    Transfer(spi::Error),
}

/// Blocking SPI1 as a [`SpiPeripheral`].
pub struct Spi1Controller<'d> {
    spi: Spi<'d, SPI1, NoDma, NoDma>,
    received: u8,
    complete: bool,
}

impl<'d> Spi1Controller<'d> {
    /// Wrap an already constructed SPI1 driver.
    pub fn new(spi: Spi<'d, SPI1, NoDma, NoDma>) -> Self {
        Self {
            spi,
            received: 0,
            complete: false,
        }
    }
}

/// embassy-stm32 settings for a device profile.
pub fn embassy_config(config: SpiConfig) -> spi::Config {
    let mut out = spi::Config::default();
    out.frequency = Hertz(config.frequency);
    out.mode = Mode {
        polarity: if config.mode.cpol() {
            Polarity::IdleHigh
        } else {
            Polarity::IdleLow
        },
        phase: if config.mode.cpha() {
            Phase::CaptureOnSecondTransition
        } else {
            Phase::CaptureOnFirstTransition
        },
    };
    out.bit_order = match config.bit_order {
        BitOrder::MsbFirst => spi::BitOrder::MsbFirst,
        BitOrder::LsbFirst => spi::BitOrder::LsbFirst,
    };
    out
}

impl SpiPeripheral for Spi1Controller<'_> {
    type Error = Spi1Error;

    fn configure(&mut self, config: SpiConfig) -> Result<(), Self::Error> {
        self.spi
            .set_config(&embassy_config(config))
            .map_err(|_| Spi1Error::Config)
    }

    fn start_transfer(&mut self, byte: u8) -> Result<(), Self::Error> {
        let mut frame = [byte];
        self.spi
            .blocking_transfer_in_place(&mut frame)
            .map_err(Spi1Error::Transfer)?;
        let [received] = frame;
        self.received = received;
        self.complete = true;
        Ok(())
    }

    fn transfer_complete(&mut self) -> Result<bool, Self::Error> {
        Ok(self.complete)
    }

    fn read_data(&mut self) -> Result<u8, Self::Error> {
        self.complete = false;
        Ok(self.received)
    }
}
