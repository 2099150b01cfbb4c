//! Shared SPI bus transaction primitive.
//!
//! One SPI controller serves the DS1306 clock, the HumidIcon sensor and the
//! LCD. Every access goes through [`SpiHost::transaction`], which:
//!
//! 1. reprograms mode / clock / bit order for the target device,
//! 2. asserts the device's select line and waits the setup margin,
//! 3. runs the caller's byte exchanges,
//! 4. waits the hold margin, releases the select line,
//! 5. waits the settle margin before the bus may serve another device.
//!
//! The host is borrowed mutably for the whole sequence, so two transactions
//! can never interleave. Interrupt-side code never owns the host.
//!
//! # Completion wait
//!
//! [`Transfer::exchange`] polls the controller's transfer-complete flag at
//! most [`MAX_TRANSFER_POLLS`] times. A peripheral that never completes yields
//! [`BusError::Timeout`]; the select line is still released and the settle
//! margin still honoured.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use thiserror_no_std::Error;

use crate::gpio::SelectLine;
use crate::peripheral::{SpiConfig, SpiPeripheral};

/// Upper bound on transfer-complete polls for a single byte.
///
/// One byte at the slowest bus clock (125 kHz) takes 64 µs; at 400 MHz core
/// clock that is far below this many status reads.
pub const MAX_TRANSFER_POLLS: u32 = 100_000;

/// Bus transaction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// The transfer-complete flag never rose.
    #[error("SPI transfer did not complete")]
    Timeout,
    /// The SPI controller reported an error.
    #[error("SPI controller error")]
    Spi,
    /// Driving a select or register-select line failed.
    #[error("select line error")]
    Select,
}

/// Per-device bus settings and timing margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceProfile {
    /// Mode, clock and bit order programmed before each transaction.
    pub config: SpiConfig,
    /// Delay between select assertion and the first byte.
    pub setup_ns: u32,
    /// Delay between the last byte and select release.
    pub hold_ns: u32,
    /// Delay after release before the bus is reused.
    pub settle_ns: u32,
}

/// Owner of the SPI controller and the blocking delay source.
pub struct SpiHost<SPI, D> {
    spi: SPI,
    delay: D,
    max_polls: u32,
}

impl<SPI, D> SpiHost<SPI, D>
where
    SPI: SpiPeripheral,
    D: DelayNs,
{
    /// Take ownership of the controller and delay.
    pub fn new(spi: SPI, delay: D) -> Self {
        Self {
            spi,
            delay,
            max_polls: MAX_TRANSFER_POLLS,
        }
    }

    /// Override the completion poll bound.
    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls.max(1);
        self
    }

    /// Reprogram the controller outside a transaction.
    pub fn configure(&mut self, config: SpiConfig) -> Result<(), BusError> {
        self.spi.configure(config).map_err(|_| BusError::Spi)
    }

    /// Read and discard the data register without clocking the bus.
    ///
    /// Clears a transfer-complete flag left over from an earlier exchange.
    pub fn drain(&mut self) -> Result<(), BusError> {
        self.spi.read_data().map(|_| ()).map_err(|_| BusError::Spi)
    }

    /// Run one select → transfer(s) → deselect → settle sequence.
    ///
    /// The select line is released even when `body` fails; the first error
    /// encountered is returned.
    pub fn transaction<P, R, F>(
        &mut self,
        cs: &mut SelectLine<P>,
        profile: &DeviceProfile,
        body: F,
    ) -> Result<R, BusError>
    where
        P: OutputPin,
        F: FnOnce(&mut Transfer<'_, SPI, D>) -> Result<R, BusError>,
    {
        self.configure(profile.config)?;
        cs.assert().map_err(|_| BusError::Select)?;
        self.delay.delay_ns(profile.setup_ns);

        let outcome = body(&mut Transfer {
            spi: &mut self.spi,
            delay: &mut self.delay,
            max_polls: self.max_polls,
        });

        self.delay.delay_ns(profile.hold_ns);
        let released = cs.release().map_err(|_| BusError::Select);
        self.delay.delay_ns(profile.settle_ns);

        let value = outcome?;
        released?;
        Ok(value)
    }

    /// Blocking delay in milliseconds.
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Blocking delay in microseconds.
    pub fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    /// Give back the controller and delay.
    pub fn release(self) -> (SPI, D) {
        (self.spi, self.delay)
    }
}

/// Byte-exchange handle valid while a device is selected.
pub struct Transfer<'a, SPI, D> {
    spi: &'a mut SPI,
    delay: &'a mut D,
    max_polls: u32,
}

impl<SPI, D> Transfer<'_, SPI, D>
where
    SPI: SpiPeripheral,
    D: DelayNs,
{
    /// Shift `byte` out and return the byte shifted in.
    pub fn exchange(&mut self, byte: u8) -> Result<u8, BusError> {
        exchange_byte(self.spi, byte, self.max_polls)
    }

    /// Shift `byte` out, discarding the byte shifted in.
    pub fn write(&mut self, byte: u8) -> Result<(), BusError> {
        self.exchange(byte).map(|_| ())
    }

    /// Read and discard a stale received byte.
    pub fn drain(&mut self) -> Result<(), BusError> {
        self.spi.read_data().map(|_| ()).map_err(|_| BusError::Spi)
    }

    /// Blocking delay while the device stays selected.
    pub fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}

/// Load, wait for completion, read back.
fn exchange_byte<SPI: SpiPeripheral>(
    spi: &mut SPI,
    byte: u8,
    max_polls: u32,
) -> Result<u8, BusError> {
    spi.start_transfer(byte).map_err(|_| BusError::Spi)?;
    for _ in 0..max_polls {
        if spi.transfer_complete().map_err(|_| BusError::Spi)? {
            return spi.read_data().map_err(|_| BusError::Spi);
        }
    }
    #[cfg(feature = "defmt")]
    defmt::warn!(
        "SPI transfer of {=u8:#x} timed out after {=u32} polls",
        byte,
        max_polls
    );
    Err(BusError::Timeout)
}
