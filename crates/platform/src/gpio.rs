//! Chip-select and auxiliary control lines.
//!
//! Each SPI peripheral on the shared bus owns one [`SelectLine`]. The line
//! knows its own polarity, so drivers only ever say "assert" or "release"
//! and never hard-code a level. The DS1306 clock is selected by driving its
//! CE pin high, the HumidIcon and the LCD by driving their pins low.

use embedded_hal::digital::{OutputPin, PinState};

/// Electrical level that selects a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Device selected while the line is high (DS1306 CE).
    ActiveHigh,
    /// Device selected while the line is low (HumidIcon SS, LCD CSB).
    ActiveLow,
}

impl Polarity {
    /// Pin level that selects the device.
    pub const fn asserted(self) -> PinState {
        match self {
            Self::ActiveHigh => PinState::High,
            Self::ActiveLow => PinState::Low,
        }
    }

    /// Pin level that leaves the device idle.
    pub const fn released(self) -> PinState {
        match self {
            Self::ActiveHigh => PinState::Low,
            Self::ActiveLow => PinState::High,
        }
    }
}

/// A chip-select output with a fixed polarity.
pub struct SelectLine<P> {
    pin: P,
    polarity: Polarity,
    asserted: bool,
}

impl<P: OutputPin> SelectLine<P> {
    /// Wrap `pin` and drive it to the released level.
    pub fn new(mut pin: P, polarity: Polarity) -> Result<Self, P::Error> {
        pin.set_state(polarity.released())?;
        Ok(Self {
            pin,
            polarity,
            asserted: false,
        })
    }

    /// Select the device.
    pub fn assert(&mut self) -> Result<(), P::Error> {
        self.pin.set_state(self.polarity.asserted())?;
        self.asserted = true;
        Ok(())
    }

    /// Deselect the device.
    pub fn release(&mut self) -> Result<(), P::Error> {
        self.pin.set_state(self.polarity.released())?;
        self.asserted = false;
        Ok(())
    }

    /// Whether the last successful write selected the device.
    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    /// Polarity of this line.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Give back the underlying pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};

    #[test]
    fn active_high_line_idles_low() {
        let pin = PinMock::new(&[
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
        ]);
        let mut cs = SelectLine::new(pin, Polarity::ActiveHigh).unwrap();
        assert!(!cs.is_asserted());
        cs.assert().unwrap();
        assert!(cs.is_asserted());
        cs.release().unwrap();
        cs.into_inner().done();
    }

    #[test]
    fn active_low_line_idles_high() {
        let pin = PinMock::new(&[
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ]);
        let mut cs = SelectLine::new(pin, Polarity::ActiveLow).unwrap();
        cs.assert().unwrap();
        cs.release().unwrap();
        assert_eq!(cs.polarity(), Polarity::ActiveLow);
        cs.into_inner().done();
    }

    #[test]
    fn polarity_levels_are_complementary() {
        for p in [Polarity::ActiveHigh, Polarity::ActiveLow] {
            assert_ne!(p.asserted(), p.released());
        }
    }
}
