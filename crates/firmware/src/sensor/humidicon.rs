//! HumidIcon driver over the shared bus.
//!
//! Selecting the sensor and clocking the first byte starts a measurement;
//! the remaining three bytes are clocked after the conversion time with SS
//! still low.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use platform::humidicon::{self, RawSample, MEASUREMENT_SETTLE_US, READ_DUMMY};
use platform::{BusError, Polarity, SelectLine, SpiHost, SpiPeripheral};

use super::SensorError;

/// HumidIcon on its SS line.
pub struct HumidIcon<P> {
    ss: SelectLine<P>,
}

impl<P: OutputPin> HumidIcon<P> {
    /// Take the SS pin and drive it inactive (high).
    pub fn new(ss: P) -> Result<Self, SensorError> {
        let ss = SelectLine::new(ss, Polarity::ActiveLow).map_err(|_| BusError::Select)?;
        Ok(Self { ss })
    }

    /// Release SS, program the sensor's bus mode and discard any stale
    /// received byte.
    pub fn configure<S, D>(&mut self, bus: &mut SpiHost<S, D>) -> Result<(), SensorError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        self.ss.release().map_err(|_| BusError::Select)?;
        bus.configure(humidicon::PROFILE.config)?;
        bus.drain()?;
        Ok(())
    }

    /// Run one measurement and return the raw frame.
    pub fn read_sample<S, D>(&mut self, bus: &mut SpiHost<S, D>) -> Result<RawSample, SensorError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        let frame = bus.transaction(&mut self.ss, &humidicon::PROFILE, |t| {
            let mut frame = [0u8; 4];
            let (first, rest) = frame.split_at_mut(1);
            for b in first.iter_mut() {
                *b = t.exchange(READ_DUMMY)?;
            }
            t.delay_us(MEASUREMENT_SETTLE_US);
            for b in rest.iter_mut() {
                *b = t.exchange(READ_DUMMY)?;
            }
            Ok(frame)
        })?;
        let sample = RawSample::from_bytes(frame);
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "HumidIcon: status={} rh={=u16} t={=u16}",
            sample.status,
            sample.humidity,
            sample.temperature
        );
        Ok(sample)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::mocks::{BusEvent, Device, Line, SimBoard};
    use platform::SensorStatus;

    #[test]
    fn test_sensor_reads_four_bytes_with_settle_after_first() {
        let board = SimBoard::new();
        let mut bus = SpiHost::new(board.spi(), board.delay());
        let mut sensor = HumidIcon::new(board.pin(Line::SensorSelect)).unwrap();
        board.set_sensor_frame([0x1F, 0xFF, 0x66, 0x64]);

        sensor.configure(&mut bus).unwrap();
        let sample = sensor.read_sample(&mut bus).unwrap();

        assert_eq!(sample.status, SensorStatus::Valid);
        assert_eq!(sample.humidity, 0x1FFF);
        assert_eq!(sample.temperature, (0x66 << 6) | (0x64 >> 2));
        assert_eq!(board.bytes_for(Device::Sensor).len(), 4);
        assert!(board.faults().is_empty());
        assert!(board.level(Line::SensorSelect));

        // The conversion delay sits between byte 1 and byte 2 only.
        let trace = board.trace();
        let bytes: Vec<usize> = trace
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, BusEvent::Byte { device: Some(Device::Sensor), .. }))
            .map(|(i, _)| i)
            .collect();
        let settle = trace
            .iter()
            .position(|e| *e == BusEvent::Delay(MEASUREMENT_SETTLE_US * 1_000))
            .unwrap();
        assert!(bytes[0] < settle && settle < bytes[1]);
    }

    #[test]
    fn test_sensor_configure_drains_stale_byte() {
        let board = SimBoard::new();
        let mut bus = SpiHost::new(board.spi(), board.delay());
        let mut sensor = HumidIcon::new(board.pin(Line::SensorSelect)).unwrap();
        board.clear_trace();
        sensor.configure(&mut bus).unwrap();
        let trace = board.trace();
        assert!(matches!(trace.first(), Some(BusEvent::Level(Line::SensorSelect, true))));
        assert!(trace.contains(&BusEvent::Drain));
        assert!(board.bytes_for(Device::Sensor).is_empty());
    }
}
