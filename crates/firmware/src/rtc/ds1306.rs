//! DS1306 driver over the shared bus.
//!
//! Single-byte accesses are one transaction each: address byte, then data
//! (write) or the `0x77` dummy whose reply is the register value (read).
//! Block accesses keep CE asserted across all bytes and let the device
//! auto-increment the address.
//!
//! The driver owns only the CE line. The bus itself is borrowed per call,
//! so the controller decides which device talks when.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use platform::clock_types::{Bcd, RawTime};
use platform::ds1306::{
    self, read_address, write_address, BLOCK_READ_DUMMY, CONTROL_AIE0, CONTROL_WP, CONT_REG_RD,
    CONT_REG_WT, DAY_ALM_WT, HR_ALM_RD, HR_ALM_WT, HR_RD, HR_WT, MIN_ALM_RD, MIN_ALM_WT, MIN_RD,
    MIN_WT, NVRAM_RD, NVRAM_WT, READ_DUMMY, SEC_ALM_WT, SEC_RD, SEC_WT, STAT_REG_WT,
};
use platform::{BusError, Polarity, SelectLine, SpiHost, SpiPeripheral};

use super::ClockError;
use crate::config;

/// Bytes exercised by [`Ds1306::nvram_self_test`].
pub const NVRAM_TEST_LEN: usize = 10;

/// First byte of the self-test pattern; byte `i` is this plus `i`.
pub const NVRAM_TEST_SEED: u8 = 0x2B;

/// DS1306 on its CE line.
pub struct Ds1306<P> {
    ce: SelectLine<P>,
}

impl<P: OutputPin> Ds1306<P> {
    /// Take the CE pin and drive it inactive (low).
    pub fn new(ce: P) -> Result<Self, ClockError> {
        let ce = SelectLine::new(ce, Polarity::ActiveHigh).map_err(|_| BusError::Select)?;
        Ok(Self { ce })
    }

    /// Write `value` to register `address`. The write tag is applied if the
    /// caller passed a read address.
    pub fn write_register<S, D>(
        &mut self,
        bus: &mut SpiHost<S, D>,
        address: u8,
        value: u8,
    ) -> Result<(), ClockError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        bus.transaction(&mut self.ce, &ds1306::PROFILE, |t| {
            t.write(write_address(address))?;
            t.write(value)
        })?;
        Ok(())
    }

    /// Read register `address`. The write tag is stripped if present.
    pub fn read_register<S, D>(
        &mut self,
        bus: &mut SpiHost<S, D>,
        address: u8,
    ) -> Result<u8, ClockError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        let value = bus.transaction(&mut self.ce, &ds1306::PROFILE, |t| {
            t.write(read_address(address))?;
            t.exchange(READ_DUMMY)
        })?;
        Ok(value)
    }

    /// Write `buffer[..count]` starting at `start` in one transaction.
    pub fn block_write<S, D>(
        &mut self,
        bus: &mut SpiHost<S, D>,
        buffer: &[u8],
        start: u8,
        count: usize,
    ) -> Result<(), ClockError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        let bytes = buffer.get(..count).ok_or(ClockError::BufferTooSmall {
            count,
            len: buffer.len(),
        })?;
        bus.transaction(&mut self.ce, &ds1306::PROFILE, |t| {
            t.write(write_address(start))?;
            bytes.iter().try_for_each(|&b| t.write(b))
        })?;
        Ok(())
    }

    /// Read `count` bytes starting at `start` into `buffer[..count]` in one
    /// transaction.
    pub fn block_read<S, D>(
        &mut self,
        bus: &mut SpiHost<S, D>,
        buffer: &mut [u8],
        start: u8,
        count: usize,
    ) -> Result<(), ClockError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        let len = buffer.len();
        let bytes = buffer
            .get_mut(..count)
            .ok_or(ClockError::BufferTooSmall { count, len })?;
        bus.transaction(&mut self.ce, &ds1306::PROFILE, |t| {
            t.write(read_address(start))?;
            for slot in bytes.iter_mut() {
                *slot = t.exchange(BLOCK_READ_DUMMY)?;
            }
            Ok(())
        })?;
        Ok(())
    }

    /// Hours, minutes and seconds registers, each read on its own.
    pub fn read_time<S, D>(&mut self, bus: &mut SpiHost<S, D>) -> Result<RawTime, ClockError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        let hours = self.read_register(bus, HR_RD)?;
        let minutes = self.read_register(bus, MIN_RD)?;
        let seconds = self.read_register(bus, SEC_RD)?;
        Ok(RawTime::from_registers(hours, minutes, seconds))
    }

    /// Set the clock to `hours:minutes:00`.
    pub fn set_time<S, D>(
        &mut self,
        bus: &mut SpiHost<S, D>,
        hours: Bcd,
        minutes: Bcd,
    ) -> Result<(), ClockError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        self.write_register(bus, HR_WT, hours.raw())?;
        self.write_register(bus, MIN_WT, minutes.raw())?;
        self.write_register(bus, SEC_WT, 0x00)
    }

    /// Program alarm 0 for `hours:minutes:00`.
    pub fn set_alarm<S, D>(
        &mut self,
        bus: &mut SpiHost<S, D>,
        hours: Bcd,
        minutes: Bcd,
    ) -> Result<(), ClockError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        self.write_register(bus, HR_ALM_WT, hours.raw())?;
        self.write_register(bus, MIN_ALM_WT, minutes.raw())?;
        self.write_register(bus, SEC_ALM_WT, 0x00)
    }

    /// Alarm 0 hours and minutes.
    pub fn read_alarm<S, D>(&mut self, bus: &mut SpiHost<S, D>) -> Result<(Bcd, Bcd), ClockError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        let hours = self.read_register(bus, HR_ALM_RD)?;
        let minutes = self.read_register(bus, MIN_ALM_RD)?;
        Ok((Bcd::from_raw(hours & 0x3F), Bcd::from_raw(minutes & 0x7F)))
    }

    /// Flip the alarm 0 interrupt enable. Returns the new enable state.
    pub fn toggle_alarm<S, D>(&mut self, bus: &mut SpiHost<S, D>) -> Result<bool, ClockError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        let control = self.read_register(bus, CONT_REG_RD)? ^ CONTROL_AIE0;
        self.write_register(bus, CONT_REG_WT, control)?;
        Ok(control & CONTROL_AIE0 != 0)
    }

    /// Clear both alarm flags, releasing the interrupt line.
    pub fn clear_alarm_flags<S, D>(&mut self, bus: &mut SpiHost<S, D>) -> Result<(), ClockError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        self.write_register(bus, STAT_REG_WT, 0x00)
    }

    /// Power-on configuration.
    ///
    /// Clears write protect, enables the 1 Hz output and alarm 0, sets
    /// alarm 0 to hour 00 on any day and starts the clock at 00:00:00.
    pub fn configure<S, D>(&mut self, bus: &mut SpiHost<S, D>) -> Result<(), ClockError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        // WP must be cleared on its own before any other bit can change.
        self.write_register(bus, CONT_REG_WT, 0x00)?;
        self.write_register(bus, CONT_REG_WT, config::RTC_CONTROL)?;
        self.write_register(bus, HR_ALM_WT, config::ALARM_HOURS)?;
        self.write_register(bus, DAY_ALM_WT, config::ALARM_DAY)?;
        let (hours, minutes) = config::BOOT_TIME;
        self.set_time(bus, hours, minutes)?;
        #[cfg(feature = "defmt")]
        defmt::info!("DS1306 configured: 1 Hz on, AIE0 on, 00:00:00");
        Ok(())
    }

    /// Whether write protect is set.
    pub fn is_write_protected<S, D>(&mut self, bus: &mut SpiHost<S, D>) -> Result<bool, ClockError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        Ok(self.read_register(bus, CONT_REG_RD)? & CONTROL_WP != 0)
    }

    /// Write a known pattern to the start of user RAM with a block write,
    /// read it back with a block read and compare.
    #[allow(clippy::cast_possible_truncation)] // NVRAM_TEST_LEN < 256
    pub fn nvram_self_test<S, D>(&mut self, bus: &mut SpiHost<S, D>) -> Result<(), ClockError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        let mut pattern = [0u8; NVRAM_TEST_LEN];
        for (i, b) in pattern.iter_mut().enumerate() {
            *b = NVRAM_TEST_SEED.wrapping_add(i as u8);
        }
        self.block_write(bus, &pattern, NVRAM_WT, NVRAM_TEST_LEN)?;

        let mut readback = [0u8; NVRAM_TEST_LEN];
        self.block_read(bus, &mut readback, NVRAM_RD, NVRAM_TEST_LEN)?;

        for (i, (&expected, &found)) in pattern.iter().zip(readback.iter()).enumerate() {
            if expected != found {
                return Err(ClockError::NvramMismatch {
                    address: NVRAM_RD.wrapping_add(i as u8),
                    expected,
                    found,
                });
            }
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("NV RAM self-test passed ({=usize} bytes)", NVRAM_TEST_LEN);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::ds1306::CONTROL_1HZ;
    use platform::mocks::{BusEvent, Device, Line, SimBoard, SimDelay, SimPin, SimSpi};

    fn setup() -> (SimBoard, SpiHost<SimSpi, SimDelay>, Ds1306<SimPin>) {
        let board = SimBoard::new();
        let bus = SpiHost::new(board.spi(), board.delay());
        let rtc = Ds1306::new(board.pin(Line::RtcSelect)).unwrap();
        (board, bus, rtc)
    }

    #[test]
    fn test_rtc_write_then_read_hours() {
        let (board, mut bus, mut rtc) = setup();
        rtc.write_register(&mut bus, CONT_REG_WT, 0x00).unwrap();
        rtc.write_register(&mut bus, HR_WT, 0x12).unwrap();
        assert_eq!(rtc.read_register(&mut bus, HR_RD).unwrap(), 0x12);
        assert!(board.faults().is_empty());
    }

    #[test]
    fn test_rtc_write_honours_margins_in_order() {
        let (board, mut bus, mut rtc) = setup();
        board.clear_trace();
        rtc.write_register(&mut bus, HR_WT, 0x12).unwrap();
        assert_eq!(
            board.trace(),
            vec![
                BusEvent::Configure(ds1306::PROFILE.config),
                BusEvent::Level(Line::RtcSelect, true),
                BusEvent::Delay(1_125),
                BusEvent::Byte { device: Some(Device::Rtc), out: HR_WT, inp: 0x00 },
                BusEvent::Byte { device: Some(Device::Rtc), out: 0x12, inp: 0x00 },
                BusEvent::Delay(125),
                BusEvent::Level(Line::RtcSelect, false),
                BusEvent::Delay(1_250),
            ]
        );
    }

    #[test]
    fn test_rtc_single_read_frames() {
        let (board, mut bus, mut rtc) = setup();
        board.set_rtc_register(0x00, 0x42);
        board.clear_trace();
        rtc.read_register(&mut bus, SEC_RD).unwrap();
        assert_eq!(board.bytes_for(Device::Rtc), vec![(0x00, 0x00), (0x77, 0x42)]);
        assert!(!board.level(Line::RtcSelect));
    }

    #[test]
    fn test_rtc_write_protect_blocks_writes() {
        let (board, mut bus, mut rtc) = setup();
        assert!(rtc.is_write_protected(&mut bus).unwrap());
        rtc.write_register(&mut bus, HR_WT, 0x12).unwrap();
        assert_eq!(board.rtc_register(0x02), 0x00);
    }

    #[test]
    fn test_rtc_block_rejects_short_buffer() {
        let (board, mut bus, mut rtc) = setup();
        board.clear_trace();
        let err = rtc.block_write(&mut bus, &[1, 2], NVRAM_WT, 3).unwrap_err();
        assert_eq!(err, ClockError::BufferTooSmall { count: 3, len: 2 });
        let mut buf = [0u8; 1];
        assert!(rtc.block_read(&mut bus, &mut buf, NVRAM_RD, 2).is_err());
        assert!(board.trace().is_empty());
    }

    #[test]
    fn test_rtc_block_is_one_frame() {
        let (board, mut bus, mut rtc) = setup();
        rtc.configure(&mut bus).unwrap();
        board.clear_trace();
        rtc.block_write(&mut bus, &[9, 8, 7], NVRAM_WT, 3).unwrap();
        let rises = board
            .trace()
            .iter()
            .filter(|e| matches!(e, BusEvent::Level(Line::RtcSelect, true)))
            .count();
        assert_eq!(rises, 1);
        assert_eq!(board.rtc_register(0x20), 9);
        assert_eq!(board.rtc_register(0x22), 7);
    }

    #[test]
    fn test_rtc_configure_writes_boot_values() {
        let (board, mut bus, mut rtc) = setup();
        board.set_rtc_register(0x02, 0x17);
        rtc.configure(&mut bus).unwrap();
        assert_eq!(board.rtc_register(0x0F), 0x05);
        assert_eq!(board.rtc_register(0x09), 0x00);
        assert_eq!(board.rtc_register(0x0A), 0x80);
        assert_eq!(board.rtc_register(0x02), 0x00);
        assert!(!rtc.is_write_protected(&mut bus).unwrap());
    }

    #[test]
    fn test_rtc_toggle_alarm_flips_aie0() {
        let (board, mut bus, mut rtc) = setup();
        rtc.configure(&mut bus).unwrap();
        assert!(!rtc.toggle_alarm(&mut bus).unwrap());
        assert_eq!(board.rtc_register(0x0F), CONTROL_1HZ);
        assert!(rtc.toggle_alarm(&mut bus).unwrap());
        assert_eq!(board.rtc_register(0x0F), CONTROL_1HZ | CONTROL_AIE0);
    }

    #[test]
    fn test_rtc_set_time_and_alarm() {
        let (board, mut bus, mut rtc) = setup();
        rtc.configure(&mut bus).unwrap();
        board.set_rtc_register(0x00, 0x33);
        rtc.set_time(&mut bus, Bcd::from_raw(0x21), Bcd::from_raw(0x45))
            .unwrap();
        let time = rtc.read_time(&mut bus).unwrap().format();
        assert_eq!((time.hours, time.minutes, time.seconds), (21, 45, 0));

        rtc.set_alarm(&mut bus, Bcd::from_raw(0x06), Bcd::from_raw(0x30))
            .unwrap();
        let (h, m) = rtc.read_alarm(&mut bus).unwrap();
        assert_eq!((h.raw(), m.raw()), (0x06, 0x30));
    }

    #[test]
    fn test_rtc_nvram_self_test() {
        let (board, mut bus, mut rtc) = setup();
        rtc.configure(&mut bus).unwrap();
        rtc.nvram_self_test(&mut bus).unwrap();
        assert_eq!(board.rtc_register(0x20), 0x2B);
        assert_eq!(board.rtc_register(0x29), 0x34);
    }

    #[test]
    fn test_rtc_nvram_self_test_reports_protected_ram() {
        let (_board, mut bus, mut rtc) = setup();
        // Still write-protected: writes are dropped, reads return zeros.
        let err = rtc.nvram_self_test(&mut bus).unwrap_err();
        assert_eq!(
            err,
            ClockError::NvramMismatch {
                address: 0x20,
                expected: 0x2B,
                found: 0x00
            }
        );
    }

    #[test]
    fn test_rtc_stalled_bus_times_out() {
        let (board, bus, mut rtc) = setup();
        let mut bus = bus.with_max_polls(8);
        board.set_stalled(true);
        let err = rtc.read_register(&mut bus, HR_RD).unwrap_err();
        assert_eq!(err, ClockError::Bus(BusError::Timeout));
        assert!(!board.level(Line::RtcSelect));
    }
}
