//! LCD DOG (ST7036) driver over the shared bus.
//!
//! Every byte is its own transaction: RS chooses instruction (low) or data
//! (high), CSB frames the byte, and the 30 µs settle after release covers the
//! controller's execution time. The transfer-complete flag is drained after
//! every byte, and also before each data byte, so a stale flag from another
//! device never satisfies the next completion wait.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use platform::lcd_dog::{
    self, CLEAR_DELAY_US, CLEAR_DISPLAY, INIT_SEQUENCE, LINE_ADDRESS, LINE_COUNT, LINE_WIDTH,
    POWER_UP_DELAY_MS,
};
use platform::{BusError, Polarity, SelectLine, SpiHost, SpiPeripheral};
use thiserror_no_std::Error;
use ui::DisplayBuffer;

/// LCD driver failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// The bus transaction failed.
    #[error("bus: {0}")]
    Bus(#[from] BusError),
    /// Driving RS failed.
    #[error("register-select pin error")]
    Pin,
}

/// LCD DOG on its CSB line with its RS line.
pub struct LcdDog<CS, RS> {
    csb: SelectLine<CS>,
    rs: RS,
}

impl<CS, RS> LcdDog<CS, RS>
where
    CS: OutputPin,
    RS: OutputPin,
{
    /// Take CSB (driven high, inactive) and RS.
    pub fn new(csb: CS, rs: RS) -> Result<Self, DisplayError> {
        let csb = SelectLine::new(csb, Polarity::ActiveLow).map_err(|_| BusError::Select)?;
        Ok(Self { csb, rs })
    }

    /// Send one instruction byte.
    pub fn send_command<S, D>(
        &mut self,
        bus: &mut SpiHost<S, D>,
        command: u8,
    ) -> Result<(), DisplayError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        self.rs.set_low().map_err(|_| DisplayError::Pin)?;
        bus.transaction(&mut self.csb, &lcd_dog::PROFILE, |t| t.write(command))?;
        bus.drain()?;
        Ok(())
    }

    /// Send one data byte to the current DDRAM address.
    pub fn send_data<S, D>(
        &mut self,
        bus: &mut SpiHost<S, D>,
        data: u8,
    ) -> Result<(), DisplayError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        self.rs.set_high().map_err(|_| DisplayError::Pin)?;
        bus.transaction(&mut self.csb, &lcd_dog::PROFILE, |t| {
            t.drain()?;
            t.write(data)
        })?;
        bus.drain()?;
        Ok(())
    }

    /// Power-up wait followed by the fixed initialisation sequence.
    pub fn initialize<S, D>(&mut self, bus: &mut SpiHost<S, D>) -> Result<(), DisplayError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        bus.delay_ms(POWER_UP_DELAY_MS);
        for command in INIT_SEQUENCE {
            self.send_command(bus, command)?;
            if command == CLEAR_DISPLAY {
                bus.delay_us(CLEAR_DELAY_US);
            }
        }
        #[cfg(feature = "defmt")]
        defmt::info!("LCD DOG initialised ({=usize}x{=usize})", LINE_COUNT, LINE_WIDTH);
        Ok(())
    }

    /// Blank the glass.
    pub fn clear<S, D>(&mut self, bus: &mut SpiHost<S, D>) -> Result<(), DisplayError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        self.send_command(bus, CLEAR_DISPLAY)?;
        bus.delay_us(CLEAR_DELAY_US);
        Ok(())
    }

    /// Write three 16-character lines, each preceded by its DDRAM address.
    pub fn redraw<S, D>(
        &mut self,
        bus: &mut SpiHost<S, D>,
        lines: &[[u8; LINE_WIDTH]; LINE_COUNT],
    ) -> Result<(), DisplayError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        for (address, line) in LINE_ADDRESS.iter().zip(lines.iter()) {
            self.send_command(bus, *address)?;
            for &b in line {
                self.send_data(bus, b)?;
            }
        }
        Ok(())
    }

    /// Copy a display buffer to the glass.
    pub fn paint<S, D>(
        &mut self,
        bus: &mut SpiHost<S, D>,
        buffer: &DisplayBuffer,
    ) -> Result<(), DisplayError>
    where
        S: SpiPeripheral,
        D: DelayNs,
    {
        self.redraw(bus, buffer.lines())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
    use platform::mocks::{BusEvent, Device, Line, SimBoard};

    fn lcd(board: &SimBoard) -> LcdDog<platform::mocks::SimPin, platform::mocks::SimPin> {
        LcdDog::new(board.pin(Line::LcdSelect), board.pin(Line::LcdRegisterSelect)).unwrap()
    }

    #[test]
    fn test_lcd_initialize_sends_sequence_in_order() {
        let board = SimBoard::new();
        let mut bus = SpiHost::new(board.spi(), board.delay());
        let mut lcd = lcd(&board);
        lcd.initialize(&mut bus).unwrap();
        assert_eq!(board.lcd_commands(), INIT_SEQUENCE);
        let first_delay = board
            .trace()
            .into_iter()
            .find(|e| matches!(e, BusEvent::Delay(_)));
        assert_eq!(first_delay, Some(BusEvent::Delay(40_000_000)));
        assert!(board.trace().contains(&BusEvent::Delay(1_100_000)));
        assert!(board.faults().is_empty());
    }

    #[test]
    fn test_lcd_paint_writes_three_lines() {
        let board = SimBoard::new();
        let mut bus = SpiHost::new(board.spi(), board.delay());
        let mut lcd = lcd(&board);
        let mut buf = DisplayBuffer::new();
        write!(buf, "Time: 12:00:00\nTemp:  21.50°C\nRH:    40.00%").unwrap();
        lcd.paint(&mut bus, &buf).unwrap();
        assert_eq!(board.lcd_line(0), "Time: 12:00:00  ");
        assert_eq!(board.lcd_line(1), "Temp:  21.50°C  ");
        assert_eq!(board.lcd_line(2), "RH:    40.00%   ");
        assert_eq!(board.lcd_commands(), [0x80, 0x90, 0xA0]);
        assert_eq!(board.lcd_data_writes(), 48);
    }

    #[test]
    fn test_lcd_bytes_settle_after_release() {
        let board = SimBoard::new();
        let mut bus = SpiHost::new(board.spi(), board.delay());
        let mut lcd = lcd(&board);
        board.clear_trace();
        lcd.send_command(&mut bus, 0x80).unwrap();
        lcd.send_data(&mut bus, b'A').unwrap();
        assert_eq!(
            board.trace(),
            vec![
                BusEvent::Level(Line::LcdRegisterSelect, false),
                BusEvent::Configure(lcd_dog::PROFILE.config),
                BusEvent::Level(Line::LcdSelect, false),
                BusEvent::Byte { device: Some(Device::Lcd), out: 0x80, inp: 0x00 },
                BusEvent::Level(Line::LcdSelect, true),
                BusEvent::Delay(30_000),
                BusEvent::Drain,
                BusEvent::Level(Line::LcdRegisterSelect, true),
                BusEvent::Configure(lcd_dog::PROFILE.config),
                BusEvent::Level(Line::LcdSelect, false),
                BusEvent::Drain,
                BusEvent::Byte { device: Some(Device::Lcd), out: b'A', inp: 0x00 },
                BusEvent::Level(Line::LcdSelect, true),
                BusEvent::Delay(30_000),
                BusEvent::Drain,
            ]
        );
    }

    #[test]
    fn test_lcd_data_drains_before_and_after() {
        let board = SimBoard::new();
        let mut bus = SpiHost::new(board.spi(), board.delay());
        let mut lcd = lcd(&board);
        board.clear_trace();
        lcd.send_data(&mut bus, b'X').unwrap();
        let trace = board.trace();
        let byte = trace
            .iter()
            .position(|e| matches!(e, BusEvent::Byte { device: Some(Device::Lcd), .. }))
            .unwrap();
        assert!(trace[..byte].contains(&BusEvent::Drain));
        assert!(trace[byte..].contains(&BusEvent::Drain));
    }

    #[test]
    fn test_lcd_command_and_data_switch_rs() {
        let board = SimBoard::new();
        let mut bus = SpiHost::new(board.spi(), board.delay());
        let rs = PinMock::new(&[
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ]);
        let mut lcd = LcdDog::new(board.pin(Line::LcdSelect), rs).unwrap();
        lcd.send_command(&mut bus, 0x80).unwrap();
        lcd.send_data(&mut bus, b'A').unwrap();
        assert!(board.lcd_line(0).starts_with('A'));
        lcd.rs.done();
    }
}
