//! Mock implementations for testing
//!
//! [`SimBoard`] models the whole peripheral side of the board: one SPI bus
//! with a DS1306, a HumidIcon and an LCD DOG attached, their select lines,
//! the LCD register-select line and the alarm output. Handles returned by
//! [`SimBoard::spi`], [`SimBoard::pin`] and [`SimBoard::delay`] all share the
//! same state, so a test can hand them to drivers and then inspect register
//! contents, LCD text, delays and protocol faults.

#![cfg(any(test, feature = "std"))]
// Test double: fixed-size register files are indexed by masked addresses.
#![allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use core::cell::RefCell;
use core::convert::Infallible;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use crate::ds1306::{RegisterAddress, CONTROL_WP};
use crate::lcd_dog::{CLEAR_DISPLAY, GLYPH_DEGREE, GLYPH_RIGHT_ARROW, LINE_COUNT, LINE_WIDTH};
use crate::peripheral::{SpiConfig, SpiMode, SpiPeripheral};

/// Board signals driven by the MCU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// DS1306 CE (active-high).
    RtcSelect,
    /// HumidIcon SS (active-low).
    SensorSelect,
    /// LCD CSB (active-low).
    LcdSelect,
    /// LCD RS: low = instruction, high = data.
    LcdRegisterSelect,
    /// Alarm indicator output.
    AlarmOutput,
}

impl Line {
    #[cfg(test)]
    const ALL: [Line; 5] = [
        Line::RtcSelect,
        Line::SensorSelect,
        Line::LcdSelect,
        Line::LcdRegisterSelect,
        Line::AlarmOutput,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Bus devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// DS1306 real-time clock.
    Rtc,
    /// HumidIcon sensor.
    Sensor,
    /// LCD DOG.
    Lcd,
}

impl Device {
    fn expected_mode(self) -> SpiMode {
        match self {
            Device::Rtc => SpiMode::Mode1,
            Device::Sensor | Device::Lcd => SpiMode::Mode3,
        }
    }
}

/// Protocol violations detected by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// A byte was clocked with more than one device selected.
    Contention,
    /// A byte was clocked with no device selected.
    NoDevice,
    /// A byte was clocked with the wrong SPI mode for the selected device.
    WrongMode {
        /// Selected device.
        device: Device,
        /// Mode programmed at the time.
        mode: SpiMode,
    },
    /// A byte was clocked before the controller was ever configured.
    Unconfigured,
}

/// Everything observable on the board, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    /// Controller reprogrammed.
    Configure(SpiConfig),
    /// A line changed to the given level (`true` = high).
    Level(Line, bool),
    /// One byte exchanged with `device`.
    Byte {
        /// Selected device, if exactly one.
        device: Option<Device>,
        /// Byte shifted out by the MCU.
        out: u8,
        /// Byte shifted in.
        inp: u8,
    },
    /// Data register read without a pending transfer.
    Drain,
    /// Blocking delay.
    Delay(u32),
}

struct RtcModel {
    registers: [u8; 128],
    cursor: Option<RegisterAddress>,
}

impl RtcModel {
    fn new() -> Self {
        let mut registers = [0u8; 128];
        // Power-on: write protect set, so configuration must clear it first.
        registers[0x0F] = CONTROL_WP;
        Self {
            registers,
            cursor: None,
        }
    }

    fn begin_frame(&mut self) {
        self.cursor = None;
    }

    fn exchange(&mut self, out: u8) -> u8 {
        let Some(cursor) = self.cursor else {
            self.cursor = Some(RegisterAddress::from_byte(out));
            return 0x00;
        };
        let index = cursor.index();
        let reply = match cursor {
            RegisterAddress::Read(_) => self.registers[usize::from(index)],
            RegisterAddress::Write(_) => {
                let protected = self.registers[0x0F] & CONTROL_WP != 0;
                if !protected || index == 0x0F {
                    self.registers[usize::from(index)] = out;
                }
                0x00
            }
        };
        let next = next_rtc_index(index);
        self.cursor = Some(match cursor {
            RegisterAddress::Read(_) => RegisterAddress::Read(next),
            RegisterAddress::Write(_) => RegisterAddress::Write(next | 0x80),
        });
        reply
    }
}

/// Clock/alarm registers wrap within 0x00–0x1F, user RAM within 0x20–0x7F.
fn next_rtc_index(index: u8) -> u8 {
    match index {
        0x1F => 0x00,
        0x7F => 0x20,
        i => i + 1,
    }
}

struct SensorModel {
    frame: [u8; 4],
    position: usize,
}

impl SensorModel {
    fn exchange(&mut self) -> u8 {
        let byte = self.frame.get(self.position).copied().unwrap_or(0xFF);
        self.position += 1;
        byte
    }
}

struct LcdModel {
    ddram: [u8; 0x80],
    address: usize,
    commands: Vec<u8>,
    data_writes: usize,
}

impl LcdModel {
    fn new() -> Self {
        Self {
            ddram: [b' '; 0x80],
            address: 0,
            commands: Vec::new(),
            data_writes: 0,
        }
    }

    fn exchange(&mut self, out: u8, data: bool) {
        if data {
            self.ddram[self.address & 0x7F] = out;
            self.address = (self.address + 1) & 0x7F;
            self.data_writes += 1;
            return;
        }
        self.commands.push(out);
        if out & 0x80 != 0 {
            self.address = usize::from(out & 0x7F);
        } else if out == CLEAR_DISPLAY {
            self.ddram = [b' '; 0x80];
            self.address = 0;
        }
    }
}

struct BoardState {
    levels: [bool; 5],
    config: Option<SpiConfig>,
    data: u8,
    complete: bool,
    stalled: bool,
    rtc: RtcModel,
    sensor: SensorModel,
    lcd: LcdModel,
    trace: Vec<BusEvent>,
    faults: Vec<Fault>,
    elapsed_ns: u64,
}

impl BoardState {
    fn new() -> Self {
        let mut levels = [false; 5];
        // Idle levels: CE low, SS and CSB high.
        levels[Line::SensorSelect.index()] = true;
        levels[Line::LcdSelect.index()] = true;
        Self {
            levels,
            config: None,
            data: 0,
            complete: false,
            stalled: false,
            rtc: RtcModel::new(),
            sensor: SensorModel {
                frame: [0; 4],
                position: 0,
            },
            lcd: LcdModel::new(),
            trace: Vec::new(),
            faults: Vec::new(),
            elapsed_ns: 0,
        }
    }

    fn level(&self, line: Line) -> bool {
        self.levels[line.index()]
    }

    fn set_level(&mut self, line: Line, high: bool) {
        let was = self.level(line);
        self.levels[line.index()] = high;
        self.trace.push(BusEvent::Level(line, high));
        match (line, was, high) {
            (Line::RtcSelect, false, true) => self.rtc.begin_frame(),
            (Line::SensorSelect, true, false) => self.sensor.position = 0,
            _ => {}
        }
    }

    fn selected(&self) -> Vec<Device> {
        let mut devices = Vec::new();
        if self.level(Line::RtcSelect) {
            devices.push(Device::Rtc);
        }
        if !self.level(Line::SensorSelect) {
            devices.push(Device::Sensor);
        }
        if !self.level(Line::LcdSelect) {
            devices.push(Device::Lcd);
        }
        devices
    }

    fn clock_byte(&mut self, out: u8) -> u8 {
        let selected = self.selected();
        let device = match selected.as_slice() {
            [] => {
                self.faults.push(Fault::NoDevice);
                None
            }
            [one] => Some(*one),
            _ => {
                self.faults.push(Fault::Contention);
                None
            }
        };
        match (device, self.config) {
            (Some(d), Some(cfg)) if cfg.mode != d.expected_mode() => {
                self.faults.push(Fault::WrongMode {
                    device: d,
                    mode: cfg.mode,
                });
            }
            (_, None) => self.faults.push(Fault::Unconfigured),
            _ => {}
        }
        let inp = match device {
            Some(Device::Rtc) => self.rtc.exchange(out),
            Some(Device::Sensor) => self.sensor.exchange(),
            Some(Device::Lcd) => {
                let data = self.level(Line::LcdRegisterSelect);
                self.lcd.exchange(out, data);
                0x00
            }
            None => 0xFF,
        };
        self.trace.push(BusEvent::Byte { device, out, inp });
        inp
    }
}

/// Shared simulated board.
#[derive(Clone)]
pub struct SimBoard {
    state: Rc<RefCell<BoardState>>,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoard {
    /// Fresh board: clock write-protected and zeroed, LCD blank.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(BoardState::new())),
        }
    }

    /// SPI controller handle.
    pub fn spi(&self) -> SimSpi {
        SimSpi {
            state: Rc::clone(&self.state),
        }
    }

    /// Output pin handle for `line`.
    pub fn pin(&self, line: Line) -> SimPin {
        SimPin {
            state: Rc::clone(&self.state),
            line,
        }
    }

    /// Delay handle; every call is recorded.
    pub fn delay(&self) -> SimDelay {
        SimDelay {
            state: Rc::clone(&self.state),
        }
    }

    /// Current level of `line`.
    pub fn level(&self, line: Line) -> bool {
        self.state.borrow().level(line)
    }

    /// Clock register at 7-bit `index`.
    pub fn rtc_register(&self, index: u8) -> u8 {
        self.state.borrow().rtc.registers[usize::from(index & 0x7F)]
    }

    /// Preload a clock register, bypassing write protection.
    pub fn set_rtc_register(&self, index: u8, value: u8) {
        self.state.borrow_mut().rtc.registers[usize::from(index & 0x7F)] = value;
    }

    /// Four bytes the sensor returns on its next frame.
    pub fn set_sensor_frame(&self, frame: [u8; 4]) {
        self.state.borrow_mut().sensor.frame = frame;
    }

    /// Text on LCD line `line` (0-based), ROM glyphs mapped back to Unicode.
    pub fn lcd_line(&self, line: usize) -> String {
        let state = self.state.borrow();
        let start = (line % LINE_COUNT) * 0x10;
        state.lcd.ddram[start..start + LINE_WIDTH]
            .iter()
            .map(|&b| match b {
                GLYPH_DEGREE => '°',
                GLYPH_RIGHT_ARROW => '→',
                b => char::from(b),
            })
            .collect()
    }

    /// Every instruction byte the LCD received.
    pub fn lcd_commands(&self) -> Vec<u8> {
        self.state.borrow().lcd.commands.clone()
    }

    /// Number of data bytes the LCD received.
    pub fn lcd_data_writes(&self) -> usize {
        self.state.borrow().lcd.data_writes
    }

    /// Protocol violations so far.
    pub fn faults(&self) -> Vec<Fault> {
        self.state.borrow().faults.clone()
    }

    /// Event log so far.
    pub fn trace(&self) -> Vec<BusEvent> {
        self.state.borrow().trace.clone()
    }

    /// Bytes exchanged with `device`, as `(out, in)` pairs.
    pub fn bytes_for(&self, device: Device) -> Vec<(u8, u8)> {
        self.state
            .borrow()
            .trace
            .iter()
            .filter_map(|e| match *e {
                BusEvent::Byte {
                    device: Some(d),
                    out,
                    inp,
                } if d == device => Some((out, inp)),
                _ => None,
            })
            .collect()
    }

    /// Forget the event log and faults.
    pub fn clear_trace(&self) {
        let mut state = self.state.borrow_mut();
        state.trace.clear();
        state.faults.clear();
    }

    /// While stalled the transfer-complete flag never rises.
    pub fn set_stalled(&self, stalled: bool) {
        self.state.borrow_mut().stalled = stalled;
    }

    /// Sum of all recorded delays.
    pub fn elapsed_ns(&self) -> u64 {
        self.state.borrow().elapsed_ns
    }
}

/// SPI controller handle of a [`SimBoard`].
pub struct SimSpi {
    state: Rc<RefCell<BoardState>>,
}

impl SpiPeripheral for SimSpi {
    type Error = Infallible;

    fn configure(&mut self, config: SpiConfig) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.config = Some(config);
        state.trace.push(BusEvent::Configure(config));
        Ok(())
    }

    fn start_transfer(&mut self, byte: u8) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.data = state.clock_byte(byte);
        state.complete = true;
        Ok(())
    }

    fn transfer_complete(&mut self) -> Result<bool, Self::Error> {
        let state = self.state.borrow();
        Ok(state.complete && !state.stalled)
    }

    fn read_data(&mut self) -> Result<u8, Self::Error> {
        let mut state = self.state.borrow_mut();
        if !state.complete {
            state.trace.push(BusEvent::Drain);
        }
        state.complete = false;
        Ok(state.data)
    }
}

/// Output pin handle of a [`SimBoard`].
pub struct SimPin {
    state: Rc<RefCell<BoardState>>,
    line: Line,
}

impl SimPin {
    /// Line driven by this pin.
    pub fn line(&self) -> Line {
        self.line
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state.borrow_mut().set_level(self.line, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.state.borrow_mut().set_level(self.line, true);
        Ok(())
    }
}

/// Recording delay handle of a [`SimBoard`].
pub struct SimDelay {
    state: Rc<RefCell<BoardState>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        if ns == 0 {
            return;
        }
        let mut state = self.state.borrow_mut();
        state.elapsed_ns += u64::from(ns);
        state.trace.push(BusEvent::Delay(ns));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn idle_board_has_nothing_selected() {
        let board = SimBoard::new();
        for line in Line::ALL {
            let expected = matches!(line, Line::SensorSelect | Line::LcdSelect);
            assert_eq!(board.level(line), expected);
        }
    }

    #[test]
    fn two_selected_devices_is_contention() {
        let board = SimBoard::new();
        let mut spi = board.spi();
        spi.configure(SpiConfig::msb_first(1_000_000, SpiMode::Mode1))
            .unwrap();
        board.pin(Line::RtcSelect).set_high().unwrap();
        board.pin(Line::LcdSelect).set_low().unwrap();
        spi.start_transfer(0x00).unwrap();
        assert_eq!(board.faults(), [Fault::Contention]);
    }

    #[test]
    fn rtc_respects_write_protect() {
        let board = SimBoard::new();
        let mut spi = board.spi();
        let mut ce = board.pin(Line::RtcSelect);
        spi.configure(SpiConfig::msb_first(2_000_000, SpiMode::Mode1))
            .unwrap();
        ce.set_high().unwrap();
        spi.start_transfer(0x82).unwrap();
        spi.start_transfer(0x12).unwrap();
        ce.set_low().unwrap();
        assert_eq!(board.rtc_register(0x02), 0x00);
        assert!(board.faults().is_empty());
    }

    #[test]
    fn lcd_data_lands_at_ddram_address() {
        let board = SimBoard::new();
        let mut spi = board.spi();
        spi.configure(SpiConfig::msb_first(125_000, SpiMode::Mode3))
            .unwrap();
        let mut rs = board.pin(Line::LcdRegisterSelect);
        board.pin(Line::LcdSelect).set_low().unwrap();
        rs.set_low().unwrap();
        spi.start_transfer(0x90).unwrap();
        rs.set_high().unwrap();
        spi.start_transfer(b'A').unwrap();
        spi.start_transfer(GLYPH_DEGREE).unwrap();
        assert!(board.lcd_line(1).starts_with("A°"));
        assert_eq!(board.lcd_commands(), [0x90]);
    }

    #[test]
    fn next_rtc_index_wraps_by_region() {
        assert_eq!(next_rtc_index(0x1F), 0x00);
        assert_eq!(next_rtc_index(0x7F), 0x20);
        assert_eq!(next_rtc_index(0x20), 0x21);
    }
}
