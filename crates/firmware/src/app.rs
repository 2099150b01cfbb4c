//! Application controller.
//!
//! [`Board`] owns the bus and every device on it and executes FSM actions.
//! [`Controller`] pairs it with the [`Machine`] and turns queued
//! [`Event`]s into bus work. Nothing else holds the bus, so a transaction
//! is never interleaved with another device's.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use platform::humidicon::{Reading, SensorStatus};
use platform::{SpiHost, SpiPeripheral};
use thiserror_no_std::Error;
use ui::screens::{self, HomeData};
use ui::{Action, DisplayBuffer, HomePage, Key, Machine, State, TableError, TimeEntry};

use crate::config::{ALARM_PULSE_MS, MESSAGE_HOLD_MS};
use crate::display::{DisplayError, LcdDog};
use crate::events::{AdcLatch, Event};
use crate::rtc::{ClockError, Ds1306};
use crate::sensor::{HumidIcon, SensorError};

/// Starts an ADC conversion. The result arrives later through an
/// [`AdcLatch`].
pub trait ConversionTrigger {
    /// Request one conversion. Must not block.
    fn start_conversion(&mut self);
}

/// Failure while handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppError {
    /// Clock access failed.
    #[error("clock: {0}")]
    Clock(#[from] ClockError),
    /// Sensor access failed.
    #[error("sensor: {0}")]
    Sensor(#[from] SensorError),
    /// LCD access failed.
    #[error("display: {0}")]
    Display(#[from] DisplayError),
    /// Driving the alarm output failed.
    #[error("alarm output pin error")]
    AlarmPin,
    /// The transition table is malformed.
    #[error("transition table: {0}")]
    Table(#[from] TableError),
}

const NO_READING: Reading = Reading {
    humidity_pct: 0.0,
    temperature_c: 0.0,
};

/// Bus, devices and the UI data the actions work on.
pub struct Board<S, D, CE, SS, CSB, RS, ALM, ADC> {
    bus: SpiHost<S, D>,
    rtc: Ds1306<CE>,
    sensor: HumidIcon<SS>,
    lcd: LcdDog<CSB, RS>,
    alarm_out: ALM,
    adc: ADC,
    adc_latch: &'static AdcLatch,
    buffer: DisplayBuffer,
    entry: TimeEntry,
    page: HomePage,
    reading: Reading,
}

impl<S, D, CE, SS, CSB, RS, ALM, ADC> Board<S, D, CE, SS, CSB, RS, ALM, ADC>
where
    S: SpiPeripheral,
    D: DelayNs,
    CE: OutputPin,
    SS: OutputPin,
    CSB: OutputPin,
    RS: OutputPin,
    ALM: OutputPin,
    ADC: ConversionTrigger,
{
    /// Assemble the board. Nothing is sent until [`Controller::boot`].
    pub fn new(
        bus: SpiHost<S, D>,
        rtc: Ds1306<CE>,
        sensor: HumidIcon<SS>,
        lcd: LcdDog<CSB, RS>,
        alarm_out: ALM,
        adc: ADC,
        adc_latch: &'static AdcLatch,
    ) -> Self {
        Self {
            bus,
            rtc,
            sensor,
            lcd,
            alarm_out,
            adc,
            adc_latch,
            buffer: DisplayBuffer::new(),
            entry: TimeEntry::new(),
            page: HomePage::default(),
            reading: NO_READING,
        }
    }

    /// Character buffer as last painted.
    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    /// Time entry in progress.
    pub fn entry(&self) -> &TimeEntry {
        &self.entry
    }

    /// Home page shown in the idle state.
    pub fn page(&self) -> HomePage {
        self.page
    }

    /// Execute one FSM action. `key` is the key that selected it.
    pub fn run(&mut self, action: Action, key: Key) -> Result<(), AppError> {
        match action {
            Action::ShowHome => self.draw_home(),
            Action::ShowOptions => {
                screens::options(&mut self.buffer);
                self.paint()
            }
            Action::ShowInstructions => {
                screens::instructions(&mut self.buffer);
                self.paint()
            }
            // The next tick redraws the new page.
            Action::ScrollUp => {
                self.page = self.page.next();
                Ok(())
            }
            Action::ScrollDown => {
                self.page = self.page.previous();
                Ok(())
            }
            Action::InvalidKey => {
                screens::invalid_key(&mut self.buffer);
                self.hold_message()?;
                self.draw_home()
            }
            Action::PromptTimeEntry => {
                self.entry.reset();
                screens::time_prompt(&mut self.buffer, &self.entry);
                self.paint()
            }
            Action::EnterDigit => self.enter_digit(key),
            Action::ShowTimeAlarmChoice => {
                screens::time_alarm_choice(&mut self.buffer, &self.entry);
                self.paint()
            }
            Action::InvalidTimeEntry => self.reject_entry(),
            Action::SetSystemTime => {
                self.rtc
                    .set_time(&mut self.bus, self.entry.hours(), self.entry.minutes())?;
                #[cfg(feature = "defmt")]
                defmt::info!(
                    "clock set to {=u8:02x}:{=u8:02x}:00",
                    self.entry.hours().raw(),
                    self.entry.minutes().raw()
                );
                self.draw_home()
            }
            Action::SetSystemAlarm => {
                self.rtc
                    .set_alarm(&mut self.bus, self.entry.hours(), self.entry.minutes())?;
                #[cfg(feature = "defmt")]
                defmt::info!(
                    "alarm set to {=u8:02x}:{=u8:02x}:00",
                    self.entry.hours().raw(),
                    self.entry.minutes().raw()
                );
                self.draw_home()
            }
            Action::InvalidTimeAlarmChoice => {
                screens::invalid_choice(&mut self.buffer);
                self.hold_message()?;
                screens::time_alarm_choice(&mut self.buffer, &self.entry);
                self.paint()
            }
            Action::ToggleAlarm => {
                let enabled = self.rtc.toggle_alarm(&mut self.bus)?;
                let (hours, minutes) = self.rtc.read_alarm(&mut self.bus)?;
                screens::alarm_status(&mut self.buffer, enabled, hours, minutes);
                self.paint()
            }
        }
    }

    /// Read the clock (and the page's measurement) and draw the home page.
    pub fn draw_home(&mut self) -> Result<(), AppError> {
        let time = self.rtc.read_time(&mut self.bus)?.format();
        let co2_ppm = match self.page {
            HomePage::Climate => {
                let sample = self.sensor.read_sample(&mut self.bus)?;
                if sample.status == SensorStatus::Valid {
                    self.reading = sample.scale();
                } else {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("sensor sample not fresh: {}", sample.status);
                }
                self.adc_latch.load()
            }
            HomePage::Co2 => {
                self.adc.start_conversion();
                self.adc_latch.load()
            }
        };
        let data = HomeData {
            time,
            reading: self.reading,
            co2_ppm,
        };
        screens::home(&mut self.buffer, self.page, &data);
        self.paint()
    }

    /// Pulse the alarm output, then clear the clock's alarm flags so the
    /// interrupt line is released.
    pub fn service_alarm(&mut self) -> Result<(), AppError> {
        self.alarm_out.set_high().map_err(|_| AppError::AlarmPin)?;
        self.bus.delay_ms(ALARM_PULSE_MS);
        self.alarm_out.set_low().map_err(|_| AppError::AlarmPin)?;
        self.rtc.clear_alarm_flags(&mut self.bus)?;
        #[cfg(feature = "defmt")]
        defmt::info!("alarm serviced");
        Ok(())
    }

    fn enter_digit(&mut self, key: Key) -> Result<(), AppError> {
        let Some(digit) = key.digit() else {
            return self.reject_entry();
        };
        match self.entry.push_digit(digit) {
            Ok(()) => {
                screens::time_entry_line(&mut self.buffer, &self.entry);
                self.paint()
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("digit rejected: {}", _e);
                self.reject_entry()
            }
        }
    }

    fn reject_entry(&mut self) -> Result<(), AppError> {
        screens::invalid_time_entry(&mut self.buffer);
        self.hold_message()?;
        screens::time_prompt(&mut self.buffer, &self.entry);
        self.paint()
    }

    fn hold_message(&mut self) -> Result<(), AppError> {
        self.paint()?;
        self.bus.delay_ms(MESSAGE_HOLD_MS);
        Ok(())
    }

    fn paint(&mut self) -> Result<(), AppError> {
        self.lcd.paint(&mut self.bus, &self.buffer)?;
        Ok(())
    }

    fn boot(&mut self) -> Result<(), AppError> {
        self.alarm_out.set_low().map_err(|_| AppError::AlarmPin)?;
        self.rtc.configure(&mut self.bus)?;
        if let Err(_e) = self.rtc.nvram_self_test(&mut self.bus) {
            #[cfg(feature = "defmt")]
            defmt::warn!("NV RAM self-test failed: {}", _e);
        }
        self.sensor.configure(&mut self.bus)?;
        self.lcd.initialize(&mut self.bus)?;
        self.draw_home()
    }
}

/// State machine plus board: the whole application.
pub struct Controller<S, D, CE, SS, CSB, RS, ALM, ADC> {
    machine: Machine,
    board: Board<S, D, CE, SS, CSB, RS, ALM, ADC>,
}

impl<S, D, CE, SS, CSB, RS, ALM, ADC> Controller<S, D, CE, SS, CSB, RS, ALM, ADC>
where
    S: SpiPeripheral,
    D: DelayNs,
    CE: OutputPin,
    SS: OutputPin,
    CSB: OutputPin,
    RS: OutputPin,
    ALM: OutputPin,
    ADC: ConversionTrigger,
{
    /// Controller in the idle state.
    pub fn new(board: Board<S, D, CE, SS, CSB, RS, ALM, ADC>) -> Self {
        Self {
            machine: Machine::new(),
            board,
        }
    }

    /// One-time configuration: clock registers, NV RAM check, sensor and
    /// LCD setup, then the home page.
    pub fn boot(&mut self) -> Result<(), AppError> {
        self.board.boot()?;
        #[cfg(feature = "defmt")]
        defmt::info!("controller ready in {}", self.machine.state());
        Ok(())
    }

    /// Current FSM state.
    pub fn state(&self) -> State {
        self.machine.state()
    }

    /// The board, for inspection.
    pub fn board(&self) -> &Board<S, D, CE, SS, CSB, RS, ALM, ADC> {
        &self.board
    }

    /// Handle one queued event.
    ///
    /// Keys go through the transition table. Ticks redraw the home page
    /// only while idle, so a menu or a held message is never overwritten.
    pub fn handle(&mut self, event: Event) -> Result<(), AppError> {
        match event {
            Event::Key(key) => {
                let board = &mut self.board;
                self.machine.process(key, |action, _| board.run(action, key))?
            }
            Event::Tick if self.machine.state() == State::Idle => self.board.draw_home(),
            Event::Tick => Ok(()),
            Event::Alarm => self.board.service_alarm(),
        }
    }
}
