//! Event queue between the interrupt producers and the main loop.
//!
//! Producers run in EXTI tasks (or any interrupt-side context) and only
//! enqueue: they never touch the bus. The main loop is the single consumer
//! and does all peripheral work while handling an event.
//!
//! # Overflow handling
//!
//! [`try_send_event`] never blocks. If the main loop is busy (for example
//! holding an error message on screen) and the queue reaches
//! [`EVENT_QUEUE_DEPTH`], new events are dropped with a warning rather than
//! stalling the producer.

use core::sync::atomic::{AtomicU16, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Sender};
use embassy_sync::signal::Signal;
use ui::Key;

use crate::app::ConversionTrigger;
use crate::config::EVENT_QUEUE_DEPTH;

/// Something the main loop has to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A keypad key was pressed.
    Key(Key),
    /// The clock's 1 Hz output rose.
    Tick,
    /// The clock asserted its alarm line.
    Alarm,
}

/// Queue type shared by every producer and the main loop.
pub type EventChannel = Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>;

/// Producer handle.
pub type EventSender = Sender<'static, CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>;

/// Global event queue.
pub static EVENTS: EventChannel = Channel::new();

/// Enqueue without blocking. Returns `false` if the queue was full and the
/// event was dropped.
pub fn try_send_event(tx: &EventSender, event: Event) -> bool {
    match tx.try_send(event) {
        Ok(()) => true,
        Err(_) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("event queue full, dropped {}", event);
            false
        }
    }
}

/// Keypad data-available: decode the 4-bit code and enqueue the key.
///
/// Bits above the low nibble are ignored.
pub fn on_key_available(tx: &EventSender, code: u8) -> bool {
    match Key::from_code(code & 0x0F) {
        Some(key) => try_send_event(tx, Event::Key(key)),
        None => false,
    }
}

/// Clock 1 Hz edge.
pub fn on_tick(tx: &EventSender) -> bool {
    try_send_event(tx, Event::Tick)
}

/// Clock alarm line asserted.
pub fn on_alarm(tx: &EventSender) -> bool {
    try_send_event(tx, Event::Alarm)
}

/// Conversion-complete: latch the result for the next redraw.
///
/// No event is posted. The CO2 page starts a conversion on every redraw, so
/// posting one here would turn each conversion into another redraw.
pub fn on_conversion_complete(latch: &AdcLatch, value: u16) {
    latch.store(value);
}

/// Last ADC result, written by the conversion-complete side and read by the
/// display actions.
#[derive(Debug)]
pub struct AdcLatch(AtomicU16);

impl AdcLatch {
    /// Latch holding zero.
    pub const fn new() -> Self {
        Self(AtomicU16::new(0))
    }

    /// Record a new result.
    pub fn store(&self, value: u16) {
        self.0.store(value, Ordering::Release);
    }

    /// Most recent result.
    pub fn load(&self) -> u16 {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for AdcLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Latch fed by the ADC task.
pub static ADC_LATCH: AdcLatch = AdcLatch::new();

/// Conversion requests from the controller to the ADC task.
pub static ADC_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// [`ConversionTrigger`] that wakes the task waiting on a request signal.
///
/// Requests made while a conversion is pending coalesce into one.
#[derive(Clone, Copy)]
pub struct SignalTrigger(&'static Signal<CriticalSectionRawMutex, ()>);

impl SignalTrigger {
    /// Trigger on `signal`.
    pub const fn new(signal: &'static Signal<CriticalSectionRawMutex, ()>) -> Self {
        Self(signal)
    }
}

impl ConversionTrigger for SignalTrigger {
    fn start_conversion(&mut self) {
        self.0.signal(());
    }
}
