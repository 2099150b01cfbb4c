//! Interrupt-side producers: keypad, clock tick, clock alarm and ADC.
//!
//! # Pin assignments
//!
//! | Signal            | MCU pin | Notes                              |
//! |-------------------|---------|------------------------------------|
//! | Keypad DA         | PB8     | EXTI8 rising edge                  |
//! | Keypad D0–D3      | PE0–PE3 | GPIO input only                    |
//! | DS1306 1 Hz       | PB9     | EXTI9 rising edge, open drain, pull-up |
//! | DS1306 INT0       | PB10    | EXTI10 falling edge (active low), pull-up |
//! | CO2 sensor output | PC0     | ADC1 INP10                         |
//!
//! Each task only decodes and enqueues (see [`crate::events`]); the main
//! loop does all bus work. None of them can block on a full queue.

use embassy_executor::Spawner;
use embassy_stm32::adc::Adc;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{AnyPin, Input};
use embassy_stm32::peripherals::{ADC1, PC0};

use super::keypad_code;
use crate::events::{
    on_alarm, on_conversion_complete, on_key_available, on_tick, EventSender, ADC_LATCH,
    ADC_REQUEST, EVENTS,
};

/// Keypad data lines, D0 first.
pub type KeypadData = [Input<'static, AnyPin>; 4];

/// Spawn the keypad, tick and alarm producers and the ADC task.
///
/// Call once from `main`. The tasks own their pins for the lifetime of the
/// program.
// A spawn failure means the task pool is exhausted at boot; nothing can recover.
#[allow(clippy::expect_used)]
pub fn spawn_input_tasks(
    spawner: &Spawner,
    keypad_da: ExtiInput<'static, AnyPin>,
    keypad_data: KeypadData,
    rtc_1hz: ExtiInput<'static, AnyPin>,
    rtc_int0: ExtiInput<'static, AnyPin>,
    adc: Adc<'static, ADC1>,
    adc_pin: PC0,
) {
    spawner
        .spawn(keypad_task(keypad_da, keypad_data))
        .expect("failed to spawn keypad_task");
    spawner
        .spawn(tick_task(rtc_1hz))
        .expect("failed to spawn tick_task");
    spawner
        .spawn(alarm_task(rtc_int0))
        .expect("failed to spawn alarm_task");
    spawner
        .spawn(adc_task(adc, adc_pin))
        .expect("failed to spawn adc_task");
}

/// Read the key code on every DA rising edge.
#[embassy_executor::task]
async fn keypad_task(mut da: ExtiInput<'static, AnyPin>, data: KeypadData) {
    let tx: EventSender = EVENTS.sender();
    loop {
        da.wait_for_rising_edge().await;
        let [d0, d1, d2, d3] = &data;
        let code = keypad_code([d0.is_high(), d1.is_high(), d2.is_high(), d3.is_high()]);
        defmt::trace!("keypad code={=u8}", code);
        on_key_available(&tx, code);
    }
}

/// One event per rising edge of the clock's 1 Hz output.
#[embassy_executor::task]
async fn tick_task(mut sqw: ExtiInput<'static, AnyPin>) {
    let tx: EventSender = EVENTS.sender();
    loop {
        sqw.wait_for_rising_edge().await;
        on_tick(&tx);
    }
}

/// One event per falling edge of INT0.
///
/// INT0 stays low until the controller clears the alarm flags, so the next
/// falling edge is the next alarm.
#[embassy_executor::task]
async fn alarm_task(mut int0: ExtiInput<'static, AnyPin>) {
    let tx: EventSender = EVENTS.sender();
    loop {
        int0.wait_for_falling_edge().await;
        defmt::debug!("RTC alarm line asserted");
        on_alarm(&tx);
    }
}

/// Run one conversion per request and latch the result.
#[embassy_executor::task]
async fn adc_task(mut adc: Adc<'static, ADC1>, mut pin: PC0) {
    loop {
        ADC_REQUEST.wait().await;
        let value = adc.read(&mut pin);
        on_conversion_complete(&ADC_LATCH, value);
    }
}
