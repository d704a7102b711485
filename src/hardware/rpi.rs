// Raspberry Pi GPIO header through rppal. BCM numbering throughout.

use rppal::gpio::{Event, Gpio as PiGpio, InputPin, OutputPin, Trigger};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::hardware::traits::Gpio;
use crate::hardware::types::*;

/// Owns the claimed pins. Dropping a pin returns it to its previous mode,
/// so `release` is the cleanup step.
#[derive(Debug, Default)]
pub struct RppalGpio {
    inputs: HashMap<u8, InputPin>,
    outputs: HashMap<u8, OutputPin>,
}

impl RppalGpio {
    pub fn new() -> Self {
        Self::default()
    }
}

fn unavailable(e: rppal::gpio::Error) -> HardwareError {
    HardwareError::GpioUnavailable {
        message: e.to_string(),
    }
}

fn to_level(level: rppal::gpio::Level) -> Level {
    Level::from(level == rppal::gpio::Level::High)
}

impl Gpio for RppalGpio {
    fn configure(&mut self, layout: &PinLayout) -> Result<(), HardwareError> {
        self.release();
        let gpio = PiGpio::new().map_err(unavailable)?;

        // Restart button wired from the pin to 3V3
        let reset = gpio.get(layout.reset_button).map_err(unavailable)?.into_input_pulldown();
        // IR beam wired from the pin to GND
        let beam = gpio.get(layout.beam_sensor).map_err(unavailable)?.into_input_pullup();
        let relay = gpio.get(layout.relay).map_err(unavailable)?.into_output_low();

        self.inputs.insert(layout.reset_button, reset);
        self.inputs.insert(layout.beam_sensor, beam);
        self.outputs.insert(layout.relay, relay);
        info!(?layout, "GPIO pins claimed");
        Ok(())
    }

    fn read(&self, pin: u8) -> Result<Level, HardwareError> {
        if let Some(input) = self.inputs.get(&pin) {
            return Ok(to_level(input.read()));
        }
        self.outputs
            .get(&pin)
            .map(|output| Level::from(output.is_set_high()))
            .ok_or(HardwareError::PinNotConfigured { pin })
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), HardwareError> {
        let output = self
            .outputs
            .get_mut(&pin)
            .ok_or(HardwareError::PinNotConfigured { pin })?;
        match level {
            Level::High => output.set_high(),
            Level::Low => output.set_low(),
        }
        debug!(pin, %level, "Output driven");
        Ok(())
    }

    fn watch_edge(
        &mut self,
        pin: u8,
        edge: Edge,
        debounce: Option<Duration>,
    ) -> Result<EdgeWatch, HardwareError> {
        let input = self
            .inputs
            .get_mut(&pin)
            .ok_or(HardwareError::PinNotConfigured { pin })?;
        let trigger = match edge {
            Edge::Rising => Trigger::RisingEdge,
            Edge::Falling => Trigger::FallingEdge,
            Edge::Both => Trigger::Both,
        };
        let (tx, watch) = EdgeWatch::channel();
        input
            .set_async_interrupt(trigger, debounce, move |_event: Event| {
                tx.notify();
            })
            .map_err(unavailable)?;
        Ok(watch)
    }

    fn release(&mut self) {
        for (pin, input) in self.inputs.iter_mut() {
            if let Err(e) = input.clear_async_interrupt() {
                warn!(pin = *pin, "Could not clear edge interrupt: {}", e);
            }
        }
        self.inputs.clear();
        self.outputs.clear();
    }
}
