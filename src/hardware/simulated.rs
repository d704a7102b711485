// In-memory GPIO for running the controller away from the Pi

use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::hardware::traits::Gpio;
use crate::hardware::types::*;

/// Keeps pin levels in memory. Inputs sit at their idle level: the beam is
/// broken (loader plugged in) and the reset button is released.
#[derive(Debug, Default)]
pub struct SimulatedGpio {
    levels: HashMap<u8, Level>,
    outputs: Vec<u8>,
    watchers: HashMap<u8, Vec<EdgeSender>>,
}

impl SimulatedGpio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force an input level, firing any edge watch on the pin
    #[cfg(test)]
    pub fn set_input(&mut self, pin: u8, level: Level) {
        let previous = self.levels.insert(pin, level);
        if previous != Some(level) {
            if let Some(senders) = self.watchers.get_mut(&pin) {
                senders.retain(|tx| tx.notify());
            }
        }
    }
}

impl Gpio for SimulatedGpio {
    fn configure(&mut self, layout: &PinLayout) -> Result<(), HardwareError> {
        self.release();
        self.levels.insert(layout.reset_button, Level::Low);
        self.levels.insert(layout.beam_sensor, Level::Low);
        self.levels.insert(layout.relay, Level::Low);
        self.outputs.push(layout.relay);
        info!(?layout, "Simulated GPIO configured");
        Ok(())
    }

    fn read(&self, pin: u8) -> Result<Level, HardwareError> {
        self.levels
            .get(&pin)
            .copied()
            .ok_or(HardwareError::PinNotConfigured { pin })
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), HardwareError> {
        if !self.outputs.contains(&pin) {
            return Err(HardwareError::PinNotConfigured { pin });
        }
        debug!(pin, %level, "Simulated output");
        self.levels.insert(pin, level);
        Ok(())
    }

    fn watch_edge(
        &mut self,
        pin: u8,
        _edge: Edge,
        _debounce: Option<Duration>,
    ) -> Result<EdgeWatch, HardwareError> {
        if !self.levels.contains_key(&pin) {
            return Err(HardwareError::PinNotConfigured { pin });
        }
        let (tx, watch) = EdgeWatch::channel();
        self.watchers.entry(pin).or_default().push(tx);
        Ok(watch)
    }

    fn release(&mut self) {
        self.levels.clear();
        self.outputs.clear();
        self.watchers.clear();
    }
}
