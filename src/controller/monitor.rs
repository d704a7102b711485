//! Run mode: while the loader is energized, poll the sensor and re-check the
//! work order on a fixed tick.

use tracing::{debug, info, warn};

use crate::controller::error::ControllerError;
use crate::controller::sequence::ActiveRun;
use crate::controller::station::Station;
use crate::hardware::{Display, Gpio};

/// What is due on a given tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickChecks {
    pub sensor: bool,
    pub work_order: bool,
}

/// Tick counter for the monitor loop
#[derive(Debug, Clone)]
pub struct MonitorClock {
    count: u32,
    sensor_every: u32,
    work_order_every: u32,
}

impl MonitorClock {
    pub fn new(sensor_every: u32, work_order_every: u32) -> Self {
        Self {
            count: 0,
            sensor_every: sensor_every.max(1),
            work_order_every: work_order_every.max(1),
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Count one tick. The counter starts over after each work order check.
    pub fn advance(&mut self) -> TickChecks {
        self.count += 1;
        let checks = TickChecks {
            sensor: self.count % self.sensor_every == 0,
            work_order: self.count >= self.work_order_every,
        };
        if checks.work_order {
            self.count = 0;
        }
        checks
    }
}

impl<D: Display, G: Gpio> Station<D, G> {
    /// Runs until something is wrong, and returns what
    pub async fn monitor(&mut self, run: &ActiveRun) -> ControllerError {
        let monitor = self.config.monitor.clone();
        let sensor_pin = monitor.sensor_pin(&self.config.pins);
        let mut clock = MonitorClock::new(monitor.sensor_check_ticks, monitor.api_check_ticks);
        info!(
            work_order = %run.work_order,
            sensor_pin,
            "Monitoring loader"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(monitor.tick()) => {}
                _ = self.reset_watch.triggered() => {
                    info!("Reset button pressed");
                    return ControllerError::ResetRequested;
                }
            }

            let checks = clock.advance();

            if checks.sensor {
                match self.gpio.read(sensor_pin) {
                    Ok(level) if level == monitor.anomaly_level => {
                        warn!(pin = sensor_pin, %level, "Sensor detected, pallet moved");
                        return ControllerError::SensorAnomaly { pin: sensor_pin, level };
                    }
                    Ok(level) => debug!(pin = sensor_pin, %level, "Sensor ok"),
                    Err(e) => return e.into(),
                }
            }

            if checks.work_order {
                debug!("Checking loaded workorder");
                match self.api.current_work_order(&run.work_order).await {
                    Ok(current) if current == run.work_order => {
                        let minutes = (chrono::Utc::now() - run.started_at).num_minutes();
                        debug!(work_order = %current, minutes, "Work order still loaded");
                    }
                    Ok(current) => {
                        warn!(
                            scanned = %run.work_order,
                            current = %current,
                            "Workorders do not match"
                        );
                        return ControllerError::WorkOrderReassigned {
                            scanned: run.work_order.clone(),
                            current,
                        };
                    }
                    Err(e) => {
                        warn!("Work order check failed: {}", e);
                        return e.into();
                    }
                }
            }
        }
    }
}
