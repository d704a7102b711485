//! Outer loop: run cycles back to back until the operator stops the station.

use std::future::Future;
use tracing::{error, info, warn, Instrument};

use crate::controller::error::{ControllerError, SupervisorAction};
use crate::controller::station::Station;
use crate::hardware::{Display, Gpio};
use crate::telemetry::{create_cycle_span, generate_correlation_id};

/// How the supervisor ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorReport {
    pub cycles: u64,
    pub restarts: u64,
    pub reason: ControllerError,
}

pub struct Supervisor<D: Display, G: Gpio> {
    station: Station<D, G>,
}

impl<D: Display, G: Gpio> Supervisor<D, G> {
    pub fn new(station: Station<D, G>) -> Self {
        Self { station }
    }

    pub fn station(&self) -> &Station<D, G> {
        &self.station
    }

    /// Run until `shutdown` resolves or operator input closes. Every other
    /// ending restarts the sequence from the work order scan.
    pub async fn run<F>(&mut self, shutdown: F) -> SupervisorReport
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let press_id = self.station.config().station.press_id.clone();
        let mut cycles = 0u64;
        let mut restarts = 0u64;

        loop {
            cycles += 1;
            let correlation_id = generate_correlation_id();
            let span = create_cycle_span(cycles, &press_id, &correlation_id);

            let reason = tokio::select! {
                outcome = self.station.run_cycle().instrument(span.clone()) => match outcome {
                    Err(reason) => reason,
                    Ok(never) => match never {},
                },
                _ = &mut shutdown => ControllerError::Interrupted,
            };

            match reason.action() {
                SupervisorAction::Shutdown => {
                    info!(parent: &span, reason = %reason, "Shutting down");
                    self.station.shutdown();
                    return SupervisorReport {
                        cycles,
                        restarts,
                        reason,
                    };
                }
                SupervisorAction::Restart => {
                    match &reason {
                        ControllerError::Hardware(e) => error!(parent: &span, "Hardware fault: {}", e),
                        ControllerError::Network { source } => {
                            warn!(parent: &span, "Failed to get data from API: {}", source)
                        }
                        other => info!(parent: &span, reason = %other, "Cycle ended"),
                    }
                    restarts += 1;
                    let recovery = self.station.recover(&reason).instrument(span);
                    tokio::select! {
                        _ = recovery => {}
                        _ = &mut shutdown => {
                            self.station.shutdown();
                            return SupervisorReport {
                                cycles,
                                restarts,
                                reason: ControllerError::Interrupted,
                            };
                        }
                    }
                }
            }
        }
    }
}
