//! Drives the validation state machine: performs the scan or lookup each
//! state asks for and feeds the outcome back in as an event.

use chrono::{DateTime, Utc};
use statig::prelude::*;
use std::convert::Infallible;
use tracing::{debug, info};

use crate::controller::error::ControllerError;
use crate::controller::state_machine::{LoaderSequence, SequenceEvent, State};
use crate::controller::station::Station;
use crate::hardware::{Color, Display, Gpio};

pub const PROMPT_WORK_ORDER: &str = "SCAN\n\nWORKORDER NUMBER";
pub const PROMPT_SERIAL: &str = "SCAN\nRAW MATERIAL\nSERIAL NUMBER";
pub const FETCHING_WORK_ORDER: &str = "GETTING\nWORKORDER\nINFORMATION...";
pub const FETCHING_SERIAL: &str = "GETTING\nRAW MATERIAL\nSERIAL NUMBER\nINFORMATION...";

/// A validated work order with the loader energized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRun {
    pub work_order: String,
    pub started_at: DateTime<Utc>,
}

pub fn running_banner(press_id: &str, work_order: &str) -> String {
    format!("PRESS: {press_id}\nWORKORDER: {work_order}\n\nLOADER RUNNING")
}

impl<D: Display, G: Gpio> Station<D, G> {
    /// One pass from power-on banner to a running loader, then the monitor.
    /// A cycle only ever ends with the reason it stopped.
    pub async fn run_cycle(&mut self) -> Result<Infallible, ControllerError> {
        self.acquire()?;
        self.splash().await?;
        if self.config.features.outlet_check {
            self.check_outlet().await?;
        }

        let mut machine = LoaderSequence::new(self.config.station.press_id.clone()).state_machine();
        let run = self.run_sequence(&mut machine).await?;

        self.start_loader().await?;
        let banner = running_banner(&self.config.station.press_id, &run.work_order);
        self.show(&banner, Color::Green)?;
        info!(work_order = %run.work_order, "Loader running");

        let stopped = self.monitor(&run).await;
        machine.handle(&SequenceEvent::Fail(stopped.clone()));
        Err(machine.state().restart_reason().cloned().unwrap_or(stopped))
    }

    /// Scan, look up and verify until the state machine reaches `Running`
    /// or `Restart`
    pub async fn run_sequence(
        &mut self,
        machine: &mut StateMachine<LoaderSequence>,
    ) -> Result<ActiveRun, ControllerError> {
        loop {
            let state = machine.state().clone();
            debug!(state = state.name(), "Sequence step");

            let event = match state {
                State::AwaitWorkOrderScan { .. } => {
                    self.show(PROMPT_WORK_ORDER, Color::White)?;
                    self.scan("Scan Workorder: ").await
                }
                State::FetchWorkOrderInfo { work_order } => {
                    self.show(FETCHING_WORK_ORDER, Color::Blue)?;
                    match self.api.work_order(&work_order).await {
                        Ok(info) => SequenceEvent::WorkOrderFetched(info),
                        Err(e) => SequenceEvent::Fail(e.into()),
                    }
                }
                State::AwaitSerialScan { .. } => {
                    self.show(PROMPT_SERIAL, Color::White)?;
                    self.scan("Scan Raw Material Serial Number: ").await
                }
                State::FetchSerialInfo { serial, .. } => {
                    self.show(FETCHING_SERIAL, Color::Blue)?;
                    match self.api.serial(&serial).await {
                        Ok(info) => SequenceEvent::SerialFetched(info),
                        Err(e) => SequenceEvent::Fail(e.into()),
                    }
                }
                State::VerifyPress { .. } | State::VerifyMaterial { .. } => SequenceEvent::Verify,
                State::Running { work_order } => {
                    return Ok(ActiveRun {
                        work_order,
                        started_at: Utc::now(),
                    });
                }
                State::Restart { reason } => return Err(reason),
            };

            machine.handle(&event);
        }
    }

    /// Wait for a scan, or for the reset button
    async fn scan(&mut self, prompt: &str) -> SequenceEvent {
        tokio::select! {
            scanned = self.scanner.scan(prompt) => match scanned {
                Ok(Some(value)) => SequenceEvent::Scanned(value),
                Ok(None) => SequenceEvent::Fail(ControllerError::InputClosed),
                Err(e) => SequenceEvent::Fail(e.into()),
            },
            _ = self.reset_watch.triggered() => SequenceEvent::Fail(ControllerError::ResetRequested),
        }
    }
}
