// Validation sequence as a state machine. Pure: no I/O, the driver in
// `sequence.rs` performs the lookups and feeds the results back as events.

use statig::prelude::*;

use crate::api::{SerialInfo, WorkOrderInfo};
use crate::controller::error::ControllerError;

/// Qualifier printed in front of every raw material serial barcode
pub const SERIAL_QUALIFIER: char = 'S';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceEvent {
    /// Operator scanned a barcode
    Scanned(String),
    WorkOrderFetched(WorkOrderInfo),
    SerialFetched(SerialInfo),
    /// Run the comparison for the current verify state
    Verify,
    /// A lookup, the hardware or the running loader failed; the cycle is over
    Fail(ControllerError),
}

/// Context: the one thing every check compares against
#[derive(Debug, Clone)]
pub struct LoaderSequence {
    press_id: String,
}

impl LoaderSequence {
    pub fn new(press_id: impl Into<String>) -> Self {
        Self {
            press_id: press_id.into(),
        }
    }

    pub fn press_id(&self) -> &str {
        &self.press_id
    }
}

#[state_machine(
    initial = "State::await_work_order_scan()",
    state(derive(Debug, Clone, PartialEq, Eq)),
    visibility = "pub"
)]
impl LoaderSequence {
    #[state(superstate = "validating")]
    fn await_work_order_scan(event: &SequenceEvent) -> Outcome<State> {
        match event {
            SequenceEvent::Scanned(work_order) => {
                tracing::debug!(work_order = %work_order, "Scanned work order");
                Transition(State::fetch_work_order_info(work_order.clone()))
            }
            _ => Super,
        }
    }

    #[state(superstate = "validating")]
    fn fetch_work_order_info(work_order: &String, event: &SequenceEvent) -> Outcome<State> {
        match event {
            SequenceEvent::WorkOrderFetched(info) => {
                tracing::debug!(
                    work_order = %work_order,
                    press = %info.press,
                    rmat = %info.raw_material,
                    "Work order information received"
                );
                Transition(State::verify_press(
                    work_order.clone(),
                    info.press.clone(),
                    info.raw_material.clone(),
                ))
            }
            _ => Super,
        }
    }

    #[state(superstate = "validating")]
    fn verify_press(
        &mut self,
        work_order: &String,
        press: &String,
        raw_material: &String,
        event: &SequenceEvent,
    ) -> Outcome<State> {
        match event {
            SequenceEvent::Verify if *press == self.press_id => {
                tracing::debug!(
                    work_order = %work_order,
                    press = %self.press_id,
                    "Work order is running on this press"
                );
                Transition(State::await_serial_scan(work_order.clone(), raw_material.clone()))
            }
            SequenceEvent::Verify => {
                tracing::warn!(
                    work_order = %work_order,
                    work_order_press = %press,
                    press = %self.press_id,
                    "Incorrect work order"
                );
                Transition(State::restart(ControllerError::WrongPress {
                    expected: self.press_id.clone(),
                    actual: press.clone(),
                }))
            }
            _ => Super,
        }
    }

    #[state(superstate = "validating")]
    fn await_serial_scan(work_order: &String, raw_material: &String, event: &SequenceEvent) -> Outcome<State> {
        match event {
            SequenceEvent::Scanned(scanned) => match scanned.strip_prefix(SERIAL_QUALIFIER) {
                Some(serial) => {
                    tracing::debug!(serial = %serial, "Serial number from label");
                    Transition(State::fetch_serial_info(
                        work_order.clone(),
                        raw_material.clone(),
                        serial.to_string(),
                    ))
                }
                None => {
                    tracing::warn!(scanned = %scanned, "Not a serial number, missing qualifier");
                    Transition(State::restart(ControllerError::InvalidSerialFormat {
                        scanned: scanned.clone(),
                    }))
                }
            },
            _ => Super,
        }
    }

    #[state(superstate = "validating")]
    fn fetch_serial_info(
        work_order: &String,
        raw_material: &String,
        serial: &String,
        event: &SequenceEvent,
    ) -> Outcome<State> {
        match event {
            SequenceEvent::SerialFetched(info) => {
                tracing::debug!(serial = %serial, rmat = %info.item_number, "Serial information received");
                Transition(State::verify_material(
                    work_order.clone(),
                    raw_material.clone(),
                    info.item_number.clone(),
                ))
            }
            _ => Super,
        }
    }

    #[state(superstate = "validating")]
    fn verify_material(
        work_order: &String,
        raw_material: &String,
        serial_material: &String,
        event: &SequenceEvent,
    ) -> Outcome<State> {
        match event {
            SequenceEvent::Verify if raw_material == serial_material => {
                tracing::info!(work_order = %work_order, rmat = %raw_material, "Material matches work order");
                Transition(State::running(work_order.clone()))
            }
            SequenceEvent::Verify => {
                tracing::warn!(
                    expected = %raw_material,
                    actual = %serial_material,
                    "Invalid material"
                );
                Transition(State::restart(ControllerError::WrongMaterial {
                    expected: raw_material.clone(),
                    actual: serial_material.clone(),
                }))
            }
            _ => Super,
        }
    }

    /// Loader energized; the monitor reports why it stopped as a failure
    #[state(superstate = "validating")]
    fn running(work_order: &String, event: &SequenceEvent) -> Outcome<State> {
        if let SequenceEvent::Fail(reason) = event {
            tracing::info!(work_order = %work_order, reason = %reason, "Loader run ended");
        }
        Super
    }

    /// Terminal for the cycle. The next cycle starts from a fresh machine.
    #[state]
    fn restart(reason: &ControllerError, event: &SequenceEvent) -> Outcome<State> {
        tracing::debug!(reason = %reason, ?event, "Cycle is over, event ignored");
        Handled
    }

    #[superstate]
    fn validating(event: &SequenceEvent) -> Outcome<State> {
        match event {
            SequenceEvent::Fail(reason) => Transition(State::restart(reason.clone())),
            _ => Handled,
        }
    }
}

impl State {
    /// Why the cycle ended, once it has
    pub fn restart_reason(&self) -> Option<&ControllerError> {
        match self {
            State::Restart { reason } => Some(reason),
            _ => None,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            State::AwaitWorkOrderScan { .. } => "AwaitWorkOrderScan",
            State::FetchWorkOrderInfo { .. } => "FetchWorkOrderInfo",
            State::VerifyPress { .. } => "VerifyPress",
            State::AwaitSerialScan { .. } => "AwaitSerialScan",
            State::FetchSerialInfo { .. } => "FetchSerialInfo",
            State::VerifyMaterial { .. } => "VerifyMaterial",
            State::Running { .. } => "Running",
            State::Restart { .. } => "Restart",
        }
    }
}
