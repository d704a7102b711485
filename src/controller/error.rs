// Everything that ends a loader cycle, and what the supervisor does about it

use std::time::Duration;
use thiserror::Error;

use crate::api::{ApiError, Endpoint};
use crate::config::TimingConfig;
use crate::hardware::{Color, HardwareError, Level};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// The API could not be reached or its answer could not be read
    #[error("manufacturing API unavailable: {source}")]
    Network { source: ApiError },
    /// The API answered with its error flag set
    #[error("{endpoint} lookup for `{id}` was rejected")]
    Rejected { endpoint: Endpoint, id: String },
    #[error("`{scanned}` is not a serial number (missing `S` qualifier)")]
    InvalidSerialFormat { scanned: String },
    #[error("work order is for press {actual}, this is press {expected}")]
    WrongPress { expected: String, actual: String },
    #[error("material {actual} does not match work order material {expected}")]
    WrongMaterial { expected: String, actual: String },
    #[error("press switched from work order {scanned} to {current}")]
    WorkOrderReassigned { scanned: String, current: String },
    #[error("sensor on pin {pin} read {level} while the loader was running")]
    SensorAnomaly { pin: u8, level: Level },
    #[error("reset button pressed")]
    ResetRequested,
    #[error("loader outlet occupied again")]
    OutletRestored,
    #[error(transparent)]
    Hardware(#[from] HardwareError),
    #[error("operator input closed")]
    InputClosed,
    #[error("interrupted by operator")]
    Interrupted,
}

impl From<ApiError> for ControllerError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected { endpoint, id } => ControllerError::Rejected { endpoint, id },
            source => ControllerError::Network { source },
        }
    }
}

/// What the supervisor does once a cycle has ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorAction {
    /// Release the hardware and start over from the work order scan
    Restart,
    /// Relay off, panel dark, hardware released, exit 0
    Shutdown,
}

/// Operator message shown while a cycle winds down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: &'static str,
    pub color: Color,
    pub hold: Duration,
}

impl Notice {
    fn new(text: &'static str, color: Color, hold_ms: u64) -> Self {
        Self {
            text,
            color,
            hold: Duration::from_millis(hold_ms),
        }
    }
}

pub const NETWORK_FAILURE: &str = "NETWORK FAILURE\nIf this persists\ncontact TPI IT Dept.\nRestarting...";
pub const INVALID_WORK_ORDER: &str = "INVALID WORKORDER!";
pub const INVALID_SERIAL: &str = "INVALID SERIAL\nNUMBER!";
pub const WORK_ORDER_CHANGED: &str = "WORKORDER CHANGED!\n\nRESTARTING";
pub const NOT_A_SERIAL: &str = "NOT A VALID\nSERIAL NUMBER!";
pub const INCORRECT_WORK_ORDER: &str = "INCORRECT\nWORKORDER!";
pub const INCORRECT_MATERIAL: &str = "INCORRECT\nMATERIAL!";
pub const PALLET_MOVED: &str = "PALLET MOVED!\n\nRESTARTING";
pub const RESETTING: &str = "RESETTING\nLOADER\nCONTROLLER";
pub const HARDWARE_FAULT: &str = "HARDWARE FAULT\n\nRestarting...";

impl ControllerError {
    pub fn action(&self) -> SupervisorAction {
        match self {
            ControllerError::Interrupted | ControllerError::InputClosed => SupervisorAction::Shutdown,
            ControllerError::Network { .. }
            | ControllerError::Rejected { .. }
            | ControllerError::InvalidSerialFormat { .. }
            | ControllerError::WrongPress { .. }
            | ControllerError::WrongMaterial { .. }
            | ControllerError::WorkOrderReassigned { .. }
            | ControllerError::SensorAnomaly { .. }
            | ControllerError::ResetRequested
            | ControllerError::OutletRestored
            | ControllerError::Hardware(_) => SupervisorAction::Restart,
        }
    }

    /// Message for the panel before restarting, if any
    pub fn notice(&self, timings: &TimingConfig) -> Option<Notice> {
        let rejection = timings.rejection_hold_ms;
        let notice = match self {
            ControllerError::Network { .. } => {
                Notice::new(NETWORK_FAILURE, Color::Red, timings.network_failure_hold_ms)
            }
            ControllerError::Rejected { endpoint, .. } => match endpoint {
                Endpoint::WorkOrder => Notice::new(INVALID_WORK_ORDER, Color::Red, rejection),
                Endpoint::Serial => Notice::new(INVALID_SERIAL, Color::Red, rejection),
                Endpoint::WorkOrderMonitor => Notice::new(WORK_ORDER_CHANGED, Color::Red, rejection),
            },
            ControllerError::InvalidSerialFormat { .. } => Notice::new(NOT_A_SERIAL, Color::Red, rejection),
            ControllerError::WrongPress { .. } => Notice::new(INCORRECT_WORK_ORDER, Color::Red, rejection),
            ControllerError::WrongMaterial { .. } => Notice::new(INCORRECT_MATERIAL, Color::Red, rejection),
            ControllerError::WorkOrderReassigned { .. } => {
                Notice::new(WORK_ORDER_CHANGED, Color::Red, rejection)
            }
            ControllerError::SensorAnomaly { .. } => Notice::new(PALLET_MOVED, Color::Red, rejection),
            ControllerError::ResetRequested => Notice::new(RESETTING, Color::White, timings.reset_hold_ms),
            // Hardware faults also back off so a dead bus does not spin the loop
            ControllerError::Hardware(_) => {
                Notice::new(HARDWARE_FAULT, Color::Red, timings.network_failure_hold_ms)
            }
            ControllerError::OutletRestored
            | ControllerError::InputClosed
            | ControllerError::Interrupted => return None,
        };
        Some(notice)
    }
}
