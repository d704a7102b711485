//! Loader control
//!
//! [`state_machine`] decides what comes next from what has been scanned and
//! looked up. [`Station`] owns the collaborators and performs the I/O each
//! state asks for, and [`Supervisor`] restarts the cycle until the operator
//! stops it.

pub mod error;
pub mod monitor;
pub mod sequence;
pub mod state_machine;
pub mod station;
pub mod supervisor;


pub use error::{ControllerError, Notice, SupervisorAction};
pub use monitor::{MonitorClock, TickChecks};
pub use sequence::{running_banner, ActiveRun};
pub use state_machine::{LoaderSequence, SequenceEvent, SERIAL_QUALIFIER};
pub use station::Station;
pub use supervisor::{Supervisor, SupervisorReport};
