//! Commands run outside the controller process
//!
//! Everything here goes through [`CommandExecutor`], so callers can be tested
//! without touching the host.

pub mod command;
pub mod system;

pub use command::{CommandError, CommandExecutor, CommandOutput, ProcessCommandExecutor};
pub use system::{reboot_system, REBOOT_BANNER};
