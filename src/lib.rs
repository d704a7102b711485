// Loader Controller Library - press-side loader interlock
// Exposes the controller components for the binary and for integration tests

pub mod api;
pub mod cli;
pub mod config;
pub mod controller;
pub mod external;
pub mod hardware;
pub mod shutdown;
pub mod telemetry;

// Re-export key types for easy access
pub use api::{ApiError, HttpManufacturingApi, ManufacturingApi};
pub use config::LoaderConfig;
pub use controller::{ControllerError, Station, Supervisor, SupervisorAction};
pub use hardware::{Display, Gpio, HardwareError, Scanner};
pub use telemetry::{create_cycle_span, generate_correlation_id, init_telemetry};
