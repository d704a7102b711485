//! Hardware collaborators
//!
//! The controller reaches the operator panel, the GPIO header and the barcode
//! scanner only through the traits in [`traits`], so the control sequence can
//! be exercised with mocks and run on a bench without a Pi attached.

pub mod console;
pub mod scanner;
pub mod simulated;
pub mod traits;
pub mod types;

#[cfg(feature = "rpi")]
pub mod rpi;

#[cfg(test)]
pub mod mocks;

pub use console::ConsoleDisplay;
pub use scanner::StdinScanner;
pub use simulated::SimulatedGpio;
pub use traits::{Display, Gpio, Scanner};
pub use types::{debounce_for, Color, Edge, EdgeWatch, HardwareError, Level, PinLayout, Rgb};

#[cfg(feature = "rpi")]
pub use rpi::RppalGpio;

/// GPIO backend for this build
#[cfg(feature = "rpi")]
pub type PlatformGpio = RppalGpio;

/// GPIO backend for this build
#[cfg(not(feature = "rpi"))]
pub type PlatformGpio = SimulatedGpio;

pub fn platform_gpio() -> PlatformGpio {
    PlatformGpio::new()
}
