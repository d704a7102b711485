// Traits for dependency injection - the controller only talks to hardware through these

use async_trait::async_trait;
use std::time::Duration;

use crate::hardware::types::*;

/// RGB character display on the operator panel
pub trait Display {
    /// Show newline-delimited text with the given backlight colour
    fn show_text(&mut self, text: &str, color: Color, clear_first: bool) -> Result<(), HardwareError>;

    /// Set the backlight directly
    fn set_backlight(&mut self, rgb: Rgb) -> Result<(), HardwareError>;

    /// Blank the character area
    fn clear(&mut self) -> Result<(), HardwareError>;
}

/// Digital I/O on the station's GPIO header
pub trait Gpio {
    /// Claim the pins for their roles. Calling it again re-claims them.
    fn configure(&mut self, layout: &PinLayout) -> Result<(), HardwareError>;

    /// Read the level of an input (or the driven level of an output)
    fn read(&self, pin: u8) -> Result<Level, HardwareError>;

    /// Drive an output pin
    fn write(&mut self, pin: u8, level: Level) -> Result<(), HardwareError>;

    /// Register an edge callback on an input pin
    fn watch_edge(
        &mut self,
        pin: u8,
        edge: Edge,
        debounce: Option<Duration>,
    ) -> Result<EdgeWatch, HardwareError>;

    /// Give every claimed pin back to the system
    fn release(&mut self);
}

/// Operator input. Barcode scanners type like keyboards, one line per scan.
#[async_trait]
pub trait Scanner: Send {
    /// Wait for the next scan. `None` means the input stream is closed.
    async fn scan(&mut self, prompt: &str) -> Result<Option<String>, HardwareError>;
}
