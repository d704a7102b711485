// Value types shared by the display, GPIO and scanner collaborators

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Backlight colours the controller uses for operator messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    White,
    Off,
}

impl Color {
    /// Resolve a colour by name. Unknown names switch the backlight off.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "red" => Color::Red,
            "green" => Color::Green,
            "blue" => Color::Blue,
            "white" => Color::White,
            _ => Color::Off,
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            Color::Red => Rgb::new(1.0, 0.0, 0.0),
            Color::Green => Rgb::new(0.0, 1.0, 0.0),
            Color::Blue => Rgb::new(0.0, 0.0, 1.0),
            Color::White => Rgb::new(1.0, 1.0, 1.0),
            Color::Off => Rgb::OFF,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::White => "white",
            Color::Off => "off",
        };
        f.write_str(name)
    }
}

/// Backlight intensity per channel, 0.0 to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Rgb {
    pub const OFF: Rgb = Rgb {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
    };

    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }
}

/// Logic level of a digital pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => f.write_str("low"),
            Level::High => f.write_str("high"),
        }
    }
}

/// Signal edge that fires an edge watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Rising,
    Falling,
    Both,
}

/// BCM pin assignment for the three roles the station wires up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinLayout {
    /// Input with pull-down, manual restart button
    pub reset_button: u8,
    /// Input with pull-up, loader outlet IR beam
    pub beam_sensor: u8,
    /// Output, solid state relay, starts low
    pub relay: u8,
}

impl Default for PinLayout {
    fn default() -> Self {
        Self {
            reset_button: 18,
            beam_sensor: 23,
            relay: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HardwareError {
    #[error("GPIO unavailable: {message}")]
    GpioUnavailable { message: String },
    #[error("pin {pin} is not configured")]
    PinNotConfigured { pin: u8 },
    #[error("display error: {message}")]
    Display { message: String },
    #[error("scanner error: {message}")]
    Scanner { message: String },
}

/// Sending half of an edge watch, handed to the interrupt source
#[derive(Debug, Clone)]
pub struct EdgeSender {
    tx: mpsc::UnboundedSender<()>,
}

impl EdgeSender {
    /// Report an edge. Returns false once the watch has been dropped.
    pub fn notify(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

/// Receiving half of an edge callback registration
#[derive(Debug)]
pub struct EdgeWatch {
    rx: Option<mpsc::UnboundedReceiver<()>>,
}

impl EdgeWatch {
    pub fn channel() -> (EdgeSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EdgeSender { tx }, Self { rx: Some(rx) })
    }

    /// A watch that never fires
    pub fn idle() -> Self {
        Self { rx: None }
    }

    /// Wait for the next edge. Pends forever once the source is gone.
    pub async fn triggered(&mut self) {
        let closed = match self.rx.as_mut() {
            Some(rx) => {
                if rx.recv().await.is_some() {
                    return;
                }
                true
            }
            None => false,
        };
        if closed {
            self.rx = None;
        }
        std::future::pending::<()>().await
    }

    /// Drop any edges that arrived while nobody was waiting
    pub fn drain(&mut self) {
        if let Some(rx) = self.rx.as_mut() {
            while rx.try_recv().is_ok() {}
        }
    }
}

/// Debounce window passed to edge registrations
pub fn debounce_for(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
