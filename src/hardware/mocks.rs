// Mock hardware for testing - records every call, no side effects

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::hardware::traits::*;
use crate::hardware::types::*;

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    ShowText {
        text: String,
        color: Color,
        clear_first: bool,
    },
    SetBacklight(Rgb),
    Clear,
}

/// Mock display. Clones share the same call log.
#[derive(Debug, Clone, Default)]
pub struct MockDisplay {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<DisplayCall>> {
        self.calls.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<DisplayCall> {
        self.log().clone()
    }

    /// Every text shown, in order
    pub fn texts(&self) -> Vec<String> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                DisplayCall::ShowText { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_text(&self) -> Option<String> {
        self.texts().pop()
    }

    pub fn showed(&self, text: &str) -> bool {
        self.texts().iter().any(|t| t == text)
    }
}

impl Display for MockDisplay {
    fn show_text(&mut self, text: &str, color: Color, clear_first: bool) -> Result<(), HardwareError> {
        self.log().push(DisplayCall::ShowText {
            text: text.to_string(),
            color,
            clear_first,
        });
        Ok(())
    }

    fn set_backlight(&mut self, rgb: Rgb) -> Result<(), HardwareError> {
        self.log().push(DisplayCall::SetBacklight(rgb));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), HardwareError> {
        self.log().push(DisplayCall::Clear);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockGpioState {
    pub levels: HashMap<u8, Level>,
    /// Scripted reads per pin, consumed before falling back to `levels`
    pub scripted: HashMap<u8, VecDeque<Level>>,
    pub writes: Vec<(u8, Level)>,
    pub reads: Vec<u8>,
    pub configured: u32,
    pub released: u32,
    pub watchers: HashMap<u8, Vec<EdgeSender>>,
    pub fail_configure: bool,
}

/// Mock GPIO. Clones share state so tests can inspect after handing it over.
#[derive(Debug, Clone, Default)]
pub struct MockGpio {
    state: Arc<Mutex<MockGpioState>>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockGpioState> {
        self.state.lock().unwrap()
    }

    pub fn set_level(&self, pin: u8, level: Level) {
        self.state().levels.insert(pin, level);
    }

    pub fn script_reads(&self, pin: u8, levels: &[Level]) {
        self.state()
            .scripted
            .entry(pin)
            .or_default()
            .extend(levels.iter().copied());
    }

    pub fn writes_to(&self, pin: u8) -> Vec<Level> {
        self.state()
            .writes
            .iter()
            .filter(|(p, _)| *p == pin)
            .map(|(_, level)| *level)
            .collect()
    }

    pub fn reads_of(&self, pin: u8) -> usize {
        self.state().reads.iter().filter(|p| **p == pin).count()
    }

    /// Fire every edge watch registered on a pin
    pub fn trigger_edge(&self, pin: u8) {
        if let Some(senders) = self.state().watchers.get(&pin) {
            for tx in senders {
                tx.notify();
            }
        }
    }
}

impl Gpio for MockGpio {
    fn configure(&mut self, layout: &PinLayout) -> Result<(), HardwareError> {
        let mut state = self.state();
        if state.fail_configure {
            return Err(HardwareError::GpioUnavailable {
                message: "mock configure failure".to_string(),
            });
        }
        state.configured += 1;
        state.levels.entry(layout.reset_button).or_insert(Level::Low);
        state.levels.entry(layout.beam_sensor).or_insert(Level::Low);
        state.levels.insert(layout.relay, Level::Low);
        Ok(())
    }

    fn read(&self, pin: u8) -> Result<Level, HardwareError> {
        let mut state = self.state();
        state.reads.push(pin);
        if let Some(level) = state.scripted.get_mut(&pin).and_then(VecDeque::pop_front) {
            return Ok(level);
        }
        state
            .levels
            .get(&pin)
            .copied()
            .ok_or(HardwareError::PinNotConfigured { pin })
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), HardwareError> {
        let mut state = self.state();
        state.writes.push((pin, level));
        state.levels.insert(pin, level);
        Ok(())
    }

    fn watch_edge(
        &mut self,
        pin: u8,
        _edge: Edge,
        _debounce: Option<Duration>,
    ) -> Result<EdgeWatch, HardwareError> {
        let (tx, watch) = EdgeWatch::channel();
        self.state().watchers.entry(pin).or_default().push(tx);
        Ok(watch)
    }

    fn release(&mut self) {
        let mut state = self.state();
        state.released += 1;
        state.watchers.clear();
    }
}

/// Scanner fed from a fixed list of scans; closes when the list runs out
#[derive(Debug, Clone, Default)]
pub struct MockScanner {
    scans: Arc<Mutex<VecDeque<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockScanner {
    pub fn new(scans: &[&str]) -> Self {
        Self {
            scans: Arc::new(Mutex::new(scans.iter().map(|s| s.to_string()).collect())),
            prompts: Arc::default(),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.scans.lock().unwrap().len()
    }
}

#[async_trait]
impl Scanner for MockScanner {
    async fn scan(&mut self, prompt: &str) -> Result<Option<String>, HardwareError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.scans.lock().unwrap().pop_front())
    }
}

/// Scanner that never produces a scan, for tests that must block on input
#[derive(Debug, Default)]
pub struct PendingScanner;

#[async_trait]
impl Scanner for PendingScanner {
    async fn scan(&mut self, _prompt: &str) -> Result<Option<String>, HardwareError> {
        std::future::pending().await
    }
}
