//! The loader station: the collaborators plus the operations the cycle is
//! built from (splash, relay control, recovery and shutdown).

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::ManufacturingApi;
use crate::config::LoaderConfig;
use crate::controller::error::ControllerError;
use crate::hardware::{debounce_for, Color, Display, EdgeWatch, Gpio, Level, Rgb, Scanner};

/// Everything one loader station owns for its lifetime
pub struct Station<D: Display, G: Gpio> {
    pub(crate) config: Arc<LoaderConfig>,
    pub(crate) display: D,
    pub(crate) gpio: G,
    pub(crate) scanner: Box<dyn Scanner>,
    pub(crate) api: Arc<dyn ManufacturingApi>,
    pub(crate) reset_watch: EdgeWatch,
    relay_energized: bool,
    acquired: bool,
}

impl<D: Display, G: Gpio> Station<D, G> {
    pub fn new(
        config: Arc<LoaderConfig>,
        display: D,
        gpio: G,
        scanner: Box<dyn Scanner>,
        api: Arc<dyn ManufacturingApi>,
    ) -> Self {
        Self {
            config,
            display,
            gpio,
            scanner,
            api,
            reset_watch: EdgeWatch::idle(),
            relay_energized: false,
            acquired: false,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    pub fn relay_energized(&self) -> bool {
        self.relay_energized
    }

    /// Claim the GPIO pins and, if enabled, arm the reset button.
    /// Safe to call again after `release`.
    pub fn acquire(&mut self) -> Result<(), ControllerError> {
        let config = Arc::clone(&self.config);
        self.gpio.configure(&config.pins)?;
        self.acquired = true;
        self.relay_energized = false;

        self.reset_watch = if config.features.reset_button {
            let mut watch = self.gpio.watch_edge(
                config.pins.reset_button,
                config.features.reset_edge,
                debounce_for(config.features.reset_debounce_ms),
            )?;
            watch.drain();
            watch
        } else {
            EdgeWatch::idle()
        };
        Ok(())
    }

    /// Hand the pins back. Outputs drop to their idle state.
    pub fn release(&mut self) {
        if self.acquired {
            debug!("GPIO cleanup");
            self.gpio.release();
            self.acquired = false;
        }
        self.relay_energized = false;
        self.reset_watch = EdgeWatch::idle();
    }

    pub fn show(&mut self, text: &str, color: Color) -> Result<(), ControllerError> {
        self.display.show_text(text, color, true)?;
        Ok(())
    }

    pub async fn splash(&mut self) -> Result<(), ControllerError> {
        let press = self.config.station.press_id.clone();
        info!(press = %press, "Starting Loader Controller Program");
        self.show(&format!("LOADER CONTROLLER\n\n\nPRESS {press}"), Color::White)?;
        tokio::time::sleep(Duration::from_millis(self.config.timings.splash_ms)).await;
        Ok(())
    }

    /// Energize the loader relay after the settle delay
    pub async fn start_loader(&mut self) -> Result<(), ControllerError> {
        info!("Energizing Loader");
        self.settle().await;
        self.gpio.write(self.config.pins.relay, Level::High)?;
        self.relay_energized = true;
        Ok(())
    }

    /// De-energize the loader relay after the settle delay
    pub async fn stop_loader(&mut self) -> Result<(), ControllerError> {
        info!("De-energizing Loader");
        self.settle().await;
        self.gpio.write(self.config.pins.relay, Level::Low)?;
        self.relay_energized = false;
        Ok(())
    }

    async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(self.config.timings.relay_settle_ms)).await;
    }

    /// Before the sequence: wait until something is plugged into the loader
    /// outlet. The beam reads high while the outlet is empty.
    pub async fn check_outlet(&mut self) -> Result<(), ControllerError> {
        let beam = self.config.pins.beam_sensor;
        if !self.gpio.read(beam)?.is_high() {
            return Ok(());
        }

        warn!(pin = beam, "Outlet IR beam is connected, nothing is plugged in");
        self.show("LOADER NOT FOUND!\n\nPlease check the\nLoader outlet", Color::Red)?;
        let poll = Duration::from_millis(self.config.timings.outlet_poll_ms);
        while self.gpio.read(beam)?.is_high() {
            tokio::time::sleep(poll).await;
        }
        info!(pin = beam, "Something is plugged into the loader outlet");
        Err(ControllerError::OutletRestored)
    }

    /// Wind a failed cycle down: relay off, show why, then give the pins back
    pub async fn recover(&mut self, reason: &ControllerError) {
        if self.relay_energized {
            if let Err(e) = self.stop_loader().await {
                warn!("Could not de-energize loader: {}", e);
            }
        }
        if let Some(notice) = reason.notice(&self.config.timings) {
            if let Err(e) = self.show(notice.text, notice.color) {
                warn!("Could not show notice: {}", e);
            }
            tokio::time::sleep(notice.hold).await;
        }
        self.release();
        info!("Restarting program");
    }

    /// Orderly exit: relay off, backlight off, panel cleared, pins released
    pub fn shutdown(&mut self) {
        info!("Exiting");
        if self.acquired {
            if let Err(e) = self.gpio.write(self.config.pins.relay, Level::Low) {
                warn!("Could not de-energize loader: {}", e);
            }
        }
        if let Err(e) = self.display.set_backlight(Rgb::OFF) {
            warn!("Could not switch backlight off: {}", e);
        }
        if let Err(e) = self.display.clear() {
            warn!("Could not clear display: {}", e);
        }
        self.release();
    }
}
