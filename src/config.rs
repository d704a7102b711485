use anyhow::{bail, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::hardware::{Edge, Level, PinLayout};

/// System-wide configuration file, installed with the station image
pub const SYSTEM_CONFIG_PATH: &str = "/etc/loader-controller/loader-controller.toml";
/// Configuration file next to the working directory
pub const LOCAL_CONFIG_PATH: &str = "loader-controller.toml";
pub const ENV_PREFIX: &str = "LOADER_CONTROLLER";

/// Main configuration structure for the loader controller
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoaderConfig {
    /// Station identity
    pub station: StationConfig,
    /// Manufacturing API settings
    pub api: ApiConfig,
    /// BCM pin assignment
    pub pins: PinLayout,
    /// Run-mode monitor settings
    pub monitor: MonitorConfig,
    /// Operator-facing delays
    pub timings: TimingConfig,
    /// Optional behaviours
    pub features: FeatureConfig,
    /// Character display geometry
    pub display: DisplayConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationConfig {
    /// Press this loader feeds. It does not change for a station.
    pub press_id: String,
    /// Console tracing at debug level and echoed scan prompts
    pub debug: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base address of the work order service
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

/// Which input the run-mode monitor polls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorSource {
    BeamSensor,
    ResetButton,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// Length of one monitor tick
    pub tick_ms: u64,
    /// Poll the sensor every this many ticks
    pub sensor_check_ticks: u32,
    /// Re-check the work order every this many ticks
    pub api_check_ticks: u32,
    /// Input polled for anomalies
    pub sensor: SensorSource,
    /// Level that counts as an anomaly while the loader runs
    pub anomaly_level: Level,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimingConfig {
    /// Start-up banner
    pub splash_ms: u64,
    /// Pause before the relay changes state
    pub relay_settle_ms: u64,
    /// Network failure message
    pub network_failure_hold_ms: u64,
    /// Rejection and mismatch messages
    pub rejection_hold_ms: u64,
    /// Reset button message
    pub reset_hold_ms: u64,
    /// Beam polling while waiting for the loader to be plugged in
    pub outlet_poll_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureConfig {
    /// Refuse to start until something is plugged into the loader outlet
    pub outlet_check: bool,
    /// Restart when the reset button fires
    pub reset_button: bool,
    /// Edge that counts as a button press
    pub reset_edge: Edge,
    pub reset_debounce_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub columns: usize,
    pub rows: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level when debug is off
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            station: StationConfig {
                press_id: "136".to_string(),
                debug: true,
            },
            api: ApiConfig {
                base_url: "http://10.130.0.42".to_string(),
                timeout_secs: 10,
            },
            pins: PinLayout::default(),
            monitor: MonitorConfig {
                tick_ms: 1000,
                sensor_check_ticks: 10, // 10 seconds
                api_check_ticks: 300,   // 5 minutes
                sensor: SensorSource::BeamSensor,
                anomaly_level: Level::High,
            },
            timings: TimingConfig {
                splash_ms: 1000,
                relay_settle_ms: 500,
                network_failure_hold_ms: 5000,
                rejection_hold_ms: 2000,
                reset_hold_ms: 1000,
                outlet_poll_ms: 1000,
            },
            features: FeatureConfig {
                // Both off: the outlet sensor picks up EMI on the press floor
                outlet_check: false,
                reset_button: false,
                reset_edge: Edge::Falling,
                reset_debounce_ms: 300,
            },
            display: DisplayConfig { columns: 20, rows: 4 },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json: false,
            },
        }
    }
}

impl MonitorConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn sensor_pin(&self, pins: &PinLayout) -> u8 {
        match self.sensor {
            SensorSource::BeamSensor => pins.beam_sensor,
            SensorSource::ResetButton => pins.reset_button,
        }
    }
}

impl LoaderConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. System configuration file
    /// 3. Local configuration file
    /// 4. Environment variables (prefixed with LOADER_CONTROLLER_)
    pub fn load() -> Result<Self> {
        let files: Vec<PathBuf> = [SYSTEM_CONFIG_PATH, LOCAL_CONFIG_PATH]
            .into_iter()
            .map(PathBuf::from)
            .filter(|path| path.exists())
            .collect();
        Self::load_from(&files)
    }

    /// Layer the given files over the defaults, then the environment
    pub fn load_from(files: &[PathBuf]) -> Result<Self> {
        Self::load_layers(files, Self::environment())
    }

    /// Values stay strings; the deserializer converts numeric and boolean
    /// fields, so ids like `0136` are kept verbatim
    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }

    fn load_layers(files: &[PathBuf], environment: Environment) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        for path in files {
            builder = builder.add_source(File::from(path.as_path()));
        }

        builder = builder.add_source(environment);

        let config: LoaderConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.station.press_id.trim().is_empty() {
            bail!("station.press_id must not be empty");
        }
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be greater than zero");
        }
        if self.monitor.tick_ms == 0 {
            bail!("monitor.tick_ms must be greater than zero");
        }
        if self.monitor.sensor_check_ticks == 0 || self.monitor.api_check_ticks == 0 {
            bail!("monitor check intervals must be at least one tick");
        }
        if self.display.columns == 0 || self.display.rows == 0 {
            bail!("display must have at least one row and column");
        }
        let pins = self.pins;
        if pins.reset_button == pins.beam_sensor
            || pins.reset_button == pins.relay
            || pins.beam_sensor == pins.relay
        {
            bail!("pins must be distinct, got {pins:?}");
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Load .env file if it exists. Runs before logging is set up, so the
    /// caller reports whether anything was loaded.
    pub fn load_env_file() -> Result<bool> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_station_wiring() {
        let config = LoaderConfig::default();
        assert_eq!(config.station.press_id, "136");
        assert_eq!(config.pins.reset_button, 18);
        assert_eq!(config.pins.beam_sensor, 23);
        assert_eq!(config.pins.relay, 24);
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.monitor.sensor_pin(&config.pins), 23);
        config.validate().unwrap();
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[station]\npress_id = \"137\"\n\n[monitor]\nsensor = \"reset_button\"\nanomaly_level = \"low\""
        )
        .unwrap();

        let config = LoaderConfig::load_from(&[file.path().to_path_buf()]).unwrap();
        assert_eq!(config.station.press_id, "137");
        assert!(config.station.debug);
        assert_eq!(config.monitor.sensor, SensorSource::ResetButton);
        assert_eq!(config.monitor.anomaly_level, Level::Low);
        assert_eq!(config.monitor.sensor_pin(&config.pins), 18);
        assert_eq!(config.api.base_url, "http://10.130.0.42");
    }

    #[test]
    fn test_validation_rejects_pin_collision() {
        let mut config = LoaderConfig::default();
        config.pins.relay = config.pins.beam_sensor;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_api_timeout() {
        let mut config = LoaderConfig::default();
        config.api.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_env_values_are_not_reparsed() {
        let vars: config::Map<String, String> = [
            ("LOADER_CONTROLLER_STATION__PRESS_ID", "0136"),
            ("LOADER_CONTROLLER_MONITOR__TICK_MS", "250"),
            ("LOADER_CONTROLLER_STATION__DEBUG", "false"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config =
            LoaderConfig::load_layers(&[], LoaderConfig::environment().source(Some(vars))).unwrap();
        assert_eq!(config.station.press_id, "0136");
        assert_eq!(config.monitor.tick_ms, 250);
        assert!(!config.station.debug);
    }

    #[test]
    fn test_validation_rejects_empty_press() {
        let mut config = LoaderConfig::default();
        config.station.press_id = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trips_through_loader() {
        let mut config = LoaderConfig::default();
        config.timings.rejection_hold_ms = 750;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("station.toml");
        config.save_to_file(&path).unwrap();

        let loaded = LoaderConfig::load_from(&[path]).unwrap();
        assert_eq!(loaded.timings.rejection_hold_ms, 750);
        assert_eq!(loaded.features.reset_edge, Edge::Falling);
    }
}
