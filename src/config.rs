//! config.rs
//! Simulation tunables, with default-if-zero semantics: a field explicitly
//! set to zero in the TOML document falls back to its documented default,
//! not to zero (`#[serde(default)]` alone only covers *missing* fields).
//!
//! Grounded in `sairen-os`'s TOML-backed config loading style.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    pub tick_interval_ms: u64,
    pub base_temp: f64,
    pub fission_rate_minute: f64,
    pub turbine_output_rate_minute: f64,
    pub turbine_thermal_rate_minute: f64,
    pub turbine_drag: f64,
    pub conduction_rate_minute: f64,
    pub containment_transfer_rate_minute: f64,
    pub pump_transfer_rate_minute: f64,
    pub control_rod_adjustment_ms: u64,
    pub pump_throttle_adjustment_ms: u64,
    pub scripts: HashMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: 250,
            base_temp: 10.0,
            fission_rate_minute: 16384.0,
            turbine_output_rate_minute: 512.0,
            turbine_thermal_rate_minute: 16.0,
            turbine_drag: 0.33,
            conduction_rate_minute: 512.0,
            containment_transfer_rate_minute: 512.0,
            pump_transfer_rate_minute: 512.0,
            control_rod_adjustment_ms: 10_000,
            pump_throttle_adjustment_ms: 5_000,
            scripts: default_scripts(),
        }
    }
}

impl Config {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn control_rod_adjustment(&self) -> Duration {
        Duration::from_millis(self.control_rod_adjustment_ms)
    }

    pub fn pump_throttle_adjustment(&self) -> Duration {
        Duration::from_millis(self.pump_throttle_adjustment_ms)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let mut cfg: Config = toml::from_str(s)?;
        cfg.normalize();
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Replace any explicit-zero numeric field with its documented default.
    fn normalize(&mut self) {
        let defaults = Config::default();
        if self.tick_interval_ms == 0 {
            self.tick_interval_ms = defaults.tick_interval_ms;
        }
        if self.base_temp == 0.0 {
            self.base_temp = defaults.base_temp;
        }
        if self.fission_rate_minute == 0.0 {
            self.fission_rate_minute = defaults.fission_rate_minute;
        }
        if self.turbine_output_rate_minute == 0.0 {
            self.turbine_output_rate_minute = defaults.turbine_output_rate_minute;
        }
        if self.turbine_thermal_rate_minute == 0.0 {
            self.turbine_thermal_rate_minute = defaults.turbine_thermal_rate_minute;
        }
        if self.turbine_drag == 0.0 {
            self.turbine_drag = defaults.turbine_drag;
        }
        if self.conduction_rate_minute == 0.0 {
            self.conduction_rate_minute = defaults.conduction_rate_minute;
        }
        if self.containment_transfer_rate_minute == 0.0 {
            self.containment_transfer_rate_minute = defaults.containment_transfer_rate_minute;
        }
        if self.pump_transfer_rate_minute == 0.0 {
            self.pump_transfer_rate_minute = defaults.pump_transfer_rate_minute;
        }
        if self.control_rod_adjustment_ms == 0 {
            self.control_rod_adjustment_ms = defaults.control_rod_adjustment_ms;
        }
        if self.pump_throttle_adjustment_ms == 0 {
            self.pump_throttle_adjustment_ms = defaults.pump_throttle_adjustment_ms;
        }
        if self.scripts.is_empty() {
            self.scripts = defaults.scripts;
        }
    }
}

fn default_scripts() -> HashMap<String, Vec<String>> {
    let mut scripts = HashMap::new();
    scripts.insert(
        "scram".to_string(),
        vec![
            "notice SCRAM commanded".to_string(),
            "cr * 255".to_string(),
            "pp 255".to_string(),
            "sp 255".to_string(),
            "notice scram initiated".to_string(),
        ],
    );
    scripts.insert("az5".to_string(), vec!["scram".to_string()]);
    scripts.insert(
        "base".to_string(),
        vec![
            "cr * 135".to_string(),
            "pp 255".to_string(),
            "sp 255".to_string(),
            "notice base load commanded".to_string(),
        ],
    );
    scripts.insert(
        "full".to_string(),
        vec![
            "cr * 0".to_string(),
            "pp 255".to_string(),
            "sp 255".to_string(),
            "notice full load commanded".to_string(),
        ],
    );
    scripts.insert(
        "fail".to_string(),
        vec![
            "cr * 0".to_string(),
            "pp 0".to_string(),
            "sp 0".to_string(),
            "notice simulated failure commanded".to_string(),
        ],
    );
    scripts
}
