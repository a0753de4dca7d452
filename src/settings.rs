// src/settings.rs

//! # Settings
//!
//! The user-facing configuration surface, loadable from JSON. Every field has a
//! default, so a file only needs the values it changes. Defaults reproduce the
//! reference tuning: hold 10 m with `kp = 0.4`, `kd = 10.0`, `ki = 0.03`, a 1 ms
//! tick and an integral radius of 2.
//!
//! ```
//! use altitude_hold::{CommandMode, Settings};
//!
//! let settings = Settings::from_json(
//!     r#"{
//!         "target_altitude": 5.0,
//!         "command_mode": { "mode": "closed_loop", "base_throttle": 0.55 }
//!     }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(5.0, settings.target_altitude);
//! assert_eq!(0.4, settings.kp);
//! assert_eq!(CommandMode::ClosedLoop { base_throttle: 0.55 }, settings.command_mode);
//! ```

use crate::{CommandMode, ConfigurationError, ConstantSetpoint, ControllerConfig, LoopConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Full configuration for an altitude hold run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Altitude to hold, metres above the origin.
    pub target_altitude: f64,
    /// Proportional gain.
    pub kp: f64,
    /// Derivative gain.
    pub kd: f64,
    /// Integral gain.
    pub ki: f64,
    /// Tick duration in seconds.
    pub tick: f64,
    /// Leaky integrator time constant in seconds.
    pub integral_time_constant: f64,
    /// Bound on the integral accumulator.
    pub integral_radius: f64,
    /// How the PID command reaches the motors.
    pub command_mode: CommandMode,
    /// Throttle sent on shutdown and on failed ticks.
    pub safe_throttle: f64,
    /// Optional tick budget.
    pub max_ticks: Option<u64>,
    /// Pace ticks to wall-clock time.
    pub realtime: bool,
    /// Simulator connection.
    pub link: LinkSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_altitude: 10.0,
            kp: 0.4,
            kd: 10.0,
            ki: 0.03,
            tick: 0.001,
            integral_time_constant: 0.1,
            integral_radius: 2.0,
            command_mode: CommandMode::default(),
            safe_throttle: 0.0,
            max_ticks: None,
            realtime: false,
            link: LinkSettings::default(),
        }
    }
}

impl Settings {
    /// Parses and validates settings from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigurationError> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        log::debug!("Loading settings from {}", path.display());
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Checks every value the control loop depends on.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.target_altitude.is_finite() {
            return Err(ConfigurationError::NonFinite {
                name: "target_altitude",
            });
        }
        self.controller_config().validate()?;
        self.loop_config().validate()?;
        if self.link.timeout_ms == 0 {
            return Err(ConfigurationError::NonPositive {
                name: "link.timeout_ms",
            });
        }
        Ok(())
    }

    /// Controller gains and timing.
    pub fn controller_config(&self) -> ControllerConfig<f64> {
        ControllerConfig {
            kp: self.kp,
            ki: self.ki,
            kd: self.kd,
            tick: self.tick,
            integral_time_constant: self.integral_time_constant,
            integral_radius: self.integral_radius,
        }
    }

    /// Loop timing and actuation options.
    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            tick: self.tick,
            command_mode: self.command_mode,
            safe_throttle: self.safe_throttle,
            max_ticks: self.max_ticks,
            realtime: self.realtime,
        }
    }

    /// Generator for the configured target.
    pub fn set_point(&self) -> ConstantSetpoint<f64> {
        ConstantSetpoint(self.target_altitude)
    }
}

/// Where the simulator listens and where telemetry arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkSettings {
    /// Simulator host, the destination of motor datagrams.
    pub host: String,
    /// Local address the telemetry socket binds to.
    pub bind_host: String,
    /// Port the simulator reads motor commands on.
    pub motor_port: u16,
    /// Local port telemetry is received on.
    pub telemetry_port: u16,
    /// Telemetry read timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            bind_host: "0.0.0.0".into(),
            motor_port: 5000,
            telemetry_port: 5001,
            timeout_ms: 1000,
        }
    }
}

impl LinkSettings {
    /// Telemetry read timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
