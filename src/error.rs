// src/error.rs

//! # Error Types
//!
//! Errors raised while configuring the controller or talking to the vehicle.
//! Integral saturation is not an error; it is reported through
//! [`ControlOutput::saturated`](crate::ControlOutput::saturated).

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Failure on the telemetry or actuator channel.
#[derive(Debug, Error)]
pub enum CommunicationError {
    /// Underlying socket or transport error.
    #[error("vehicle link I/O error: {0}")]
    Io(#[from] io::Error),
    /// No reply arrived within the configured timeout.
    #[error("vehicle link timed out after {0:?}")]
    Timeout(Duration),
    /// A telemetry packet did not carry the expected number of values.
    #[error("malformed telemetry packet: expected {expected} values, got {actual}")]
    Malformed {
        /// Values required by the telemetry schema.
        expected: usize,
        /// Values actually received.
        actual: usize,
    },
    /// The collaborator is no longer reachable.
    #[error("vehicle link disconnected: {0}")]
    Disconnected(String),
}

impl CommunicationError {
    /// Maps socket errors, turning would-block and timed-out reads into [`CommunicationError::Timeout`].
    pub fn from_io(err: io::Error, timeout: Duration) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Self::Timeout(timeout),
            _ => Self::Io(err),
        }
    }
}

/// Invalid configuration detected before the control loop starts.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A gain or constant is NaN or infinite.
    #[error("`{name}` must be finite")]
    NonFinite {
        /// Name of the offending parameter.
        name: &'static str,
    },
    /// A duration or bound is zero or negative.
    #[error("`{name}` must be greater than zero")]
    NonPositive {
        /// Name of the offending parameter.
        name: &'static str,
    },
    /// A throttle value lies outside `0.0..=1.0`.
    #[error("`{name}` must lie within 0.0..=1.0, got {value}")]
    ThrottleOutOfRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The controller and the loop disagree on the tick duration.
    #[error("controller tick {controller}s does not match loop tick {control_loop}s")]
    TickMismatch {
        /// Tick the controller was configured with.
        controller: f64,
        /// Tick the loop runs at.
        control_loop: f64,
    },
    /// The settings file could not be read.
    #[error("unable to read settings: {0}")]
    Io(#[from] io::Error),
    /// The settings file is not valid JSON for [`Settings`](crate::Settings).
    #[error("unable to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Any error surfaced by the control loop.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Telemetry or actuator failure.
    #[error(transparent)]
    Communication(#[from] CommunicationError),
    /// Rejected configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
