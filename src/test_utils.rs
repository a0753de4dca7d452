// src/test_utils.rs

//! This module contains utilities for testing.

use crate::vehicle::{ActuatorSink, MotorCommand, TelemetrySource, VehicleState};
use crate::CommunicationError;

/// A constant defining the tolerance within which floating-point values
/// are considered close enough to be equal.
pub const TEST_TOLERANCE: f64 = 1e-9;

/// Checks if two floating point numbers are close enough to be considered
/// equal.
///
/// # Arguments
/// * `target` - The target value.
/// * `value` - The value to compare against the target.
///
/// # Returns
/// `true` if the absolute difference between `target` and `value` is less than
/// `TEST_TOLERANCE`, otherwise `false`.
pub fn value_close(target: f64, value: f64) -> bool {
    (target - value).abs() < TEST_TOLERANCE
}

/// Checks if two floating point numbers are not close enough to be
/// considered equal.
///
/// # Arguments
/// * `target` - The target value.
/// * `value` - The value to compare against the target.
///
/// # Returns
/// `true` if the absolute difference between `target` and `value` exceeds
/// `TEST_TOLERANCE`, otherwise `false`.
pub fn value_not_close(target: f64, value: f64) -> bool {
    TEST_TOLERANCE <= (target - value).abs()
}

/// Checks if every channel of a motor command is close to `target`.
pub fn motors_close(target: f64, command: &MotorCommand) -> bool {
    command.channels().iter().all(|&value| value_close(target, value))
}

/// Builds a telemetry snapshot at the given altitude and climb rate.
pub fn state_at(altitude: f64, climb_rate: f64) -> VehicleState {
    let mut state = VehicleState::default();
    state.position[2] = -altitude;
    state.velocity[2] = -climb_rate;
    state
}

/// Vehicle link that replays telemetry and records every motor command.
#[derive(Debug, Default)]
pub struct ScriptedLink {
    /// Telemetry returned by successive reads; the last entry is held once exhausted.
    pub states: Vec<VehicleState>,
    /// Number of reads served so far.
    pub reads: usize,
    /// Every command sent, in order.
    pub sent: Vec<MotorCommand>,
    /// When set, reads fail with a disconnect.
    pub fail_reads: bool,
    /// When set, every send after this many attempts fails with a disconnect.
    /// Failed attempts are still recorded in `sent`.
    pub fail_sends_after: Option<usize>,
}

impl ScriptedLink {
    /// Creates a link that always reports `state`.
    pub fn holding(state: VehicleState) -> Self {
        Self {
            states: vec![state],
            ..Self::default()
        }
    }
}

impl TelemetrySource for ScriptedLink {
    fn read_state(&mut self) -> Result<VehicleState, CommunicationError> {
        if self.fail_reads {
            return Err(CommunicationError::Disconnected("scripted".into()));
        }
        let index = self.reads.min(self.states.len().saturating_sub(1));
        self.reads += 1;
        self.states
            .get(index)
            .copied()
            .ok_or_else(|| CommunicationError::Disconnected("no telemetry scripted".into()))
    }
}

impl ActuatorSink for ScriptedLink {
    fn send_motors(&mut self, command: &MotorCommand) -> Result<(), CommunicationError> {
        let attempt = self.sent.len();
        self.sent.push(*command);
        match self.fail_sends_after {
            Some(limit) if limit <= attempt => {
                Err(CommunicationError::Disconnected("scripted send".into()))
            }
            _ => Ok(()),
        }
    }
}
