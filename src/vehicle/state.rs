// src/vehicle/state.rs

//! # Vehicle State Module
//!
//! Decoding of the simulator's telemetry vector. The vector holds 13 values:
//!
//! | index   | meaning                                 |
//! |---------|-----------------------------------------|
//! | 0       | simulator time, seconds                 |
//! | 1..=3   | angular velocity, body x, y, z          |
//! | 4..=6   | Euler angles, roll, pitch, yaw          |
//! | 7..=9   | position x, y, z, NED                   |
//! | 10..=12 | velocity x, y, z, NED                   |
//!
//! Position and velocity are north-east-down, so altitude and climb rate are
//! the negated z components.

use crate::CommunicationError;

/// Number of `f64` values in one telemetry vector.
pub const TELEMETRY_LEN: usize = 13;

/// One complete telemetry snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VehicleState {
    /// Simulator time in seconds.
    pub time: f64,
    /// Body angular velocity.
    pub angular_velocity: [f64; 3],
    /// Roll, pitch and yaw.
    pub euler_angles: [f64; 3],
    /// Position in NED coordinates.
    pub position: [f64; 3],
    /// Velocity in NED coordinates.
    pub velocity: [f64; 3],
}

impl VehicleState {
    /// Decodes a telemetry vector. Extra trailing values are ignored.
    pub fn from_values(values: &[f64]) -> Result<Self, CommunicationError> {
        if values.len() < TELEMETRY_LEN {
            return Err(CommunicationError::Malformed {
                expected: TELEMETRY_LEN,
                actual: values.len(),
            });
        }
        let triple = |start: usize| [values[start], values[start + 1], values[start + 2]];

        Ok(Self {
            time: values[0],
            angular_velocity: triple(1),
            euler_angles: triple(4),
            position: triple(7),
            velocity: triple(10),
        })
    }

    /// Encodes the state back into the telemetry vector layout.
    pub fn to_values(&self) -> [f64; TELEMETRY_LEN] {
        let mut values = [0.0; TELEMETRY_LEN];
        values[0] = self.time;
        values[1..4].copy_from_slice(&self.angular_velocity);
        values[4..7].copy_from_slice(&self.euler_angles);
        values[7..10].copy_from_slice(&self.position);
        values[10..13].copy_from_slice(&self.velocity);
        values
    }

    /// Altitude above the origin, the negated NED z position.
    pub fn altitude(&self) -> f64 {
        -self.position[2]
    }

    /// Climb rate, the negated NED z velocity.
    pub fn climb_rate(&self) -> f64 {
        -self.velocity[2]
    }
}
