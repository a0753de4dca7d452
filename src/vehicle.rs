// src/vehicle.rs

//! # Vehicle Link Module
//!
//! The controller only ever reaches the vehicle through two narrow contracts:
//! [`TelemetrySource`] for reading one state snapshot and [`ActuatorSink`] for
//! sending one motor command. Concrete links are provided for the UDP
//! multicopter simulator and for an in-process vertical dynamics model.

pub mod sim;
pub use sim::*;
pub mod state;
pub use state::*;
pub mod udp;
pub use udp::*;

use crate::CommunicationError;

/// Number of motor channels on the vehicle.
pub const MOTOR_COUNT: usize = 4;

/// A normalised motor command, one value per motor in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotorCommand([f64; MOTOR_COUNT]);

impl MotorCommand {
    /// Builds a command from raw channel values, clamping each into `0.0..=1.0`.
    /// Non-finite values become `0.0`.
    pub fn new(channels: [f64; MOTOR_COUNT]) -> Self {
        Self(channels.map(|value| {
            if value.is_finite() {
                value.clamp(0.0, 1.0)
            } else {
                0.0
            }
        }))
    }

    /// Sets every channel to the same throttle.
    pub fn uniform(throttle: f64) -> Self {
        Self::new([throttle; MOTOR_COUNT])
    }

    /// The channel values.
    pub fn channels(&self) -> &[f64; MOTOR_COUNT] {
        &self.0
    }

    /// Mean throttle across channels.
    pub fn mean(&self) -> f64 {
        self.0.iter().sum::<f64>() / MOTOR_COUNT as f64
    }
}

/// Supplies the current vehicle state on demand.
pub trait TelemetrySource {
    /// Requests one complete state snapshot. Blocks until it arrives or the link fails.
    fn read_state(&mut self) -> Result<VehicleState, CommunicationError>;
}

/// Accepts motor commands.
pub trait ActuatorSink {
    /// Sends one command to all motors.
    fn send_motors(&mut self, command: &MotorCommand) -> Result<(), CommunicationError>;
}

/// A bidirectional link to a vehicle.
pub trait VehicleLink: TelemetrySource + ActuatorSink {}

impl<L: TelemetrySource + ActuatorSink> VehicleLink for L {}

impl<S: TelemetrySource + ?Sized> TelemetrySource for &mut S {
    fn read_state(&mut self) -> Result<VehicleState, CommunicationError> {
        (**self).read_state()
    }
}

impl<A: ActuatorSink + ?Sized> ActuatorSink for &mut A {
    fn send_motors(&mut self, command: &MotorCommand) -> Result<(), CommunicationError> {
        (**self).send_motors(command)
    }
}
