// src/vehicle/sim.rs

//! # Simulated Multicopter
//!
//! An in-process vehicle that only models the vertical axis. Motor values are
//! converted to rotor speeds `ω = m · max_rpm · π / 30`, total thrust is
//! `b · Σ ω²`, and the vertical acceleration is
//! `-g + cos(roll) · cos(pitch) · thrust / mass`.
//!
//! Each motor command advances the model by one fixed time step, so the link
//! behaves like a lock-stepped simulator: read state, send motors, repeat.
//! The vehicle rests on the ground (altitude zero) until thrust exceeds weight.

use super::{ActuatorSink, MotorCommand, TelemetrySource, VehicleState};
use crate::CommunicationError;
use std::f64::consts::PI;

/// Physical constants of the simulated vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleParams {
    /// Vehicle mass in kilograms.
    pub mass: f64,
    /// Thrust coefficient `b`, newtons per (rad/s)².
    pub thrust_coefficient: f64,
    /// Rotor speed at full throttle, revolutions per minute.
    pub max_rpm: f64,
    /// Gravitational acceleration, metres per second squared.
    pub gravity: f64,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            thrust_coefficient: 3.3e-6,
            max_rpm: 15_000.0,
            gravity: 9.80665,
        }
    }
}

impl VehicleParams {
    /// Total thrust in newtons for a motor command.
    pub fn thrust(&self, command: &MotorCommand) -> f64 {
        let omega_max = self.max_rpm * PI / 30.0;
        command
            .channels()
            .iter()
            .map(|value| {
                let omega = value * omega_max;
                self.thrust_coefficient * omega * omega
            })
            .sum()
    }

    /// Uniform throttle at which thrust balances weight with level attitude.
    pub fn hover_throttle(&self) -> f64 {
        let full = self.thrust(&MotorCommand::uniform(1.0));
        (self.mass * self.gravity / full).sqrt()
    }
}

/// Lock-stepped vertical dynamics model usable as a [`VehicleLink`](super::VehicleLink).
#[derive(Debug, Clone)]
pub struct SimulatedMulticopter {
    params: VehicleParams,
    state: VehicleState,
    dt: f64,
    motors: MotorCommand,
}

impl SimulatedMulticopter {
    /// Creates a vehicle resting on the ground that advances `dt` seconds per command.
    pub fn new(params: VehicleParams, dt: f64) -> Self {
        Self {
            params,
            state: VehicleState::default(),
            dt,
            motors: MotorCommand::default(),
        }
    }

    /// Places the vehicle at `altitude`, at rest.
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.state.position[2] = -altitude;
        self.state.velocity[2] = 0.0;
        self
    }

    /// The current state.
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    /// The last command applied.
    pub fn motors(&self) -> &MotorCommand {
        &self.motors
    }

    /// Advances the model by one time step under the current motor command.
    pub fn step(&mut self) {
        let [roll, pitch, _] = self.state.euler_angles;
        let lift = roll.cos() * pitch.cos() * self.params.thrust(&self.motors) / self.params.mass;
        let acceleration = lift - self.params.gravity;

        let mut climb_rate = self.state.climb_rate() + acceleration * self.dt;
        let mut altitude = self.state.altitude() + climb_rate * self.dt;
        if altitude <= 0.0 {
            altitude = 0.0;
            climb_rate = climb_rate.max(0.0);
        }

        self.state.position[2] = -altitude;
        self.state.velocity[2] = -climb_rate;
        self.state.time += self.dt;
    }
}

impl TelemetrySource for SimulatedMulticopter {
    fn read_state(&mut self) -> Result<VehicleState, CommunicationError> {
        Ok(self.state)
    }
}

impl ActuatorSink for SimulatedMulticopter {
    fn send_motors(&mut self, command: &MotorCommand) -> Result<(), CommunicationError> {
        self.motors = *command;
        self.step();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    /// Test that hover throttle produces thrust equal to weight.
    #[test]
    fn test_sim_hover_throttle_balances_weight() {
        let params = VehicleParams::default();
        let hover = params.hover_throttle();
        let thrust = params.thrust(&MotorCommand::uniform(hover));

        assert!(0.0 < hover && hover < 1.0, "Hover throttle should be in range.");
        assert!(
            (thrust - params.mass * params.gravity).abs() < 1e-9,
            "Hover thrust should equal weight."
        );
    }

    /// Test that the vehicle stays on the ground with motors off.
    #[test]
    fn test_sim_rests_on_ground() {
        let mut vehicle = SimulatedMulticopter::new(VehicleParams::default(), 0.01);
        for _ in 0..100 {
            vehicle.send_motors(&MotorCommand::uniform(0.0)).unwrap();
        }
        assert!(value_close(0.0, vehicle.state().altitude()), "Vehicle should not sink.");
        assert!(value_close(1.0, vehicle.state().time), "Time should advance per command.");
    }

    /// Test that full throttle climbs and zero throttle falls.
    #[test]
    fn test_sim_climbs_and_falls() {
        let mut vehicle = SimulatedMulticopter::new(VehicleParams::default(), 0.01);
        for _ in 0..100 {
            vehicle.send_motors(&MotorCommand::uniform(1.0)).unwrap();
        }
        let peak = vehicle.read_state().unwrap();
        assert!(0.0 < peak.altitude(), "Full throttle should lift off.");
        assert!(0.0 < peak.climb_rate(), "Full throttle should climb.");

        vehicle.send_motors(&MotorCommand::uniform(0.0)).unwrap();
        assert!(
            vehicle.state().climb_rate() < peak.climb_rate(),
            "Cutting the motors should decelerate."
        );
    }

    /// Test that a vehicle placed in the air holds altitude at hover throttle.
    #[test]
    fn test_sim_hover_holds_altitude() {
        let params = VehicleParams::default();
        let mut vehicle = SimulatedMulticopter::new(params, 0.001).with_altitude(5.0);
        for _ in 0..1000 {
            vehicle
                .send_motors(&MotorCommand::uniform(params.hover_throttle()))
                .unwrap();
        }
        assert!(
            (vehicle.state().altitude() - 5.0).abs() < 1e-6,
            "Hover should hold altitude, got {}.",
            vehicle.state().altitude()
        );
    }
}
