// src/controller/altitude.rs

//! # Altitude PID Controller
//!
//! Owns every signal of the altitude control law: the PID state, the delayed
//! set point register and the integrator bounds. One call to
//! [`AltitudeController::step`] is one tick; all stages for the tick complete
//! before it returns.

use super::{ControllerConfig, DelayRegister, Number};
use crate::pid::{compute_altitude, is_saturated, passthrough, AltitudeControlData};
use crate::ConfigurationError;
use piddiy::PidController;

/// Every signal computed during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOutput<T> {
    /// The set point for this tick.
    pub set_point: T,
    /// Set point minus measurement.
    pub error: T,
    /// Integral accumulator after this tick's update.
    pub integral: T,
    /// Set point minus the previous tick's set point.
    pub delayed_set_point: T,
    /// Delayed set point minus measured rate.
    pub rate_error: T,
    /// `kp·error + ki·integral + kd·f(rate_error)`.
    pub command: T,
    /// The integral accumulator sits on its bound.
    pub saturated: bool,
}

/// Struct representing the altitude PID controller.
pub struct AltitudeController<T: Number> {
    pid: PidController<T, AltitudeControlData<T>>,
    delay: DelayRegister<T>,
    tick: T,
    filter_coefficient: T,
    integral_radius: T,
    derivative_transform: fn(T) -> T,
}

impl<T: Number> AltitudeController<T> {
    /// Creates a new controller using the provided configuration.
    pub fn with_config(config: ControllerConfig<T>) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let mut pid = PidController::new();
        pid.compute_fn(compute_altitude)
            .set_point(T::zero())
            .kp(config.kp)
            .ki(config.ki)
            .kd(config.kd);

        Ok(AltitudeController {
            pid,
            delay: DelayRegister::new(),
            tick: config.tick,
            filter_coefficient: config.filter_coefficient(),
            integral_radius: config.integral_radius,
            derivative_transform: passthrough,
        })
    }

    /// Replaces the transform applied to the rate error before the derivative gain.
    pub fn with_derivative_transform(mut self, transform: fn(T) -> T) -> Self {
        self.derivative_transform = transform;
        self
    }

    /// Runs one tick. `measurement` and `rate` must come from the same telemetry snapshot.
    pub fn step(&mut self, set_point: T, measurement: T, rate: T) -> ControlOutput<T> {
        self.pid.set_point(set_point);
        let delayed_set_point = self.delay.difference(set_point);

        let data = AltitudeControlData {
            measurement,
            rate,
            delayed_set_point,
            filter_coefficient: self.filter_coefficient,
            integral_radius: self.integral_radius,
            derivative_transform: self.derivative_transform,
        };
        let command = self.pid.compute(data);

        ControlOutput {
            set_point,
            error: self.pid.error,
            integral: self.pid.integral,
            delayed_set_point,
            rate_error: delayed_set_point - rate,
            command,
            saturated: is_saturated(self.pid.integral, self.integral_radius),
        }
    }

    /// Tick duration the integrator coefficient was derived from.
    pub fn tick(&self) -> T {
        self.tick
    }

    /// Current integral accumulator.
    pub fn integral(&self) -> T {
        self.pid.integral
    }

    /// Bound on the integral accumulator.
    pub fn integral_radius(&self) -> T {
        self.integral_radius
    }

    /// Clears the integrator, the stored error and the delayed set point.
    pub fn reset(&mut self) {
        self.pid.integral = T::zero();
        self.pid.error = T::zero();
        self.delay.clear();
    }
}
