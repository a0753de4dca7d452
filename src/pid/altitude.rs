// src/pid/altitude.rs

//! # Altitude PID Control Module
//!
//! This module provides a compute function and control data structure
//! to perform the altitude PID (Proportional-Integral-Derivative) control
//! calculation.
//!
//! The three paths are staged as follows:
//!
//! - **Proportional**: `error = set_point - measurement`.
//! - **Integral**: a normalised leaky integrator,
//!   `A ← (1 - k)·A + k·error`, clamped to `±integral_radius`.
//! - **Derivative**: `f(delayed_set_point - rate)`, where the delayed set point
//!   is the one-tick difference of the set point and `f` is a transform
//!   applied before the derivative gain.
//!
//! `piddiy` then sums `kp·error + ki·A + kd·f(rate_error)`.

use crate::Number;
use piddiy::PidController;

/// Control data for the altitude PID compute callback.
#[derive(Debug, Clone, Copy)]
pub struct AltitudeControlData<T> {
    /// The measured altitude for this tick.
    pub measurement: T,
    /// The measured climb rate, taken from the same telemetry snapshot.
    pub rate: T,
    /// The set point minus the previous tick's set point.
    pub delayed_set_point: T,
    /// Integrator filter coefficient `k`, tick duration over integral time constant.
    pub filter_coefficient: T,
    /// The integral accumulator is clamped to plus or minus this value.
    pub integral_radius: T,
    /// Transform applied to the rate error before the derivative gain.
    pub derivative_transform: fn(T) -> T,
}

/// Derivative transform that returns its input unchanged.
pub fn passthrough<T>(value: T) -> T {
    value
}

/// One update of the normalised leaky integrator.
///
/// The decaying feedback and the injected error share the coefficient `k`,
/// so a constant error `E` drives the accumulator towards `E`.
pub fn leaky_integrate<T: Number>(accumulator: T, error: T, filter_coefficient: T) -> T {
    (T::one() - filter_coefficient) * accumulator + filter_coefficient * error
}

/// Returns `true` if `value` sits on or beyond the `±radius` bound.
pub fn is_saturated<T: Number>(value: T, radius: T) -> bool {
    radius <= value || value <= -radius
}

/// Altitude PID compute callback.
pub fn compute_altitude<T: Number>(
    pid: &mut PidController<T, AltitudeControlData<T>>,
    data: AltitudeControlData<T>,
) -> (T, T, T) {
    let error = pid.set_point - data.measurement;
    let integral = leaky_integrate(pid.integral, error, data.filter_coefficient)
        .clamp(-data.integral_radius, data.integral_radius);
    let rate_error = data.delayed_set_point - data.rate;
    let derivative = (data.derivative_transform)(rate_error);

    (error, integral, derivative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn altitude_pid(set_point: f64) -> PidController<f64, AltitudeControlData<f64>> {
        let mut pid = PidController::new();
        pid.compute_fn(compute_altitude)
            .set_point(set_point)
            .kp(0.4)
            .ki(0.03)
            .kd(10.0);
        pid
    }

    fn control_data(measurement: f64, rate: f64) -> AltitudeControlData<f64> {
        AltitudeControlData {
            measurement,
            rate,
            delayed_set_point: 0.0,
            filter_coefficient: 0.01,
            integral_radius: 2.0,
            derivative_transform: passthrough,
        }
    }

    /// Test that the error term is exactly the set point minus the measurement.
    #[test]
    fn test_pid_altitude_error_term() {
        let mut pid = altitude_pid(10.0);
        for measurement in [0.0, 2.5, 9.999, 10.0, 12.75, -3.0] {
            let (error, _, _) = compute_altitude(&mut pid, control_data(measurement, 0.0));
            let _ = pid.compute(control_data(measurement, 0.0));
            assert!(
                value_close(10.0 - measurement, error),
                "Error should be set point minus measurement for {measurement}."
            );
        }
    }

    /// Test that the integral never leaves the radius for large bounded errors.
    #[test]
    fn test_pid_altitude_integral_bounded() {
        let mut pid = altitude_pid(0.0);
        let mut data = control_data(0.0, 0.0);
        data.filter_coefficient = 0.5;

        for step in 0..500 {
            data.measurement = if step % 7 < 4 { -250.0 } else { 180.0 };
            let _ = pid.compute(data);
            assert!(
                pid.integral <= data.integral_radius && -data.integral_radius <= pid.integral,
                "Integral escaped the radius: {}",
                pid.integral
            );
        }
    }

    /// Test that a constant error in range drives the integral to that error.
    #[test]
    fn test_pid_altitude_integral_converges() {
        let mut pid = altitude_pid(10.0);
        let data = control_data(8.5, 0.0);

        for _ in 0..3000 {
            let _ = pid.compute(data);
        }

        assert!(
            (pid.integral - 1.5).abs() < 1e-6,
            "Integral should converge to the error, got {}",
            pid.integral
        );
    }

    /// Test that an out-of-range error saturates at the radius.
    #[test]
    fn test_pid_altitude_integral_saturates() {
        let mut pid = altitude_pid(10.0);
        let data = control_data(0.0, 0.0);

        for _ in 0..3000 {
            let _ = pid.compute(data);
        }

        assert!(value_close(2.0, pid.integral), "Integral should sit on the radius.");
        assert!(is_saturated(pid.integral, 2.0), "Saturation should be reported.");
    }

    /// Test the command is the weighted sum of the three paths.
    #[test]
    fn test_pid_altitude_specific_output() {
        let mut pid = altitude_pid(10.0);
        let data = AltitudeControlData {
            measurement: 8.0,
            rate: -0.1,
            delayed_set_point: 0.0,
            filter_coefficient: 0.5,
            integral_radius: 2.0,
            derivative_transform: passthrough,
        };

        let (error, integral, derivative) = compute_altitude(&mut pid, data);
        let output = pid.compute(data);

        assert!(value_close(2.0, error), "Error should be 2.");
        assert!(value_close(1.0, integral), "Integral should be 1.");
        assert!(value_close(0.1, derivative), "Rate error should be 0.1.");
        assert!(
            value_close(1.83, output),
            "Output should be 0.8 + 0.03 + 1.0, got {output}."
        );
    }

    /// Test the derivative transform runs before the derivative gain.
    #[test]
    fn test_pid_altitude_derivative_transform() {
        let mut pid = altitude_pid(0.0);
        pid.kp(0.0).ki(0.0).kd(2.0);
        let mut data = control_data(0.0, 0.0);
        data.delayed_set_point = 3.0;
        data.derivative_transform = |rate_error: f64| rate_error * rate_error;

        let output = pid.compute(data);
        assert!(value_close(18.0, output), "Output should be kd * f(3.0).");
    }

    /// Test that PID computes zero output for zero error with zero initial conditions.
    #[test]
    fn test_pid_altitude_zero_conditions() {
        let mut pid = altitude_pid(0.0);
        let data = control_data(0.0, 0.0);
        let (error, integral, derivative) = compute_altitude(&mut pid, data);
        let output = pid.compute(data);

        assert!(value_close(0.0, error), "Error should be zero.");
        assert!(value_close(0.0, integral), "Integral should be zero.");
        assert!(value_close(0.0, derivative), "Derivative should be zero.");
        assert!(value_close(0.0, output), "Output should be zero.");
    }
}
