// src/controller/config.rs

//! Shared numeric trait and configuration for the altitude controller.
//! The controller is generic over the number type so the same code runs on
//! floating point and fixed point.

use crate::ConfigurationError;
use piddiy::Number as PiddiyNumber;

/// Custom trait to encapsulate base number requirements.
pub trait Number: PiddiyNumber {
    /// Clamps generic PartialOrd values within a given range.
    fn clamp(self, min: Self, max: Self) -> Self {
        if self < min {
            min
        } else if max < self {
            max
        } else {
            self
        }
    }

    /// Returns `false` for NaN and infinities.
    ///
    /// NaN never equals itself and infinity minus infinity is NaN, so this
    /// holds for any number type without a dedicated float API.
    #[allow(clippy::eq_op)]
    fn is_finite_number(self) -> bool {
        self == self && self - self == Self::zero()
    }
}

impl<T: PiddiyNumber> Number for T {}

/// Gains and timing for the altitude controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig<T: Number> {
    /// Proportional gain.
    pub kp: T,
    /// Integral gain.
    pub ki: T,
    /// Derivative gain, applied to the transformed rate error.
    pub kd: T,
    /// Duration of one control tick.
    pub tick: T,
    /// Time constant of the leaky integrator.
    pub integral_time_constant: T,
    /// The integral accumulator is clamped to plus or minus this value.
    pub integral_radius: T,
}

impl<T: Number> ControllerConfig<T> {
    /// Creates a new configuration with default values for all parameters.
    /// Default values are zero or one are used.
    /// These should be replaced meaningful values that are tuned for the vehicle.
    ///
    /// Example Usage
    /// ```
    /// use altitude_hold::{AltitudeController, ControllerConfig};
    ///
    /// let mut config = ControllerConfig::<f64>::new();
    ///
    /// // Set the PID gains.
    /// config.kp = 0.4;
    /// config.ki = 0.03;
    /// config.kd = 10.0;
    ///
    /// // One millisecond ticks, 100 ms integrator time constant.
    /// config.tick = 0.001;
    /// config.integral_time_constant = 0.1;
    ///
    /// // Bound the integral term.
    /// config.integral_radius = 2.0;
    ///
    /// let controller = AltitudeController::with_config(config).unwrap();
    /// ```
    pub fn new() -> Self {
        Self {
            kp: T::one(),
            ki: T::zero(),
            kd: T::zero(),
            tick: T::one(),
            integral_time_constant: T::one(),
            integral_radius: T::one(),
        }
    }

    /// Rejects non-finite gains and non-positive timing or bounds.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let values = [
            ("kp", self.kp),
            ("ki", self.ki),
            ("kd", self.kd),
            ("tick", self.tick),
            ("integral_time_constant", self.integral_time_constant),
            ("integral_radius", self.integral_radius),
        ];
        if let Some(&(name, _)) = values.iter().find(|&&(_, value)| !value.is_finite_number()) {
            return Err(ConfigurationError::NonFinite { name });
        }

        let positive = [
            ("tick", self.tick),
            ("integral_time_constant", self.integral_time_constant),
            ("integral_radius", self.integral_radius),
        ];
        if let Some(&(name, _)) = positive.iter().find(|&&(_, value)| value <= T::zero()) {
            return Err(ConfigurationError::NonPositive { name });
        }

        Ok(())
    }

    /// Integrator coefficient `k = tick / integral_time_constant`, at most one.
    pub fn filter_coefficient(&self) -> T {
        (self.tick / self.integral_time_constant).clamp(T::zero(), T::one())
    }
}

impl<T: Number> Default for ControllerConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}
