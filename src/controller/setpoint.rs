// src/controller/setpoint.rs

//! Set point generators. A generator maps controller time `t ≥ 0` to the
//! desired value of the controlled quantity and must be total over that range.

/// Produces the set point for each tick.
pub trait SetpointGenerator<T> {
    /// Desired value at controller time `time`.
    fn set_point(&mut self, time: T) -> T;
}

/// A set point that never changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSetpoint<T>(pub T);

impl<T: Copy> SetpointGenerator<T> for ConstantSetpoint<T> {
    fn set_point(&mut self, _time: T) -> T {
        self.0
    }
}

impl<T, F: FnMut(T) -> T> SetpointGenerator<T> for F {
    fn set_point(&mut self, time: T) -> T {
        self(time)
    }
}
