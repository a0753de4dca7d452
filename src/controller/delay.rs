// src/controller/delay.rs

//! Single-slot delay register used to difference the set point across ticks.

use crate::Number;

/// Holds the previous tick's sample.
///
/// [`DelayRegister::difference`] reads the stored sample, then stores the new
/// one, so each call returns `current - previous`. The register primes itself
/// with its first sample, making the first difference zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRegister<T> {
    previous: Option<T>,
}

impl<T: Number> DelayRegister<T> {
    /// Creates an empty register.
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Returns `current` minus the previous sample and stores `current`.
    pub fn difference(&mut self, current: T) -> T {
        let previous = self.previous.unwrap_or(current);
        self.previous = Some(current);
        current - previous
    }

    /// The stored sample, if any.
    pub fn previous(&self) -> Option<T> {
        self.previous
    }

    /// Forgets the stored sample.
    pub fn clear(&mut self) {
        self.previous = None;
    }
}

impl<T: Number> Default for DelayRegister<T> {
    fn default() -> Self {
        Self::new()
    }
}
