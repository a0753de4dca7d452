// src/controller.rs

//! # Altitude Controller Module
//!
//! This module provides the stateful altitude controller together with its
//! configuration, the set point generators that feed it, and the delay
//! register used by the derivative path.

pub mod altitude;
pub use altitude::*;
pub mod config;
pub use config::*;
pub mod delay;
pub use delay::*;
pub mod setpoint;
pub use setpoint::*;
