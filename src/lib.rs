// src/lib.rs

//! # PID Altitude Hold
//!
//! This crate holds a multirotor at a target altitude. A PID controller turns
//! a set point and a live telemetry feed into a four-channel motor command,
//! one fixed-duration tick at a time.
//!
//! The control law is staged as separate paths feeding one summation node:
//! proportional error, a bounded leaky integral of that error, and a rate
//! error built from a one-tick difference of the set point minus the measured
//! climb rate. The numeric core is generic over the number type and runs on
//! floating point or fixed point.
//!
//! The vehicle is reached only through the [`vehicle::TelemetrySource`] and
//! [`vehicle::ActuatorSink`] traits. A UDP client for the multicopter
//! simulator and an in-process vertical dynamics model are provided.
//!
//! ```
//! use altitude_hold::vehicle::{SimulatedMulticopter, VehicleParams};
//! use altitude_hold::{CommandMode, ControlLoop, Settings};
//! use std::sync::atomic::AtomicBool;
//!
//! let params = VehicleParams::default();
//! let settings = Settings {
//!     command_mode: CommandMode::ClosedLoop {
//!         base_throttle: params.hover_throttle(),
//!     },
//!     max_ticks: Some(1000),
//!     ..Settings::default()
//! };
//! let vehicle = SimulatedMulticopter::new(params, settings.tick);
//!
//! let mut control = ControlLoop::from_settings(vehicle, &settings).unwrap();
//! let summary = control.run(&AtomicBool::new(false)).unwrap();
//! assert_eq!(1000, summary.ticks);
//! ```

#![deny(missing_docs)]

pub mod control_loop;
pub mod controller;
pub mod error;
pub mod pid;
pub mod settings;
pub mod vehicle;

#[doc(inline)]
pub use control_loop::*;
#[doc(inline)]
pub use controller::*;
#[doc(inline)]
pub use error::*;
#[doc(inline)]
pub use settings::*;

#[cfg(test)]
mod test_utils;
