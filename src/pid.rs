// src/pid.rs

//! # PID Control Module
//!
//! This module provides the compute function and control data structure
//! that `piddiy` uses to perform the altitude PID calculation.

pub mod altitude;
pub use altitude::*;
