// src/control_loop.rs

//! # Altitude Hold Control Loop
//!
//! Drives an [`AltitudeController`] against a [`VehicleLink`], one tick at a
//! time:
//!
//! 1. read exactly one telemetry snapshot,
//! 2. step the controller with the altitude and climb rate from that snapshot,
//! 3. translate the result into a motor command according to the [`CommandMode`],
//! 4. send the command.
//!
//! A tick that fails on either channel sends the safe command instead and
//! returns the error; no retry happens here. [`ControlLoop::run`] checks a
//! cancellation flag between ticks and finishes with exactly one safe command.

use crate::vehicle::{MotorCommand, VehicleLink, VehicleState};
use crate::{
    AltitudeController, CommunicationError, ConfigurationError, ConstantSetpoint, ControlError,
    ControlOutput, SetpointGenerator, Settings,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// What the actuator receives each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CommandMode {
    /// Every channel gets `throttle`, whatever the control law computes.
    /// The PID command is still computed and reported.
    OpenLoop {
        /// Fixed throttle for all four motors.
        throttle: f64,
    },
    /// Every channel gets `base_throttle + command`, clamped to `0.0..=1.0`.
    ClosedLoop {
        /// Throttle added to the PID command, normally the hover throttle.
        base_throttle: f64,
    },
}

impl Default for CommandMode {
    fn default() -> Self {
        CommandMode::OpenLoop { throttle: 0.4 }
    }
}

impl CommandMode {
    /// Translates the synthesised command into motor values.
    pub fn motor_command(&self, command: f64) -> MotorCommand {
        match *self {
            CommandMode::OpenLoop { throttle } => MotorCommand::uniform(throttle),
            CommandMode::ClosedLoop { base_throttle } => {
                MotorCommand::uniform(base_throttle + command)
            }
        }
    }

    /// Rejects throttles outside `0.0..=1.0`.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match *self {
            CommandMode::OpenLoop { throttle } => check_throttle("throttle", throttle),
            CommandMode::ClosedLoop { base_throttle } => {
                check_throttle("base_throttle", base_throttle)
            }
        }
    }
}

fn check_throttle(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::ThrottleOutOfRange { name, value })
    }
}

/// Timing and actuation options for the loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopConfig {
    /// Duration of one tick in seconds.
    pub tick: f64,
    /// How the PID command reaches the motors.
    pub command_mode: CommandMode,
    /// Throttle sent on every channel when the loop stops or a tick fails.
    pub safe_throttle: f64,
    /// Stop after this many ticks.
    pub max_ticks: Option<u64>,
    /// Pace ticks to wall-clock time.
    pub realtime: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick: 0.001,
            command_mode: CommandMode::default(),
            safe_throttle: 0.0,
            max_ticks: None,
            realtime: false,
        }
    }
}

impl LoopConfig {
    /// Rejects a non-positive tick and out-of-range throttles.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.tick.is_finite() {
            return Err(ConfigurationError::NonFinite { name: "tick" });
        }
        if self.tick <= 0.0 {
            return Err(ConfigurationError::NonPositive { name: "tick" });
        }
        self.command_mode.validate()?;
        check_throttle("safe_throttle", self.safe_throttle)
    }
}

/// Everything observed and issued during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Controller time at the start of the tick.
    pub time: f64,
    /// The telemetry snapshot used for the whole tick.
    pub state: VehicleState,
    /// Signals computed by the controller.
    pub output: ControlOutput<f64>,
    /// The command sent to the motors.
    pub command: MotorCommand,
}

/// Why a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The cancellation flag was raised.
    Cancelled,
    /// The configured tick budget was used up.
    TickBudget,
}

/// Outcome of [`ControlLoop::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Ticks completed during this run.
    pub ticks: u64,
    /// Ticks that ended with the integrator on its bound.
    pub saturated_ticks: u64,
    /// Report of the final completed tick.
    pub last: Option<TickReport>,
    /// Why the run ended.
    pub reason: StopReason,
}

/// Single-threaded altitude hold loop.
pub struct ControlLoop<L: VehicleLink, G: SetpointGenerator<f64>> {
    link: L,
    controller: AltitudeController<f64>,
    set_point: G,
    config: LoopConfig,
    safe_command: MotorCommand,
    ticks: u64,
    saturated: bool,
}

impl<L: VehicleLink> ControlLoop<L, ConstantSetpoint<f64>> {
    /// Builds a loop holding the configured target altitude.
    pub fn from_settings(link: L, settings: &Settings) -> Result<Self, ConfigurationError> {
        settings.validate()?;
        let controller = AltitudeController::with_config(settings.controller_config())?;
        Self::new(link, controller, settings.set_point(), settings.loop_config())
    }
}

impl<L: VehicleLink, G: SetpointGenerator<f64>> ControlLoop<L, G> {
    /// Creates a loop from its parts. The controller must be configured with the loop's tick.
    pub fn new(
        link: L,
        controller: AltitudeController<f64>,
        set_point: G,
        config: LoopConfig,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        if controller.tick() != config.tick {
            return Err(ConfigurationError::TickMismatch {
                controller: controller.tick(),
                control_loop: config.tick,
            });
        }
        Ok(Self {
            link,
            controller,
            set_point,
            safe_command: MotorCommand::uniform(config.safe_throttle),
            config,
            ticks: 0,
            saturated: false,
        })
    }

    /// Controller time of the next tick.
    pub fn time(&self) -> f64 {
        self.ticks as f64 * self.config.tick
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The controller.
    pub fn controller(&self) -> &AltitudeController<f64> {
        &self.controller
    }

    /// The vehicle link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Consumes the loop and returns the vehicle link.
    pub fn into_link(self) -> L {
        self.link
    }

    /// Runs one tick.
    pub fn tick(&mut self) -> Result<TickReport, ControlError> {
        let state = match self.link.read_state() {
            Ok(state) => state,
            Err(err) => return Err(self.abort_tick(err)),
        };

        let time = self.time();
        let set_point = self.set_point.set_point(time);
        let output = self
            .controller
            .step(set_point, state.altitude(), state.climb_rate());
        self.track_saturation(&output);

        let command = self.config.command_mode.motor_command(output.command);
        if let Err(err) = self.link.send_motors(&command) {
            return Err(self.abort_tick(err));
        }

        log::trace!(
            "t={:.3} altitude={:.3} error={:.4} integral={:.4} command={:.4} motors={:.3}",
            time,
            state.altitude(),
            output.error,
            output.integral,
            output.command,
            command.mean()
        );
        self.ticks += 1;

        Ok(TickReport {
            time,
            state,
            output,
            command,
        })
    }

    /// Ticks until `stop` is raised or the tick budget runs out, then sends one safe command.
    ///
    /// A failing tick has already sent the safe command; its error is returned as is.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<RunSummary, ControlError> {
        log::info!(
            "Starting altitude hold: tick {}s, mode {:?}, budget {:?}",
            self.config.tick,
            self.config.command_mode,
            self.config.max_ticks
        );
        let started = Instant::now();
        let first_tick = self.ticks;
        let mut saturated_ticks = 0;
        let mut last = None;

        let reason = loop {
            if stop.load(Ordering::Acquire) {
                break StopReason::Cancelled;
            }
            if self
                .config
                .max_ticks
                .is_some_and(|max| max <= self.ticks - first_tick)
            {
                break StopReason::TickBudget;
            }

            let report = self.tick()?;
            if report.output.saturated {
                saturated_ticks += 1;
            }
            last = Some(report);

            if self.config.realtime {
                self.pace(started, self.ticks - first_tick);
            }
        };

        self.shutdown()?;
        let summary = RunSummary {
            ticks: self.ticks - first_tick,
            saturated_ticks,
            last,
            reason,
        };
        log::info!(
            "Altitude hold stopped ({:?}) after {} ticks, {} saturated",
            summary.reason,
            summary.ticks,
            summary.saturated_ticks
        );
        Ok(summary)
    }

    /// Sends the safe command.
    pub fn shutdown(&mut self) -> Result<(), ControlError> {
        log::info!("Sending safe command {:?}", self.safe_command.channels());
        self.link.send_motors(&self.safe_command)?;
        Ok(())
    }

    fn abort_tick(&mut self, err: CommunicationError) -> ControlError {
        log::warn!("Tick {} aborted: {}", self.ticks, err);
        if let Err(safe_err) = self.link.send_motors(&self.safe_command) {
            log::warn!("Safe command not delivered: {}", safe_err);
        }
        err.into()
    }

    fn track_saturation(&mut self, output: &ControlOutput<f64>) {
        if output.saturated != self.saturated {
            if output.saturated {
                log::debug!("Integrator saturated at {:.4}", output.integral);
            } else {
                log::debug!("Integrator left saturation at {:.4}", output.integral);
            }
            self.saturated = output.saturated;
        }
    }

    fn pace(&self, started: Instant, completed: u64) {
        let deadline = started + Duration::from_secs_f64(completed as f64 * self.config.tick);
        if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
    }
}
