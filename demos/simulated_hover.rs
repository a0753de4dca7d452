// demos/simulated_hover.rs

use altitude_hold::vehicle::{SimulatedMulticopter, VehicleParams};
use altitude_hold::{CommandMode, ControlLoop, Settings};
use clap::Parser;
use std::path::PathBuf;

/// Holds altitude against the in-process vertical dynamics model.
#[derive(Parser, Debug)]
#[command(name = "simulated_hover")]
struct Args {
    /// JSON settings file; defaults are used when omitted
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short, long, default_value = "30000")]
    ticks: u64,

    /// Print a line every this many ticks
    #[arg(long, default_value = "1000")]
    every: u64,

    /// Keep the fixed open loop throttle from the settings
    #[arg(long)]
    open_loop: bool,

    /// Starting altitude in metres
    #[arg(long, default_value = "0.0")]
    altitude: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let params = VehicleParams::default();
    if !args.open_loop {
        settings.command_mode = CommandMode::ClosedLoop {
            base_throttle: params.hover_throttle(),
        };
    }

    let vehicle = SimulatedMulticopter::new(params, settings.tick).with_altitude(args.altitude);
    let mut control = ControlLoop::from_settings(vehicle, &settings)?;

    println!("     time, altitude,    error, integral,  command,   motors");
    for tick in 0..args.ticks {
        let report = control.tick()?;
        if tick % args.every.max(1) == 0 {
            println!(
                "{:-9.3}, {:-8.3}, {:-8.3}, {:-8.3}, {:-8.3}, {:-8.3}",
                report.time,
                report.state.altitude(),
                report.output.error,
                report.output.integral,
                report.output.command,
                report.command.mean()
            );
        }
    }
    control.shutdown()?;

    let state = control.link().state();
    println!(
        "Final altitude {:.3} m, climb rate {:.3} m/s after {:.1} s",
        state.altitude(),
        state.climb_rate(),
        state.time
    );
    Ok(())
}
