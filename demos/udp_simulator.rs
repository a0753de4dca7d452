// demos/udp_simulator.rs

use altitude_hold::vehicle::UdpMulticopter;
use altitude_hold::{ControlLoop, Settings};
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Holds altitude against a multicopter simulator reached over UDP.
///
/// Press Enter to stop; the motors receive the safe command before exit.
/// Without an interactive stdin the run lasts until `--ticks` is used up.
#[derive(Parser, Debug)]
#[command(name = "udp_simulator")]
struct Args {
    /// JSON settings file; defaults are used when omitted
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Override the simulator host
    #[arg(long)]
    host: Option<String>,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(host) = args.host {
        settings.link.host = host;
    }
    if args.ticks.is_some() {
        settings.max_ticks = args.ticks;
    }
    settings.realtime = true;

    let link = UdpMulticopter::connect(&settings.link)?;
    println!(
        "Sending motors to {}:{}, telemetry on port {}",
        settings.link.host, settings.link.motor_port, settings.link.telemetry_port
    );
    let mut control = ControlLoop::from_settings(link, &settings)?;

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    thread::spawn(move || {
        let mut line = String::new();
        // A closed stdin leaves the run to the tick budget.
        let read = std::io::stdin().lock().read_line(&mut line);
        if matches!(read, Ok(count) if count > 0) {
            flag.store(true, Ordering::Release);
        }
    });

    let summary = control.run(&stop)?;
    println!(
        "Stopped ({:?}) after {} ticks, {} with the integrator saturated",
        summary.reason, summary.ticks, summary.saturated_ticks
    );
    if let Some(last) = summary.last {
        println!(
            "Last altitude {:.3} m, error {:.3}",
            last.state.altitude(),
            last.output.error
        );
    }
    Ok(())
}
