// demos/fixed_point.rs

use altitude_hold::{AltitudeController, ControllerConfig};
use fixed::types::I16F16;

fn main() {
    let mut config = ControllerConfig::<I16F16>::new();

    // Set the PID gains.
    config.kp = I16F16::from_num(0.4);
    config.ki = I16F16::from_num(0.03);
    config.kd = I16F16::from_num(10.0);

    // Set the tick and the leaky integrator shape.
    config.tick = I16F16::from_num(0.01);
    config.integral_time_constant = I16F16::from_num(0.1);
    config.integral_radius = I16F16::from_num(2.0);

    let mut controller = match AltitudeController::with_config(config) {
        Ok(controller) => controller,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            return;
        }
    };

    // Point mass plant; the command is taken as a vertical acceleration.
    let set_point = I16F16::from_num(10.0);
    let dt = config.tick;
    let mut altitude = I16F16::ZERO;
    let mut climb_rate = I16F16::ZERO;

    println!("     time, altitude,    error, integral,  command");
    for tick in 0..6000 {
        let output = controller.step(set_point, altitude, climb_rate);
        if tick % 500 == 0 {
            println!(
                "{:-9.3}, {:-8.3}, {:-8.3}, {:-8.3}, {:-8.3}",
                tick as f64 * dt.to_num::<f64>(),
                altitude.to_num::<f64>(),
                output.error.to_num::<f64>(),
                output.integral.to_num::<f64>(),
                output.command.to_num::<f64>()
            );
        }
        climb_rate += output.command * dt;
        altitude += climb_rate * dt;
    }
}
