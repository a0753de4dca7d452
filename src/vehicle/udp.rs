// src/vehicle/udp.rs

//! # UDP Multicopter Link
//!
//! Talks to the multicopter simulator over two UDP sockets. Motor commands go
//! out as four little-endian `f64` values to the simulator's motor port;
//! telemetry comes back as [`TELEMETRY_LEN`] little-endian `f64` values on the
//! telemetry port.
//!
//! The simulator streams telemetry faster than one datagram per tick, so a read
//! blocks for the first datagram and then drains anything already queued,
//! keeping only the newest snapshot.

use super::{ActuatorSink, MotorCommand, TelemetrySource, VehicleState, MOTOR_COUNT, TELEMETRY_LEN};
use crate::{CommunicationError, LinkSettings};
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

const VALUE_SIZE: usize = std::mem::size_of::<f64>();

/// UDP link to a running multicopter simulator.
#[derive(Debug)]
pub struct UdpMulticopter {
    motor_socket: UdpSocket,
    motor_addr: SocketAddr,
    telemetry_socket: UdpSocket,
    timeout: Duration,
}

impl UdpMulticopter {
    /// Binds the telemetry port on `bind_host` and resolves the simulator's motor address on `host`.
    pub fn connect(settings: &LinkSettings) -> Result<Self, CommunicationError> {
        let timeout = settings.timeout();
        let motor_addr = (settings.host.as_str(), settings.motor_port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                CommunicationError::Disconnected(format!("unable to resolve {}", settings.host))
            })?;

        let telemetry_socket = UdpSocket::bind((settings.bind_host.as_str(), settings.telemetry_port))?;
        telemetry_socket.set_read_timeout(Some(timeout))?;
        let motor_socket = UdpSocket::bind(("0.0.0.0", 0))?;

        log::info!(
            "Connected to simulator: motors -> {}, telemetry <- {}",
            motor_addr,
            telemetry_socket.local_addr()?
        );

        Ok(Self {
            motor_socket,
            motor_addr,
            telemetry_socket,
            timeout,
        })
    }

    /// Address the telemetry socket is bound to.
    pub fn telemetry_addr(&self) -> Result<SocketAddr, CommunicationError> {
        Ok(self.telemetry_socket.local_addr()?)
    }

    fn drain_latest(&self, buffer: &mut [u8], mut len: usize) -> io::Result<usize> {
        self.telemetry_socket.set_nonblocking(true)?;
        let mut scratch = [0u8; TELEMETRY_LEN * VALUE_SIZE * 2];
        let drained = loop {
            match self.telemetry_socket.recv(&mut scratch) {
                Ok(received) => {
                    buffer[..received].copy_from_slice(&scratch[..received]);
                    len = received;
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break Ok(len),
                Err(err) => break Err(err),
            }
        };
        self.telemetry_socket.set_nonblocking(false)?;
        drained
    }
}

/// Decodes consecutive little-endian `f64` values; a trailing partial value is dropped.
pub fn decode_values(bytes: &[u8]) -> Vec<f64> {
    bytes
        .chunks_exact(VALUE_SIZE)
        .map(|chunk| {
            let mut raw = [0u8; VALUE_SIZE];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect()
}

/// Encodes values as consecutive little-endian `f64`.
pub fn encode_values(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

impl TelemetrySource for UdpMulticopter {
    fn read_state(&mut self) -> Result<VehicleState, CommunicationError> {
        let mut buffer = [0u8; TELEMETRY_LEN * VALUE_SIZE * 2];
        let received = self
            .telemetry_socket
            .recv(&mut buffer)
            .map_err(|err| CommunicationError::from_io(err, self.timeout))?;
        let received = self.drain_latest(&mut buffer, received)?;

        VehicleState::from_values(&decode_values(&buffer[..received]))
    }
}

impl ActuatorSink for UdpMulticopter {
    fn send_motors(&mut self, command: &MotorCommand) -> Result<(), CommunicationError> {
        let payload = encode_values(command.channels());
        let sent = self.motor_socket.send_to(&payload, self.motor_addr)?;
        if sent != MOTOR_COUNT * VALUE_SIZE {
            return Err(CommunicationError::Disconnected(format!(
                "short motor datagram: {sent} bytes"
            )));
        }
        Ok(())
    }
}
