//! Device control: run/stop commands and setpoint writes.
//!
//! Control is only exercised from explicit CLI commands. The reporting
//! pipeline never writes to the device.

use super::{RegisterIo, TransportError};

/// Writing ON to this coil starts the unit
pub const START_COIL: u16 = 0;
/// Writing ON to this coil stops the unit
pub const STOP_COIL: u16 = 1;
pub const TEMPERATURE_SETPOINT_REGISTER: u16 = 6;
pub const HUMIDITY_SETPOINT_REGISTER: u16 = 7;

pub struct AcController<Io> {
    io: Io,
}

impl<Io: RegisterIo> AcController<Io> {
    pub fn new(io: Io) -> Self {
        AcController { io }
    }

    pub fn start(&mut self) -> Result<(), TransportError> {
        log::info!("Sending start command");
        self.io.write_single_coil(START_COIL, true)
    }

    pub fn stop(&mut self) -> Result<(), TransportError> {
        log::info!("Sending stop command");
        self.io.write_single_coil(STOP_COIL, true)
    }

    /// Setpoint in raw device units; no scaling is applied
    pub fn set_temperature(&mut self, value: u16) -> Result<(), TransportError> {
        log::info!("Setting temperature setpoint to {}", value);
        self.io
            .write_single_register(TEMPERATURE_SETPOINT_REGISTER, value)
    }

    /// Setpoint in raw device units; no scaling is applied
    pub fn set_humidity(&mut self, value: u16) -> Result<(), TransportError> {
        log::info!("Setting humidity setpoint to {}", value);
        self.io.write_single_register(HUMIDITY_SETPOINT_REGISTER, value)
    }

    pub fn into_inner(self) -> Io {
        self.io
    }
}
