pub mod client;
pub mod config;
pub mod control;
pub mod defaults;

use std::time::Duration;

use serialport::SerialPort;
use thiserror::Error;

pub use client::RtuClient;
pub use config::SerialLineConfig;
pub use control::AcController;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("could not open device {path}: {source}")]
    Connect {
        path: String,
        #[source]
        source: serialport::Error,
    },
    #[error("unit {unit_id} did not answer within {timeout:?}")]
    Timeout { unit_id: u8, timeout: Duration },
    #[error("malformed response: {0}")]
    Frame(String),
    #[error("modbus error: {0}")]
    Modbus(#[from] rmodbus::ErrorKind),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Blocking register-level access to one Modbus unit
pub trait RegisterIo {
    /// Read `count` coils starting at `address`; packed LSB-first, `ceil(count/8)` bytes
    fn read_coils(&mut self, address: u16, count: u16) -> Result<Vec<u8>, TransportError>;

    /// Read `count` discrete inputs starting at `address`; same packing as coils
    fn read_discrete_inputs(&mut self, address: u16, count: u16) -> Result<Vec<u8>, TransportError>;

    /// Read `count` holding registers; `2 * count` bytes in device (big-endian) order
    fn read_holding_registers(&mut self, address: u16, count: u16)
        -> Result<Vec<u8>, TransportError>;

    fn write_single_coil(&mut self, address: u16, value: bool) -> Result<(), TransportError>;

    fn write_single_register(&mut self, address: u16, value: u16) -> Result<(), TransportError>;
}

/// Source of fresh device handles.
///
/// The reporting pipeline asks for a new handle on every tick and drops it when
/// the tick ends, so a dead line is reopened on the next tick.
pub trait Connector {
    type Io: RegisterIo;

    fn connect(&self) -> Result<Self::Io, TransportError>;
}

/// Opens the controller's serial line with the device profile settings
#[derive(Clone, Debug)]
pub struct SerialConnector {
    config: SerialLineConfig,
}

impl SerialConnector {
    pub fn new(config: SerialLineConfig) -> Self {
        SerialConnector { config }
    }
}

impl Connector for SerialConnector {
    type Io = RtuClient<Box<dyn SerialPort>>;

    fn connect(&self) -> Result<Self::Io, TransportError> {
        RtuClient::open(&self.config)
    }
}
