use std::io::{self, Read, Write};
use std::time::Duration;

use rmodbus::client::ModbusRequest;
use rmodbus::{guess_response_frame_len, ModbusProto};
use serialport::SerialPort;

use super::config::SerialLineConfig;
use super::{RegisterIo, TransportError};

pub const MAX_BIT_COUNT: u16 = 2000;
pub const MAX_REGISTER_COUNT: u16 = 125;

/// Unit, function and byte count (or exception code); enough to size the rest
const RESPONSE_HEAD_LEN: usize = 3;
const CRC_LEN: usize = 2;
/// Unit, function, address and value of a single write
const ECHO_LEN: usize = 6;

/// Modbus RTU client bound to a single unit on a half-duplex line.
///
/// Every transaction takes `&mut self`, so a handle can never have two
/// requests in flight. The underlying port is closed when the client is dropped.
pub struct RtuClient<T> {
    port: T,
    unit_id: u8,
    timeout: Duration,
}

impl RtuClient<Box<dyn SerialPort>> {
    /// Open the serial device with the fixed line parameters
    pub fn open(config: &SerialLineConfig) -> Result<Self, TransportError> {
        log::debug!("Opening RTU line {}", config);

        let port = serialport::new(&config.path, config.baud_rate)
            .data_bits(config.data_bits)
            .parity(config.parity)
            .stop_bits(config.stop_bits)
            .flow_control(config.flow_control)
            .timeout(config.timeout)
            .open()
            .map_err(|source| TransportError::Connect {
                path: config.path.clone(),
                source,
            })?;

        Ok(RtuClient::new(port, config.unit_id, config.timeout))
    }
}

impl<T: Read + Write> RtuClient<T> {
    /// Wrap an already opened port. `timeout` is the bound the port enforces
    /// on reads and is only used for reporting.
    pub fn new(port: T, unit_id: u8, timeout: Duration) -> Self {
        RtuClient {
            port,
            unit_id,
            timeout,
        }
    }

    pub fn into_inner(self) -> T {
        self.port
    }

    fn request(&self) -> ModbusRequest {
        ModbusRequest::new(self.unit_id, ModbusProto::Rtu)
    }

    /// Send a generated request and return the response once rmodbus has
    /// checked its CRC, unit, function and exception flag
    fn transact(
        &mut self,
        request: &ModbusRequest,
        adu: &[u8],
    ) -> Result<Vec<u8>, TransportError> {
        log::trace!("RTU tx {}", hex::encode(adu));
        self.port.write_all(adu)?;
        self.port.flush()?;

        let response = self.read_response()?;
        log::trace!("RTU rx {}", hex::encode(&response));

        request.parse_ok(&response)?;
        Ok(response)
    }

    fn read_response(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut response = vec![0u8; RESPONSE_HEAD_LEN];
        self.read_exact(&mut response)?;

        let frame_len = guess_response_frame_len(&response, ModbusProto::Rtu)? as usize;
        response.resize(frame_len.max(RESPONSE_HEAD_LEN), 0);
        self.read_exact(&mut response[RESPONSE_HEAD_LEN..])?;
        Ok(response)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        self.port.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportError::Timeout {
                unit_id: self.unit_id,
                timeout: self.timeout,
            },
            io::ErrorKind::UnexpectedEof => {
                TransportError::Frame("short read, line closed mid-frame".into())
            }
            _ => TransportError::Io(e),
        })
    }
}

fn check_count(what: &str, count: u16, max: u16) -> Result<(), TransportError> {
    if count == 0 || count > max {
        return Err(TransportError::InvalidRequest(format!(
            "{what} count must be within 1..={max}, got {count}"
        )));
    }
    Ok(())
}

/// Data bytes of a read response, which must be exactly `expected` long
fn read_data(response: &[u8], expected: usize) -> Result<Vec<u8>, TransportError> {
    let data = &response[RESPONSE_HEAD_LEN..response.len() - CRC_LEN];
    if data.len() != expected {
        return Err(TransportError::Frame(format!(
            "expected {expected} data bytes, response carries {}",
            data.len()
        )));
    }
    Ok(data.to_vec())
}

/// A single write is acknowledged by echoing the request
fn check_echo(response: &[u8], adu: &[u8]) -> Result<(), TransportError> {
    if response.len() < ECHO_LEN || response[..ECHO_LEN] != adu[..ECHO_LEN] {
        return Err(TransportError::Frame(format!(
            "write echo {} does not match request {}",
            hex::encode(response),
            hex::encode(adu)
        )));
    }
    Ok(())
}

impl<T: Read + Write> RegisterIo for RtuClient<T> {
    fn read_coils(&mut self, address: u16, count: u16) -> Result<Vec<u8>, TransportError> {
        check_count("coil", count, MAX_BIT_COUNT)?;
        let mut request = self.request();
        let mut adu = Vec::with_capacity(8);
        request.generate_get_coils(address, count, &mut adu)?;
        let response = self.transact(&request, &adu)?;
        read_data(&response, (count as usize).div_ceil(8))
    }

    fn read_discrete_inputs(&mut self, address: u16, count: u16) -> Result<Vec<u8>, TransportError> {
        check_count("discrete input", count, MAX_BIT_COUNT)?;
        let mut request = self.request();
        let mut adu = Vec::with_capacity(8);
        request.generate_get_discretes(address, count, &mut adu)?;
        let response = self.transact(&request, &adu)?;
        read_data(&response, (count as usize).div_ceil(8))
    }

    fn read_holding_registers(
        &mut self,
        address: u16,
        count: u16,
    ) -> Result<Vec<u8>, TransportError> {
        check_count("holding register", count, MAX_REGISTER_COUNT)?;
        let mut request = self.request();
        let mut adu = Vec::with_capacity(8);
        request.generate_get_holdings(address, count, &mut adu)?;
        let response = self.transact(&request, &adu)?;
        read_data(&response, count as usize * 2)
    }

    fn write_single_coil(&mut self, address: u16, value: bool) -> Result<(), TransportError> {
        let mut request = self.request();
        let mut adu = Vec::with_capacity(8);
        request.generate_set_coil(address, value, &mut adu)?;
        let response = self.transact(&request, &adu)?;
        check_echo(&response, &adu)
    }

    fn write_single_register(&mut self, address: u16, value: u16) -> Result<(), TransportError> {
        let mut request = self.request();
        let mut adu = Vec::with_capacity(8);
        request.generate_set_holding(address, value, &mut adu)?;
        let response = self.transact(&request, &adu)?;
        check_echo(&response, &adu)
    }
}
