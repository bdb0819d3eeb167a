#![allow(dead_code)]
// Not every test binary uses every helper

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::rc::Rc;
use std::time::Duration;

use rmodbus::server::context::ModbusContext;
use rmodbus::server::storage::ModbusStorageSmall;
use rmodbus::server::ModbusFrame;
use rmodbus::ModbusProto;

use ac_agent::readers::modbus_rtu::{Connector, RtuClient, TransportError};

pub const UNIT_ID: u8 = 1;
const REQUEST_LEN: usize = 8;
const COIL_START: u16 = 1;

#[derive(Clone, Debug, PartialEq)]
pub enum DeviceWrite {
    Coil(u16, bool),
    Register(u16, u16),
}

/// Register contents and behaviour of the simulated controller
#[derive(Default)]
pub struct ControllerState {
    pub storage: ModbusStorageSmall,
    /// Function codes the controller never answers
    pub silent_functions: Vec<u8>,
    /// Delay before each reply
    pub reply_delay: Duration,
    /// Function codes of every request received, in order
    pub requests: Vec<u8>,
    pub writes: Vec<DeviceWrite>,
}

impl ControllerState {
    /// Controller with `coil_bytes` packed from coil 1 and supply/indoor
    /// temperature and humidity in registers 3..=5
    pub fn with_readings(coil_bytes: &[u8], readings: [u16; 3]) -> Self {
        let mut state = ControllerState::default();
        for (index, byte) in coil_bytes.iter().enumerate() {
            for bit in 0..8 {
                let address = COIL_START + (index * 8 + bit) as u16;
                state
                    .storage
                    .set_coil(address, (byte >> bit) & 1 == 1)
                    .unwrap();
            }
        }
        for (offset, value) in readings.into_iter().enumerate() {
            state.storage.set_holding(3 + offset as u16, value).unwrap();
        }
        state
    }
}

/// In-memory RTU line answering from the controller's register storage
pub struct SimulatedLine {
    state: Rc<RefCell<ControllerState>>,
    pending: Vec<u8>,
    replies: VecDeque<u8>,
}

impl SimulatedLine {
    fn handle(&mut self, request: &[u8]) {
        let mut state = self.state.borrow_mut();
        let function = request[1];
        let address = u16::from_be_bytes([request[2], request[3]]);
        let word = u16::from_be_bytes([request[4], request[5]]);

        state.requests.push(function);
        match function {
            0x05 => state.writes.push(DeviceWrite::Coil(address, word == 0xFF00)),
            0x06 => state.writes.push(DeviceWrite::Register(address, word)),
            _ => {}
        }
        if state.silent_functions.contains(&function) {
            return;
        }
        std::thread::sleep(state.reply_delay);

        let mut response = Vec::new();
        let mut frame = ModbusFrame::new(UNIT_ID, request, ModbusProto::Rtu, &mut response);
        frame.parse().expect("controller received a malformed request");
        if frame.processing_required {
            if frame.readonly {
                frame.process_read(&state.storage).unwrap();
            } else {
                frame.process_write(&mut state.storage).unwrap();
            }
        }
        if frame.response_required {
            frame.finalize_response().unwrap();
        }
        self.replies.extend(response);
    }
}

impl Read for SimulatedLine {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.replies.is_empty() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "operation timed out"));
        }
        let n = buf.len().min(self.replies.len());
        for (slot, byte) in buf.iter_mut().zip(self.replies.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for SimulatedLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while self.pending.len() >= REQUEST_LEN {
            let request: Vec<u8> = self.pending.drain(..REQUEST_LEN).collect();
            self.handle(&request);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Hands out fresh RTU clients on the simulated line and counts connections
pub struct SimulatedConnector {
    pub state: Rc<RefCell<ControllerState>>,
    pub connects: Cell<usize>,
    pub unplugged: Cell<bool>,
}

impl SimulatedConnector {
    pub fn new(state: ControllerState) -> Self {
        SimulatedConnector {
            state: Rc::new(RefCell::new(state)),
            connects: Cell::new(0),
            unplugged: Cell::new(false),
        }
    }

    pub fn requests(&self) -> Vec<u8> {
        self.state.borrow().requests.clone()
    }
}

impl Connector for &SimulatedConnector {
    type Io = RtuClient<SimulatedLine>;

    fn connect(&self) -> Result<Self::Io, TransportError> {
        self.connects.set(self.connects.get() + 1);
        if self.unplugged.get() {
            return Err(TransportError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "No such file or directory",
            )));
        }
        let line = SimulatedLine {
            state: Rc::clone(&self.state),
            pending: Vec::new(),
            replies: VecDeque::new(),
        };
        Ok(RtuClient::new(line, UNIT_ID, Duration::from_secs(2)))
    }
}
