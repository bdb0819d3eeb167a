//! Serial line configuration for the controller's RTU port
//!
//! The device profile fixes every line parameter; only the device path comes
//! from the agent configuration.

use std::fmt;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, StopBits};

use super::defaults;

#[derive(Clone, Debug)]
pub struct SerialLineConfig {
    pub path: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    pub unit_id: u8,
    pub timeout: Duration,
}

impl SerialLineConfig {
    /// Line settings of the air conditioner controller on `path`
    pub fn for_device(path: impl Into<String>) -> Self {
        SerialLineConfig {
            path: path.into(),
            baud_rate: defaults::BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            unit_id: defaults::UNIT_ID,
            timeout: defaults::TIMEOUT,
        }
    }
}

impl fmt::Display for SerialLineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data_bits = match self.data_bits {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        };
        let stop_bits = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Odd => 'O',
            Parity::Even => 'E',
        };
        write!(
            f,
            "{} {} {}{}{} unit {}",
            self.path,
            self.baud_rate,
            data_bits,
            parity,
            stop_bits,
            self.unit_id
        )
    }
}
