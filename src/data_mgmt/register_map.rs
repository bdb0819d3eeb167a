//! Register map of the air conditioner controller.
//!
//! The table binds every named signal to a bit offset inside the coil read and
//! every measurement to a byte offset inside the holding-register read. The
//! decoder consults this table only; it holds no addresses of its own.

use super::decode::FieldError;
use super::models::{Measurement, Signal, MEASUREMENT_COUNT, SIGNAL_COUNT};

/// A contiguous read issued once per poll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadWindow {
    pub address: u16,
    pub count: u16,
}

#[derive(Clone, Copy, Debug)]
pub struct RegisterMap {
    pub coils: ReadWindow,
    pub holding_registers: ReadWindow,
    /// Signal -> bit offset within the coil read
    pub signals: &'static [(Signal, usize)],
    /// Measurement -> byte offset within the holding-register read (2 bytes, big-endian)
    pub measurements: &'static [(Measurement, usize)],
}

pub const AC_REGISTER_MAP: RegisterMap = RegisterMap {
    coils: ReadWindow {
        address: 1,
        count: 32,
    },
    holding_registers: ReadWindow {
        address: 3,
        count: 3,
    },
    signals: &[
        (Signal::FanProtect, 0),
        (Signal::FanPressureSwitch, 1),
        (Signal::PhaseProtect, 2),
        (Signal::FireLinkage, 3),
        (Signal::HeaterOverheat, 4),
        (Signal::RemoteSwitch, 5),
        (Signal::HumidifierFault, 6),
        (Signal::Comp1HighPressure, 7),
        (Signal::Comp1LowPressure, 8),
        (Signal::Comp1Overload, 9),
        (Signal::Cond1Overload, 10),
        (Signal::Comp2HighPressure, 11),
        (Signal::Comp2LowPressure, 12),
        (Signal::Comp2Overload, 13),
        (Signal::Cond2Overload, 14),
        (Signal::RunSignal, 15),
        (Signal::FaultSignal, 16),
        (Signal::Valve, 17),
        (Signal::SupplyFan, 18),
        (Signal::Comp1, 19),
        (Signal::Cond1, 20),
        (Signal::Comp2, 21),
        (Signal::Cond2, 22),
        (Signal::Heater1, 23),
        (Signal::Heater2, 24),
    ],
    measurements: &[
        (Measurement::SupplyTemp, 0),
        (Measurement::IndoorTemp, 2),
        (Measurement::IndoorHumidity, 4),
    ],
};

impl RegisterMap {
    /// Bytes of coil data needed to cover the highest mapped bit
    pub fn discrete_bytes_needed(&self) -> usize {
        self.signals
            .iter()
            .map(|(_, bit)| bit + 1)
            .max()
            .unwrap_or(0)
            .div_ceil(8)
    }

    /// Bytes of register data needed to cover the highest mapped word
    pub fn register_bytes_needed(&self) -> usize {
        self.measurements
            .iter()
            .map(|(_, offset)| offset + 2)
            .max()
            .unwrap_or(0)
    }

    /// Check the table binds every field exactly once and inside its read window
    pub fn validate(&self) -> Result<(), FieldError> {
        let mut seen_signals = [false; SIGNAL_COUNT];
        for (signal, bit) in self.signals {
            if std::mem::replace(&mut seen_signals[signal.slot()], true) {
                return Err(FieldError::DuplicateBinding(signal.name()));
            }
            if *bit >= self.coils.count as usize {
                return Err(FieldError::OutsideReadWindow {
                    field: signal.name(),
                    offset: *bit,
                });
            }
        }
        if let Some(missing) = Signal::ALL.iter().find(|s| !seen_signals[s.slot()]) {
            return Err(FieldError::Unmapped(missing.name()));
        }

        let mut seen_measurements = [false; MEASUREMENT_COUNT];
        for (measurement, offset) in self.measurements {
            if std::mem::replace(&mut seen_measurements[measurement.slot()], true) {
                return Err(FieldError::DuplicateBinding(measurement.name()));
            }
            if offset + 2 > self.holding_registers.count as usize * 2 {
                return Err(FieldError::OutsideReadWindow {
                    field: measurement.name(),
                    offset: *offset,
                });
            }
        }
        if let Some(missing) = Measurement::ALL
            .iter()
            .find(|m| !seen_measurements[m.slot()])
        {
            return Err(FieldError::Unmapped(missing.name()));
        }

        Ok(())
    }
}
