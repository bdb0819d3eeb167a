//! Raw coil/register buffers to [`AcStatus`].
//!
//! Decoding is a pure function of the register map and the two buffers.
//! A buffer too short for the map is an error; unreachable bits are never
//! read as `false`.

use thiserror::Error;

use super::models::{
    AcStatus, DiscreteStatus, Measurement, Measurements, Signal, MEASUREMENT_COUNT, SIGNAL_COUNT,
};
use super::register_map::RegisterMap;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FieldError {
    #[error("insufficient discrete data: need {needed} bytes, got {actual}")]
    InsufficientDiscrete { needed: usize, actual: usize },
    #[error("insufficient register data: need {needed} bytes, got {actual}")]
    InsufficientRegisters { needed: usize, actual: usize },
    #[error("register map leaves '{0}' unbound")]
    Unmapped(&'static str),
    #[error("register map binds '{0}' more than once")]
    DuplicateBinding(&'static str),
    #[error("register map places '{field}' at offset {offset}, outside the read window")]
    OutsideReadWindow { field: &'static str, offset: usize },
}

fn bit_at(bits: &[u8], index: usize) -> bool {
    (bits[index / 8] >> (index % 8)) & 1 == 1
}

pub fn decode_discrete(map: &RegisterMap, bits: &[u8]) -> Result<DiscreteStatus, FieldError> {
    let needed = map.discrete_bytes_needed();
    if bits.len() < needed {
        return Err(FieldError::InsufficientDiscrete {
            needed,
            actual: bits.len(),
        });
    }

    let mut values = [None; SIGNAL_COUNT];
    for (signal, index) in map.signals {
        values[signal.slot()] = Some(bit_at(bits, *index));
    }

    let mut decoded = [false; SIGNAL_COUNT];
    for (slot, value) in values.into_iter().enumerate() {
        decoded[slot] = value.ok_or(FieldError::Unmapped(Signal::ALL[slot].name()))?;
    }
    Ok(DiscreteStatus::from_values(decoded))
}

pub fn decode_words(map: &RegisterMap, words: &[u8]) -> Result<Measurements, FieldError> {
    let needed = map.register_bytes_needed();
    if words.len() < needed {
        return Err(FieldError::InsufficientRegisters {
            needed,
            actual: words.len(),
        });
    }

    let mut values = [None; MEASUREMENT_COUNT];
    for (measurement, offset) in map.measurements {
        values[measurement.slot()] = Some(u16::from_be_bytes([words[*offset], words[offset + 1]]));
    }

    let mut decoded = [0u16; MEASUREMENT_COUNT];
    for (slot, value) in values.into_iter().enumerate() {
        decoded[slot] = value.ok_or(FieldError::Unmapped(Measurement::ALL[slot].name()))?;
    }
    Ok(Measurements::from_values(decoded))
}

/// Decode a full status record from one coil read and one register read
pub fn decode(map: &RegisterMap, bits: &[u8], words: &[u8]) -> Result<AcStatus, FieldError> {
    let discrete = decode_discrete(map, bits)?;
    let measurements = decode_words(map, words)?;
    Ok(AcStatus::new(discrete, measurements))
}
