//! One poll-decode-report cycle.
//!
//! Each tick opens the device, reads coils then holding registers, decodes,
//! wraps the record in an envelope and POSTs it. Any stage failing ends the
//! tick; nothing carries over to the next one.

use std::fmt;

use thiserror::Error;

use crate::helpers::now_epoch;
use crate::interfaces::http_api::{CollectorClient, CollectorError};
use crate::readers::modbus_rtu::{Connector, RegisterIo, TransportError};

use super::decode::{self, FieldError};
use super::models::AcStatus;
use super::payload::ReportEnvelope;
use super::register_map::RegisterMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Acquire,
    Read,
    Decode,
    Serialize,
    Send,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Acquire => "acquire",
            Stage::Read => "read",
            Stage::Decode => "decode",
            Stage::Serialize => "serialize",
            Stage::Send => "send",
        })
    }
}

#[derive(Error, Debug)]
pub enum TickError {
    #[error("device unavailable: {0}")]
    Acquire(#[source] TransportError),
    #[error("coil read failed: {0}")]
    ReadCoils(#[source] TransportError),
    #[error("holding register read failed: {0}")]
    ReadRegisters(#[source] TransportError),
    #[error("device data does not match register map: {0}")]
    Decode(#[from] FieldError),
    #[error("could not serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Send(#[from] CollectorError),
}

impl TickError {
    pub fn stage(&self) -> Stage {
        match self {
            TickError::Acquire(_) => Stage::Acquire,
            TickError::ReadCoils(_) | TickError::ReadRegisters(_) => Stage::Read,
            TickError::Decode(_) => Stage::Decode,
            TickError::Serialize(_) => Stage::Serialize,
            TickError::Send(_) => Stage::Send,
        }
    }
}

/// Outcome of a delivered report
#[derive(Debug)]
pub struct Delivery {
    pub timestamp: i64,
    pub status: AcStatus,
    pub response: String,
}

pub struct Reporter<C> {
    connector: C,
    collector: CollectorClient,
    agent_id: i64,
    map: &'static RegisterMap,
}

impl<C: Connector> Reporter<C> {
    pub fn new(
        connector: C,
        collector: CollectorClient,
        agent_id: i64,
        map: &'static RegisterMap,
    ) -> Result<Self, FieldError> {
        map.validate()?;
        Ok(Reporter {
            connector,
            collector,
            agent_id,
            map,
        })
    }

    /// Open the device, read both tables and decode. The handle is dropped on
    /// return, so every call starts from a fresh connection.
    pub fn poll_status(&self) -> Result<AcStatus, TickError> {
        poll_status(&self.connector, self.map)
    }

    /// Run one tick and report what happened to the caller
    pub fn run_tick(&self) -> Result<Delivery, TickError> {
        let timestamp = now_epoch();

        let status = self.poll_status()?;
        log::debug!("Decoded status: {:?}", status);

        let envelope = ReportEnvelope::new(self.agent_id, timestamp, status);
        let body = envelope.to_json()?;

        let response = self.collector.send_report(&body)?;
        Ok(Delivery {
            timestamp,
            status: envelope.message,
            response,
        })
    }

    /// Run one tick, logging the outcome. Never fails.
    pub fn tick(&self) -> bool {
        match self.run_tick() {
            Ok(delivery) => {
                log::info!(
                    "Report for {} accepted by collector: {}",
                    delivery.timestamp,
                    delivery.response
                );
                true
            }
            Err(e) => {
                log_tick_error(&e);
                false
            }
        }
    }
}

pub fn poll_status<C: Connector>(
    connector: &C,
    map: &RegisterMap,
) -> Result<AcStatus, TickError> {
    let mut io = connector.connect().map_err(TickError::Acquire)?;

    let bits = io
        .read_coils(map.coils.address, map.coils.count)
        .map_err(TickError::ReadCoils)?;
    let words = io
        .read_holding_registers(map.holding_registers.address, map.holding_registers.count)
        .map_err(TickError::ReadRegisters)?;

    Ok(decode::decode(map, &bits, &words)?)
}

fn log_tick_error(e: &TickError) {
    match e {
        TickError::Send(CollectorError::Status { .. }) => {
            log::warn!("Tick failed at {} stage: {}", e.stage(), e)
        }
        TickError::Decode(_) => log::error!(
            "Tick failed at {} stage, check controller firmware against the register map: {}",
            e.stage(),
            e
        ),
        _ => log::error!("Tick failed at {} stage: {}", e.stage(), e),
    }
}
