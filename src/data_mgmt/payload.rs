use serde::Serialize;

use super::models::AcStatus;

/// Body of one report sent to the collector
#[derive(Debug, Serialize)]
pub struct ReportEnvelope {
    #[serde(rename = "agentID")]
    pub agent_id: i64,
    /// Unix seconds captured when the poll started
    pub timestamp: i64,
    pub message: AcStatus,
}

impl ReportEnvelope {
    pub fn new(agent_id: i64, timestamp: i64, message: AcStatus) -> Self {
        ReportEnvelope {
            agent_id,
            timestamp,
            message,
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
