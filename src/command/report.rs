use anyhow::{anyhow, Result};

use ac_agent::data_mgmt::{Reporter, AC_REGISTER_MAP};
use ac_agent::interfaces::http_api::CollectorClient;
use ac_agent::node_mgmt::AgentConfig;
use ac_agent::readers::modbus_rtu::{SerialConnector, SerialLineConfig};

/// Run a single tick now, for use from an external scheduler
pub fn report() -> Result<()> {
    let config = AgentConfig::from_env()?;
    let reporter = Reporter::new(
        SerialConnector::new(SerialLineConfig::for_device(&config.device_path)),
        CollectorClient::new(&config.collector_url, &config.api_key, config.http_timeout),
        config.agent_id,
        &AC_REGISTER_MAP,
    )?;

    let delivery = reporter
        .run_tick()
        .map_err(|e| anyhow!("Report failed at {} stage: {}", e.stage(), e))?;
    log::info!("Report accepted by collector: {}", delivery.response);
    Ok(())
}
