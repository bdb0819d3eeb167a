use anyhow::Result;
use flume::Receiver;

use ac_agent::data_mgmt::{Reporter, AC_REGISTER_MAP};
use ac_agent::helpers::schedule::{run_schedule, Schedule};
use ac_agent::interfaces::http_api::CollectorClient;
use ac_agent::node_mgmt::AgentConfig;
use ac_agent::readers::modbus_rtu::{SerialConnector, SerialLineConfig};

/// Poll and report on a fixed interval until a shutdown signal arrives
pub fn run(shutdown: Receiver<()>) -> Result<()> {
    let config = AgentConfig::from_env()?;
    log::debug!("Configuration: {:?}", config);

    let line = SerialLineConfig::for_device(&config.device_path);
    let collector =
        CollectorClient::new(&config.collector_url, &config.api_key, config.http_timeout);
    log::info!(
        "Agent {} reporting from {} to {} every {:?}{}",
        config.agent_id,
        line,
        collector.report_url(),
        config.poll_interval,
        if config.poll_roundtime { " (clock-aligned)" } else { "" }
    );

    let reporter = Reporter::new(
        SerialConnector::new(line),
        collector,
        config.agent_id,
        &AC_REGISTER_MAP,
    )?;

    // Ticks block on serial and HTTP I/O; a single-threaded runtime only drives the timer
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let schedule = Schedule::new(config.poll_interval, config.poll_roundtime);
    runtime.block_on(run_schedule(&schedule, &shutdown, || {
        reporter.tick();
    }));

    log::info!("Have a good day!");
    Ok(())
}
