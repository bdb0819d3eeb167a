use anyhow::Result;

use ac_agent::data_mgmt::{report::poll_status, AC_REGISTER_MAP};
use ac_agent::node_mgmt::device_path_from_env;
use ac_agent::readers::modbus_rtu::{SerialConnector, SerialLineConfig};

/// Read the controller once and print the decoded status as JSON
pub fn status() -> Result<()> {
    let connector = SerialConnector::new(SerialLineConfig::for_device(device_path_from_env()?));
    let status = poll_status(&connector, &AC_REGISTER_MAP)?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
