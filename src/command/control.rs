use anyhow::Result;

use ac_agent::node_mgmt::device_path_from_env;
use ac_agent::readers::modbus_rtu::{AcController, RegisterIo, RtuClient, SerialLineConfig};

use crate::argsets::SetpointArgs;

fn controller() -> Result<AcController<impl RegisterIo>> {
    let line = SerialLineConfig::for_device(device_path_from_env()?);
    Ok(AcController::new(RtuClient::open(&line)?))
}

pub fn start() -> Result<()> {
    controller()?.start()?;
    log::info!("Unit started");
    Ok(())
}

pub fn stop() -> Result<()> {
    controller()?.stop()?;
    log::info!("Unit stopped");
    Ok(())
}

pub fn set_temperature(args: SetpointArgs) -> Result<()> {
    controller()?.set_temperature(args.value)?;
    Ok(())
}

pub fn set_humidity(args: SetpointArgs) -> Result<()> {
    controller()?.set_humidity(args.value)?;
    Ok(())
}
