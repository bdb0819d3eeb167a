mod argsets;
mod command;

use ac_agent::constants::{defaults, envvars};
use ac_agent::helpers;
use anyhow::{anyhow, Result};
use env_logger::Env;

const CMD_RUN: &str = "run";
const CMD_REPORT: &str = "report";
const CMD_STATUS: &str = "status";
const CMD_START: &str = "start";
const CMD_STOP: &str = "stop";
const CMD_SET_TEMPERATURE: &str = "set-temperature";
const CMD_SET_HUMIDITY: &str = "set-humidity";

fn main() -> Result<()> {
    let dotenv_files = helpers::load_dotenv();
    env_logger::Builder::from_env(Env::default().filter_or(envvars::LOG_LEVEL, defaults::LOG_LEVEL))
        .init();
    for file in dotenv_files {
        log::debug!("Loaded {}", file);
    }

    let mut args = pico_args::Arguments::from_env();
    match args.subcommand()?.as_deref() {
        Some(CMD_RUN) => {
            // Before anything else spawns a thread
            let shutdown = helpers::shutdown_channel()?;
            command::run(shutdown)
        }
        Some(CMD_REPORT) => command::report(),
        Some(CMD_STATUS) => command::status(),
        Some(CMD_START) => command::start(),
        Some(CMD_STOP) => command::stop(),
        Some(CMD_SET_TEMPERATURE) => command::set_temperature(argsets::SetpointArgs {
            value: args.free_from_str()?,
        }),
        Some(CMD_SET_HUMIDITY) => command::set_humidity(argsets::SetpointArgs {
            value: args.free_from_str()?,
        }),
        _ => Err(anyhow!(
            "Subcommand must be one of 'run', 'report', 'status', 'start', 'stop', 'set-temperature', 'set-humidity'"
        )),
    }
}
