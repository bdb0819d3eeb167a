mod stubs;

use std::time::Duration;

use mockito::Matcher;
use serde_json::json;
use url::Url;

use ac_agent::data_mgmt::{Reporter, Signal, Stage, TickError, AC_REGISTER_MAP};
use ac_agent::helpers::now_epoch;
use ac_agent::interfaces::http_api::{CollectorClient, CollectorError};
use ac_agent::readers::modbus_rtu::{AcController, Connector, TransportError};
use rmodbus::server::context::ModbusContext;
use stubs::device::{ControllerState, DeviceWrite, SimulatedConnector};

const AGENT_ID: i64 = 7;
const API_KEY: &str = "test-key";
const REPORT_PATH: &str = "/receive/airConditioner";

fn collector_for(server: &mockito::Server) -> CollectorClient {
    CollectorClient::new(
        &Url::parse(&server.url()).unwrap(),
        API_KEY,
        Duration::from_secs(5),
    )
}

fn running_unit() -> ControllerState {
    // runSignal, supplyFan and comp1 on, no faults
    ControllerState::with_readings(&[0x00, 0x80, 0x0C, 0x00], [18, 24, 45])
}

#[test]
fn report_delivered_to_collector() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("POST", REPORT_PATH)
        .match_header("x-api-key", API_KEY)
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "agentID": AGENT_ID,
            "message": {
                "fanProtect": false,
                "runSignal": true,
                "faultSignal": false,
                "supplyFan": true,
                "comp1": true,
                "comp2": false,
                "heater2": false,
                "supplyTemp": 18,
                "indoorTemp": 24,
                "indoorHumidity": 45
            }
        })))
        .with_body(r#"{"result":"ok"}"#)
        .expect(1)
        .create();

    let connector = SimulatedConnector::new(running_unit());
    let reporter =
        Reporter::new(&connector, collector_for(&server), AGENT_ID, &AC_REGISTER_MAP).unwrap();

    let before = now_epoch();
    let delivery = reporter.run_tick().unwrap();
    assert!(delivery.timestamp >= before && delivery.timestamp <= now_epoch());
    assert_eq!(delivery.response, r#"{"result":"ok"}"#);
    assert!(delivery.status.signal(Signal::RunSignal));
    assert!(!delivery.status.signal(Signal::FaultSignal));
    assert_eq!(connector.requests(), vec![0x01, 0x03]);
    m.assert();
}

#[test]
fn register_timeout_skips_report() {
    let mut server = mockito::Server::new();
    let m = server.mock("POST", REPORT_PATH).expect(0).create();

    let mut state = running_unit();
    state.silent_functions.push(0x03);
    let connector = SimulatedConnector::new(state);
    let reporter =
        Reporter::new(&connector, collector_for(&server), AGENT_ID, &AC_REGISTER_MAP).unwrap();

    let err = reporter.run_tick().unwrap_err();
    assert_eq!(err.stage(), Stage::Read);
    assert!(matches!(
        err,
        TickError::ReadRegisters(TransportError::Timeout { unit_id: 1, .. })
    ));
    assert_eq!(connector.requests(), vec![0x01, 0x03]);
    m.assert();
}

#[test]
fn collector_error_fails_tick_without_retry() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("POST", REPORT_PATH)
        .with_status(500)
        .expect(2)
        .create();

    let connector = SimulatedConnector::new(running_unit());
    let reporter =
        Reporter::new(&connector, collector_for(&server), AGENT_ID, &AC_REGISTER_MAP).unwrap();

    let err = reporter.run_tick().unwrap_err();
    assert_eq!(err.stage(), Stage::Send);
    assert!(matches!(
        err,
        TickError::Send(CollectorError::Status { status: 500 })
    ));
    // One POST per tick, never retried within the tick
    assert!(!reporter.tick());
    m.assert();
}

#[test]
fn next_tick_recovers_after_device_unplugged() {
    let mut server = mockito::Server::new();
    let m = server.mock("POST", REPORT_PATH).expect(1).create();

    let connector = SimulatedConnector::new(running_unit());
    let reporter =
        Reporter::new(&connector, collector_for(&server), AGENT_ID, &AC_REGISTER_MAP).unwrap();

    connector.unplugged.set(true);
    assert_eq!(reporter.run_tick().unwrap_err().stage(), Stage::Acquire);

    connector.unplugged.set(false);
    assert!(reporter.tick());
    assert_eq!(connector.connects.get(), 2);
    m.assert();
}

#[test]
fn timestamp_taken_before_device_is_read() {
    let mut server = mockito::Server::new();
    let m = server.mock("POST", REPORT_PATH).expect(1).create();

    let mut state = running_unit();
    state.reply_delay = Duration::from_millis(600);
    let connector = SimulatedConnector::new(state);
    let reporter =
        Reporter::new(&connector, collector_for(&server), AGENT_ID, &AC_REGISTER_MAP).unwrap();

    let delivery = reporter.run_tick().unwrap();
    // Two replies at 600 ms each put the end of the poll at least a second later
    assert!(delivery.timestamp < now_epoch());
    m.assert();
}

#[test]
fn control_commands_reach_the_device() {
    let connector = SimulatedConnector::new(running_unit());
    let mut controller = AcController::new((&connector).connect().unwrap());

    controller.start().unwrap();
    controller.stop().unwrap();
    controller.set_temperature(22).unwrap();
    controller.set_humidity(50).unwrap();

    assert_eq!(
        connector.state.borrow().writes,
        vec![
            DeviceWrite::Coil(0, true),
            DeviceWrite::Coil(1, true),
            DeviceWrite::Register(6, 22),
            DeviceWrite::Register(7, 50),
        ]
    );
    let state = connector.state.borrow();
    assert!(state.storage.get_coil(0).unwrap());
    assert_eq!(state.storage.get_holding(6).unwrap(), 22);
    assert_eq!(state.storage.get_holding(7).unwrap(), 50);
}
