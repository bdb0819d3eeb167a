use serde::ser::{Serialize, SerializeMap, Serializer};

pub const SIGNAL_COUNT: usize = 25;
pub const MEASUREMENT_COUNT: usize = 3;

/// Boolean status points reported by the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    // Protective interlocks and fault inputs
    FanProtect,
    FanPressureSwitch,
    PhaseProtect,
    FireLinkage,
    HeaterOverheat,
    RemoteSwitch,
    HumidifierFault,
    Comp1HighPressure,
    Comp1LowPressure,
    Comp1Overload,
    Cond1Overload,
    Comp2HighPressure,
    Comp2LowPressure,
    Comp2Overload,
    Cond2Overload,
    // Unit state
    RunSignal,
    FaultSignal,
    // Actuators
    Valve,
    SupplyFan,
    Comp1,
    Cond1,
    Comp2,
    Cond2,
    Heater1,
    Heater2,
}

impl Signal {
    pub const ALL: [Signal; SIGNAL_COUNT] = [
        Signal::FanProtect,
        Signal::FanPressureSwitch,
        Signal::PhaseProtect,
        Signal::FireLinkage,
        Signal::HeaterOverheat,
        Signal::RemoteSwitch,
        Signal::HumidifierFault,
        Signal::Comp1HighPressure,
        Signal::Comp1LowPressure,
        Signal::Comp1Overload,
        Signal::Cond1Overload,
        Signal::Comp2HighPressure,
        Signal::Comp2LowPressure,
        Signal::Comp2Overload,
        Signal::Cond2Overload,
        Signal::RunSignal,
        Signal::FaultSignal,
        Signal::Valve,
        Signal::SupplyFan,
        Signal::Comp1,
        Signal::Cond1,
        Signal::Comp2,
        Signal::Cond2,
        Signal::Heater1,
        Signal::Heater2,
    ];

    /// Field name used in the report payload
    pub fn name(self) -> &'static str {
        match self {
            Signal::FanProtect => "fanProtect",
            Signal::FanPressureSwitch => "fanPressureSwitch",
            Signal::PhaseProtect => "phaseProtect",
            Signal::FireLinkage => "fireLinkage",
            Signal::HeaterOverheat => "heaterOverheat",
            Signal::RemoteSwitch => "remoteSwitch",
            Signal::HumidifierFault => "humidifierFault",
            Signal::Comp1HighPressure => "comp1HighPressure",
            Signal::Comp1LowPressure => "comp1LowPressure",
            Signal::Comp1Overload => "comp1Overload",
            Signal::Cond1Overload => "cond1Overload",
            Signal::Comp2HighPressure => "comp2HighPressure",
            Signal::Comp2LowPressure => "comp2LowPressure",
            Signal::Comp2Overload => "comp2Overload",
            Signal::Cond2Overload => "cond2Overload",
            Signal::RunSignal => "runSignal",
            Signal::FaultSignal => "faultSignal",
            Signal::Valve => "valve",
            Signal::SupplyFan => "supplyFan",
            Signal::Comp1 => "comp1",
            Signal::Cond1 => "cond1",
            Signal::Comp2 => "comp2",
            Signal::Cond2 => "cond2",
            Signal::Heater1 => "heater1",
            Signal::Heater2 => "heater2",
        }
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

/// Raw 16-bit measurements. Values are passed through in device units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Measurement {
    SupplyTemp,
    IndoorTemp,
    IndoorHumidity,
}

impl Measurement {
    pub const ALL: [Measurement; MEASUREMENT_COUNT] = [
        Measurement::SupplyTemp,
        Measurement::IndoorTemp,
        Measurement::IndoorHumidity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Measurement::SupplyTemp => "supplyTemp",
            Measurement::IndoorTemp => "indoorTemp",
            Measurement::IndoorHumidity => "indoorHumidity",
        }
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

/// Every boolean signal of one poll
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscreteStatus {
    values: [bool; SIGNAL_COUNT],
}

impl DiscreteStatus {
    pub(crate) fn from_values(values: [bool; SIGNAL_COUNT]) -> Self {
        DiscreteStatus { values }
    }

    pub fn get(&self, signal: Signal) -> bool {
        self.values[signal.slot()]
    }
}

/// Every measurement of one poll
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Measurements {
    values: [u16; MEASUREMENT_COUNT],
}

impl Measurements {
    pub(crate) fn from_values(values: [u16; MEASUREMENT_COUNT]) -> Self {
        Measurements { values }
    }

    pub fn get(&self, measurement: Measurement) -> u16 {
        self.values[measurement.slot()]
    }
}

/// Decoded snapshot of the air conditioner at one instant.
///
/// Only the decoder builds these, and only with every field present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcStatus {
    discrete: DiscreteStatus,
    measurements: Measurements,
}

impl AcStatus {
    pub(crate) fn new(discrete: DiscreteStatus, measurements: Measurements) -> Self {
        AcStatus {
            discrete,
            measurements,
        }
    }

    pub fn signal(&self, signal: Signal) -> bool {
        self.discrete.get(signal)
    }

    pub fn measurement(&self, measurement: Measurement) -> u16 {
        self.measurements.get(measurement)
    }

    pub fn supply_temp(&self) -> u16 {
        self.measurement(Measurement::SupplyTemp)
    }

    pub fn indoor_temp(&self) -> u16 {
        self.measurement(Measurement::IndoorTemp)
    }

    pub fn indoor_humidity(&self) -> u16 {
        self.measurement(Measurement::IndoorHumidity)
    }

    /// Signals in register-map order
    pub fn signals(&self) -> impl Iterator<Item = (Signal, bool)> + '_ {
        Signal::ALL.into_iter().map(|s| (s, self.signal(s)))
    }
}

impl Serialize for AcStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SIGNAL_COUNT + MEASUREMENT_COUNT))?;
        for (signal, value) in self.signals() {
            map.serialize_entry(signal.name(), &value)?;
        }
        for measurement in Measurement::ALL {
            map.serialize_entry(measurement.name(), &self.measurement(measurement))?;
        }
        map.end()
    }
}
