//! Transport envelope handed to the reporting layer.
//!
//! Every section is always present. Fields the reading did not carry
//! serialize as `null`, so consumers see one shape regardless of which
//! sensor produced the line.

use serde::Serialize;

use crate::Reading;

/// Local civil time a reading was captured at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaptureTime {
    pub second: i8,
    pub minute: i8,
    pub hour: i8,
    pub day: i8,
    pub month: i8,
    pub year: i16,
}

impl CaptureTime {
    pub fn now() -> Self {
        Self::from_zoned(&jiff::Zoned::now())
    }

    pub fn from_zoned(zoned: &jiff::Zoned) -> Self {
        Self {
            second: zoned.second(),
            minute: zoned.minute(),
            hour: zoned.hour(),
            day: zoned.day(),
            month: zoned.month(),
            year: zoned.year(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChargeControllerSection {
    pub charge: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeakSection {
    pub leak: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleSection {
    pub temperature: Option<i64>,
    pub humidity: Option<i64>,
    pub pressure: Option<i64>,
    pub gas: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnvironmentSection {
    pub temperature: Option<i64>,
    pub humidity: Option<i64>,
    pub pressure: Option<i64>,
    #[serde(rename = "VOC")]
    pub voc: Option<i64>,
    pub gas1: Option<i64>,
    pub gas2: Option<i64>,
    pub gas3: Option<i64>,
    pub pm1: Option<i64>,
    pub pm25: Option<i64>,
    pub pm10: Option<i64>,
    pub fire: Option<i64>,
    pub smoke: Option<i64>,
}

/// A reading wrapped for transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Envelope {
    /// Sensor identity. Not resolved against any registry.
    pub id: u32,
    #[serde(rename = "type")]
    pub sensor_type: Option<i64>,
    pub number: Option<i64>,
    /// Sensor status. Placeholder supplied by the caller.
    pub status: u32,
    pub charge: Option<i64>,
    #[serde(rename = "temperature_MK")]
    pub temperature_mk: Option<i64>,
    pub data: CaptureTime,
    #[serde(rename = "controlergk")]
    pub charge_controller: ChargeControllerSection,
    #[serde(rename = "controlerleak")]
    pub leak: LeakSection,
    #[serde(rename = "controlermodule")]
    pub module: ModuleSection,
    #[serde(rename = "controlerenvironment")]
    pub environment: EnvironmentSection,
}

impl Envelope {
    pub fn build(reading: &Reading, id: u32, status: u32, data: CaptureTime) -> Self {
        let get = |name: &str| reading.get(name);

        Self {
            id,
            sensor_type: reading.sensor_type(),
            number: reading.number(),
            status,
            charge: get("charge"),
            temperature_mk: get("temperature_MK"),
            data,
            charge_controller: ChargeControllerSection {
                charge: get("charge"),
            },
            leak: LeakSection { leak: get("leak") },
            module: ModuleSection {
                temperature: get("temperature"),
                humidity: get("humidity"),
                pressure: get("pressure"),
                gas: get("gas"),
            },
            environment: EnvironmentSection {
                temperature: get("temperature"),
                humidity: get("humidity"),
                pressure: get("pressure"),
                voc: get("VOC"),
                gas1: get("gas1"),
                gas2: get("gas2"),
                gas3: get("gas3"),
                pm1: get("pm1"),
                pm25: get("pm25"),
                pm10: get("pm10"),
                fire: get("fire"),
                smoke: get("smoke"),
            },
        }
    }
}
