use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

/// Which wire protocol a stove is reached over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Local,
    Cloud,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Local => write!(f, "local"),
            Transport::Cloud => write!(f, "cloud"),
        }
    }
}

/// How to reach a stove: directly on the LAN, or through the vendor's
/// cloud proxy. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Local { host: String },
    Cloud { stove_id: String },
}

impl Connection {
    pub fn local(host: impl Into<String>) -> Self {
        Connection::Local { host: host.into() }
    }

    pub fn cloud(stove_id: impl Into<String>) -> Self {
        Connection::Cloud {
            stove_id: stove_id.into(),
        }
    }

    pub fn transport(&self) -> Transport {
        match self {
            Connection::Local { .. } => Transport::Local,
            Connection::Cloud { .. } => Transport::Cloud,
        }
    }

    /// The required field for the active mode, checked before every
    /// request is issued.
    pub(crate) fn require(&self) -> Result<&str> {
        match self {
            Connection::Local { host } if host.trim().is_empty() => {
                Err(Error::ConfigMissing("host"))
            }
            Connection::Cloud { stove_id } if stove_id.trim().is_empty() => {
                Err(Error::ConfigMissing("stove id"))
            }
            Connection::Local { host } => Ok(host),
            Connection::Cloud { stove_id } => Ok(stove_id),
        }
    }
}

/// Per-device options beyond the connection itself.
#[derive(Debug, Clone)]
pub struct DeviceOptions {
    pub poll_interval: Duration,
    /// Stoves with a hydro circuit report water temperatures; most don't.
    pub has_water_circuit: bool,
}

impl Default for DeviceOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(15),
            has_water_circuit: false,
        }
    }
}

/// One normalized point-in-time reading of the stove.
///
/// Temperatures are °C. `gas_flue` and `extractor_rpm` stay raw at this
/// layer; [`crate::projection`] applies the display rules. `raw` keeps the
/// untouched wire payload for diagnostics dumps.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoveStatus {
    pub status: Option<i64>,
    pub description: Option<String>,
    pub power: Option<i64>,
    pub air_temperature: Option<f64>,
    pub target_air_temperature: Option<f64>,
    pub water_temperature: Option<f64>,
    pub target_water_temperature: Option<f64>,
    pub gas_flue: Value,
    pub extractor_rpm: Value,
    pub raw: Value,
}
