//! Display semantics over a cached snapshot.
//!
//! Everything here is presentation policy, deliberately kept out of the
//! adapter: the two transports enumerate status codes differently, the
//! flue probe has a cold-floor rule, and the extractor fan reads 0 when
//! unreadable. The adapter hands over raw-but-typed values; this module
//! decides what a user sees.

use std::fmt;

use crate::convert;
use crate::types::{StoveStatus, Transport};

/// Operating phase of the stove, decoded from the transport-specific
/// status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StovePhase {
    Off,
    WaitingForFlame,
    On,
    Standby,
    FinalCleaning,
    BrazierCleaning,
    Alarm,
    Unmanaged,
    Unknown(i64),
}

impl StovePhase {
    pub fn from_code(transport: Transport, code: i64) -> Self {
        match transport {
            Transport::Local => match code {
                0 => StovePhase::Off,
                1 => StovePhase::On,
                2 => StovePhase::FinalCleaning,
                3 => StovePhase::Alarm,
                4 => StovePhase::Unmanaged,
                other => StovePhase::Unknown(other),
            },
            Transport::Cloud => match code {
                0 => StovePhase::Off,
                1 | 2 => StovePhase::WaitingForFlame,
                3 | 4 => StovePhase::On,
                5 => StovePhase::Standby,
                6 => StovePhase::FinalCleaning,
                7 => StovePhase::BrazierCleaning,
                8 | 9 => StovePhase::Alarm,
                other => StovePhase::Unknown(other),
            },
        }
    }
}

impl fmt::Display for StovePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StovePhase::Off => write!(f, "off"),
            StovePhase::WaitingForFlame => write!(f, "waiting for flame"),
            StovePhase::On => write!(f, "on"),
            StovePhase::Standby => write!(f, "standby"),
            StovePhase::FinalCleaning => write!(f, "final cleaning"),
            StovePhase::BrazierCleaning => write!(f, "brazier cleaning"),
            StovePhase::Alarm => write!(f, "alarm"),
            StovePhase::Unmanaged => write!(f, "unmanaged"),
            StovePhase::Unknown(code) => write!(f, "unknown ({code})"),
        }
    }
}

pub fn phase(transport: Transport, status: &StoveStatus) -> Option<StovePhase> {
    status
        .status
        .map(|code| StovePhase::from_code(transport, code))
}

/// Switch projection: "burning" codes only. Waiting-for-flame and
/// cleaning phases read as off.
pub fn is_on(transport: Transport, status: &StoveStatus) -> bool {
    match status.status {
        Some(code) => match transport {
            Transport::Local => code == 1,
            Transport::Cloud => matches!(code, 3 | 4),
        },
        None => false,
    }
}

/// Flue-gas temperature with the cold-probe floor applied.
pub fn flue_temperature(status: &StoveStatus) -> Option<f64> {
    convert::flue_temperature(&status.gas_flue)
}

/// Extractor fan speed; unreadable reports as 0 rpm, not unknown.
pub fn extractor_rpm(status: &StoveStatus) -> i64 {
    convert::extractor_rpm(&status.extractor_rpm)
}

pub fn reported_power(status: &StoveStatus) -> Option<i64> {
    status.power
}
