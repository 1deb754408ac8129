use serde_json::Value;

/// Readings at or below this are a cold or disconnected flue probe.
const FLUE_FLOOR_C: f64 = 30.0;

/// Interpret a wire value as a number. The stove reports numerics
/// inconsistently: sometimes JSON numbers, sometimes numeric strings.
pub(crate) fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn as_integer(v: &Value) -> Option<i64> {
    as_number(v).map(|n| n as i64)
}

/// Convert a raw temperature in half-degree units to °C.
///
/// The device uses `"---"` (and occasionally an empty string) as a
/// placeholder for sensors it cannot read; those and non-numeric values
/// all soft-fail to `None`.
pub fn half_degrees_to_celsius(v: &Value) -> Option<f64> {
    if let Value::String(s) = v {
        let s = s.trim();
        if s.is_empty() || s == "---" {
            return None;
        }
    }
    as_number(v).map(|raw| raw / 2.0)
}

/// Convert °C to the device's half-degree integer encoding.
/// Only the Local transport accepts this encoding on outbound commands.
pub fn celsius_to_half_degrees(celsius: f64) -> i64 {
    (celsius * 2.0).round() as i64
}

/// Flue-gas temperature read-out. The raw value is already °C (no
/// half-degree encoding), but anything at or below 30 °C means the probe
/// is cold or unplugged and is suppressed.
pub fn flue_temperature(v: &Value) -> Option<f64> {
    let t = as_number(v)?;
    if t <= FLUE_FLOOR_C { None } else { Some(t) }
}

/// Extractor fan speed. An absent or unreadable value reports as 0 rpm,
/// not as unknown: a stove that cannot read the fan shows it stopped.
pub fn extractor_rpm(v: &Value) -> i64 {
    as_number(v).map(|r| r as i64).unwrap_or(0)
}
