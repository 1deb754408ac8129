//! Endpoint construction for the two WiNet transports.
//!
//! The Local API is the stove's embedded web server; everything, commands
//! included, is a GET. The Cloud API is the vendor proxy at a fixed base
//! address, keyed by stove id, with `;`-delimited arguments in the path.

pub const CLOUD_BASE: &str = "https://ws.cloudwinet.it/WiNetStove.svc/json";

pub fn local_global(host: &str) -> String {
    format!("http://{host}/api/global")
}

/// `on = true` ignites, `on = false` shuts down.
pub fn local_status(host: &str, on: bool) -> String {
    format!("http://{host}/api/status/{}", u8::from(on))
}

pub fn local_power(host: &str, level: i64) -> String {
    format!("http://{host}/api/power/{level}")
}

pub fn local_air_temperature(host: &str, half_degrees: i64) -> String {
    format!("http://{host}/api/temperature/air/{half_degrees}")
}

pub fn local_water_temperature(host: &str, half_degrees: i64) -> String {
    format!("http://{host}/api/temperature/water/{half_degrees}")
}

pub fn cloud_get_status(base: &str, stove_id: &str) -> String {
    format!("{base}/GetStatus/{stove_id}")
}

pub fn cloud_get_power(base: &str, stove_id: &str) -> String {
    format!("{base}/GetPower/{stove_id}")
}

pub fn cloud_get_actual_temperature(base: &str, stove_id: &str) -> String {
    format!("{base}/GetActualTemperature/{stove_id}")
}

pub fn cloud_get_target_temperature(base: &str, stove_id: &str) -> String {
    format!("{base}/GetTemperature/{stove_id}")
}

pub fn cloud_ignite(base: &str, stove_id: &str) -> String {
    format!("{base}/Ignit/{stove_id}")
}

pub fn cloud_shutdown(base: &str, stove_id: &str) -> String {
    format!("{base}/Shutdown/{stove_id}")
}

pub fn cloud_set_power(base: &str, stove_id: &str, level: i64) -> String {
    format!("{base}/SetPower/{stove_id};{level}")
}

pub fn cloud_set_temperature(base: &str, stove_id: &str, celsius: f64) -> String {
    format!("{base}/SetTemperature/{stove_id};{celsius}")
}
