mod client;
mod convert;
mod coordinator;
mod debounce;
mod error;
mod logger;
pub mod projection;
mod protocol;
mod types;

pub use client::{
    CloudClient, LocalClient, POWER_MAX, POWER_MIN, REQUEST_TIMEOUT, StoveApi, StoveClientBuilder,
    check_connection,
};
pub use convert::{
    celsius_to_half_degrees, extractor_rpm, flue_temperature, half_degrees_to_celsius,
};
pub use coordinator::{PollCoordinator, PollState, RefreshHandle};
pub use debounce::{Debouncer, QUIESCENCE_WINDOW, Setpoint};
pub use error::{Error, Result};
pub use types::{Connection, DeviceOptions, StoveStatus, Transport};
