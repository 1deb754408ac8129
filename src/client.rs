use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::convert::{as_integer, as_number, celsius_to_half_degrees, half_degrees_to_celsius};
use crate::logger::MessageLog;
use crate::protocol;
use crate::types::{Connection, StoveStatus, Transport};
use crate::{Error, Result};

/// Every outbound call is bounded by this; the embedded web server can
/// take several seconds to answer while the stove is mid-cleaning.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

pub const POWER_MIN: i64 = 1;
pub const POWER_MAX: i64 = 5;

/// The capability set of a stove, independent of transport.
///
/// Callers hold `Arc<dyn StoveApi>`; the transport split between
/// [`LocalClient`] and [`CloudClient`] stays behind this seam. Adapters
/// are stateless beyond their configuration, so one instance may be
/// shared freely across tasks.
#[async_trait]
pub trait StoveApi: Send + Sync {
    fn transport(&self) -> Transport;

    /// Fetch one normalized snapshot. Never returns a partially
    /// populated snapshot: if any underlying call fails, the whole
    /// fetch fails.
    async fn fetch_status(&self) -> Result<StoveStatus>;

    async fn ignite(&self) -> Result<()>;
    async fn shutdown(&self) -> Result<()>;

    /// `level` must be in `POWER_MIN..=POWER_MAX`; checked before any
    /// request is issued.
    async fn set_power(&self, level: i64) -> Result<()>;

    async fn set_air_temperature(&self, celsius: f64) -> Result<()>;

    /// Local only. The cloud proxy has no known water endpoint, so
    /// Cloud mode fails with [`Error::Unsupported`].
    async fn set_water_temperature(&self, celsius: f64) -> Result<()>;
}

/// Shared request plumbing for both transports.
struct Http {
    client: reqwest::Client,
    log: Option<Mutex<MessageLog>>,
}

impl Http {
    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!(url, "GET");
        if let Some(log) = &self.log
            && let Ok(mut log) = log.lock()
        {
            log.log_request(url);
        }
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }
        // The embedded server sends unreliable content-type headers;
        // reqwest's json() decodes regardless.
        Ok(resp.json().await?)
    }

    /// Commands are GETs too. No body is parsed; only the status code
    /// is checked.
    async fn call(&self, action: &str, url: &str) -> Result<()> {
        debug!(action, url, "command");
        if let Some(log) = &self.log
            && let Ok(mut log) = log.lock()
        {
            log.log_command(action, url);
        }
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }
        Ok(())
    }

    fn log_status(&self, status: &StoveStatus) {
        if let Some(log) = &self.log
            && let Ok(mut log) = log.lock()
        {
            log.log_status(status);
        }
    }
}

fn check_power_range(level: i64) -> Result<()> {
    if !(POWER_MIN..=POWER_MAX).contains(&level) {
        return Err(Error::OutOfRange {
            value: level,
            min: POWER_MIN,
            max: POWER_MAX,
        });
    }
    Ok(())
}

pub struct StoveClientBuilder {
    connection: Connection,
    http: Option<reqwest::Client>,
    log_path: Option<String>,
    cloud_base: Option<String>,
}

impl StoveClientBuilder {
    pub fn new(connection: Connection) -> Self {
        Self {
            connection,
            http: None,
            log_path: None,
            cloud_base: None,
        }
    }

    /// Reuse an existing HTTP client for process-wide connection
    /// pooling. The injected client's timeout policy governs; the
    /// default client is built with [`REQUEST_TIMEOUT`].
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Append an NDJSON wire log to `path`.
    pub fn message_log(mut self, path: impl Into<String>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Override the cloud proxy base address; tests point this at a
    /// mock server.
    pub fn cloud_base(mut self, base: impl Into<String>) -> Self {
        self.cloud_base = Some(base.into());
        self
    }

    pub fn build(self) -> Arc<dyn StoveApi> {
        let client = self.http.unwrap_or_else(|| {
            reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client")
        });
        let log = self
            .log_path
            .map(|path| Mutex::new(MessageLog::new(&path).expect("failed to open log file")));
        let http = Http { client, log };

        match self.connection.transport() {
            Transport::Local => Arc::new(LocalClient {
                connection: self.connection,
                http,
            }),
            Transport::Cloud => Arc::new(CloudClient {
                connection: self.connection,
                http,
                base: self
                    .cloud_base
                    .unwrap_or_else(|| protocol::CLOUD_BASE.to_string()),
            }),
        }
    }
}

/// Direct LAN client for the stove's embedded web server.
pub struct LocalClient {
    connection: Connection,
    http: Http,
}

impl LocalClient {
    pub fn new(host: impl Into<String>) -> Arc<dyn StoveApi> {
        StoveClientBuilder::new(Connection::local(host)).build()
    }
}

#[async_trait]
impl StoveApi for LocalClient {
    fn transport(&self) -> Transport {
        Transport::Local
    }

    async fn fetch_status(&self) -> Result<StoveStatus> {
        let host = self.connection.require()?;
        let data = self.http.get_json(&protocol::local_global(host)).await?;

        let field = |key: &str| data.get(key).cloned().unwrap_or(Value::Null);
        let half = |key: &str| data.get(key).and_then(half_degrees_to_celsius);

        let status = StoveStatus {
            status: data.get("status").and_then(as_integer),
            description: data
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            power: data.get("power").and_then(as_integer),
            air_temperature: half("air"),
            target_air_temperature: half("setAir"),
            water_temperature: half("water"),
            target_water_temperature: half("setWater"),
            gas_flue: field("gasflue"),
            extractor_rpm: field("rpmExtractor"),
            raw: data,
        };
        self.http.log_status(&status);
        Ok(status)
    }

    async fn ignite(&self) -> Result<()> {
        let host = self.connection.require()?;
        self.http
            .call("ignite", &protocol::local_status(host, true))
            .await
    }

    async fn shutdown(&self) -> Result<()> {
        let host = self.connection.require()?;
        self.http
            .call("shutdown", &protocol::local_status(host, false))
            .await
    }

    async fn set_power(&self, level: i64) -> Result<()> {
        check_power_range(level)?;
        let host = self.connection.require()?;
        self.http
            .call("set_power", &protocol::local_power(host, level))
            .await
    }

    async fn set_air_temperature(&self, celsius: f64) -> Result<()> {
        let host = self.connection.require()?;
        let raw = celsius_to_half_degrees(celsius);
        self.http
            .call(
                "set_air_temperature",
                &protocol::local_air_temperature(host, raw),
            )
            .await
    }

    async fn set_water_temperature(&self, celsius: f64) -> Result<()> {
        let host = self.connection.require()?;
        let raw = celsius_to_half_degrees(celsius);
        self.http
            .call(
                "set_water_temperature",
                &protocol::local_water_temperature(host, raw),
            )
            .await
    }
}

/// Client for the vendor-hosted REST proxy.
///
/// Status is spread over four endpoints; a fetch issues them
/// sequentially and fails as a whole if any call fails. Water readings
/// are never available over this transport.
pub struct CloudClient {
    connection: Connection,
    http: Http,
    base: String,
}

impl CloudClient {
    pub fn new(stove_id: impl Into<String>) -> Arc<dyn StoveApi> {
        StoveClientBuilder::new(Connection::cloud(stove_id)).build()
    }
}

#[async_trait]
impl StoveApi for CloudClient {
    fn transport(&self) -> Transport {
        Transport::Cloud
    }

    async fn fetch_status(&self) -> Result<StoveStatus> {
        let id = self.connection.require()?;

        let status = self
            .http
            .get_json(&protocol::cloud_get_status(&self.base, id))
            .await?;
        let power = self
            .http
            .get_json(&protocol::cloud_get_power(&self.base, id))
            .await?;
        let air = self
            .http
            .get_json(&protocol::cloud_get_actual_temperature(&self.base, id))
            .await?;
        let set_air = self
            .http
            .get_json(&protocol::cloud_get_target_temperature(&self.base, id))
            .await?;

        let status = StoveStatus {
            status: status.get("Status").and_then(as_integer),
            description: None,
            power: power.get("Result").and_then(as_integer),
            air_temperature: air.get("Result").and_then(as_number),
            target_air_temperature: set_air.get("Result").and_then(as_number),
            water_temperature: None,
            target_water_temperature: None,
            gas_flue: Value::Null,
            extractor_rpm: Value::Null,
            raw: json!({
                "status": status,
                "power": power,
                "air": air,
                "setAir": set_air,
            }),
        };
        self.http.log_status(&status);
        Ok(status)
    }

    async fn ignite(&self) -> Result<()> {
        let id = self.connection.require()?;
        self.http
            .call("ignite", &protocol::cloud_ignite(&self.base, id))
            .await
    }

    async fn shutdown(&self) -> Result<()> {
        let id = self.connection.require()?;
        self.http
            .call("shutdown", &protocol::cloud_shutdown(&self.base, id))
            .await
    }

    async fn set_power(&self, level: i64) -> Result<()> {
        check_power_range(level)?;
        let id = self.connection.require()?;
        self.http
            .call("set_power", &protocol::cloud_set_power(&self.base, id, level))
            .await
    }

    async fn set_air_temperature(&self, celsius: f64) -> Result<()> {
        let id = self.connection.require()?;
        self.http
            .call(
                "set_air_temperature",
                &protocol::cloud_set_temperature(&self.base, id, celsius),
            )
            .await
    }

    async fn set_water_temperature(&self, _celsius: f64) -> Result<()> {
        self.connection.require()?;
        Err(Error::Unsupported("water setpoint over cloud transport"))
    }
}

/// One probing fetch used at setup time. Collapses every failure into
/// the generic [`Error::CannotConnect`] so configuration UIs don't leak
/// transport detail; the real cause is logged at debug level.
pub async fn check_connection(api: &dyn StoveApi) -> Result<StoveStatus> {
    api.fetch_status().await.map_err(|e| {
        debug!(error = %e, "connection check failed");
        Error::CannotConnect
    })
}
