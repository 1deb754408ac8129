use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use winet_stove::{
    Connection, Error, StoveApi, StoveClientBuilder, Transport, check_connection, projection,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn local_client(server: &MockServer) -> Arc<dyn StoveApi> {
    StoveClientBuilder::new(Connection::local(server.address().to_string())).build()
}

fn cloud_client(server: &MockServer) -> Arc<dyn StoveApi> {
    StoveClientBuilder::new(Connection::cloud("STOVE42"))
        .cloud_base(server.uri())
        .build()
}

/// Client whose timeout trips well before the mock's response delay.
fn impatient(server: &MockServer, connection: Connection) -> Arc<dyn StoveApi> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    StoveClientBuilder::new(connection)
        .cloud_base(server.uri())
        .http_client(http)
        .build()
}

#[tokio::test]
async fn local_fetch_normalizes_half_degrees() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/global"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 1,
            "description": "ACCESO",
            "power": 3,
            "air": "40",
            "setAir": "44",
            "water": "---",
            "setWater": "---",
            "gasflue": 118,
            "rpmExtractor": "1450",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = local_client(&server);
    let status = client.fetch_status().await.unwrap();

    assert_eq!(status.status, Some(1));
    assert_eq!(status.description.as_deref(), Some("ACCESO"));
    assert_eq!(status.power, Some(3));
    assert_eq!(status.air_temperature, Some(20.0));
    assert_eq!(status.target_air_temperature, Some(22.0));
    assert_eq!(status.water_temperature, None);
    assert_eq!(status.target_water_temperature, None);
    // flue and rpm stay raw in the snapshot; projection applies the rules
    assert_eq!(status.gas_flue, json!(118));
    assert_eq!(projection::flue_temperature(&status), Some(118.0));
    assert_eq!(projection::extractor_rpm(&status), 1450);
    // the untouched wire payload rides along for diagnostics
    assert_eq!(status.raw["air"], json!("40"));
}

#[tokio::test]
async fn local_fetch_tolerates_missing_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/global"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status": 0}"#))
        .mount(&server)
        .await;

    let status = local_client(&server).fetch_status().await.unwrap();
    assert_eq!(status.status, Some(0));
}

#[tokio::test]
async fn local_fetch_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/global"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = local_client(&server).fetch_status().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus(500)), "got {err:?}");
}

#[tokio::test]
async fn local_fetch_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/global"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": 1}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = impatient(
        &server,
        Connection::local(server.address().to_string()),
    );
    let err = client.fetch_status().await.unwrap_err();
    assert!(matches!(err, Error::Timeout), "got {err:?}");
}

#[tokio::test]
async fn local_fetch_network_error() {
    // Nothing listens on port 1.
    let client = StoveClientBuilder::new(Connection::local("127.0.0.1:1")).build();
    let err = client.fetch_status().await.unwrap_err();
    assert!(matches!(err, Error::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn blank_config_fails_before_any_request() {
    let local = StoveClientBuilder::new(Connection::local("")).build();
    let err = local.fetch_status().await.unwrap_err();
    assert!(matches!(err, Error::ConfigMissing("host")));
    let err = local.ignite().await.unwrap_err();
    assert!(matches!(err, Error::ConfigMissing("host")));

    let cloud = StoveClientBuilder::new(Connection::cloud("  ")).build();
    let err = cloud.fetch_status().await.unwrap_err();
    assert!(matches!(err, Error::ConfigMissing("stove id")));
}

#[tokio::test]
async fn cloud_fetch_assembles_four_calls() {
    let server = MockServer::start().await;
    for (endpoint, body) in [
        ("/GetStatus/STOVE42", json!({"Status": 3})),
        ("/GetPower/STOVE42", json!({"Result": 4})),
        ("/GetActualTemperature/STOVE42", json!({"Result": 21.5})),
        ("/GetTemperature/STOVE42", json!({"Result": 23.0})),
    ] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = cloud_client(&server);
    assert_eq!(client.transport(), Transport::Cloud);
    let status = client.fetch_status().await.unwrap();

    assert_eq!(status.status, Some(3));
    assert_eq!(status.power, Some(4));
    assert_eq!(status.air_temperature, Some(21.5));
    assert_eq!(status.target_air_temperature, Some(23.0));
    // transport limitation, not an error
    assert_eq!(status.water_temperature, None);
    assert_eq!(status.target_water_temperature, None);
    assert_eq!(status.raw["status"]["Status"], json!(3));
}

#[tokio::test]
async fn cloud_fetch_fails_whole_when_one_call_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/GetStatus/STOVE42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Status": 3})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/GetPower/STOVE42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Result": 4})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/GetActualTemperature/STOVE42"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    // the fourth call must never be issued
    Mock::given(method("GET"))
        .and(path("/GetTemperature/STOVE42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Result": 23.0})))
        .expect(0)
        .mount(&server)
        .await;

    let err = cloud_client(&server).fetch_status().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus(502)), "got {err:?}");
}

#[tokio::test]
async fn cloud_fetch_timeout_produces_no_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/GetStatus/STOVE42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Status": 3})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/GetPower/STOVE42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Result": 4})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/GetActualTemperature/STOVE42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"Result": 21.5}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/GetTemperature/STOVE42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Result": 23.0})))
        .expect(0)
        .mount(&server)
        .await;

    let client = impatient(&server, Connection::cloud("STOVE42"));
    let err = client.fetch_status().await.unwrap_err();
    assert!(matches!(err, Error::Timeout), "got {err:?}");
}

#[tokio::test]
async fn local_toggle_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status/0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = local_client(&server);
    client.ignite().await.unwrap();
    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn set_power_range_checked_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/power/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/power/5"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = local_client(&server);
    client.set_power(1).await.unwrap();
    client.set_power(5).await.unwrap();

    let err = client.set_power(0).await.unwrap_err();
    assert!(matches!(err, Error::OutOfRange { value: 0, .. }));
    let err = client.set_power(6).await.unwrap_err();
    assert!(matches!(err, Error::OutOfRange { value: 6, .. }));

    // only the two valid levels reached the wire
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn local_setpoints_sent_in_half_degrees() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/temperature/air/43"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/temperature/water/90"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = local_client(&server);
    client.set_air_temperature(21.5).await.unwrap();
    client.set_water_temperature(45.0).await.unwrap();
}

#[tokio::test]
async fn cloud_command_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Ignit/STOVE42"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Shutdown/STOVE42"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/SetPower/STOVE42;3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/SetTemperature/STOVE42;21.5"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = cloud_client(&server);
    client.ignite().await.unwrap();
    client.shutdown().await.unwrap();
    client.set_power(3).await.unwrap();
    client.set_air_temperature(21.5).await.unwrap();
}

#[tokio::test]
async fn cloud_water_setpoint_unsupported() {
    let server = MockServer::start().await;
    let client = cloud_client(&server);

    for celsius in [40.0, 60.0, 80.0] {
        let err = client.set_water_temperature(celsius).await.unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)), "got {err:?}");
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn command_http_error_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = local_client(&server).ignite().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus(403)), "got {err:?}");
}

#[tokio::test]
async fn check_connection_hides_failure_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/global"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = local_client(&server);
    let err = check_connection(client.as_ref()).await.unwrap_err();
    assert!(matches!(err, Error::CannotConnect), "got {err:?}");
}

#[tokio::test]
async fn check_connection_returns_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/global"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 1, "power": 2})))
        .mount(&server)
        .await;

    let client = local_client(&server);
    let status = check_connection(client.as_ref()).await.unwrap();
    assert_eq!(status.status, Some(1));
}
