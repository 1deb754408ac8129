use std::env;
use std::time::Duration;

use winet_stove::projection;
use winet_stove::{Connection, DeviceOptions, PollCoordinator, StoveClientBuilder, Transport};

#[tokio::main]
async fn main() -> winet_stove::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let target = args
        .get(1)
        .expect("usage: monitor <host | --cloud <stove-id>> [--water]");
    let has_water = args.iter().any(|a| a == "--water");

    let connection = if target == "--cloud" {
        let id = args.get(2).expect("usage: monitor --cloud <stove-id>");
        Connection::cloud(id.clone())
    } else {
        Connection::local(target.clone())
    };
    let transport = connection.transport();

    let api = StoveClientBuilder::new(connection).build();
    let coordinator = PollCoordinator::new(
        api,
        DeviceOptions {
            poll_interval: Duration::from_secs(15),
            has_water_circuit: has_water,
        },
    );

    println!("Checking {transport} connection...");
    coordinator.first_refresh().await?;
    println!("Connected. Polling every 15s...");

    let mut state = coordinator.subscribe();
    tokio::spawn(coordinator.run());

    loop {
        if state.changed().await.is_err() {
            break;
        }
        let snapshot = state.borrow().clone();
        if !snapshot.available {
            eprintln!(
                "unavailable: {}",
                snapshot.last_error.as_deref().unwrap_or("unknown")
            );
            continue;
        }
        let Some(status) = snapshot.status else {
            continue;
        };

        let burning = if projection::is_on(transport, &status) {
            "ON"
        } else {
            "off"
        };
        match projection::phase(transport, &status) {
            Some(phase) => print!("[{phase}] {burning}"),
            None => print!("[?] {burning}"),
        }
        if let Some(power) = projection::reported_power(&status) {
            print!(" | power {power}");
        }
        if let Some(air) = status.air_temperature {
            print!(" | air {air:.1}\u{00b0}C");
        }
        if let Some(target) = status.target_air_temperature {
            print!(" -> {target:.1}\u{00b0}C");
        }
        if has_water && transport == Transport::Local {
            if let Some(water) = status.water_temperature {
                print!(" | water {water:.1}\u{00b0}C");
            }
            if let Some(target) = status.target_water_temperature {
                print!(" -> {target:.1}\u{00b0}C");
            }
        }
        if let Some(flue) = projection::flue_temperature(&status) {
            print!(" | flue {flue:.0}\u{00b0}C");
        }
        println!(" | fan {} rpm", projection::extractor_rpm(&status));
    }
    Ok(())
}
