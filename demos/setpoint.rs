use std::env;
use std::time::Duration;

use winet_stove::{
    Connection, Debouncer, DeviceOptions, PollCoordinator, Setpoint, StoveClientBuilder,
    QUIESCENCE_WINDOW,
};

/// Ramps the air target through a burst of values the way a UI slider
/// would; only the last one should reach the stove.
#[tokio::main]
async fn main() -> winet_stove::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let host = args.get(1).expect("usage: setpoint <host> <celsius>");
    let target: f64 = args
        .get(2)
        .expect("usage: setpoint <host> <celsius>")
        .parse()
        .expect("temperature must be a number");

    let api = StoveClientBuilder::new(Connection::local(host.clone())).build();
    let coordinator = PollCoordinator::new(api.clone(), DeviceOptions::default());
    coordinator.first_refresh().await?;

    let reported = coordinator
        .state()
        .status
        .and_then(|s| s.target_air_temperature);
    println!("current target: {reported:?}, requesting {target:.1}");

    let debouncer = Debouncer::new(api, coordinator.refresh_handle());
    let mut state = coordinator.subscribe();
    tokio::spawn(coordinator.run());

    // simulated slider drag toward the requested value
    for step in [target - 1.5, target - 1.0, target - 0.5, target] {
        debouncer.request(Setpoint::AirTarget, step, reported);
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    tokio::time::sleep(QUIESCENCE_WINDOW + Duration::from_secs(1)).await;
    state.changed().await.ok();
    let confirmed = state
        .borrow()
        .status
        .as_ref()
        .and_then(|s| s.target_air_temperature);
    println!("stove now reports target: {confirmed:?}");
    Ok(())
}
