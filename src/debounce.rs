//! Coalescing of user-driven setpoint writes.
//!
//! The stove persists setpoints to limited-write-cycle memory, so a burst
//! of slider movements must collapse into a single outbound command. Each
//! controllable quantity cycles `Idle -> Pending -> Idle`: a write starts
//! (or restarts) a quiescence delay, a superseding write cancels the
//! previous one, and only the value still pending when the delay expires
//! is sent.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::client::{POWER_MAX, POWER_MIN, StoveApi};
use crate::coordinator::RefreshHandle;

/// Delay after the last write before the coalesced command is sent.
pub const QUIESCENCE_WINDOW: Duration = Duration::from_millis(2000);

/// Writes equal to the reported value within this tolerance are dropped;
/// UIs echo the current value back on focus changes.
const EQUAL_EPSILON: f64 = 1e-6;

/// A controllable quantity with its own debounce state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setpoint {
    Power,
    AirTarget,
    WaterTarget,
}

impl Setpoint {
    /// Clamping happens at send time: out-of-range requests are accepted
    /// and re-clamped, not rejected.
    pub fn clamp(self, value: f64) -> f64 {
        let (min, max) = match self {
            Setpoint::Power => (POWER_MIN as f64, POWER_MAX as f64),
            Setpoint::AirTarget => (5.0, 40.0),
            Setpoint::WaterTarget => (40.0, 80.0),
        };
        value.clamp(min, max)
    }

    async fn send(self, api: &dyn StoveApi, value: f64) -> crate::Result<()> {
        match self {
            Setpoint::Power => api.set_power(value as i64).await,
            Setpoint::AirTarget => api.set_air_temperature(value).await,
            Setpoint::WaterTarget => api.set_water_temperature(value).await,
        }
    }
}

struct PendingSend {
    value: f64,
    generation: u64,
    handle: JoinHandle<()>,
}

struct Shared {
    api: Arc<dyn StoveApi>,
    refresh: RefreshHandle,
    window: Duration,
    pending: Mutex<HashMap<Setpoint, PendingSend>>,
    /// At most one command on the wire at a time; sends for the same
    /// quantity (and in practice, the same device) never overlap.
    wire: tokio::sync::Mutex<()>,
    generation: AtomicU64,
}

pub struct Debouncer {
    inner: Arc<Shared>,
}

impl Debouncer {
    pub fn new(api: Arc<dyn StoveApi>, refresh: RefreshHandle) -> Self {
        Self::with_window(api, refresh, QUIESCENCE_WINDOW)
    }

    /// Same machine with a custom quiescence window; tests shrink it.
    pub fn with_window(api: Arc<dyn StoveApi>, refresh: RefreshHandle, window: Duration) -> Self {
        Self {
            inner: Arc::new(Shared {
                api,
                refresh,
                window,
                pending: Mutex::new(HashMap::new()),
                wire: tokio::sync::Mutex::new(()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Record a write of `value` for `setpoint`, restarting its
    /// quiescence delay. `reported` is the device's last known value;
    /// writes equal to it are dropped without scheduling anything.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request(&self, setpoint: Setpoint, value: f64, reported: Option<f64>) {
        if let Some(current) = reported
            && (current - value).abs() < EQUAL_EPSILON
        {
            debug!(?setpoint, value, "write equals reported value, dropped");
            return;
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let inner = Arc::clone(&self.inner);

        let mut pending = self.inner.pending.lock().expect("debounce map poisoned");
        if let Some(prev) = pending.remove(&setpoint) {
            prev.handle.abort();
        }

        let handle = tokio::spawn(async move {
            sleep(inner.window).await;

            let value = {
                let mut pending = inner.pending.lock().expect("debounce map poisoned");
                // A cancellation or superseding write that raced the delay
                // expiry leaves a different generation (or no entry at
                // all); this send must never happen.
                let still_ours = pending
                    .get(&setpoint)
                    .is_some_and(|p| p.generation == generation);
                if still_ours {
                    pending.remove(&setpoint).map(|p| p.value)
                } else {
                    None
                }
            };
            let Some(value) = value else { return };

            let clamped = setpoint.clamp(value);
            let _wire = inner.wire.lock().await;
            match setpoint.send(inner.api.as_ref(), clamped).await {
                Ok(()) => inner.refresh.request_refresh(),
                // Pending state is already cleared; surfacing the failure
                // is the caller's policy, the queue only records it.
                Err(e) => warn!(?setpoint, value = clamped, error = %e, "debounced send failed"),
            }
        });

        pending.insert(
            setpoint,
            PendingSend {
                value,
                generation,
                handle,
            },
        );
    }

    /// Discard the pending write for `setpoint`, if any, without sending.
    /// Safe to call when nothing is pending.
    pub fn cancel(&self, setpoint: Setpoint) {
        let mut pending = self.inner.pending.lock().expect("debounce map poisoned");
        if let Some(prev) = pending.remove(&setpoint) {
            prev.handle.abort();
        }
    }

    /// Discard every pending write; used when the owning entity goes away.
    pub fn cancel_all(&self) {
        let mut pending = self.inner.pending.lock().expect("debounce map poisoned");
        for (_, prev) in pending.drain() {
            prev.handle.abort();
        }
    }

    /// The coalesced value awaiting its quiescence delay. UIs read this
    /// back immediately instead of the stale device value.
    pub fn pending_value(&self, setpoint: Setpoint) -> Option<f64> {
        self.inner
            .pending
            .lock()
            .expect("debounce map poisoned")
            .get(&setpoint)
            .map(|p| p.value)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
