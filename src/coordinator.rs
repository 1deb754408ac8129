//! Fixed-interval polling with a cached last-good snapshot.
//!
//! The coordinator owns the only mutable shared state in the crate: the
//! latest [`PollState`], published through a watch channel. Adapters never
//! retry; retry cadence and degraded-state signalling live here. On a
//! failed fetch the last good snapshot stays visible and `available`
//! flips to false.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::client::{StoveApi, check_connection};
use crate::types::{DeviceOptions, StoveStatus};
use crate::Result;

/// What projections read: the cached snapshot plus availability.
#[derive(Debug, Clone, Default)]
pub struct PollState {
    /// Last successfully fetched snapshot, retained across failures.
    pub status: Option<StoveStatus>,
    pub available: bool,
    pub last_error: Option<String>,
}

/// Cheap handle for requesting an out-of-band refresh, e.g. right after
/// a debounced command lands.
#[derive(Clone)]
pub struct RefreshHandle {
    tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Non-blocking; a refresh already queued is good enough.
    pub fn request_refresh(&self) {
        let _ = self.tx.try_send(());
    }
}

pub struct PollCoordinator {
    api: Arc<dyn StoveApi>,
    options: DeviceOptions,
    state: watch::Sender<PollState>,
    refresh_tx: mpsc::Sender<()>,
    refresh_rx: mpsc::Receiver<()>,
}

impl PollCoordinator {
    pub fn new(api: Arc<dyn StoveApi>, options: DeviceOptions) -> Self {
        let (refresh_tx, refresh_rx) = mpsc::channel(4);
        let (state, _) = watch::channel(PollState::default());
        Self {
            api,
            options,
            state,
            refresh_tx,
            refresh_rx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.subscribe()
    }

    pub fn refresh_handle(&self) -> RefreshHandle {
        RefreshHandle {
            tx: self.refresh_tx.clone(),
        }
    }

    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    /// Setup-time validation fetch. Any failure surfaces only as the
    /// generic cannot-connect error, unlike steady-state polling which
    /// records the full error string.
    pub async fn first_refresh(&self) -> Result<()> {
        let status = check_connection(self.api.as_ref()).await?;
        self.publish_ok(status);
        Ok(())
    }

    /// One fetch cycle: replace the cache on success, keep the last good
    /// snapshot and flag unavailability on failure.
    pub async fn refresh_once(&self) {
        match self.api.fetch_status().await {
            Ok(status) => {
                debug!(code = ?status.status, "poll ok");
                self.publish_ok(status);
            }
            Err(e) => {
                warn!(error = %e, "poll failed");
                self.state.send_modify(|st| {
                    st.available = false;
                    st.last_error = Some(e.to_string());
                });
            }
        }
    }

    /// Poll until dropped: one fetch per interval, plus one per refresh
    /// request. The first tick fires immediately.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.options.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.refresh_once().await,
                Some(()) = self.refresh_rx.recv() => self.refresh_once().await,
            }
        }
    }

    fn publish_ok(&self, status: StoveStatus) {
        self.state.send_modify(|st| {
            st.status = Some(status);
            st.available = true;
            st.last_error = None;
        });
    }
}
