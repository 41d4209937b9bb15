//! Telemetry store: current vitals, bounded history and the simulation ticker.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::generator::VitalsGenerator;
use super::model::{PersistedTelemetry, TelemetryState, VitalsSnapshot, VitalsUpdate};
use crate::error::{CareError, Result};
use crate::persistence::{SnapshotRepository, load_or_default, save_logged};
use crate::time::Clock;

const STORE: &str = "TelemetryStore";

/// Default period between simulated readings.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(30);

/// Shortest accepted tick period.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Owns the vitals feed.
///
/// The ticker task only holds a weak reference to the store's state, and the
/// store aborts it on `stop()` and on drop, so a store that goes away never
/// leaves a running timer behind.
pub struct TelemetryStore {
    inner: Arc<TelemetryInner>,
}

struct TelemetryInner {
    state: Mutex<TelemetryState>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    generator: Arc<dyn VitalsGenerator>,
    repository: Arc<dyn SnapshotRepository<PersistedTelemetry>>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
}

impl TelemetryStore {
    pub fn new(
        generator: Arc<dyn VitalsGenerator>,
        repository: Arc<dyn SnapshotRepository<PersistedTelemetry>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_state(TelemetryState::default(), generator, repository, clock)
    }

    /// Creates a store rehydrated from the repository (empty on any fault).
    pub fn restore(
        generator: Arc<dyn VitalsGenerator>,
        repository: Arc<dyn SnapshotRepository<PersistedTelemetry>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = load_or_default(repository.as_ref(), STORE)
            .map(TelemetryState::from_persisted)
            .unwrap_or_default();

        tracing::debug!(
            "[{}] Rehydrated {} history entries",
            STORE,
            state.history.len()
        );

        Self::with_state(state, generator, repository, clock)
    }

    fn with_state(
        state: TelemetryState,
        generator: Arc<dyn VitalsGenerator>,
        repository: Arc<dyn SnapshotRepository<PersistedTelemetry>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(TelemetryInner {
                state: Mutex::new(state),
                ticker: Mutex::new(None),
                generator,
                repository,
                clock,
                tick_interval: DEFAULT_TICK_INTERVAL,
            }),
        }
    }

    /// Overrides the tick period. Takes effect on the next `start()`.
    /// Periods below [`MIN_TICK_INTERVAL`] are raised to it.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        let interval = interval.max(MIN_TICK_INTERVAL);
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => inner.tick_interval = interval,
            None => tracing::warn!("[{}] Tick interval not changed: store is shared", STORE),
        }
        self
    }

    pub fn tick_interval(&self) -> Duration {
        self.inner.tick_interval
    }

    pub fn snapshot(&self) -> TelemetryState {
        self.inner.lock_state().clone()
    }

    pub fn current(&self) -> Option<VitalsSnapshot> {
        self.inner.lock_state().current.clone()
    }

    pub fn history(&self) -> Vec<VitalsSnapshot> {
        self.inner.lock_state().history.clone()
    }

    pub fn is_simulating(&self) -> bool {
        self.inner.lock_state().is_simulating
    }

    /// Starts the simulation: one reading now, then one per tick.
    ///
    /// Calling this while already running does nothing. Fails only when no
    /// Tokio runtime is available to drive the ticker.
    pub fn start(&self) -> Result<()> {
        let runtime = Handle::try_current().map_err(|_| {
            CareError::runtime("Telemetry simulation needs a running Tokio runtime")
        })?;

        let mut ticker = self.inner.lock_ticker();
        if ticker.is_some() {
            tracing::debug!("[{}] Simulation already running", STORE);
            return Ok(());
        }

        self.inner.lock_state().is_simulating = true;
        self.inner.add_generated();

        let weak = Arc::downgrade(&self.inner);
        let period = self.inner.tick_interval;
        let first_tick = Instant::now() + period;
        *ticker = Some(runtime.spawn(run_ticker(weak, first_tick, period)));

        tracing::info!(
            "[{}] Simulation started ({}s interval)",
            STORE,
            period.as_secs()
        );
        Ok(())
    }

    /// Stops the simulation. Idempotent.
    pub fn stop(&self) {
        let handle = self.inner.lock_ticker().take();
        self.inner.lock_state().is_simulating = false;

        if let Some(handle) = handle {
            handle.abort();
            tracing::info!("[{}] Simulation stopped", STORE);
        }
    }

    /// Makes `snapshot` current and appends it to history.
    pub fn add_metrics(&self, snapshot: VitalsSnapshot) {
        self.inner.add_metrics(snapshot);
    }

    /// Merges `update` into the current reading. No-op when there is none yet.
    pub fn update_metrics(&self, update: VitalsUpdate) -> Option<VitalsSnapshot> {
        let mut state = self.inner.lock_state();
        let merged = update.apply(state.current.as_ref()?, self.inner.clock.now());
        state.push(merged.clone());
        save_logged(self.inner.repository.as_ref(), &state.to_persisted(), STORE);
        Some(merged)
    }
}

impl Drop for TelemetryStore {
    fn drop(&mut self) {
        if let Some(handle) = self.inner.lock_ticker().take() {
            handle.abort();
        }
    }
}

impl TelemetryInner {
    fn lock_state(&self) -> MutexGuard<'_, TelemetryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_ticker(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.ticker.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn add_metrics(&self, snapshot: VitalsSnapshot) {
        let mut state = self.lock_state();
        state.push(snapshot);
        save_logged(self.repository.as_ref(), &state.to_persisted(), STORE);
    }

    fn add_generated(&self) {
        let snapshot = self.generator.generate(self.clock.now());
        tracing::debug!(
            "[{}] New reading: {} bpm, {}, {:.1}°C",
            STORE,
            snapshot.heart_rate,
            snapshot.blood_pressure,
            snapshot.temperature
        );
        self.add_metrics(snapshot);
    }

    fn tick(&self) {
        if self.lock_state().is_simulating {
            self.add_generated();
        }
    }
}

async fn run_ticker(inner: Weak<TelemetryInner>, first_tick: Instant, period: Duration) {
    let mut interval = tokio::time::interval_at(first_tick, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        match inner.upgrade() {
            Some(inner) => inner.tick(),
            None => break,
        }
    }
}
