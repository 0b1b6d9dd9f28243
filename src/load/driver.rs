//! Load Driver
//!
//! A controller loop follows the profile and publishes the current VU target.
//! Virtual users are spawned on demand; a user whose index is at or above the
//! target idles until the target rises again or the run ends. Records flow
//! back over a channel and are summarized once every user has exited.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinSet;

use super::payloads::PayloadPool;
use super::profile::LoadProfile;
use super::script::{IterationRecord, LoadScript};
use super::summary::LoadSummary;
use super::LoadError;
use crate::ports::AggregatorApi;

const DEFAULT_TICK: Duration = Duration::from_millis(100);

pub struct LoadDriver {
    api: Arc<dyn AggregatorApi>,
    script: Arc<LoadScript>,
    profile: LoadProfile,
    pool: Arc<PayloadPool>,
    tick: Duration,
    is_running: Arc<RwLock<bool>>,
}

/// Shared between the controller and its virtual users
struct VuState {
    target: AtomicU32,
    done: AtomicBool,
}

impl LoadDriver {
    pub fn new(api: Arc<dyn AggregatorApi>, script: LoadScript, profile: LoadProfile, pool: PayloadPool) -> Self {
        Self {
            api,
            script: Arc::new(script),
            profile,
            pool: Arc::new(pool),
            tick: DEFAULT_TICK,
            is_running: Arc::new(RwLock::new(false)),
        }
    }

    /// How often the controller re-reads the profile
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn profile(&self) -> &LoadProfile {
        &self.profile
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// End the run early; users finish their current iteration
    pub async fn stop(&self) {
        *self.is_running.write().await = false;
    }

    pub async fn run(&self) -> Result<LoadSummary, LoadError> {
        *self.is_running.write().await = true;

        let total = self.profile.total_duration();
        tracing::info!(
            "Starting {} load run against {}: {:?}, up to {} VUs",
            self.script.scenario,
            self.script.target,
            total,
            self.profile.max_vus()
        );

        let state = Arc::new(VuState {
            target: AtomicU32::new(0),
            done: AtomicBool::new(false),
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut users = JoinSet::new();
        let mut spawned = 0u32;
        let started = Instant::now();

        loop {
            let elapsed = started.elapsed();
            if elapsed >= total || !*self.is_running.read().await {
                break;
            }
            let target = self.profile.target_at(elapsed);
            state.target.store(target, Ordering::SeqCst);
            while spawned < target {
                users.spawn(virtual_user(
                    spawned,
                    Arc::clone(&self.api),
                    Arc::clone(&self.script),
                    Arc::clone(&self.pool),
                    Arc::clone(&state),
                    tx.clone(),
                    self.tick,
                ));
                spawned += 1;
            }
            tokio::time::sleep(self.tick).await;
        }

        state.target.store(0, Ordering::SeqCst);
        state.done.store(true, Ordering::SeqCst);
        drop(tx);

        let mut worker_error = None;
        while let Some(joined) = users.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Virtual user failed: {}", e);
                worker_error.get_or_insert_with(|| e.to_string());
            }
        }
        let wall_clock = started.elapsed();
        *self.is_running.write().await = false;

        if let Some(e) = worker_error {
            return Err(LoadError::Worker(e));
        }

        let mut records = Vec::new();
        while let Some(record) = rx.recv().await {
            records.push(record);
        }

        let summary = LoadSummary::from_records(&self.script, &records, wall_clock);
        tracing::info!(
            "Load run finished: {} requests, {:.2}% failed, p95 {:.0}ms, {} VUs used",
            summary.metrics.requests,
            summary.metrics.failure_rate * 100.0,
            summary.metrics.duration_p95,
            spawned
        );
        for verdict in summary.failed_thresholds() {
            tracing::warn!("Threshold crossed: {} (observed {:.3})", verdict.name, verdict.observed);
        }
        Ok(summary)
    }
}

async fn virtual_user(
    index: u32,
    api: Arc<dyn AggregatorApi>,
    script: Arc<LoadScript>,
    pool: Arc<PayloadPool>,
    state: Arc<VuState>,
    records: mpsc::UnboundedSender<IterationRecord>,
    idle: Duration,
) {
    tracing::debug!("VU {} started", index);
    let mut rng = StdRng::from_entropy();

    while !state.done.load(Ordering::SeqCst) {
        if index >= state.target.load(Ordering::SeqCst) {
            tokio::time::sleep(idle).await;
            continue;
        }

        let request = pool.pick(&mut rng);
        let started = Instant::now();
        let result = api.send(request).await;
        let record = script.record(&result, started.elapsed());
        if let Err(ref e) = result {
            tracing::debug!("VU {} request failed: {}", index, e);
        }
        if records.send(record).is_err() {
            break;
        }
        tokio::time::sleep(script.think_time).await;
    }
    tracing::debug!("VU {} stopped", index);
}
