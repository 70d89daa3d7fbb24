//! Run/refresh orchestration.
//!
//! [`AnalysisOrchestrator`] owns the [`RunState`] machine:
//!
//! | State     | trigger_run | run succeeds            | run fails |
//! |-----------|-------------|-------------------------|-----------|
//! | Idle      | Running     |                         |           |
//! | Running   | suppressed  | Completed (after reload)| Failed    |
//! | Completed | Running     |                         |           |
//! | Failed    | Running     |                         |           |
//!
//! At most one run is in flight. A second trigger while Running returns
//! [`TriggerOutcome::Suppressed`] without touching the network.

use crate::backend::EmissionBackend;
use crate::models::{LoadStatus, RunState};
use crate::store::ResultStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{debug, info, warn};

pub const RUNNING_MESSAGE: &str = "Running emission analysis...";
pub const RUN_FAILED_MESSAGE: &str = "Unable to run analysis. Check the backend logs.";

/// What a call to [`AnalysisOrchestrator::trigger_run`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Another run was already in flight; nothing happened.
    Suppressed,
    /// The backend accepted the run and the store was refreshed.
    Completed,
    /// The run request failed; the store is untouched.
    Failed,
}

#[derive(Debug, Clone, Copy)]
struct Banner {
    run_state: RunState,
    message: &'static str,
}

/// Coordinates recomputation requests and store refreshes.
pub struct AnalysisOrchestrator {
    backend: Arc<dyn EmissionBackend>,
    store: RwLock<ResultStore>,
    banner: Mutex<Banner>,
}

impl AnalysisOrchestrator {
    pub fn new(backend: Arc<dyn EmissionBackend>) -> Self {
        let store = ResultStore::new();
        let banner = Banner {
            run_state: RunState::Idle,
            message: store.message(),
        };

        Self {
            backend,
            store: RwLock::new(store),
            banner: Mutex::new(banner),
        }
    }

    pub fn run_state(&self) -> RunState {
        self.banner().run_state
    }

    /// Presentation uses this to disable the run action.
    #[allow(dead_code)] // Polled by interactive front ends; the CLI awaits the run
    pub fn is_running(&self) -> bool {
        self.run_state() == RunState::Running
    }

    /// Message from the most recent transition or load.
    pub fn status_message(&self) -> &'static str {
        self.banner().message
    }

    /// Snapshot of the current results.
    pub fn store(&self) -> ResultStore {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fetch both collections and apply them, or record the failure.
    ///
    /// Does not change the run state. While a run is in flight the banner
    /// keeps the running message.
    pub async fn reload(&self) -> LoadStatus {
        let status = self.refresh_store().await;

        let mut banner = self.banner();
        if banner.run_state != RunState::Running {
            banner.message = status.message();
        }
        status
    }

    async fn refresh_store(&self) -> LoadStatus {
        let loaded = ResultStore::load(self.backend.as_ref()).await;

        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        match loaded {
            Ok(pair) => store.apply_loaded(pair),
            Err(e) => store.mark_load_failed(&e),
        }
        store.load_status()
    }

    /// Ask the backend to recompute, then refresh the store.
    pub async fn trigger_run(&self) -> TriggerOutcome {
        let Some(guard) = RunGuard::acquire(&self.banner) else {
            debug!("Run already in progress, ignoring trigger");
            return TriggerOutcome::Suppressed;
        };

        info!("Running emission analysis");

        match self.backend.run_analysis().await {
            Ok(()) => {
                let status = self.refresh_store().await;
                self.banner().message = status.message();
                info!(load_status = %status, "Emission analysis completed");
                guard.finish(RunState::Completed);
                TriggerOutcome::Completed
            }
            Err(e) => {
                warn!("Emission analysis failed: {}", e);
                self.banner().message = RUN_FAILED_MESSAGE;
                guard.finish(RunState::Failed);
                TriggerOutcome::Failed
            }
        }
    }

    fn banner(&self) -> MutexGuard<'_, Banner> {
        lock_banner(&self.banner)
    }
}

fn lock_banner(banner: &Mutex<Banner>) -> MutexGuard<'_, Banner> {
    banner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the Running state for the duration of one run.
///
/// Dropping the guard always leaves a terminal state. If the run future is
/// dropped mid-flight or panics, the state becomes Failed.
struct RunGuard<'a> {
    banner: &'a Mutex<Banner>,
    outcome: RunState,
}

impl<'a> RunGuard<'a> {
    fn acquire(banner: &'a Mutex<Banner>) -> Option<Self> {
        let mut current = lock_banner(banner);
        if current.run_state == RunState::Running {
            return None;
        }
        current.run_state = RunState::Running;
        current.message = RUNNING_MESSAGE;

        Some(Self {
            banner,
            outcome: RunState::Failed,
        })
    }

    fn finish(mut self, outcome: RunState) {
        self.outcome = outcome;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut current = lock_banner(self.banner);
        if self.outcome == RunState::Failed && current.message == RUNNING_MESSAGE {
            current.message = RUN_FAILED_MESSAGE;
        }
        current.run_state = self.outcome;
    }
}
