//! In-memory backend for store and orchestrator tests.

use crate::backend::EmissionBackend;
use crate::error::{FetchError, RunRequestError};
use crate::models::{EmissionRecord, EmissionStatus, ResultCollection};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Canned responses keyed by endpoint. `Err(status)` simulates a non-2xx reply.
pub struct FakeBackend {
    vehicles: Mutex<Result<ResultCollection, u16>>,
    industries: Mutex<Result<ResultCollection, u16>>,
    run_result: Mutex<Result<(), u16>>,
    /// Data served after a successful run, simulating recomputation.
    after_run: Mutex<Option<(ResultCollection, ResultCollection)>>,
    run_gate: Option<Arc<Notify>>,
    fetch_calls: AtomicUsize,
    run_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new(vehicles: ResultCollection, industries: ResultCollection) -> Self {
        Self {
            vehicles: Mutex::new(Ok(vehicles)),
            industries: Mutex::new(Ok(industries)),
            run_result: Mutex::new(Ok(())),
            after_run: Mutex::new(None),
            run_gate: None,
            fetch_calls: AtomicUsize::new(0),
            run_calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(ResultCollection::default(), ResultCollection::default())
    }

    pub fn failing_vehicles(self, status: u16) -> Self {
        *self.vehicles.lock().unwrap() = Err(status);
        self
    }

    pub fn failing_industries(self, status: u16) -> Self {
        *self.industries.lock().unwrap() = Err(status);
        self
    }

    pub fn failing_run(self, status: u16) -> Self {
        *self.run_result.lock().unwrap() = Err(status);
        self
    }

    pub fn serving_after_run(self, vehicles: ResultCollection, industries: ResultCollection) -> Self {
        *self.after_run.lock().unwrap() = Some((vehicles, industries));
        self
    }

    /// Hold every `run_analysis` call until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.run_gate = Some(gate);
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn run_calls(&self) -> usize {
        self.run_calls.load(Ordering::SeqCst)
    }

    fn respond(
        &self,
        endpoint: &str,
        slot: &Mutex<Result<ResultCollection, u16>>,
    ) -> Result<ResultCollection, FetchError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        slot.lock()
            .unwrap()
            .clone()
            .map_err(|status| FetchError::Status {
                endpoint: endpoint.to_string(),
                status,
            })
    }
}

#[async_trait::async_trait]
impl EmissionBackend for FakeBackend {
    async fn fetch_vehicles(&self) -> Result<ResultCollection, FetchError> {
        tokio::task::yield_now().await;
        self.respond("/vehicles", &self.vehicles)
    }

    async fn fetch_industries(&self) -> Result<ResultCollection, FetchError> {
        tokio::task::yield_now().await;
        self.respond("/industries", &self.industries)
    }

    async fn run_analysis(&self) -> Result<(), RunRequestError> {
        self.run_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.run_gate {
            gate.notified().await;
        }

        let result = *self.run_result.lock().unwrap();
        match result {
            Ok(()) => {
                if let Some((vehicles, industries)) = self.after_run.lock().unwrap().take() {
                    *self.vehicles.lock().unwrap() = Ok(vehicles);
                    *self.industries.lock().unwrap() = Ok(industries);
                }
                Ok(())
            }
            Err(status) => Err(RunRequestError::Status { status }),
        }
    }
}

/// Shorthand for test records.
pub fn record(identifier: &str, value: f64, status: &str) -> EmissionRecord {
    EmissionRecord::new(identifier, value, EmissionStatus::from(status))
}

pub fn collection(records: &[(&str, f64, &str)]) -> ResultCollection {
    records
        .iter()
        .map(|(id, value, status)| record(id, *value, status))
        .collect()
}
