//! Current vehicle and industry results.
//!
//! The store is replaced wholesale: a load either yields both collections
//! or nothing, and [`ResultStore::apply_loaded`] swaps both at once.

use crate::backend::EmissionBackend;
use crate::error::FetchError;
use crate::models::{LoadStatus, LoadedPair, ResultCollection};
use futures::future::try_join;
use tracing::{debug, info, warn};

/// In-memory snapshot of the latest successful load.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    vehicles: ResultCollection,
    industries: ResultCollection,
    load_status: LoadStatus,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch both collections concurrently.
    ///
    /// Fails if either request fails; nothing is mutated either way.
    pub async fn load(backend: &dyn EmissionBackend) -> Result<LoadedPair, FetchError> {
        debug!("Fetching vehicle and industry results");

        let (vehicles, industries) =
            try_join(backend.fetch_vehicles(), backend.fetch_industries()).await?;

        Ok(LoadedPair {
            vehicles,
            industries,
        })
    }

    /// Replace both collections with a freshly loaded pair.
    pub fn apply_loaded(&mut self, pair: LoadedPair) {
        info!(
            vehicles = pair.vehicles.len(),
            industries = pair.industries.len(),
            "Loaded emission results"
        );
        self.vehicles = pair.vehicles;
        self.industries = pair.industries;
        self.load_status = LoadStatus::Loaded;
    }

    /// Record a failed load. The previous collections stay visible.
    pub fn mark_load_failed(&mut self, error: &FetchError) {
        warn!("Failed to load emission results: {}", error);
        self.load_status = LoadStatus::LoadFailed;
    }

    pub fn vehicles(&self) -> &ResultCollection {
        &self.vehicles
    }

    pub fn industries(&self) -> &ResultCollection {
        &self.industries
    }

    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    /// Banner text for the last load outcome.
    pub fn message(&self) -> &'static str {
        self.load_status.message()
    }
}
