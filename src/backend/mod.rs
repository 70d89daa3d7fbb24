//! Analysis backend access.
//!
//! The [`EmissionBackend`] trait is the seam between the orchestration
//! logic and the HTTP service; [`HttpBackend`] is the reqwest implementation.

pub mod client;
#[cfg(test)]
pub mod testing;

pub use client::HttpBackend;

use crate::error::{FetchError, RunRequestError};
use crate::models::{ReportLinks, ResultCollection};

/// Default backend location when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Operations the dashboard needs from the analysis service.
#[async_trait::async_trait]
pub trait EmissionBackend: Send + Sync {
    /// `GET /vehicles`
    async fn fetch_vehicles(&self) -> Result<ResultCollection, FetchError>;

    /// `GET /industries`
    async fn fetch_industries(&self) -> Result<ResultCollection, FetchError>;

    /// `POST /run-analysis`. The response body is ignored.
    async fn run_analysis(&self) -> Result<(), RunRequestError>;
}

/// Strip trailing slashes so endpoint paths can be appended directly.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Download links for the backend's CSV reports.
pub fn report_links(base_url: &str) -> ReportLinks {
    let base = normalize_base_url(base_url);
    ReportLinks {
        vehicles: format!("{}/download/vehicles", base),
        industries: format!("{}/download/industries", base),
    }
}
