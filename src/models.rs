//! Data models for the emission dashboard.
//!
//! This module contains the records fetched from the analysis backend,
//! the load/run state enums, and the dashboard snapshot handed to the
//! report generator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Emission classification assigned by the backend.
///
/// Only `HIGH` and `LOW` are recognized. Anything else (the backend also
/// emits `SAFE`, and the field may be missing) is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmissionStatus {
    High,
    Low,
    Other(String),
}

impl Default for EmissionStatus {
    fn default() -> Self {
        EmissionStatus::Other(String::new())
    }
}

impl From<&str> for EmissionStatus {
    fn from(s: &str) -> Self {
        match s {
            "HIGH" => EmissionStatus::High,
            "LOW" => EmissionStatus::Low,
            other => EmissionStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for EmissionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "HIGH" => EmissionStatus::High,
            "LOW" => EmissionStatus::Low,
            _ => EmissionStatus::Other(s),
        }
    }
}

impl From<EmissionStatus> for String {
    fn from(status: EmissionStatus) -> Self {
        match status {
            EmissionStatus::High => "HIGH".to_string(),
            EmissionStatus::Low => "LOW".to_string(),
            EmissionStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for EmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmissionStatus::High => write!(f, "HIGH"),
            EmissionStatus::Low => write!(f, "LOW"),
            EmissionStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// One classified subject: a vehicle or an industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    /// Vehicle number or industry name. Not unique within a collection.
    pub identifier: String,
    /// Predicted CO2 quantity.
    pub predicted_value: f64,
    /// Classification assigned upstream.
    pub status: EmissionStatus,
}

impl EmissionRecord {
    pub fn new(identifier: impl Into<String>, predicted_value: f64, status: EmissionStatus) -> Self {
        Self {
            identifier: identifier.into(),
            predicted_value,
            status,
        }
    }
}

/// Records in backend response order.
///
/// Read-only once built; derefs to a slice so the view functions can
/// borrow it without copying.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultCollection(Vec<EmissionRecord>);

impl Deref for ResultCollection {
    type Target = [EmissionRecord];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<EmissionRecord>> for ResultCollection {
    fn from(records: Vec<EmissionRecord>) -> Self {
        Self(records)
    }
}

impl FromIterator<EmissionRecord> for ResultCollection {
    fn from_iter<I: IntoIterator<Item = EmissionRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Both collections from one successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPair {
    pub vehicles: ResultCollection,
    pub industries: ResultCollection,
}

/// Outcome of the most recent load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    NeverLoaded,
    Loaded,
    LoadFailed,
}

impl LoadStatus {
    /// Banner text shown for this outcome.
    pub fn message(&self) -> &'static str {
        match self {
            LoadStatus::NeverLoaded => "Run analysis to load the latest emissions.",
            LoadStatus::Loaded => "Latest emissions loaded.",
            LoadStatus::LoadFailed => "Run analysis to generate results.",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::NeverLoaded => write!(f, "Never loaded"),
            LoadStatus::Loaded => write!(f, "Loaded"),
            LoadStatus::LoadFailed => write!(f, "Load failed"),
        }
    }
}

/// Lifecycle of a backend recomputation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "Idle"),
            RunState::Running => write!(f, "Running"),
            RunState::Completed => write!(f, "Completed"),
            RunState::Failed => write!(f, "Failed"),
        }
    }
}

/// A record annotated with its 1-based position in fetch order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub index: usize,
    #[serde(flatten)]
    pub record: EmissionRecord,
}

/// The four aggregate cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    /// Vehicles flagged HIGH.
    pub high_vehicles: usize,
    /// Industries flagged HIGH.
    pub high_industries: usize,
    pub total_vehicles: usize,
    pub total_industries: usize,
}

/// Download URLs for the backend's report artifacts. Never fetched here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLinks {
    pub vehicles: String,
    pub industries: String,
}

/// Metadata about the dashboard snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetadata {
    /// Backend base URL the data came from.
    pub api_base: String,
    /// When the snapshot was taken.
    pub generated_at: DateTime<Utc>,
    pub run_state: RunState,
    pub load_status: LoadStatus,
    /// Limit used for the top-N tables.
    pub top_n: usize,
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub metadata: DashboardMetadata,
    /// Current banner message.
    pub message: String,
    pub summary: StatusSummary,
    pub vehicles: ResultCollection,
    pub industries: ResultCollection,
    pub top_vehicles: Vec<EmissionRecord>,
    pub top_industries: Vec<EmissionRecord>,
    pub vehicle_trend: Vec<TrendPoint>,
    pub links: ReportLinks,
}
