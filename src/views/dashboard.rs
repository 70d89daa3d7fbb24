//! Assemble a [`Dashboard`] snapshot from the store and run state.

use crate::backend::{normalize_base_url, report_links};
use crate::models::{Dashboard, DashboardMetadata, RunState};
use crate::store::ResultStore;
use crate::views::derive::{summarize, top_n, trend_sequence};
use chrono::Utc;

/// Knobs for building a dashboard.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Rows in each top-N table.
    pub top_n: usize,
    /// Backend base URL, used for the download links.
    pub api_base: String,
}

pub fn build_dashboard(
    store: &ResultStore,
    run_state: RunState,
    message: &str,
    options: &DashboardOptions,
) -> Dashboard {
    let vehicles = store.vehicles();
    let industries = store.industries();

    Dashboard {
        metadata: DashboardMetadata {
            api_base: normalize_base_url(&options.api_base),
            generated_at: Utc::now(),
            run_state,
            load_status: store.load_status(),
            top_n: options.top_n,
        },
        message: message.to_string(),
        summary: summarize(vehicles, industries),
        vehicles: vehicles.clone(),
        industries: industries.clone(),
        top_vehicles: top_n(vehicles, options.top_n),
        top_industries: top_n(industries, options.top_n),
        vehicle_trend: trend_sequence(vehicles),
        links: report_links(&options.api_base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::collection;
    use crate::models::{LoadStatus, LoadedPair};

    #[test]
    fn test_build_dashboard() {
        let mut store = ResultStore::new();
        store.apply_loaded(LoadedPair {
            vehicles: collection(&[
                ("V1", 120.0, "HIGH"),
                ("V2", 80.0, "LOW"),
                ("V3", 150.0, "HIGH"),
            ]),
            industries: collection(&[("Cement Co", 700.0, "HIGH"), ("Textile", 90.0, "SAFE")]),
        });
        let options = DashboardOptions {
            top_n: 2,
            api_base: "http://localhost:8000/".to_string(),
        };

        let dashboard = build_dashboard(&store, RunState::Completed, store.message(), &options);

        assert_eq!(dashboard.metadata.api_base, "http://localhost:8000");
        assert_eq!(dashboard.metadata.load_status, LoadStatus::Loaded);
        assert_eq!(dashboard.metadata.run_state, RunState::Completed);
        assert_eq!(dashboard.message, "Latest emissions loaded.");
        assert_eq!(dashboard.summary.high_vehicles, 2);
        assert_eq!(dashboard.summary.total_industries, 2);
        assert_eq!(dashboard.top_vehicles.len(), 2);
        assert_eq!(dashboard.top_vehicles[0].identifier, "V3");
        assert_eq!(dashboard.vehicle_trend[2].index, 3);
        assert_eq!(dashboard.vehicle_trend[2].record.identifier, "V3");
        assert_eq!(
            dashboard.links.industries,
            "http://localhost:8000/download/industries"
        );
    }

    #[test]
    fn test_build_dashboard_empty_store() {
        let store = ResultStore::new();
        let options = DashboardOptions {
            top_n: 5,
            api_base: "http://localhost:8000".to_string(),
        };

        let dashboard = build_dashboard(&store, RunState::Idle, store.message(), &options);

        assert_eq!(dashboard.summary, Default::default());
        assert!(dashboard.top_vehicles.is_empty());
        assert!(dashboard.vehicle_trend.is_empty());
    }
}
