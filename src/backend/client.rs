//! reqwest client for the emission analysis service.

use crate::backend::{normalize_base_url, EmissionBackend};
use crate::error::{FetchError, RunRequestError};
use crate::models::{EmissionRecord, EmissionStatus, ResultCollection};
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

const VEHICLES_ENDPOINT: &str = "/vehicles";
const INDUSTRIES_ENDPOINT: &str = "/industries";
const RUN_ANALYSIS_ENDPOINT: &str = "/run-analysis";

/// Row of the `/vehicles` payload.
#[derive(Debug, Deserialize)]
struct VehicleRow {
    vehicle_no: String,
    #[serde(rename = "Predicted_CO2")]
    predicted_co2: f64,
    #[serde(rename = "Status", default, deserialize_with = "lenient_status")]
    status: EmissionStatus,
}

impl From<VehicleRow> for EmissionRecord {
    fn from(row: VehicleRow) -> Self {
        EmissionRecord::new(row.vehicle_no, row.predicted_co2, row.status)
    }
}

/// Row of the `/industries` payload.
#[derive(Debug, Deserialize)]
struct IndustryRow {
    #[serde(rename = "Industry_Name")]
    industry_name: String,
    #[serde(rename = "Predicted_CO2")]
    predicted_co2: f64,
    #[serde(rename = "Status", default, deserialize_with = "lenient_status")]
    status: EmissionStatus,
}

impl From<IndustryRow> for EmissionRecord {
    fn from(row: IndustryRow) -> Self {
        EmissionRecord::new(row.industry_name, row.predicted_co2, row.status)
    }
}

/// Accept any JSON value for `Status`. Non-string values become `Other`
/// so one odd row cannot fail the whole collection.
fn lenient_status<'de, D>(deserializer: D) -> Result<EmissionStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let status = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => EmissionStatus::from(s),
        None | Some(Value::Null) => EmissionStatus::default(),
        Some(other) => EmissionStatus::Other(other.to_string()),
    };
    Ok(status)
}

/// HTTP implementation of [`EmissionBackend`].
pub struct HttpBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client for `base_url`.
    ///
    /// `timeout` of `None` means requests wait indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let base_url = normalize_base_url(base_url);
        info!("Using analysis backend at {}", base_url);

        Ok(Self {
            http_client,
            base_url,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn fetch_collection<R>(&self, endpoint: &str) -> Result<ResultCollection, FetchError>
    where
        R: DeserializeOwned + Into<EmissionRecord>,
    {
        let url = self.url(endpoint);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        decode_collection::<R>(endpoint, &body)
    }
}

/// Decode a JSON array payload into records, keeping payload order.
fn decode_collection<R>(endpoint: &str, body: &[u8]) -> Result<ResultCollection, FetchError>
where
    R: DeserializeOwned + Into<EmissionRecord>,
{
    let rows: Vec<R> = serde_json::from_slice(body).map_err(|source| FetchError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })?;

    debug!("Decoded {} rows from {}", rows.len(), endpoint);
    Ok(rows.into_iter().map(Into::into).collect())
}

#[async_trait::async_trait]
impl EmissionBackend for HttpBackend {
    async fn fetch_vehicles(&self) -> Result<ResultCollection, FetchError> {
        self.fetch_collection::<VehicleRow>(VEHICLES_ENDPOINT).await
    }

    async fn fetch_industries(&self) -> Result<ResultCollection, FetchError> {
        self.fetch_collection::<IndustryRow>(INDUSTRIES_ENDPOINT).await
    }

    async fn run_analysis(&self) -> Result<(), RunRequestError> {
        let url = self.url(RUN_ANALYSIS_ENDPOINT);
        debug!("POST {}", url);

        let response = self.http_client.post(&url).send().await?;

        if !response.status().is_success() {
            return Err(RunRequestError::Status {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LoadStatus, LoadedPair};
    use crate::store::ResultStore;
    use crate::views::{classify_badge, BadgeClass};

    #[test]
    fn test_decode_vehicle_payload() {
        let body = br#"[
            {"vehicle_no": "KA01AB1234", "Predicted_CO2": 132.5, "Status": "HIGH", "fuel_type": 1},
            {"vehicle_no": "KA02CD5678", "Predicted_CO2": 88.0, "Status": "SAFE"}
        ]"#;

        let records = decode_collection::<VehicleRow>(VEHICLES_ENDPOINT, body).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identifier, "KA01AB1234");
        assert_eq!(records[0].predicted_value, 132.5);
        assert_eq!(records[0].status, EmissionStatus::High);
        assert_eq!(
            records[1].status,
            EmissionStatus::Other("SAFE".to_string())
        );
    }

    #[test]
    fn test_decode_industry_payload_missing_status() {
        let body = br#"[{"Industry_Name": "Steel Works", "Predicted_CO2": 612.25}]"#;

        let records = decode_collection::<IndustryRow>(INDUSTRIES_ENDPOINT, body).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier, "Steel Works");
        assert_eq!(records[0].status, EmissionStatus::default());
    }

    #[test]
    fn test_decode_rejects_malformed_payload() {
        let body = br#"{"detail": "Run analysis to generate results."}"#;

        let err = decode_collection::<VehicleRow>(VEHICLES_ENDPOINT, body).unwrap_err();

        assert!(matches!(err, FetchError::Decode { ref endpoint, .. } if endpoint == "/vehicles"));
    }

    #[test]
    fn test_decode_null_and_numeric_status() {
        let body = br#"[
            {"vehicle_no": "V1", "Predicted_CO2": 120.0, "Status": null},
            {"vehicle_no": "V2", "Predicted_CO2": 80.0, "Status": 1},
            {"vehicle_no": "V3", "Predicted_CO2": 60.0, "Status": true}
        ]"#;

        let records = decode_collection::<VehicleRow>(VEHICLES_ENDPOINT, body).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].status, EmissionStatus::default());
        assert_eq!(records[1].status, EmissionStatus::Other("1".to_string()));
        assert_eq!(records[2].status, EmissionStatus::Other("true".to_string()));
    }

    #[test]
    fn test_odd_status_rows_still_load_with_low_badge() {
        let vehicles = br#"[
            {"vehicle_no": "V1", "Predicted_CO2": 120.0, "Status": "HIGH"},
            {"vehicle_no": "V2", "Predicted_CO2": 80.0, "Status": null}
        ]"#;
        let industries = br#"[{"Industry_Name": "Mill", "Predicted_CO2": 300.0, "Status": 0}]"#;

        let mut store = ResultStore::new();
        store.apply_loaded(LoadedPair {
            vehicles: decode_collection::<VehicleRow>(VEHICLES_ENDPOINT, vehicles).unwrap(),
            industries: decode_collection::<IndustryRow>(INDUSTRIES_ENDPOINT, industries).unwrap(),
        });

        assert_eq!(store.load_status(), LoadStatus::Loaded);
        assert_eq!(store.vehicles().len(), 2);
        assert_eq!(classify_badge(&store.vehicles()[0].status), BadgeClass::High);
        assert_eq!(classify_badge(&store.vehicles()[1].status), BadgeClass::Low);
        assert_eq!(classify_badge(&store.industries()[0].status), BadgeClass::Low);
    }

    #[test]
    fn test_url_building() {
        let backend = HttpBackend::new("http://localhost:8000/", None).unwrap();
        assert_eq!(backend.base_url, "http://localhost:8000");
        assert_eq!(backend.url(RUN_ANALYSIS_ENDPOINT), "http://localhost:8000/run-analysis");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP
        let backend = HttpBackend::new("http://127.0.0.1:9", Some(Duration::from_secs(2))).unwrap();

        let fetch = backend.fetch_vehicles().await;
        assert!(matches!(fetch, Err(FetchError::Transport { .. })));

        let run = backend.run_analysis().await;
        assert!(matches!(run, Err(RunRequestError::Transport(_))));
    }
}
