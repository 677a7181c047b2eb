use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use xplan_core::{
    CalculationBasis, ResultQuery, ResultRow, NPV_METRICS, UNIT_CHANGE_METRICS, YEARLY_METRICS,
};

use super::database::{DatabaseConfig, DatabaseOperationResult, DatabaseStatus};
use super::dto::{error_message, RawRecord, ScenarioDetails, ScenarioSummary};
use super::mapping::rows_from_records;
use super::ResultsSource;
use crate::error::ApiError;

/// Per-request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking JSON client for the expansion-plan backend.
///
/// Every call carries the configured timeout. Non-2xx replies become
/// [`ApiError::Status`] with the body's `message` field.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ApiClient {
    /// Create a client with the default 30 second timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, params);

        let mut request = self.agent.get(&url);
        for (name, value) in params {
            request = request.query(name, value);
        }
        let response = request.call().map_err(ApiError::from)?;
        response
            .into_json()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("POST {}", url);

        let request = self.agent.post(&url);
        let response = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        }
        .map_err(ApiError::from)?;
        response
            .into_json()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Scenarios
    // ─────────────────────────────────────────────────────────────────────

    /// `GET /scenarios`
    pub fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>, ApiError> {
        self.get_json("scenarios", &[])
    }

    /// `GET /scenarios/{id}/details`
    pub fn scenario_details(&self, scenario_id: i64) -> Result<ScenarioDetails, ApiError> {
        self.get_json(&format!("scenarios/{scenario_id}/details"), &[])
    }

    // ─────────────────────────────────────────────────────────────────────
    // Results
    // ─────────────────────────────────────────────────────────────────────

    /// `GET /results/study/{id}?year&iteration`
    pub fn yearly_results(&self, query: &ResultQuery) -> Result<Vec<ResultRow>, ApiError> {
        let records: Vec<RawRecord> = self.get_json(
            &format!("results/study/{}", query.scenario_id),
            &filter_params(query),
        )?;
        Ok(rows_from_records(&records, YEARLY_METRICS))
    }

    /// `GET /results/npv/{id}?year&iteration`
    pub fn npv_results(&self, query: &ResultQuery) -> Result<Vec<ResultRow>, ApiError> {
        let records: Vec<RawRecord> = self.get_json(
            &format!("results/npv/{}", query.scenario_id),
            &filter_params(query),
        )?;
        Ok(rows_from_records(&records, NPV_METRICS))
    }

    /// `GET /results/units/{id}?year`
    pub fn unit_results(
        &self,
        scenario_id: i64,
        year: Option<i32>,
    ) -> Result<Vec<ResultRow>, ApiError> {
        let params: Vec<_> = year.map(|y| ("year", y.to_string())).into_iter().collect();
        let records: Vec<RawRecord> =
            self.get_json(&format!("results/units/{scenario_id}"), &params)?;
        Ok(rows_from_records(&records, UNIT_CHANGE_METRICS))
    }

    /// `GET /results/years/{id}`
    pub fn available_years(&self, scenario_id: i64) -> Result<Vec<String>, ApiError> {
        self.get_json(&format!("results/years/{scenario_id}"), &[])
    }

    // ─────────────────────────────────────────────────────────────────────
    // Database configuration
    // ─────────────────────────────────────────────────────────────────────

    /// `POST /databaseconfig/test`
    pub fn test_database(
        &self,
        config: &DatabaseConfig,
    ) -> Result<DatabaseOperationResult, ApiError> {
        config.validate()?;
        self.post_json("databaseconfig/test", Some(config))
    }

    /// `POST /databaseconfig/configure`
    pub fn configure_database(
        &self,
        config: &DatabaseConfig,
    ) -> Result<DatabaseOperationResult, ApiError> {
        config.validate()?;
        self.post_json("databaseconfig/configure", Some(config))
    }

    /// `GET /databaseconfig/current`; the password is never returned.
    pub fn current_database(&self) -> Result<Option<DatabaseConfig>, ApiError> {
        self.get_json("databaseconfig/current", &[])
    }

    /// `GET /databaseconfig/status`
    pub fn database_status(&self) -> Result<DatabaseStatus, ApiError> {
        self.get_json("databaseconfig/status", &[])
    }

    /// `POST /databaseconfig/disconnect`
    pub fn disconnect_database(&self) -> Result<DatabaseOperationResult, ApiError> {
        self.post_json::<(), _>("databaseconfig/disconnect", None)
    }
}

impl ResultsSource for ApiClient {
    fn fetch_results(&self, query: &ResultQuery) -> Result<Vec<ResultRow>, ApiError> {
        match query.basis {
            CalculationBasis::Yearly => self.yearly_results(query),
            CalculationBasis::Npv => self.npv_results(query),
        }
    }
}

fn filter_params(query: &ResultQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(year) = query.year {
        params.push(("year", year.to_string()));
    }
    if let Some(iteration) = query.iteration {
        params.push(("iteration", iteration.to_string()));
    }
    params
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                let message = error_message(&body);
                ApiError::Status {
                    status,
                    message: if message.is_empty() {
                        format!("HTTP {status}")
                    } else {
                        message
                    },
                }
            }
            ureq::Error::Transport(transport) => ApiError::Transport(transport.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("http://localhost:5000/api/");
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(
            client.url("/results/years/5"),
            "http://localhost:5000/api/results/years/5"
        );
    }

    #[test]
    fn test_filter_params() {
        let query = ResultQuery::new(5, CalculationBasis::Yearly)
            .with_year(2030)
            .with_iteration(2);
        assert_eq!(
            filter_params(&query),
            vec![("year", "2030".to_string()), ("iteration", "2".to_string())]
        );
        assert!(filter_params(&ResultQuery::new(5, CalculationBasis::Npv)).is_empty());
    }

    #[test]
    fn test_validation_happens_before_network() {
        // Nothing listens on this port; a validation error proves no request was made.
        let client = ApiClient::new("http://127.0.0.1:9");
        let err = client
            .test_database(&DatabaseConfig::windows("", "expansion"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_unreachable_backend_is_transport_error() {
        let client = ApiClient::with_timeout("http://127.0.0.1:9", Duration::from_secs(2));
        let err = client.list_scenarios().unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(err.is_transient());
    }
}
