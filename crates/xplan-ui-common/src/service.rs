//! Main UI service entry point.
//!
//! The [`UiService`] provides a unified interface for front-ends, coordinating
//! result resolution, plan editing, datastore settings and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use xplan_io::{ApiClient, ResultsSource};

use crate::config::XplanConfig;
use crate::database::DatabaseService;
use crate::error::Result;
use crate::events::{PlanEvent, QueryEvent};
use crate::plans::PlanStore;
use crate::queries::QueryTracker;
use crate::resolver::{DataSourceResolver, Resolution};
use crate::view::ResultsView;

/// Main service coordinating all UI functionality.
///
/// Owns and coordinates:
/// - [`DataSourceResolver`]: results with demo fallback, last query wins
/// - [`QueryTracker`]: in-flight result queries
/// - [`PlanStore`]: expansion plans and candidates
/// - [`DatabaseService`]: backend datastore settings
/// - [`XplanConfig`]: application configuration
///
/// # Example
///
/// ```ignore
/// let service = UiService::new()?;
///
/// let resolution = service
///     .resolver()
///     .resolve(ResultQuery::new(5, CalculationBasis::Yearly))
///     .await;
/// let view = service.new_view(&resolution)?;
/// ```
pub struct UiService {
    /// Application configuration.
    config: Arc<RwLock<XplanConfig>>,

    /// Backend client shared by the resolver and the database service.
    client: ApiClient,

    /// Tracker for result queries.
    queries: Arc<QueryTracker>,

    resolver: DataSourceResolver,

    plans: Arc<PlanStore>,

    database: DatabaseService,
}

impl UiService {
    /// Create a new UI service with default configuration.
    ///
    /// Loads configuration from `~/.xplan/config.toml` if it exists,
    /// otherwise uses defaults.
    pub fn new() -> Result<Self> {
        let config = XplanConfig::load()?;
        Self::with_config(config)
    }

    /// Create a new UI service with the provided configuration.
    pub fn with_config(config: XplanConfig) -> Result<Self> {
        Self::assemble(config, None)
    }

    fn assemble(config: XplanConfig, source: Option<Arc<dyn ResultsSource>>) -> Result<Self> {
        config.validate()?;

        let client = ApiClient::with_timeout(config.api.base_url.clone(), config.api.timeout());
        let queries = QueryTracker::shared();
        let source: Arc<dyn ResultsSource> = match source {
            Some(source) => source,
            None => Arc::new(client.clone()),
        };
        let resolver = DataSourceResolver::with_tracker(source, Arc::clone(&queries))
            .retry_transient(config.api.retry_transient);

        Ok(Self {
            database: DatabaseService::new(client.clone()),
            config: Arc::new(RwLock::new(config)),
            client,
            queries,
            resolver,
            plans: Arc::new(PlanStore::new()),
        })
    }

    pub fn resolver(&self) -> &DataSourceResolver {
        &self.resolver
    }

    pub fn plans(&self) -> &Arc<PlanStore> {
        &self.plans
    }

    pub fn database(&self) -> &DatabaseService {
        &self.database
    }

    /// Blocking backend client, for calls outside the result flow.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Get the configuration (read-only access).
    pub fn config(&self) -> &Arc<RwLock<XplanConfig>> {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────
    // Convenience methods that delegate to components
    // ─────────────────────────────────────────────────────────────────────

    /// View over `resolution` with the configured default page size.
    pub fn new_view(&self, resolution: &Resolution) -> Result<ResultsView> {
        let page_size = self.config.read().view.default_page_size;
        ResultsView::new(resolution, page_size)
    }

    /// Number of result queries still in flight.
    pub fn active_query_count(&self) -> usize {
        self.queries.active_count()
    }

    pub fn subscribe_queries(&self) -> broadcast::Receiver<QueryEvent> {
        self.queries.subscribe()
    }

    pub fn subscribe_plans(&self) -> broadcast::Receiver<PlanEvent> {
        self.plans.subscribe()
    }

    /// Save the current configuration.
    pub fn save_config(&self) -> Result<()> {
        let cfg = self.config.read();
        cfg.save()
    }
}

/// Builder for configuring a [`UiService`].
#[derive(Default)]
pub struct UiServiceBuilder {
    config: Option<XplanConfig>,
    config_path: Option<PathBuf>,
    api_url: Option<String>,
    source: Option<Arc<dyn ResultsSource>>,
}

impl UiServiceBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific configuration.
    pub fn config(mut self, config: XplanConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from a specific path.
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Override `api.base_url` from the configuration.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Resolve results against `source` instead of the HTTP client.
    pub fn source(mut self, source: Arc<dyn ResultsSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Build the UI service.
    pub fn build(self) -> Result<UiService> {
        let mut config = if let Some(cfg) = self.config {
            cfg
        } else if let Some(path) = self.config_path {
            XplanConfig::load_from(&path)?
        } else {
            XplanConfig::load()?
        };

        if let Some(url) = self.api_url {
            config.api.base_url = url;
        }

        UiService::assemble(config, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DataOrigin;
    use xplan_core::{CalculationBasis, ResultQuery, ResultRow};
    use xplan_io::ApiError;

    struct Fixed;

    impl ResultsSource for Fixed {
        fn fetch_results(
            &self,
            query: &ResultQuery,
        ) -> std::result::Result<Vec<ResultRow>, ApiError> {
            Ok(vec![ResultRow::new("Wind", 1, 2031)
                .with_status("Selected")
                .with_metric("System Cost", query.scenario_id as f64)])
        }
    }

    #[test]
    fn test_service_creation() {
        let service = UiService::with_config(XplanConfig::default()).unwrap();
        assert_eq!(service.active_query_count(), 0);
        assert!(service.plans().is_empty());
        assert_eq!(service.client().base_url(), "http://localhost:5000/api");
    }

    #[test]
    fn test_builder_overrides_api_url() {
        let mut config = XplanConfig::default();
        config.view.default_page_size = 50;

        let service = UiServiceBuilder::new()
            .config(config)
            .api_url("http://planner:8080/api/")
            .build()
            .unwrap();

        assert_eq!(service.config().read().view.default_page_size, 50);
        assert_eq!(service.client().base_url(), "http://planner:8080/api");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = XplanConfig::default();
        config.api.timeout_secs = 0;
        assert!(UiService::with_config(config).is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_resolve_into_view() {
        let service = UiServiceBuilder::new()
            .config(XplanConfig::default())
            .source(Arc::new(Fixed))
            .build()
            .unwrap();

        let resolution = service
            .resolver()
            .resolve(ResultQuery::new(7, CalculationBasis::Yearly))
            .await;
        assert_eq!(resolution.origin, DataOrigin::Live);

        let view = service.new_view(&resolution).unwrap();
        assert_eq!(view.pagination().page_size(), 25);
        assert_eq!(view.page().total, 1);
        assert!(!view.is_using_mock_data());
    }
}
