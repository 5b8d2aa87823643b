use async_trait::async_trait;
use listing_hub::config::ListingsConfig;
use listing_hub::listings::{
    AgentId, BackendError, CurrencyPreferenceStore, InventorySnapshot, ListingAggregator,
    ListingBackend, MarketplaceRow, PropertyRow, UnitTypeRow,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared handles behind the listing routes.
#[derive(Clone)]
pub(crate) struct ListingState {
    pub(crate) aggregator: Arc<ListingAggregator>,
    pub(crate) preferences: Arc<dyn CurrencyPreferenceStore>,
    pub(crate) settings: ListingsConfig,
}

/// Backend serving a CSV inventory export from memory, scoped the way the hosted
/// tables scope rows for an agent.
#[derive(Debug, Default, Clone)]
pub(crate) struct InMemoryListingBackend {
    inventory: Arc<InventorySnapshot>,
}

impl InMemoryListingBackend {
    pub(crate) fn new(inventory: InventorySnapshot) -> Self {
        Self {
            inventory: Arc::new(inventory),
        }
    }
}

#[async_trait]
impl ListingBackend for InMemoryListingBackend {
    async fn agent_properties(&self, agent: &AgentId) -> Result<Vec<PropertyRow>, BackendError> {
        Ok(self
            .inventory
            .properties
            .iter()
            .filter(|row| row.agent_id == agent.0)
            .cloned()
            .collect())
    }

    async fn marketplace_properties(
        &self,
        agent: &AgentId,
    ) -> Result<Vec<MarketplaceRow>, BackendError> {
        Ok(self
            .inventory
            .marketplace
            .iter()
            .filter(|row| row.opted_in(&agent.0))
            .cloned()
            .collect())
    }

    async fn developer_unit_types(
        &self,
        agent: &AgentId,
    ) -> Result<Vec<UnitTypeRow>, BackendError> {
        Ok(self
            .inventory
            .unit_types
            .iter()
            .filter(|row| row.agent_id == agent.0)
            .cloned()
            .collect())
    }
}

/// Comma-separated list argument, dropping blanks.
pub(crate) fn comma_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
