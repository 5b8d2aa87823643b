use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::domain::{AgentId, SourceListing};
use super::rows::{MarketplaceRow, PropertyRow, RowError, UnitTypeRow};

/// Raw access to the hosted backend tables, one fetch per source collection.
#[async_trait]
pub trait ListingBackend: Send + Sync {
    async fn agent_properties(&self, agent: &AgentId) -> Result<Vec<PropertyRow>, BackendError>;

    async fn marketplace_properties(
        &self,
        agent: &AgentId,
    ) -> Result<Vec<MarketplaceRow>, BackendError>;

    async fn developer_unit_types(
        &self,
        agent: &AgentId,
    ) -> Result<Vec<UnitTypeRow>, BackendError>;
}

/// Transport-level failure reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct BackendError(pub String);

/// A fetcher producing normalized listings for one source collection.
#[async_trait]
pub trait ListingSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Every listing of this source visible to `agent`. No listings is `Ok(vec![])`.
    async fn collect(&self, agent: &AgentId) -> Result<Vec<SourceListing>, SourceError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("{source_name} fetch failed: {reason}")]
    Unavailable {
        source_name: &'static str,
        reason: BackendError,
    },
}

/// Re-key fetched rows. A row that cannot become a listing is logged and dropped;
/// only the fetch itself can make a source unavailable.
fn normalize_rows<R>(source_name: &'static str, rows: Vec<R>) -> Vec<SourceListing>
where
    SourceListing: TryFrom<R, Error = RowError>,
{
    rows.into_iter()
        .filter_map(|row| match SourceListing::try_from(row) {
            Ok(listing) => Some(listing),
            Err(error) => {
                warn!(source = source_name, %error, "skipping malformed listing row");
                None
            }
        })
        .collect()
}

/// Properties owned by the agent.
pub struct AgentPropertySource<B> {
    backend: Arc<B>,
}

impl<B> AgentPropertySource<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B> ListingSource for AgentPropertySource<B>
where
    B: ListingBackend + 'static,
{
    fn name(&self) -> &'static str {
        "agent_properties"
    }

    async fn collect(&self, agent: &AgentId) -> Result<Vec<SourceListing>, SourceError> {
        let rows = self
            .backend
            .agent_properties(agent)
            .await
            .map_err(|reason| SourceError::Unavailable {
                source_name: self.name(),
                reason,
            })?;
        Ok(normalize_rows(self.name(), rows))
    }
}

/// Marketplace listings of other agents that `agent` opted into.
pub struct MarketplaceSource<B> {
    backend: Arc<B>,
}

impl<B> MarketplaceSource<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B> ListingSource for MarketplaceSource<B>
where
    B: ListingBackend + 'static,
{
    fn name(&self) -> &'static str {
        "marketplace_properties"
    }

    async fn collect(&self, agent: &AgentId) -> Result<Vec<SourceListing>, SourceError> {
        let rows = self
            .backend
            .marketplace_properties(agent)
            .await
            .map_err(|reason| SourceError::Unavailable {
                source_name: self.name(),
                reason,
            })?;
        Ok(normalize_rows(self.name(), rows))
    }
}

/// Developer project unit types attached to the agent.
pub struct DeveloperUnitSource<B> {
    backend: Arc<B>,
}

impl<B> DeveloperUnitSource<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B> ListingSource for DeveloperUnitSource<B>
where
    B: ListingBackend + 'static,
{
    fn name(&self) -> &'static str {
        "developer_unit_types"
    }

    async fn collect(&self, agent: &AgentId) -> Result<Vec<SourceListing>, SourceError> {
        let rows = self
            .backend
            .developer_unit_types(agent)
            .await
            .map_err(|reason| SourceError::Unavailable {
                source_name: self.name(),
                reason,
            })?;
        Ok(normalize_rows(self.name(), rows))
    }
}
