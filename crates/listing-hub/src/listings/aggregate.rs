use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::domain::{AgentId, ListingRecord, Provenance, SourceListing};
use super::sources::{
    AgentPropertySource, DeveloperUnitSource, ListingBackend, ListingSource, MarketplaceSource,
    SourceError,
};

/// Aggregate load failure. The whole load fails when any collector fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("{provenance} listings unavailable: {source}")]
    SourceUnavailable {
        provenance: Provenance,
        source: SourceError,
    },
}

impl LoadError {
    /// Collector failures are transient from the caller's point of view.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LoadError::SourceUnavailable { .. })
    }
}

/// Merges the three source collections into one provenance-tagged list.
pub struct ListingAggregator {
    direct: Arc<dyn ListingSource>,
    marketplace: Arc<dyn ListingSource>,
    developer_units: Arc<dyn ListingSource>,
}

impl ListingAggregator {
    pub fn new(
        direct: Arc<dyn ListingSource>,
        marketplace: Arc<dyn ListingSource>,
        developer_units: Arc<dyn ListingSource>,
    ) -> Self {
        Self {
            direct,
            marketplace,
            developer_units,
        }
    }

    /// Wire the standard collectors over a single backend.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: ListingBackend + 'static,
    {
        Self::new(
            Arc::new(AgentPropertySource::new(backend.clone())),
            Arc::new(MarketplaceSource::new(backend.clone())),
            Arc::new(DeveloperUnitSource::new(backend)),
        )
    }

    /// Run all collectors concurrently and concatenate their output in
    /// direct, marketplace, developer-unit order.
    pub async fn load_listings(&self, agent: &AgentId) -> Result<Vec<ListingRecord>, LoadError> {
        let (direct, marketplace, developer_units) = tokio::try_join!(
            collect_from(self.direct.as_ref(), Provenance::Direct, agent),
            collect_from(self.marketplace.as_ref(), Provenance::Marketplace, agent),
            collect_from(
                self.developer_units.as_ref(),
                Provenance::DeveloperUnit,
                agent
            ),
        )?;

        debug!(
            agent = %agent,
            direct = direct.len(),
            marketplace = marketplace.len(),
            developer_units = developer_units.len(),
            "aggregated listing sources"
        );

        let mut records =
            Vec::with_capacity(direct.len() + marketplace.len() + developer_units.len());
        for (provenance, listings) in Provenance::ORDER
            .into_iter()
            .zip([direct, marketplace, developer_units])
        {
            records.extend(
                listings
                    .into_iter()
                    .map(|listing| listing.into_record(provenance)),
            );
        }

        Ok(records)
    }
}

async fn collect_from(
    source: &dyn ListingSource,
    provenance: Provenance,
    agent: &AgentId,
) -> Result<Vec<SourceListing>, LoadError> {
    source.collect(agent).await.map_err(|error| {
        warn!(agent = %agent, source = source.name(), %error, "listing source failed");
        LoadError::SourceUnavailable {
            provenance,
            source: error,
        }
    })
}

/// Ticket identifying one aggregation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Issues tickets so callers can tell whether a finished load is still the latest one.
#[derive(Debug, Default)]
pub struct LoadSequencer {
    latest: AtomicU64,
}

impl LoadSequencer {
    pub fn begin(&self) -> LoadTicket {
        LoadTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}

/// Last published aggregation for a listing surface.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub agent: AgentId,
    pub ticket: LoadTicket,
    pub records: Arc<Vec<ListingRecord>>,
}

#[derive(Debug, Clone)]
pub enum FeedUpdate {
    Published(FeedSnapshot),
    /// A newer refresh was issued while this one was in flight; its result was dropped.
    Stale,
}

/// Listing surface state that only ever publishes the newest aggregation.
pub struct ListingFeed {
    aggregator: Arc<ListingAggregator>,
    sequencer: LoadSequencer,
    snapshot: RwLock<Option<FeedSnapshot>>,
}

impl ListingFeed {
    pub fn new(aggregator: Arc<ListingAggregator>) -> Self {
        Self {
            aggregator,
            sequencer: LoadSequencer::default(),
            snapshot: RwLock::new(None),
        }
    }

    /// Re-run the aggregation for `agent`. Failures leave the published snapshot in place.
    pub async fn refresh(&self, agent: &AgentId) -> Result<FeedUpdate, LoadError> {
        let ticket = self.sequencer.begin();
        let result = self.aggregator.load_listings(agent).await;

        let mut snapshot = self.snapshot.write().await;
        if !self.sequencer.is_current(&ticket) {
            debug!(agent = %agent, ?ticket, "discarding stale listing load");
            return Ok(FeedUpdate::Stale);
        }

        let published = FeedSnapshot {
            agent: agent.clone(),
            ticket,
            records: Arc::new(result?),
        };
        *snapshot = Some(published.clone());
        Ok(FeedUpdate::Published(published))
    }

    pub async fn snapshot(&self) -> Option<FeedSnapshot> {
        self.snapshot.read().await.clone()
    }
}
