#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use listing_hub::listings::{
    AgentId, BackendError, ContractType, ListingBackend, ListingId, ListingSource,
    MarketplaceRow, PropertyRow, SourceError, SourceListing, UnitTypeRow,
};
use tokio::sync::{Barrier, Notify};

pub fn agent(id: &str) -> AgentId {
    AgentId(id.to_string())
}

pub fn listing(id: &str, price: f64, location: &str) -> SourceListing {
    SourceListing {
        id: ListingId(id.to_string()),
        title: format!("Listing {id}"),
        description: String::new(),
        property_type: "Apartment".to_string(),
        contract_type: ContractType::Sale,
        price,
        location: location.to_string(),
        bedrooms: None,
        bathrooms: None,
        sqft: None,
        furnishing_status: None,
        completion_status: None,
        amenities: BTreeSet::new(),
        lat: None,
        lng: None,
        created_at: None,
    }
}

/// Source returning fixed listings and counting calls.
pub struct StaticSource {
    listings: Vec<SourceListing>,
    calls: Mutex<Vec<AgentId>>,
}

impl StaticSource {
    pub fn new(listings: Vec<SourceListing>) -> Self {
        Self {
            listings,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<AgentId> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl ListingSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn collect(&self, agent: &AgentId) -> Result<Vec<SourceListing>, SourceError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(agent.clone());
        Ok(self.listings.clone())
    }
}

pub struct FailingSource;

#[async_trait]
impl ListingSource for FailingSource {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn collect(&self, _agent: &AgentId) -> Result<Vec<SourceListing>, SourceError> {
        Err(SourceError::Unavailable {
            source_name: self.name(),
            reason: BackendError("backend offline".to_string()),
        })
    }
}

/// Source that can be switched offline between loads.
pub struct FlakySource {
    listings: Vec<SourceListing>,
    offline: AtomicBool,
}

impl FlakySource {
    pub fn new(listings: Vec<SourceListing>) -> Self {
        Self {
            listings,
            offline: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl ListingSource for FlakySource {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn collect(&self, _agent: &AgentId) -> Result<Vec<SourceListing>, SourceError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable {
                source_name: self.name(),
                reason: BackendError("connection refused".to_string()),
            });
        }
        Ok(self.listings.clone())
    }
}

/// Source that only completes once every source sharing the barrier has started.
pub struct RendezvousSource {
    barrier: Arc<Barrier>,
    listings: Vec<SourceListing>,
}

impl RendezvousSource {
    pub fn new(barrier: Arc<Barrier>, listings: Vec<SourceListing>) -> Self {
        Self { barrier, listings }
    }
}

#[async_trait]
impl ListingSource for RendezvousSource {
    fn name(&self) -> &'static str {
        "rendezvous"
    }

    async fn collect(&self, _agent: &AgentId) -> Result<Vec<SourceListing>, SourceError> {
        self.barrier.wait().await;
        Ok(self.listings.clone())
    }
}

/// Source that holds requests for one agent until released.
pub struct GatedSource {
    held_agent: AgentId,
    started: Arc<Notify>,
    release: Arc<Notify>,
    listings: HashMap<AgentId, Vec<SourceListing>>,
}

impl GatedSource {
    pub fn new(
        held_agent: AgentId,
        started: Arc<Notify>,
        release: Arc<Notify>,
        listings: HashMap<AgentId, Vec<SourceListing>>,
    ) -> Self {
        Self {
            held_agent,
            started,
            release,
            listings,
        }
    }
}

#[async_trait]
impl ListingSource for GatedSource {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn collect(&self, agent: &AgentId) -> Result<Vec<SourceListing>, SourceError> {
        if agent == &self.held_agent {
            self.started.notify_one();
            self.release.notified().await;
        }
        Ok(self.listings.get(agent).cloned().unwrap_or_default())
    }
}

/// Backend serving raw rows, scoped per agent the way the hosted tables are.
#[derive(Default)]
pub struct MemoryBackend {
    pub properties: Vec<PropertyRow>,
    pub marketplace: Vec<MarketplaceRow>,
    pub unit_types: Vec<UnitTypeRow>,
    pub offline: bool,
}

impl MemoryBackend {
    fn check(&self) -> Result<(), BackendError> {
        if self.offline {
            Err(BackendError("503 from listings table".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ListingBackend for MemoryBackend {
    async fn agent_properties(&self, agent: &AgentId) -> Result<Vec<PropertyRow>, BackendError> {
        self.check()?;
        Ok(self
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
            .unit_types
            .iter()
            .filter(|row| row.agent_id == agent.0)
            .cloned()
            .collect())
    }
}

pub fn property_row(id: &str, agent_id: &str, price: f64) -> PropertyRow {
    PropertyRow {
        id: id.to_string(),
        agent_id: agent_id.to_string(),
        title: format!("Property {id}"),
        description: String::new(),
        property_type: "Apartment".to_string(),
        contract_type: "Sale".to_string(),
        price,
        location: "Business Bay".to_string(),
        bedrooms: Some(2),
        bathrooms: Some(2.0),
        sqft: Some(1_250.0),
        furnishing_status: Some("furnished".to_string()),
        completion_status: Some("ready".to_string()),
        amenities: Some("Pool;Gym".to_string()),
        latitude: Some("25.1865".to_string()),
        longitude: Some("55.2727".to_string()),
        created_at: Some("2025-04-01T10:00:00Z".to_string()),
    }
}
