use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::Error;
use crate::models::{ContentEntry, ContentType, EngagementEvent, PropertyRecord};
use crate::similar::traits::{ContentIndex, EngagementSink, PropertyStore};
use crate::similar::types::PriceQuery;

/// Property store backed by a `Vec`, in insertion order
#[derive(Debug, Default)]
pub struct InMemoryPropertyStore {
    records: Vec<PropertyRecord>,
}

impl InMemoryPropertyStore {
    /// Build a store, rejecting records the scorer cannot handle
    pub fn new(records: Vec<PropertyRecord>) -> crate::error::Result<Self> {
        for record in &records {
            record.validate().map_err(Error::validation)?;
        }
        debug!("Loaded {} properties into memory", records.len());
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Whether `record` satisfies `query`, ignoring the limit
pub fn matches_query(query: &PriceQuery, record: &PropertyRecord) -> bool {
    record.id != query.exclude_id
        && record.status == query.status
        && query.band.contains(record.price)
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<PropertyRecord>> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }

    async fn query_by_price_band(&self, query: &PriceQuery) -> Result<Vec<PropertyRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| matches_query(query, r))
            .take(query.limit)
            .cloned()
            .collect())
    }
}

/// Explore content index backed by a `Vec`
#[derive(Debug, Default)]
pub struct InMemoryContentIndex {
    entries: Vec<ContentEntry>,
}

impl InMemoryContentIndex {
    pub fn new(entries: Vec<ContentEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl ContentIndex for InMemoryContentIndex {
    async fn find_by_property_ids(
        &self,
        ids: &[i64],
        content_type: ContentType,
    ) -> Result<Vec<ContentEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.content_type == content_type && ids.contains(&e.property_id))
            .cloned()
            .collect())
    }
}

/// Engagement sink that logs each event and keeps it in memory
#[derive(Debug, Default)]
pub struct InMemoryEngagementSink {
    events: Mutex<Vec<EngagementEvent>>,
}

impl InMemoryEngagementSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<EngagementEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EngagementSink for InMemoryEngagementSink {
    async fn record(&self, event: EngagementEvent) -> Result<()> {
        info!(
            "Engagement: {} on property {} (suggested for {})",
            event.engagement_type, event.similar_property_id, event.reference_property_id
        );
        self.events.lock().await.push(event);
        Ok(())
    }
}
