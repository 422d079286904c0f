//! Fixtures and collaborator doubles shared by the unit tests.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::models::{ContentEntry, ContentType, PropertyRecord, STATUS_AVAILABLE};
use crate::similar::memory::InMemoryPropertyStore;
use crate::similar::traits::{ContentIndex, PropertyStore};
use crate::similar::types::PriceQuery;

/// Available house with every optional field empty
pub fn listing(id: i64) -> PropertyRecord {
    PropertyRecord {
        id,
        title: None,
        price: None,
        city: None,
        province: None,
        suburb_id: None,
        latitude: None,
        longitude: None,
        property_type: "house".to_string(),
        bedrooms: None,
        bathrooms: None,
        area: None,
        status: STATUS_AVAILABLE.to_string(),
    }
}

pub fn content(property_id: i64, content_id: i64) -> ContentEntry {
    ContentEntry {
        property_id,
        content_id,
        content_type: ContentType::Property,
        thumbnail_url: Some(format!("https://cdn.example/thumbs/{property_id}.jpg")),
    }
}

/// In-memory store that remembers every price-band query it served
pub struct RecordingStore {
    inner: InMemoryPropertyStore,
    queries: Mutex<Vec<PriceQuery>>,
    fail: bool,
    ignore_exclusion: bool,
}

impl RecordingStore {
    pub fn new(records: Vec<PropertyRecord>) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryPropertyStore::new(records).expect("valid fixture records"),
            queries: Mutex::new(Vec::new()),
            fail: false,
            ignore_exclusion: false,
        })
    }

    /// Store that hands the excluded id back anyway
    pub fn ignoring_exclusion(records: Vec<PropertyRecord>) -> Arc<Self> {
        let mut store = Self::new(records);
        if let Some(store) = Arc::get_mut(&mut store) {
            store.ignore_exclusion = true;
        }
        store
    }

    /// Store whose every call fails
    pub fn failing() -> Arc<Self> {
        let mut store = Self::new(Vec::new());
        if let Some(store) = Arc::get_mut(&mut store) {
            store.fail = true;
        }
        store
    }

    pub async fn queries(&self) -> Vec<PriceQuery> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl PropertyStore for RecordingStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<PropertyRecord>> {
        if self.fail {
            return Err(anyhow!("store unavailable"));
        }
        self.inner.find_by_id(id).await
    }

    async fn query_by_price_band(&self, query: &PriceQuery) -> Result<Vec<PropertyRecord>> {
        self.queries.lock().await.push(query.clone());
        if self.fail {
            return Err(anyhow!("store unavailable"));
        }

        let mut effective = query.clone();
        if self.ignore_exclusion {
            effective.exclude_id = i64::MIN;
        }
        self.inner.query_by_price_band(&effective).await
    }
}

/// Content index that is always down
pub struct FailingContentIndex;

#[async_trait]
impl ContentIndex for FailingContentIndex {
    async fn find_by_property_ids(
        &self,
        _ids: &[i64],
        _content_type: ContentType,
    ) -> Result<Vec<ContentEntry>> {
        Err(anyhow!("content index unavailable"))
    }
}
