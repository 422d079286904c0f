use crate::models::{ContentEntry, ContentType, EngagementEvent, PropertyRecord, SimilarityWeights};
use crate::similar::types::PriceQuery;
use anyhow::Result;
use async_trait::async_trait;

/// Read access to the property store.
///
/// The engine never writes through this trait. Errors are passed back to
/// the caller untouched.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<PropertyRecord>>;

    /// Records matching `query`, at most `query.limit` of them
    async fn query_by_price_band(&self, query: &PriceQuery) -> Result<Vec<PropertyRecord>>;
}

/// Lookup into the explore content index
#[async_trait]
pub trait ContentIndex: Send + Sync {
    async fn find_by_property_ids(
        &self,
        ids: &[i64],
        content_type: ContentType,
    ) -> Result<Vec<ContentEntry>>;
}

/// Destination for engagement feedback
#[async_trait]
pub trait EngagementSink: Send + Sync {
    async fn record(&self, event: EngagementEvent) -> Result<()>;
}

/// Source of per-user weight profiles.
///
/// A learned implementation can replace [`StaticWeightProvider`] without
/// touching the ranking pipeline.
///
/// [`StaticWeightProvider`]: crate::similar::StaticWeightProvider
#[async_trait]
pub trait WeightProvider: Send + Sync {
    async fn refined_weights(&self, user_id: i64) -> Result<SimilarityWeights>;
}
