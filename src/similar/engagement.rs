use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::error::Result;
use crate::models::{EngagementEvent, EngagementType, SimilarityWeights};
use crate::similar::traits::{EngagementSink, WeightProvider};

/// Forwards suggestion feedback to an [`EngagementSink`]. Nothing is
/// aggregated or retried here.
pub struct EngagementRecorder {
    sink: Arc<dyn EngagementSink>,
}

impl EngagementRecorder {
    pub fn new(sink: Arc<dyn EngagementSink>) -> Self {
        Self { sink }
    }

    pub async fn record_engagement(
        &self,
        reference_property_id: i64,
        similar_property_id: i64,
        engagement_type: EngagementType,
    ) -> Result<()> {
        let event = EngagementEvent {
            reference_property_id,
            similar_property_id,
            engagement_type,
            recorded_at: Utc::now(),
        };

        self.sink.record(event).await?;
        Ok(())
    }
}

/// Weight provider that hands every user the same profile.
///
/// Engagement history is not consulted yet.
#[derive(Debug, Clone, Default)]
pub struct StaticWeightProvider {
    weights: SimilarityWeights,
}

impl StaticWeightProvider {
    pub fn new(weights: SimilarityWeights) -> Self {
        Self { weights }
    }
}

#[async_trait]
impl WeightProvider for StaticWeightProvider {
    async fn refined_weights(&self, user_id: i64) -> anyhow::Result<SimilarityWeights> {
        debug!("Using static similarity weights for user {}", user_id);
        Ok(self.weights)
    }
}
