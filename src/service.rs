use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{EngagementType, ScoredCandidate, WeightOverrides};
use crate::similar::{EngagementRecorder, SimilarPropertiesEngine, WeightProvider};

pub const EXPLANATION_NOT_FOUND: &str = "Property not found or not similar enough";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FindSimilarRequest {
    pub property_id: i64,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub weights: Option<WeightOverrides>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FindSimilarResponse {
    pub properties: Vec<ScoredCandidate>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    pub property_id: i64,
    #[serde(default)]
    pub limit: Option<usize>,
    pub caller_user_id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub section_title: String,
    pub properties: Vec<ScoredCandidate>,
    pub reference_property_id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRequest {
    pub reference_property_id: i64,
    pub similar_property_id: i64,
    /// One of `view`, `save`, `click`
    pub engagement_type: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct EngagementAck {
    pub success: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationRequest {
    pub property_id: i64,
    pub similar_property_id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ExplanationResponse {
    #[serde(rename_all = "camelCase")]
    Found {
        similarity_score: u8,
        match_reasons: Vec<String>,
        explanation: String,
    },
    NotFound { error: String },
}

/// Request-level entry points. Input is validated here, before any store
/// access.
pub struct SimilarPropertiesService {
    engine: SimilarPropertiesEngine,
    weights: Arc<dyn WeightProvider>,
    recorder: EngagementRecorder,
}

impl SimilarPropertiesService {
    pub fn new(
        engine: SimilarPropertiesEngine,
        weights: Arc<dyn WeightProvider>,
        recorder: EngagementRecorder,
    ) -> Self {
        Self {
            engine,
            weights,
            recorder,
        }
    }

    pub async fn find_similar(&self, request: FindSimilarRequest) -> Result<FindSimilarResponse> {
        let ranking = &self.engine.config().ranking;
        let limit = checked_limit(request.limit, ranking.default_limit, ranking.max_limit)?;

        if let Some(weights) = &request.weights {
            if !weights.is_valid() {
                return Err(Error::validation("weights must be finite and non-negative"));
            }
        }

        let properties = self
            .engine
            .find_similar_properties(request.property_id, limit, request.weights.as_ref())
            .await?;

        Ok(FindSimilarResponse {
            total: properties.len(),
            properties,
        })
    }

    /// Same ranking as [`find_similar`](Self::find_similar), with the
    /// caller's weight profile
    pub async fn get_similar_for_feed(&self, request: FeedRequest) -> Result<FeedResponse> {
        let ranking = &self.engine.config().ranking;
        let limit = checked_limit(request.limit, ranking.default_limit, ranking.feed_max_limit)?;

        let weights = self.weights.refined_weights(request.caller_user_id).await?;
        let properties = self.engine.rank(request.property_id, limit, &weights).await?;

        Ok(FeedResponse {
            section_title: ranking.feed_section_title.clone(),
            properties,
            reference_property_id: request.property_id,
        })
    }

    pub async fn record_engagement(&self, request: EngagementRequest) -> Result<EngagementAck> {
        let engagement_type: EngagementType =
            request.engagement_type.parse().map_err(Error::validation)?;

        self.recorder
            .record_engagement(
                request.reference_property_id,
                request.similar_property_id,
                engagement_type,
            )
            .await?;

        Ok(EngagementAck { success: true })
    }

    /// Score and reasons for one suggested property.
    ///
    /// Reruns the full ranking to `explanation_fetch` entries and picks the
    /// requested one out of it.
    pub async fn get_explanation(&self, request: ExplanationRequest) -> Result<ExplanationResponse> {
        let depth = self.engine.config().ranking.explanation_fetch;

        let ranked = match self
            .engine
            .find_similar_properties(request.property_id, depth, None)
            .await
        {
            Ok(ranked) => ranked,
            Err(Error::NotFound { id }) => {
                debug!("No explanation: reference property {} not found", id);
                return Ok(not_found());
            }
            Err(err) => return Err(err),
        };

        let Some(entry) = ranked
            .into_iter()
            .find(|c| c.property.id == request.similar_property_id)
        else {
            info!(
                "Property {} is not among the top {} matches for {}",
                request.similar_property_id, depth, request.property_id
            );
            return Ok(not_found());
        };

        Ok(ExplanationResponse::Found {
            explanation: explain(entry.similarity_score, &entry.match_reasons),
            similarity_score: entry.similarity_score,
            match_reasons: entry.match_reasons,
        })
    }
}

fn checked_limit(requested: Option<usize>, default: usize, max: usize) -> Result<usize> {
    let limit = requested.unwrap_or(default);
    if limit == 0 || limit > max {
        return Err(Error::validation(format!("limit must be between 1 and {max}, got {limit}")));
    }
    Ok(limit)
}

fn not_found() -> ExplanationResponse {
    ExplanationResponse::NotFound {
        error: EXPLANATION_NOT_FOUND.to_string(),
    }
}

fn explain(score: u8, reasons: &[String]) -> String {
    if reasons.is_empty() {
        format!("{score}% match based on overall profile")
    } else {
        format!("{score}% match: {}", reasons.join(", "))
    }
}
