use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::models::{ContentEntry, ContentType, ScoredCandidate, SimilarityWeights, WeightOverrides};
use crate::similar::retriever::CandidateRetriever;
use crate::similar::scorer;
use crate::similar::traits::{ContentIndex, PropertyStore};

/// Ranking pipeline: retrieve, score, sort, truncate, enrich.
pub struct SimilarPropertiesEngine {
    store: Arc<dyn PropertyStore>,
    content_index: Arc<dyn ContentIndex>,
    retriever: CandidateRetriever,
    config: EngineConfig,
}

impl SimilarPropertiesEngine {
    pub fn new(
        store: Arc<dyn PropertyStore>,
        content_index: Arc<dyn ContentIndex>,
        config: EngineConfig,
    ) -> Self {
        let retriever = CandidateRetriever::new(store.clone(), config.retrieval.clone());

        Self {
            store,
            content_index,
            retriever,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rank properties similar to `property_id` using the default weights
    /// with `overrides` merged on top
    pub async fn find_similar_properties(
        &self,
        property_id: i64,
        limit: usize,
        overrides: Option<&WeightOverrides>,
    ) -> Result<Vec<ScoredCandidate>> {
        let weights = match overrides {
            Some(overrides) => self.config.weights.merged(overrides),
            None => self.config.weights,
        };

        self.rank(property_id, limit, &weights).await
    }

    /// Rank properties similar to `property_id` with a complete weight profile.
    ///
    /// Ties on score are broken by candidate id, ascending.
    pub async fn rank(
        &self,
        property_id: i64,
        limit: usize,
        weights: &SimilarityWeights,
    ) -> Result<Vec<ScoredCandidate>> {
        let reference = self
            .store
            .find_by_id(property_id)
            .await?
            .ok_or(Error::NotFound { id: property_id })?;

        let candidates = self.retriever.retrieve(&reference, property_id, limit).await?;
        let fetched = candidates.len();

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .filter(|candidate| candidate.id != property_id)
            .map(|candidate| {
                let similarity = scorer::score(&reference, &candidate, weights);
                ScoredCandidate {
                    property: candidate,
                    similarity_score: similarity.similarity_score,
                    match_reasons: similarity.match_reasons,
                    content_id: None,
                    thumbnail_url: None,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity_score
                .cmp(&a.similarity_score)
                .then_with(|| a.property.id.cmp(&b.property.id))
        });
        scored.truncate(limit);

        self.enrich(&mut scored).await;

        info!(
            "Ranked {} of {} candidates for property {}",
            scored.len(),
            fetched,
            property_id
        );
        Ok(scored)
    }

    /// Attach explore content to ranked entries. Lookup failures leave the
    /// fields empty.
    async fn enrich(&self, scored: &mut [ScoredCandidate]) {
        if scored.is_empty() {
            return;
        }

        let ids: Vec<i64> = scored.iter().map(|c| c.property.id).collect();
        let entries = match self
            .content_index
            .find_by_property_ids(&ids, ContentType::Property)
            .await
        {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Content lookup failed, returning results without thumbnails: {err:#}");
                return;
            }
        };

        let mut by_property: HashMap<i64, ContentEntry> = HashMap::new();
        for entry in entries {
            by_property.entry(entry.property_id).or_insert(entry);
        }
        debug!("Found content for {} of {} results", by_property.len(), ids.len());

        for candidate in scored.iter_mut() {
            if let Some(entry) = by_property.remove(&candidate.property.id) {
                candidate.content_id = Some(entry.content_id);
                candidate.thumbnail_url = entry.thumbnail_url;
            }
        }
    }
}
