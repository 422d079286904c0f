use std::sync::Arc;

use tracing::{debug, info};

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::models::PropertyRecord;
use crate::similar::traits::PropertyStore;
use crate::similar::types::{PriceBand, PriceQuery};

/// Fetches candidate properties in a price band around the reference,
/// widening the band once if the first pass comes up short.
pub struct CandidateRetriever {
    store: Arc<dyn PropertyStore>,
    config: RetrievalConfig,
}

impl CandidateRetriever {
    pub fn new(store: Arc<dyn PropertyStore>, config: RetrievalConfig) -> Self {
        Self { store, config }
    }

    /// Candidates for `reference`, never including `exclude_id`.
    ///
    /// The first query over-fetches up to `over_fetch_cap` rows. If it returns
    /// fewer than `limit`, a second query on the widened band replaces it.
    /// Returning fewer than `limit` rows is not an error.
    pub async fn retrieve(
        &self,
        reference: &PropertyRecord,
        exclude_id: i64,
        limit: usize,
    ) -> Result<Vec<PropertyRecord>> {
        let band = PriceBand::around(reference.price, self.config.initial_tolerance);
        debug!(
            "Initial band for property {}: {:.0}..{:?}",
            reference.id, band.min, band.max
        );

        let candidates = self
            .store
            .query_by_price_band(&self.query(exclude_id, band, self.config.over_fetch_cap))
            .await?;

        if candidates.len() >= limit {
            debug!("Initial band yielded {} candidates", candidates.len());
            return Ok(candidates);
        }

        let widened = PriceBand::around(reference.price, self.config.widened_tolerance);
        let widened_cap = limit.saturating_mul(self.config.widened_fetch_multiplier);
        info!(
            "Only {} candidates for property {} (wanted {}), widening price band",
            candidates.len(),
            reference.id,
            limit
        );

        let candidates = self
            .store
            .query_by_price_band(&self.query(exclude_id, widened, widened_cap))
            .await?;

        debug!("Widened band yielded {} candidates", candidates.len());
        Ok(candidates)
    }

    fn query(&self, exclude_id: i64, band: PriceBand, limit: usize) -> PriceQuery {
        PriceQuery {
            exclude_id,
            band,
            status: self.config.available_status.clone(),
            limit,
        }
    }
}
