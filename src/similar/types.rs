use serde::{Deserialize, Serialize};

/// Price range used to pre-filter candidates.
///
/// `max == None` means the band is unbounded, which is what a reference
/// without a price produces. An unbounded band does not filter on price at
/// all, so records without a price are admitted too.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceBand {
    pub min: f64,
    pub max: Option<f64>,
}

impl PriceBand {
    pub fn unbounded() -> Self {
        Self { min: 0.0, max: None }
    }

    /// `[price * (1 - tolerance), price * (1 + tolerance)]`, or unbounded
    /// when there is no usable price
    pub fn around(price: Option<f64>, tolerance: f64) -> Self {
        match price.filter(|p| *p > 0.0) {
            Some(price) => Self {
                min: price * (1.0 - tolerance),
                max: Some(price * (1.0 + tolerance)),
            },
            None => Self::unbounded(),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }

    pub fn contains(&self, price: Option<f64>) -> bool {
        match (self.max, price) {
            (None, _) => true,
            (Some(max), Some(price)) => price >= self.min && price <= max,
            (Some(_), None) => false,
        }
    }
}

/// One property-store query issued by the retriever
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuery {
    pub exclude_id: i64,
    pub band: PriceBand,
    pub status: String,
    pub limit: usize,
}

/// Scorer output for a single candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Similarity {
    pub similarity_score: u8,
    pub match_reasons: Vec<String>,
}
