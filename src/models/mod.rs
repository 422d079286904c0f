use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Listing status a property must carry to be offered as a match
pub const STATUS_AVAILABLE: &str = "available";

/// Core property data model, as handed over by the property store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    /// Absent or zero means "no price signal"
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub suburb_id: Option<i64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub property_type: String,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub area: Option<f64>,
    pub status: String,
}

impl PropertyRecord {
    /// Price if it carries a usable signal
    pub fn positive_price(&self) -> Option<f64> {
        self.price.filter(|p| *p > 0.0)
    }

    /// Both coordinates, when the record has them
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == STATUS_AVAILABLE
    }

    /// Check the record is sane enough to be scored.
    ///
    /// Stores call this when records enter the engine so the scorer can
    /// assume finite, non-negative numbers.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err(format!("property {}: price must be finite and non-negative", self.id));
            }
        }
        if let Some(area) = self.area {
            if !area.is_finite() || area < 0.0 {
                return Err(format!("property {}: area must be finite and non-negative", self.id));
            }
        }
        if let Some(lat) = self.latitude {
            if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
                return Err(format!("property {}: latitude out of range", self.id));
            }
        }
        if let Some(lon) = self.longitude {
            if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
                return Err(format!("property {}: longitude out of range", self.id));
            }
        }
        Ok(())
    }
}

/// Per-factor weights for the similarity score.
///
/// Conceptually they sum to 1.0 but nothing enforces it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SimilarityWeights {
    #[serde(alias = "price_match")]
    pub price_match: f64,
    #[serde(alias = "location_match")]
    pub location_match: f64,
    #[serde(alias = "property_type_match")]
    pub property_type_match: f64,
    #[serde(alias = "bedrooms_match")]
    pub bedrooms_match: f64,
    #[serde(alias = "bathrooms_match")]
    pub bathrooms_match: f64,
    #[serde(alias = "area_match")]
    pub area_match: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            price_match: 0.35,
            location_match: 0.25,
            property_type_match: 0.20,
            bedrooms_match: 0.10,
            bathrooms_match: 0.05,
            area_match: 0.05,
        }
    }
}

impl SimilarityWeights {
    /// Shallow per-key merge: keys set in `overrides` win
    pub fn merged(self, overrides: &WeightOverrides) -> Self {
        Self {
            price_match: overrides.price_match.unwrap_or(self.price_match),
            location_match: overrides.location_match.unwrap_or(self.location_match),
            property_type_match: overrides
                .property_type_match
                .unwrap_or(self.property_type_match),
            bedrooms_match: overrides.bedrooms_match.unwrap_or(self.bedrooms_match),
            bathrooms_match: overrides.bathrooms_match.unwrap_or(self.bathrooms_match),
            area_match: overrides.area_match.unwrap_or(self.area_match),
        }
    }

    pub fn values(&self) -> [f64; 6] {
        [
            self.price_match,
            self.location_match,
            self.property_type_match,
            self.bedrooms_match,
            self.bathrooms_match,
            self.area_match,
        ]
    }

    pub fn is_valid(&self) -> bool {
        self.values().iter().all(|w| w.is_finite() && *w >= 0.0)
    }
}

/// Partial weight profile supplied by a caller
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightOverrides {
    #[serde(default)]
    pub price_match: Option<f64>,
    #[serde(default)]
    pub location_match: Option<f64>,
    #[serde(default)]
    pub property_type_match: Option<f64>,
    #[serde(default)]
    pub bedrooms_match: Option<f64>,
    #[serde(default)]
    pub bathrooms_match: Option<f64>,
    #[serde(default)]
    pub area_match: Option<f64>,
}

impl WeightOverrides {
    pub fn is_valid(&self) -> bool {
        [
            self.price_match,
            self.location_match,
            self.property_type_match,
            self.bedrooms_match,
            self.bathrooms_match,
            self.area_match,
        ]
        .iter()
        .flatten()
        .all(|w| w.is_finite() && *w >= 0.0)
    }
}

/// A ranked match for a reference property. Built fresh per request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub property: PropertyRecord,
    pub similarity_score: u8,
    pub match_reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thumbnail_url: Option<String>,
}

/// Kind of content held by the explore index
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Property,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Property => "property",
        }
    }
}

/// Explore index entry linked to a property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    pub property_id: i64,
    pub content_id: i64,
    pub content_type: ContentType,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// How a user interacted with a suggested property
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EngagementType {
    View,
    Save,
    Click,
}

impl EngagementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementType::View => "view",
            EngagementType::Save => "save",
            EngagementType::Click => "click",
        }
    }
}

impl fmt::Display for EngagementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngagementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(EngagementType::View),
            "save" => Ok(EngagementType::Save),
            "click" => Ok(EngagementType::Click),
            other => Err(format!("unknown engagement type: {other}")),
        }
    }
}

/// Feedback on a similar-property suggestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngagementEvent {
    pub reference_property_id: i64,
    pub similar_property_id: i64,
    pub engagement_type: EngagementType,
    pub recorded_at: DateTime<Utc>,
}
