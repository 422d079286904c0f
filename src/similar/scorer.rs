use crate::models::{PropertyRecord, SimilarityWeights};
use crate::similar::geo::{distance_score, haversine_km};
use crate::similar::types::Similarity;

/// Sub-score points lost per unit of relative difference (20% -> 0)
const RELATIVE_DIFF_PENALTY: f64 = 500.0;
/// Sub-score points lost per bedroom or bathroom of difference
const ROOM_DIFF_PENALTY: f64 = 25.0;

const SUBURB_SCORE: f64 = 100.0;
const CITY_SCORE: f64 = 70.0;
const PROVINCE_SCORE: f64 = 40.0;

const SIMILAR_PRICE_DIFF: f64 = 0.10;
const COMPARABLE_PRICE_DIFF: f64 = 0.20;
const SIMILAR_SIZE_DIFF: f64 = 0.10;

/// Per-factor sub-scores in `[0, 100]`.
///
/// `None` means the factor had no input on one side and is left out of the
/// weighted sum entirely. The weights are not renormalised to compensate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorScores {
    pub price: Option<f64>,
    pub location: f64,
    pub property_type: f64,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub area: Option<f64>,
}

impl FactorScores {
    pub fn compute(reference: &PropertyRecord, candidate: &PropertyRecord) -> Self {
        Self {
            price: relative_diff(reference.positive_price(), candidate.positive_price())
                .map(relative_score),
            location: location_score(reference, candidate).0,
            property_type: if reference.property_type == candidate.property_type {
                100.0
            } else {
                0.0
            },
            bedrooms: room_score(reference.bedrooms, candidate.bedrooms),
            bathrooms: room_score(reference.bathrooms, candidate.bathrooms),
            area: relative_diff(reference.area, candidate.area).map(relative_score),
        }
    }

    pub fn weighted_total(&self, weights: &SimilarityWeights) -> f64 {
        let mut total = self.location * weights.location_match
            + self.property_type * weights.property_type_match;

        if let Some(price) = self.price {
            total += price * weights.price_match;
        }
        if let Some(bedrooms) = self.bedrooms {
            total += bedrooms * weights.bedrooms_match;
        }
        if let Some(bathrooms) = self.bathrooms {
            total += bathrooms * weights.bathrooms_match;
        }
        if let Some(area) = self.area {
            total += area * weights.area_match;
        }

        total
    }
}

/// Score `candidate` against `reference`. Pure.
pub fn score(
    reference: &PropertyRecord,
    candidate: &PropertyRecord,
    weights: &SimilarityWeights,
) -> Similarity {
    let factors = FactorScores::compute(reference, candidate);
    let total = factors.weighted_total(weights).clamp(0.0, 100.0).round();

    Similarity {
        similarity_score: total as u8,
        match_reasons: match_reasons(reference, candidate),
    }
}

/// Human-readable reasons, in factor order. Independent of the weights.
pub fn match_reasons(reference: &PropertyRecord, candidate: &PropertyRecord) -> Vec<String> {
    let mut reasons = Vec::new();

    if let Some(diff) = relative_diff(reference.positive_price(), candidate.positive_price()) {
        if diff <= SIMILAR_PRICE_DIFF {
            reasons.push("Similar price".to_string());
        } else if diff <= COMPARABLE_PRICE_DIFF {
            reasons.push("Comparable price".to_string());
        }
    }

    if let (_, Some(reason)) = location_score(reference, candidate) {
        reasons.push(reason.to_string());
    }

    if reference.property_type == candidate.property_type {
        reasons.push("Same property type".to_string());
    }
    if reference.bedrooms.is_some() && reference.bedrooms == candidate.bedrooms {
        reasons.push("Same bedrooms".to_string());
    }
    if reference.bathrooms.is_some() && reference.bathrooms == candidate.bathrooms {
        reasons.push("Same bathrooms".to_string());
    }

    if let Some(diff) = relative_diff(reference.area, candidate.area) {
        if diff <= SIMILAR_SIZE_DIFF {
            reasons.push("Similar size".to_string());
        }
    }

    reasons
}

/// `|reference - candidate| / reference`, when the reference is positive and
/// the candidate is present
fn relative_diff(reference: Option<f64>, candidate: Option<f64>) -> Option<f64> {
    match (reference, candidate) {
        (Some(reference), Some(candidate)) if reference > 0.0 => {
            Some((reference - candidate).abs() / reference)
        }
        _ => None,
    }
}

fn relative_score(diff: f64) -> f64 {
    (100.0 - diff * RELATIVE_DIFF_PENALTY).max(0.0)
}

fn room_score(reference: Option<u32>, candidate: Option<u32>) -> Option<f64> {
    let (reference, candidate) = (reference?, candidate?);
    let diff = f64::from(reference.abs_diff(candidate));

    Some((100.0 - diff * ROOM_DIFF_PENALTY).max(0.0))
}

/// Tiered location match. First tier that applies wins.
fn location_score(
    reference: &PropertyRecord,
    candidate: &PropertyRecord,
) -> (f64, Option<&'static str>) {
    if reference.suburb_id.is_some() && reference.suburb_id == candidate.suburb_id {
        return (SUBURB_SCORE, Some("Same suburb"));
    }
    if reference.city.is_some() && reference.city == candidate.city {
        return (CITY_SCORE, Some("Same city"));
    }
    if reference.province.is_some() && reference.province == candidate.province {
        return (PROVINCE_SCORE, Some("Same province"));
    }

    match (reference.coordinates(), candidate.coordinates()) {
        (Some(from), Some(to)) => (distance_score(haversine_km(from, to)), None),
        _ => (0.0, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> PropertyRecord {
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
            status: "available".to_string(),
        }
    }

    fn full(id: i64, price: f64, area: f64) -> PropertyRecord {
        PropertyRecord {
            price: Some(price),
            suburb_id: Some(5),
            bedrooms: Some(3),
            bathrooms: Some(2),
            area: Some(area),
            ..record(id)
        }
    }

    #[test]
    fn close_match_scores_ninety() {
        let reference = full(1, 1_000_000.0, 150.0);
        let candidate = full(2, 1_050_000.0, 155.0);

        let factors = FactorScores::compute(&reference, &candidate);
        assert!((factors.price.unwrap() - 75.0).abs() < 1e-9);
        assert!((factors.area.unwrap() - 83.333).abs() < 1e-2);
        assert_eq!(factors.location, 100.0);

        let similarity = score(&reference, &candidate, &SimilarityWeights::default());
        assert_eq!(similarity.similarity_score, 90);
        assert_eq!(
            similarity.match_reasons,
            vec![
                "Similar price",
                "Same suburb",
                "Same property type",
                "Same bedrooms",
                "Same bathrooms",
                "Similar size",
            ]
        );
    }

    #[test]
    fn price_fifty_percent_off_floors_at_zero() {
        let reference = full(1, 1_000_000.0, 150.0);
        let candidate = full(2, 1_500_000.0, 150.0);

        let factors = FactorScores::compute(&reference, &candidate);
        assert_eq!(factors.price, Some(0.0));

        let reasons = match_reasons(&reference, &candidate);
        assert!(!reasons.iter().any(|r| r.contains("price")));
    }

    #[test]
    fn comparable_price_between_ten_and_twenty_percent() {
        let reference = full(1, 1_000_000.0, 150.0);
        let candidate = full(2, 1_150_000.0, 150.0);

        let reasons = match_reasons(&reference, &candidate);
        assert_eq!(reasons[0], "Comparable price");
    }

    #[test]
    fn price_factor_is_asymmetric() {
        let a = full(1, 1_000_000.0, 150.0);
        let b = full(2, 1_100_000.0, 150.0);

        let ab = FactorScores::compute(&a, &b).price.unwrap();
        let ba = FactorScores::compute(&b, &a).price.unwrap();

        // 10% of A vs 9.09% of B
        assert!((ab - 50.0).abs() < 1e-9);
        assert!(ba > ab);
    }

    #[test]
    fn missing_inputs_drop_terms_without_renormalising() {
        let reference = record(1);
        let candidate = record(2);

        let factors = FactorScores::compute(&reference, &candidate);
        assert_eq!(factors.price, None);
        assert_eq!(factors.bedrooms, None);
        assert_eq!(factors.bathrooms, None);
        assert_eq!(factors.area, None);

        // Only the property-type term survives: 100 * 0.20
        let similarity = score(&reference, &candidate, &SimilarityWeights::default());
        assert_eq!(similarity.similarity_score, 20);
        assert_eq!(similarity.match_reasons, vec!["Same property type"]);
    }

    #[test]
    fn zero_reference_area_skips_area_factor() {
        let reference = PropertyRecord { area: Some(0.0), ..record(1) };
        let candidate = PropertyRecord { area: Some(80.0), ..record(2) };

        assert_eq!(FactorScores::compute(&reference, &candidate).area, None);
    }

    #[test]
    fn suburb_wins_over_distant_coordinates() {
        let reference = PropertyRecord {
            suburb_id: Some(9),
            latitude: Some(-33.9249),
            longitude: Some(18.4241),
            ..record(1)
        };
        let candidate = PropertyRecord {
            suburb_id: Some(9),
            latitude: Some(-26.2041),
            longitude: Some(28.0473),
            ..record(2)
        };

        assert_eq!(FactorScores::compute(&reference, &candidate).location, 100.0);
        assert!(match_reasons(&reference, &candidate).contains(&"Same suburb".to_string()));
    }

    #[test]
    fn location_tiers_in_order() {
        let reference = PropertyRecord {
            suburb_id: Some(1),
            city: Some("Cape Town".to_string()),
            province: Some("Western Cape".to_string()),
            ..record(1)
        };
        let same_city = PropertyRecord {
            suburb_id: Some(2),
            city: Some("Cape Town".to_string()),
            province: Some("Western Cape".to_string()),
            ..record(2)
        };
        let same_province = PropertyRecord {
            city: Some("Stellenbosch".to_string()),
            province: Some("Western Cape".to_string()),
            ..record(3)
        };

        assert_eq!(FactorScores::compute(&reference, &same_city).location, 70.0);
        assert_eq!(FactorScores::compute(&reference, &same_province).location, 40.0);
        assert_eq!(match_reasons(&reference, &same_city)[0], "Same city");
        assert_eq!(match_reasons(&reference, &same_province)[0], "Same province");
    }

    #[test]
    fn null_identifiers_never_match_each_other() {
        let reference = record(1);
        let candidate = record(2);

        assert_eq!(FactorScores::compute(&reference, &candidate).location, 0.0);
    }

    #[test]
    fn coordinates_used_when_no_area_matches() {
        let reference = PropertyRecord {
            latitude: Some(-26.2041),
            longitude: Some(28.0473),
            ..record(1)
        };
        // About 3 km north
        let near = PropertyRecord {
            latitude: Some(-26.1771),
            longitude: Some(28.0473),
            ..record(2)
        };
        let without_coordinates = PropertyRecord { latitude: Some(-26.1771), ..record(3) };

        assert_eq!(FactorScores::compute(&reference, &near).location, 90.0);
        assert_eq!(FactorScores::compute(&reference, &without_coordinates).location, 0.0);
        assert!(!match_reasons(&reference, &near).iter().any(|r| r.starts_with("Same s")));
    }

    #[test]
    fn rooms_cost_twenty_five_per_unit() {
        assert_eq!(room_score(Some(3), Some(3)), Some(100.0));
        assert_eq!(room_score(Some(3), Some(1)), Some(50.0));
        assert_eq!(room_score(Some(1), Some(5)), Some(0.0));
        assert_eq!(room_score(Some(0), Some(9)), Some(0.0));
        assert_eq!(room_score(None, Some(2)), None);
    }

    #[test]
    fn score_is_bounded_even_with_heavy_weights() {
        let reference = full(1, 500_000.0, 90.0);
        let candidate = full(2, 500_000.0, 90.0);
        let heavy = SimilarityWeights {
            price_match: 1.0,
            location_match: 1.0,
            property_type_match: 1.0,
            bedrooms_match: 1.0,
            bathrooms_match: 1.0,
            area_match: 1.0,
        };

        assert_eq!(score(&reference, &candidate, &heavy).similarity_score, 100);
        assert_eq!(
            score(&reference, &candidate, &SimilarityWeights::default()).similarity_score,
            100
        );
    }

    #[test]
    fn scoring_is_deterministic() {
        let reference = full(1, 1_000_000.0, 150.0);
        let candidate = PropertyRecord { property_type: "apartment".to_string(), ..full(2, 870_000.0, 120.0) };
        let weights = SimilarityWeights::default();

        let first = score(&reference, &candidate, &weights);
        for _ in 0..5 {
            assert_eq!(score(&reference, &candidate, &weights), first);
        }
    }
}
