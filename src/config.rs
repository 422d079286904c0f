use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{SimilarityWeights, STATUS_AVAILABLE};

/// Tunables for the similar-properties engine. Every field has a default,
/// so an empty TOML file is a valid config.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub retrieval: RetrievalConfig,
    pub ranking: RankingConfig,
    pub weights: SimilarityWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Relative half-width of the first price band
    pub initial_tolerance: f64,
    /// Relative half-width of the fallback band
    pub widened_tolerance: f64,
    /// Rows fetched by the first query, independent of the caller's limit
    pub over_fetch_cap: usize,
    /// Fallback fetch cap is `limit * widened_fetch_multiplier`
    pub widened_fetch_multiplier: usize,
    pub available_status: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            initial_tolerance: 0.2,
            widened_tolerance: 0.4,
            over_fetch_cap: 100,
            widened_fetch_multiplier: 2,
            available_status: STATUS_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RankingConfig {
    pub default_limit: usize,
    pub max_limit: usize,
    pub feed_max_limit: usize,
    /// How deep the explanation call ranks before looking for its entry
    pub explanation_fetch: usize,
    pub feed_section_title: String,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 50,
            feed_max_limit: 20,
            explanation_fetch: 50,
            feed_section_title: "Similar Properties".to_string(),
        }
    }
}

/// Read, parse and validate a TOML config file
pub fn load(path: &Path) -> Result<EngineConfig> {
    let raw = fs::read_to_string(path).map_err(|err| Error::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    parse(&raw).map_err(|err| match err {
        Error::Validation { message } => Error::Config { path: path.to_path_buf(), message },
        other => other,
    })
}

pub fn parse(raw: &str) -> Result<EngineConfig> {
    let cfg: EngineConfig = toml::from_str(raw).map_err(|err| Error::validation(err.to_string()))?;

    validate(&cfg)?;

    Ok(cfg)
}

pub fn validate(cfg: &EngineConfig) -> Result<()> {
    let retrieval = &cfg.retrieval;

    if !(retrieval.initial_tolerance > 0.0 && retrieval.initial_tolerance <= 1.0) {
        return Err(Error::validation("retrieval.initial_tolerance must be in (0, 1]."));
    }
    if !(retrieval.widened_tolerance > 0.0 && retrieval.widened_tolerance <= 1.0) {
        return Err(Error::validation("retrieval.widened_tolerance must be in (0, 1]."));
    }
    if retrieval.widened_tolerance < retrieval.initial_tolerance {
        return Err(Error::validation(
            "retrieval.widened_tolerance must not be narrower than retrieval.initial_tolerance.",
        ));
    }
    if retrieval.over_fetch_cap == 0 {
        return Err(Error::validation("retrieval.over_fetch_cap must be greater than zero."));
    }
    if retrieval.widened_fetch_multiplier == 0 {
        return Err(Error::validation(
            "retrieval.widened_fetch_multiplier must be greater than zero.",
        ));
    }
    if retrieval.available_status.trim().is_empty() {
        return Err(Error::validation("retrieval.available_status must be non-empty."));
    }

    let ranking = &cfg.ranking;

    if ranking.default_limit == 0 || ranking.max_limit == 0 || ranking.feed_max_limit == 0 {
        return Err(Error::validation("ranking limits must be greater than zero."));
    }
    if ranking.default_limit > ranking.max_limit {
        return Err(Error::validation("ranking.default_limit must not exceed ranking.max_limit."));
    }
    if ranking.explanation_fetch == 0 {
        return Err(Error::validation("ranking.explanation_fetch must be greater than zero."));
    }
    if !cfg.weights.is_valid() {
        return Err(Error::validation("weights must be finite and non-negative."));
    }

    Ok(())
}
