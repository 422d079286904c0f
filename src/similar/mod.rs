pub mod engagement;
pub mod engine;
pub mod geo;
pub mod memory;
pub mod retriever;
pub mod scorer;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use engagement::{EngagementRecorder, StaticWeightProvider};
pub use engine::SimilarPropertiesEngine;
pub use memory::{InMemoryContentIndex, InMemoryEngagementSink, InMemoryPropertyStore};
pub use retriever::CandidateRetriever;
pub use traits::{ContentIndex, EngagementSink, PropertyStore, WeightProvider};
pub use types::{PriceBand, PriceQuery, Similarity};
