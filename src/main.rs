use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use similar_properties::config::{self, EngineConfig};
use similar_properties::models::{ContentEntry, PropertyRecord, ScoredCandidate};
use similar_properties::service::{
    ExplanationRequest, FeedRequest, FindSimilarRequest, SimilarPropertiesService,
};
use similar_properties::similar::{
    EngagementRecorder, InMemoryContentIndex, InMemoryEngagementSink, InMemoryPropertyStore,
    SimilarPropertiesEngine, StaticWeightProvider,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Rank listings similar to a reference property
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON array of property records
    #[arg(long)]
    properties: PathBuf,
    /// JSON array of explore content entries
    #[arg(long)]
    content: Option<PathBuf>,
    /// TOML engine config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Reference property id
    #[arg(long)]
    property_id: i64,
    #[arg(long)]
    limit: Option<usize>,
    /// Rank with this user's weight profile, as the feed does
    #[arg(long)]
    user_id: Option<i64>,
    /// Explain why this property matches instead of listing matches
    #[arg(long)]
    explain: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load(path)?,
        None => EngineConfig::default(),
    };

    let raw = tokio::fs::read_to_string(&args.properties)
        .await
        .with_context(|| format!("Failed to read {}", args.properties.display()))?;
    let records: Vec<PropertyRecord> =
        serde_json::from_str(&raw).context("Failed to parse property records")?;
    let store = InMemoryPropertyStore::new(records)?;
    info!("🏠 Loaded {} properties", store.len());

    let entries: Vec<ContentEntry> = match &args.content {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&raw).context("Failed to parse content entries")?
        }
        None => Vec::new(),
    };

    let weights = Arc::new(StaticWeightProvider::new(config.weights));
    let engine = SimilarPropertiesEngine::new(
        Arc::new(store),
        Arc::new(InMemoryContentIndex::new(entries)),
        config,
    );
    let service = SimilarPropertiesService::new(
        engine,
        weights,
        EngagementRecorder::new(Arc::new(InMemoryEngagementSink::new())),
    );

    if let Some(similar_property_id) = args.explain {
        let response = service
            .get_explanation(ExplanationRequest {
                property_id: args.property_id,
                similar_property_id,
            })
            .await?;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let json = match args.user_id {
        Some(caller_user_id) => {
            let response = service
                .get_similar_for_feed(FeedRequest {
                    property_id: args.property_id,
                    limit: args.limit,
                    caller_user_id,
                })
                .await?;
            info!("{}", response.section_title);
            print_ranked(&response.properties);
            serde_json::to_string_pretty(&response)?
        }
        None => {
            let response = service
                .find_similar(FindSimilarRequest {
                    property_id: args.property_id,
                    limit: args.limit,
                    weights: None,
                })
                .await?;
            info!("✅ {} similar properties", response.total);
            print_ranked(&response.properties);
            serde_json::to_string_pretty(&response)?
        }
    };

    println!("{json}");
    Ok(())
}

fn print_ranked(properties: &[ScoredCandidate]) {
    for (i, candidate) in properties.iter().enumerate() {
        let property = &candidate.property;
        let title = property.title.as_deref().unwrap_or(&property.property_type);
        info!(
            "{}. #{} {} ({}%)",
            i + 1,
            property.id,
            title,
            candidate.similarity_score
        );
        info!("   {}", candidate.match_reasons.join(", "));
        if let Some(thumbnail) = &candidate.thumbnail_url {
            info!("   Thumbnail: {}", thumbnail);
        }
    }
}
