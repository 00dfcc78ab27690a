use std::sync::Arc;

use crate::config::Config;
use crate::screening::extraction::TextExtractor;
use crate::screening::pipeline::RankingPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Ranking pipeline over the model bundle loaded at startup. Read-only.
    pub pipeline: Arc<RankingPipeline>,
    /// Pluggable document text extractor. Default: `DocumentExtractor`.
    pub extractor: Arc<dyn TextExtractor>,
}
