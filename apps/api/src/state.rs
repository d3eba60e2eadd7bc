use std::sync::Arc;

use crate::config::Config;
use crate::extraction::{DocumentTextExtractor, TextExtractor};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable document text extractor. Default: DocumentTextExtractor.
    pub extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            extractor: Arc::new(DocumentTextExtractor),
        }
    }
}
