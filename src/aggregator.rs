use crate::config::{AppConfig, ConfigError};
use crate::fetch::{Fetcher, RateLimitedFetcher};
use crate::filter::FilterEngine;
use crate::model::{FetchError, FilterCriteria, Product, ScrapeError};
use crate::source::{GsmArenaAdapter, Mobiles91Adapter, SourceAdapter};

use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetcher(#[from] FetchError),
    #[error(transparent)]
    Source(#[from] ScrapeError),
}

/// Fans a query out to every source, merges, deduplicates, caps and filters.
pub struct Aggregator {
    adapters: Vec<Box<dyn SourceAdapter>>,
    filter: FilterEngine,
    max_total_results: usize,
}

impl Aggregator {
    /// `adapters` are listed in priority order; earlier sources win ties.
    pub fn new(adapters: Vec<Box<dyn SourceAdapter>>, filter: FilterEngine, max_total_results: usize) -> Self {
        Self {
            adapters,
            filter,
            max_total_results,
        }
    }

    /// 91mobiles then GSMArena, sharing one rate-limited fetcher. `config`
    /// is validated first.
    pub fn from_config(config: &AppConfig) -> Result<Self, SetupError> {
        config.validate()?;
        let fetcher: Arc<dyn Fetcher> = Arc::new(RateLimitedFetcher::new(
            &config.user_agent,
            config.request_timeout(),
            config.request_delay()?,
        )?);
        let adapters: Vec<Box<dyn SourceAdapter>> = vec![
            Box::new(Mobiles91Adapter::from_config(fetcher.clone(), config)?),
            Box::new(GsmArenaAdapter::from_config(fetcher, config)?),
        ];
        Ok(Self::new(adapters, FilterEngine::from_config(config), config.max_total_results))
    }

    pub fn filter(&self) -> &FilterEngine {
        &self.filter
    }

    /// Never fails: an adapter error counts as zero results from that source.
    pub async fn aggregate(&self, query: &str, criteria: Option<&FilterCriteria>) -> Vec<Product> {
        let query = query.trim();
        if query.is_empty() {
            warn!("Empty search query, nothing to do");
            return Vec::new();
        }
        info!(query, sources = self.adapters.len(), "Searching");

        // Adapters run concurrently; the shared fetcher still spaces every request.
        let results = join_all(self.adapters.iter().map(|adapter| adapter.search(query))).await;

        let mut merged = Vec::new();
        for (adapter, result) in self.adapters.iter().zip(results) {
            match result {
                Ok(products) => {
                    info!(source = %adapter.source(), count = products.len(), "Source finished");
                    merged.extend(products);
                }
                Err(e) => warn!(source = %adapter.source(), "Source failed, skipping: {}", e),
            }
        }

        let mut products = dedupe(merged);
        products.truncate(self.max_total_results);

        match criteria {
            Some(criteria) if !criteria.is_empty() => {
                let filtered = self.filter.apply(&products, criteria);
                info!(before = products.len(), after = filtered.len(), "Applied filters");
                filtered
            }
            _ => products,
        }
    }
}

/// Keeps the first product for each fingerprint.
pub fn dedupe(products: Vec<Product>) -> Vec<Product> {
    let mut seen = HashSet::new();
    products
        .into_iter()
        .filter(|p| seen.insert(p.fingerprint()))
        .collect()
}
