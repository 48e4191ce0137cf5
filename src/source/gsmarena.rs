use crate::config::AppConfig;
use crate::fetch::Fetcher;
use crate::model::{Product, ScrapeError, Source};
use crate::parser::gsmarena::parse_listing;
use crate::source::{SourceAdapter, endpoint, fetch_detail, fetch_first_listing, parse_base};

use reqwest::Url;
use std::sync::Arc;
use tracing::info;

/// GSMArena: quick-search results, specs from each phone's page.
pub struct GsmArenaAdapter {
    fetcher: Arc<dyn Fetcher>,
    base: Url,
    max_results: usize,
}

impl GsmArenaAdapter {
    pub fn new(fetcher: Arc<dyn Fetcher>, base_url: &str, max_results: usize) -> Result<Self, ScrapeError> {
        Ok(Self {
            fetcher,
            base: parse_base(Source::GsmArena, base_url)?,
            max_results,
        })
    }

    pub fn from_config(fetcher: Arc<dyn Fetcher>, config: &AppConfig) -> Result<Self, ScrapeError> {
        Self::new(fetcher, &config.sources.gsmarena, config.max_results_per_page)
    }

    pub fn search_url(&self, query: &str) -> Result<Url, ScrapeError> {
        let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
        let mut url = endpoint(&self.base, Source::GsmArena, &["results.php3"])?;
        url.query_pairs_mut()
            .append_pair("sQuickSearch", "yes")
            .append_pair("sName", &query);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl SourceAdapter for GsmArenaAdapter {
    fn source(&self) -> Source {
        Source::GsmArena
    }

    async fn search(&self, query: &str) -> Result<Vec<Product>, ScrapeError> {
        let url = self.search_url(query)?;
        let Some(body) = fetch_first_listing(self.fetcher.as_ref(), Source::GsmArena, &[url]).await else {
            return Ok(Vec::new());
        };

        let mut products = parse_listing(&body, &self.base, self.max_results);
        for product in &mut products {
            let Some(url) = product.product_url.clone() else {
                continue;
            };
            if let Some(detail) = fetch_detail(self.fetcher.as_ref(), Source::GsmArena, &url).await {
                product.specs = detail.table_specs;
                product.detailed_specs = detail.detailed_specs;
                product.features = detail.features;
                product.summary = detail.summary;
            }
        }

        info!(source = %Source::GsmArena, count = products.len(), "Found products");
        Ok(products)
    }
}
