use crate::config::AppConfig;
use crate::fetch::Fetcher;
use crate::model::{Product, ScrapeError, Source};
use crate::parser::mobiles91::parse_listing;
use crate::source::{SourceAdapter, endpoint, fetch_detail, fetch_first_listing, parse_base, slug};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::Url;
use std::sync::Arc;
use tracing::info;

/// Query-component escapes for the `%20` search template.
const QUERY: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>');

/// 91mobiles: several search URL layouts, listing prices, detail pages.
pub struct Mobiles91Adapter {
    fetcher: Arc<dyn Fetcher>,
    base: Url,
    max_results: usize,
}

impl Mobiles91Adapter {
    pub fn new(fetcher: Arc<dyn Fetcher>, base_url: &str, max_results: usize) -> Result<Self, ScrapeError> {
        Ok(Self {
            fetcher,
            base: parse_base(Source::Mobiles91, base_url)?,
            max_results,
        })
    }

    pub fn from_config(fetcher: Arc<dyn Fetcher>, config: &AppConfig) -> Result<Self, ScrapeError> {
        Self::new(fetcher, &config.sources.mobiles91, config.max_results_per_page)
    }

    /// Candidate search pages in the order they are tried.
    pub fn search_urls(&self, query: &str) -> Result<Vec<Url>, ScrapeError> {
        let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
        let slug = slug(&query);
        let source = Source::Mobiles91;

        let mut stext = endpoint(&self.base, source, &["search"])?;
        stext.query_pairs_mut().append_pair("stext", &query);

        let hub = endpoint(&self.base, source, &["hub", "mobiles", &slug])?;

        let mut search_text = endpoint(&self.base, source, &["search"])?;
        search_text.set_query(Some(&format!(
            "search_text={}",
            utf8_percent_encode(&query, QUERY)
        )));

        let path = endpoint(&self.base, source, &["search", &slug])?;

        Ok(vec![stext, hub, search_text, path])
    }
}

#[async_trait::async_trait]
impl SourceAdapter for Mobiles91Adapter {
    fn source(&self) -> Source {
        Source::Mobiles91
    }

    async fn search(&self, query: &str) -> Result<Vec<Product>, ScrapeError> {
        let urls = self.search_urls(query)?;
        let Some(body) = fetch_first_listing(self.fetcher.as_ref(), Source::Mobiles91, &urls).await else {
            return Ok(Vec::new());
        };

        let mut products = parse_listing(&body, &self.base, self.max_results);
        for product in &mut products {
            let Some(url) = product.product_url.clone() else {
                continue;
            };
            if let Some(detail) = fetch_detail(self.fetcher.as_ref(), Source::Mobiles91, &url).await {
                product.detailed_specs = detail.detailed_specs;
                product.features = detail.features;
                product.summary = detail.summary;
            }
        }

        info!(source = %Source::Mobiles91, count = products.len(), "Found products");
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FetchError;

    struct Offline;

    #[async_trait::async_trait]
    impl Fetcher for Offline {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            Err(FetchError::Timeout { url: url.to_string() })
        }
    }

    #[test]
    fn builds_templates_in_priority_order() {
        let adapter = Mobiles91Adapter::new(Arc::new(Offline), "https://www.91mobiles.com", 5).unwrap();
        let urls: Vec<String> = adapter
            .search_urls(" Galaxy  S24 ")
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            urls,
            [
                "https://www.91mobiles.com/search?stext=Galaxy+S24",
                "https://www.91mobiles.com/hub/mobiles/galaxy-s24",
                "https://www.91mobiles.com/search?search_text=Galaxy%20S24",
                "https://www.91mobiles.com/search/galaxy-s24",
            ]
        );
    }

    #[test]
    fn literal_percent_in_query_is_escaped() {
        let adapter = Mobiles91Adapter::new(Arc::new(Offline), "https://www.91mobiles.com", 5).unwrap();
        let urls = adapter.search_urls("100% battery").unwrap();
        assert_eq!(
            urls[2].as_str(),
            "https://www.91mobiles.com/search?search_text=100%25%20battery"
        );
        assert_eq!(urls[2].query_pairs().next().unwrap().1, "100% battery");
    }

    #[tokio::test]
    async fn unreachable_site_contributes_nothing() {
        let adapter = Mobiles91Adapter::new(Arc::new(Offline), "https://www.91mobiles.com", 5).unwrap();
        let products = adapter.search("pixel 8").await.unwrap();
        assert!(products.is_empty());
    }
}
