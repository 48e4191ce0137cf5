// Source adapters: one per scraped site
pub mod gsmarena;
pub mod mobiles91;

pub use gsmarena::GsmArenaAdapter;
pub use mobiles91::Mobiles91Adapter;

use crate::fetch::Fetcher;
use crate::model::{Product, ScrapeError, Source};
use crate::parser::{DetailInfo, parse_detail};

use regex::Regex;
use reqwest::Url;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Turns a query into listing records for one site.
///
/// Unreachable pages and unparsable cards yield fewer (or zero) products
/// rather than an error; `Err` is reserved for faults that make the adapter
/// unusable as a whole.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> Source;
    async fn search(&self, query: &str) -> Result<Vec<Product>, ScrapeError>;
}

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));

/// Heuristic for sites that answer unknown search paths with a 200 "not
/// found" page instead of a 404 status.
pub fn looks_not_found(body: &str) -> bool {
    let title_says_missing = TITLE
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|t| {
            let t = t.as_str().to_lowercase();
            t.contains("404") || t.contains("not found")
        })
        .unwrap_or(false);
    if title_says_missing {
        return true;
    }
    let lower = body.to_lowercase();
    lower.contains("page not found") || lower.contains("404 not found")
}

/// Tries `urls` in order and returns the first body that fetched and does
/// not look like a "not found" page.
pub(crate) async fn fetch_first_listing(
    fetcher: &dyn Fetcher,
    source: Source,
    urls: &[Url],
) -> Option<String> {
    for url in urls {
        match fetcher.fetch(url.as_str()).await {
            Ok(body) if !looks_not_found(&body) => {
                info!(%source, %url, "Search page fetched");
                return Some(body);
            }
            Ok(_) => warn!(%source, %url, "Search page looks like a not-found page"),
            Err(e) => warn!(%source, %url, "Search page fetch failed: {}", e),
        }
    }
    warn!(%source, tried = urls.len(), "All search URLs failed");
    None
}

/// Fetches and parses a product's own page. `None` when the fetch fails.
pub(crate) async fn fetch_detail(fetcher: &dyn Fetcher, source: Source, url: &str) -> Option<DetailInfo> {
    match fetcher.fetch(url).await {
        Ok(body) => {
            let detail = parse_detail(&body);
            if detail.is_empty() {
                debug!(%source, url, "Detail page had no recognizable sections");
            }
            Some(detail)
        }
        Err(e) => {
            warn!(%source, url, "Detail page fetch failed: {}", e);
            None
        }
    }
}

pub(crate) fn parse_base(source: Source, base: &str) -> Result<Url, ScrapeError> {
    let url = Url::parse(base).map_err(|e| ScrapeError::InvalidUrl {
        source_name: source,
        reason: format!("{base:?}: {e}"),
    })?;
    if url.cannot_be_a_base() {
        return Err(ScrapeError::InvalidUrl {
            source_name: source,
            reason: format!("{base:?} cannot be a base URL"),
        });
    }
    Ok(url)
}

/// `base` with `segments` appended to its path. Segments are percent-encoded.
pub(crate) fn endpoint(base: &Url, source: Source, segments: &[&str]) -> Result<Url, ScrapeError> {
    let mut url = base.clone();
    {
        let mut path = url.path_segments_mut().map_err(|()| ScrapeError::InvalidUrl {
            source_name: source,
            reason: format!("{base} cannot be a base URL"),
        })?;
        path.pop_if_empty().extend(segments);
    }
    Ok(url)
}

/// Lowercased, whitespace-collapsed, hyphen-joined query.
pub(crate) fn slug(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
